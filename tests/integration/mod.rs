//! Integration test suite for the fxpm CLI.
//!
//! These tests exercise the built binary through its command-line surface.
//! Everything here is offline-safe: channels that are not installed are
//! classified without touching the network, and the commands under test
//! never reach the real download endpoints.
//!
//! ```bash
//! cargo test --test integration
//! ```

mod common;

mod cli_surface;
mod config_commands;
mod offline_behavior;
