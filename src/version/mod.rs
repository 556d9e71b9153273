//! Version resolution and comparison.
//!
//! Three concerns live here:
//!
//! - [`local`] answers "what version is installed?" for a channel's
//!   executable, falling back through an ordered list of sources and
//!   degrading to the `"unknown"` sentinel rather than failing.
//! - [`remote`] answers "what version is currently published?" by following
//!   the channel's download redirect and reading the version token out of
//!   the final URL. Absence of an answer is an outcome, not an error.
//! - [`compare`] turns the product's lenient version strings into ordered
//!   numeric tuples and decides whether the remote is newer than the local.
//!
//! The product's versioning is deliberately *not* semver: the remote feed
//! publishes `major.minor` tokens (possibly with an alnum suffix like
//! `131.0a1`), while local metadata can carry four components. The
//! comparator truncates accordingly; see [`compare::is_newer`].

pub mod compare;
pub mod local;
pub mod remote;

pub use compare::{is_newer, parse_version_tuple};
pub use local::resolve_local_version;
pub use remote::{RemoteProbe, resolve_remote_version};
