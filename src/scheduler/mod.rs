//! Background reconciliation and install scheduling.
//!
//! The CLI command handler is the coordinating context: it never performs
//! network or archive work itself. Every sweep, check, and install runs on
//! its own `tokio` task, and results flow back over an ordered
//! [`tokio::sync::mpsc`] channel carrying typed [`ReconcileEvent`] variants
//! that only the coordinator applies to presentation state.
//!
//! Per-channel mutual exclusion: [`ChannelLocks`] is a busy set keyed by
//! channel name. A [`ChannelGuard`] is acquired *before* an install task is
//! spawned and released unconditionally when the task finishes (the guard
//! is RAII, so success, failure, and panic all clear the flag). A second
//! install request for a busy channel is rejected with
//! [`FxpmError::ChannelBusy`] rather than queued.
//!
//! The startup sweep checks channels sequentially on one background task —
//! correctness allows parallel checks, but sequential avoids unbounded
//! concurrent network fan-out. Checks for *different* channels triggered
//! individually are independent and may overlap freely.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::channel::{Channel, ChannelName, ChannelPaths, LocalInstallation};
use crate::config::Settings;
use crate::core::FxpmError;
use crate::installer::InstallPipeline;
use crate::status::InstallStatus;
use crate::version::RemoteProbe;

/// Typed results posted from background tasks to the coordinator.
#[derive(Debug)]
pub enum ReconcileEvent {
    /// A channel's status was resolved (sweep, check, or post-install).
    Status {
        /// Channel the status belongs to
        channel: ChannelName,
        /// The resolved status
        status: InstallStatus,
    },
    /// A human-readable progress line from an in-flight operation.
    Progress {
        /// Channel the line belongs to
        channel: ChannelName,
        /// The progress message
        message: String,
    },
    /// An install task ran to completion or failure.
    InstallFinished {
        /// Channel the install targeted
        channel: ChannelName,
        /// The pipeline outcome
        result: Result<(), FxpmError>,
    },
    /// The startup sweep visited every channel.
    SweepFinished {
        /// How many channels reported an available update
        updates_available: usize,
    },
}

/// Busy set enforcing at most one install per channel.
#[derive(Debug, Default)]
pub struct ChannelLocks {
    busy: DashMap<ChannelName, ()>,
}

impl ChannelLocks {
    /// Create an empty busy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `channel` busy, or fail if it already is.
    pub fn try_acquire(self: &Arc<Self>, channel: ChannelName) -> Result<ChannelGuard, FxpmError> {
        match self.busy.entry(channel) {
            Entry::Occupied(_) => Err(FxpmError::ChannelBusy {
                channel: channel.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(ChannelGuard {
                    locks: Arc::clone(self),
                    channel,
                })
            }
        }
    }

    /// Whether an install is currently in flight for `channel`.
    pub fn is_busy(&self, channel: ChannelName) -> bool {
        self.busy.contains_key(&channel)
    }
}

/// RAII handle for a channel's busy flag; clears it on drop.
#[derive(Debug)]
pub struct ChannelGuard {
    locks: Arc<ChannelLocks>,
    channel: ChannelName,
}

impl Drop for ChannelGuard {
    fn drop(&mut self) {
        self.locks.busy.remove(&self.channel);
    }
}

/// Dispatches reconciliation sweeps, single-channel checks, and installs.
pub struct Scheduler {
    settings: Arc<Settings>,
    locks: Arc<ChannelLocks>,
}

impl Scheduler {
    /// Create a scheduler over an immutable settings snapshot.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            locks: Arc::new(ChannelLocks::new()),
        }
    }

    /// The busy set, shared with anything else that needs to observe it.
    pub fn locks(&self) -> &Arc<ChannelLocks> {
        &self.locks
    }

    /// Resolve one channel's status: inspect the local installation, probe
    /// the remote feed only when a known local version makes the answer
    /// actionable.
    async fn resolve_status(probe: &RemoteProbe, settings: &Settings, channel: &Channel) -> InstallStatus {
        let paths = ChannelPaths::new(&settings.base_dir, channel.name);
        let local = LocalInstallation::inspect(&paths);

        if !local.installed || local.version_unknown() {
            // No probe: the verdict cannot change, and the sweep should not
            // spend network time on it
            return InstallStatus::resolve(&local, None);
        }

        let remote = probe.resolve(&channel.url).await;
        InstallStatus::resolve(&local, remote.as_deref())
    }

    /// Spawn the startup sweep over `channels` on one background task.
    ///
    /// Channels are checked sequentially; a [`ReconcileEvent::Status`] is
    /// posted per channel and a [`ReconcileEvent::SweepFinished`] at the
    /// end. Failures degrade inside the check (a probe failure is an
    /// `UpToDate` verdict, not an error event).
    pub fn spawn_sweep(&self, channels: Vec<Channel>) -> UnboundedReceiver<ReconcileEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let settings = Arc::clone(&self.settings);

        tokio::spawn(async move {
            info!("starting reconciliation sweep over {} channels", channels.len());
            let probe = RemoteProbe::new();
            let mut updates_available = 0;

            for channel in &channels {
                let status = Self::resolve_status(&probe, &settings, channel).await;
                if status.update_available() {
                    updates_available += 1;
                }
                if tx
                    .send(ReconcileEvent::Status {
                        channel: channel.name,
                        status,
                    })
                    .is_err()
                {
                    // Coordinator went away; nothing left to report to
                    return;
                }
            }

            info!("sweep finished, {updates_available} update(s) available");
            let _ = tx.send(ReconcileEvent::SweepFinished { updates_available });
        });

        rx
    }

    /// Spawn an on-demand check of one channel, returning the raw pair the
    /// confirmation dialog needs (local snapshot plus remote version).
    pub fn spawn_check(&self, channel: Channel) -> JoinHandle<(LocalInstallation, Option<String>)> {
        let settings = Arc::clone(&self.settings);
        tokio::spawn(async move {
            let paths = ChannelPaths::new(&settings.base_dir, channel.name);
            let local = LocalInstallation::inspect(&paths);
            let remote = RemoteProbe::new().resolve(&channel.url).await;
            (local, remote)
        })
    }

    /// Spawn an install for `channel`, rejecting the request if one is
    /// already in flight.
    ///
    /// The busy flag is acquired *before* the task is spawned and released
    /// when the task finishes, whatever the outcome. The task posts
    /// progress lines, the final [`ReconcileEvent::InstallFinished`], and a
    /// re-resolved [`ReconcileEvent::Status`] after completion.
    pub fn spawn_install(&self, channel: Channel) -> Result<UnboundedReceiver<ReconcileEvent>, FxpmError> {
        let guard = self.locks.try_acquire(channel.name)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let settings = Arc::clone(&self.settings);

        tokio::spawn(async move {
            // Held for the whole task; dropped unconditionally on exit
            let _guard = guard;

            let pipeline =
                InstallPipeline::new(channel.clone(), Arc::clone(&settings)).with_events(tx.clone());
            let result = pipeline.execute().await;

            if let Err(err) = &result {
                warn!("install of {} failed: {err}", channel.name);
            }
            let _ = tx.send(ReconcileEvent::InstallFinished {
                channel: channel.name,
                result,
            });

            // Completion re-triggers status resolution for the consumer
            let status = Self::resolve_status(&RemoteProbe::new(), &settings, &channel).await;
            let _ = tx.send(ReconcileEvent::Status {
                channel: channel.name,
                status,
            });
        });

        Ok(rx)
    }
}
