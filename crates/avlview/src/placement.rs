//! Window-placement watcher.
//!
//! AVL opens its plot windows at an arbitrary time after launch and offers no
//! notification, so the only option is to poll: enumerate each instance's
//! top-level windows until one appears, then move it to its planned
//! rectangle. Placement is cosmetic; every failure mode here degrades to
//! "window stays where AVL put it" and never affects the run outcome.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use winops::{Rect, WinOps};

use crate::{config, poll::poll_until};

/// Which of the two AVL instances a value refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceRole {
    /// The instance showing the 3D geometry view.
    Geometry,
    /// The instance showing the Trefftz-plane plot.
    Trefftz,
    /// A single non-interactive instance running an envelope batch. Never
    /// tracked by the placement watcher; it opens no windows.
    Batch,
}

impl std::fmt::Display for InstanceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geometry => f.write_str("geometry"),
            Self::Trefftz => f.write_str("Trefftz"),
            Self::Batch => f.write_str("batch"),
        }
    }
}

/// One process the watcher tracks.
#[derive(Clone, Copy, Debug)]
pub struct TrackedInstance {
    /// Which instance this is.
    pub role: InstanceRole,
    /// Its OS process id.
    pub pid: u32,
    /// The rectangle its first window should be moved to.
    pub target: Rect,
}

/// Watcher parameters.
#[derive(Clone, Debug)]
pub struct WatchConfig {
    /// The processes to place.
    pub tracked: Vec<TrackedInstance>,
    /// Timing knobs, defaulted from [`config::PLACEMENT`].
    pub timing: config::PlacementTiming,
}

impl WatchConfig {
    /// A config with default timing.
    #[must_use]
    pub fn new(tracked: Vec<TrackedInstance>) -> Self {
        Self {
            tracked,
            timing: config::PLACEMENT,
        }
    }
}

/// Terminal state of one tracked instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementState {
    /// Still looking for a window.
    Searching,
    /// A window was found and a move was attempted.
    Positioned,
    /// No window appeared before the timeout.
    TimedOut,
    /// Placement was not attempted: unsupported host or zero-area target.
    Skipped,
}

/// What happened to each tracked instance.
#[derive(Clone, Debug)]
pub struct PlacementReport {
    /// Final state per instance, in tracking order.
    pub outcomes: Vec<(InstanceRole, PlacementState)>,
}

impl PlacementReport {
    /// Final state for `role`, if tracked.
    #[must_use]
    pub fn state(&self, role: InstanceRole) -> Option<PlacementState> {
        self.outcomes
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, s)| *s)
    }
}

/// Handle to the spawned watcher task.
pub struct PlacementWatcher {
    handle: JoinHandle<PlacementReport>,
}

impl PlacementWatcher {
    /// Spawn the watcher. Cancellation of `parent` stops it early.
    pub fn spawn(
        ops: Arc<dyn WinOps>,
        watch_config: WatchConfig,
        parent: &CancellationToken,
    ) -> Self {
        let cancel = parent.child_token();
        let handle = tokio::spawn(watch(ops, watch_config, cancel));
        Self { handle }
    }

    /// Wait up to `grace` for the watcher to finish. Returns `None` when it
    /// is still running; the task then continues in the background and is
    /// reaped when the run token is cancelled at teardown.
    pub async fn join_within(self, grace: std::time::Duration) -> Option<PlacementReport> {
        match tokio::time::timeout(grace, self.handle).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(_)) | Err(_) => None,
        }
    }
}

/// Poll for windows and place each one exactly once.
///
/// A move is attempted a single time per instance; a refused move is logged
/// and the instance still counts as positioned, so one stubborn window can
/// never pin the watcher until its timeout.
async fn watch(
    ops: Arc<dyn WinOps>,
    watch_config: WatchConfig,
    cancel: CancellationToken,
) -> PlacementReport {
    let supported = ops.supported();
    let mut states: Vec<PlacementState> = watch_config
        .tracked
        .iter()
        .map(|inst| {
            if !supported {
                debug!(role = %inst.role, "window management unsupported on this host; skipping");
                PlacementState::Skipped
            } else if inst.target.is_degenerate() {
                warn!(
                    role = %inst.role,
                    target = ?inst.target,
                    "zero-area placement target; skipping placement"
                );
                PlacementState::Skipped
            } else {
                PlacementState::Searching
            }
        })
        .collect();

    let timing = watch_config.timing;
    let done = poll_until(timing.poll_interval, timing.timeout, &cancel, || {
        for (inst, state) in watch_config.tracked.iter().zip(states.iter_mut()) {
            if *state != PlacementState::Searching {
                continue;
            }
            let windows = ops.list_windows(inst.pid);
            let Some(window) = windows.first() else {
                continue;
            };
            match ops.move_window(window.handle, inst.target) {
                Ok(()) => {
                    info!(
                        role = %inst.role,
                        pid = inst.pid,
                        title = %window.title,
                        target = ?inst.target,
                        "positioned window"
                    );
                }
                Err(err) => {
                    warn!(
                        role = %inst.role,
                        pid = inst.pid,
                        %err,
                        "window move refused; leaving it where it is"
                    );
                }
            }
            *state = PlacementState::Positioned;
        }
        states
            .iter()
            .all(|state| *state != PlacementState::Searching)
            .then_some(())
    })
    .await;

    if done.is_none() {
        for (inst, state) in watch_config.tracked.iter().zip(states.iter_mut()) {
            if *state == PlacementState::Searching {
                warn!(
                    role = %inst.role,
                    pid = inst.pid,
                    "no window appeared before the placement timeout"
                );
                *state = PlacementState::TimedOut;
            }
        }
    }

    PlacementReport {
        outcomes: watch_config
            .tracked
            .iter()
            .map(|inst| inst.role)
            .zip(states)
            .collect(),
    }
}
