//! Fixed timing parameters for the orchestration run.
//!
//! These values are tuned around how long AVL takes to open its plot windows
//! and write its stability report on a typical workstation. They are
//! deliberately not CLI-configurable.

use std::time::Duration;

/// Timing for the window-placement watcher.
#[derive(Clone, Copy, Debug)]
pub struct PlacementTiming {
    /// Give up searching for windows after this long.
    pub timeout: Duration,
    /// Delay between enumeration passes.
    pub poll_interval: Duration,
    /// How long the supervisor waits for placement before sending the
    /// refresh scripts anyway.
    pub grace: Duration,
}

/// Default placement timing.
pub const PLACEMENT: PlacementTiming = PlacementTiming {
    timeout: Duration::from_secs(60),
    poll_interval: Duration::from_millis(500),
    grace: Duration::from_secs(5),
};

/// Timing for the neutral-point capture watcher.
#[derive(Clone, Copy, Debug)]
pub struct CaptureTiming {
    /// Give up waiting for the stability report after this long.
    pub timeout: Duration,
    /// Delay between report reads.
    pub poll_interval: Duration,
    /// How long the supervisor waits for the capture result at teardown.
    pub join_grace: Duration,
}

/// Default capture timing.
pub const CAPTURE: CaptureTiming = CaptureTiming {
    timeout: Duration::from_secs(10),
    poll_interval: Duration::from_millis(200),
    join_grace: Duration::from_secs(1),
};

/// Delays between supervisor phases.
#[derive(Clone, Copy, Debug)]
pub struct SettleDelays {
    /// Pause after placement settles before the first refresh script, so the
    /// plot is not redrawn mid-move.
    pub pre_refresh: Duration,
    /// Pause between the geometry and Trefftz refresh scripts.
    pub between_refresh: Duration,
    /// Pause before the liveness check, long enough for a crashing AVL to
    /// have actually exited.
    pub liveness: Duration,
}

/// Default settle delays.
pub const SETTLE: SettleDelays = SettleDelays {
    pre_refresh: Duration::from_secs(1),
    between_refresh: Duration::from_millis(300),
    liveness: Duration::from_secs(3),
};
