//! Trait abstraction over window operations to improve testability.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use crate::{
    Result as WinResult,
    geom::Rect,
    window::{WindowHandle, WindowInfo},
};

/// Capability object for window discovery and placement.
///
/// Construction-time selection of an implementation replaces any global
/// platform flag: callers hold an `Arc<dyn WinOps>` and never ask what host
/// they run on.
pub trait WinOps: Send + Sync {
    /// Whether this implementation can manage windows at all. When false,
    /// watchers skip placement instead of polling to a pointless timeout.
    fn supported(&self) -> bool {
        true
    }

    /// Visible, titled top-level windows owned by `pid`. Empty when the
    /// process has no window yet or has already exited; callers must treat
    /// those identically.
    fn list_windows(&self, pid: u32) -> Vec<WindowInfo>;

    /// Move `handle` to `rect`.
    fn move_window(&self, handle: WindowHandle, rect: Rect) -> WinResult<()>;

    /// Primary display dimensions in pixels.
    fn screen_size(&self) -> (i32, i32);
}

/// Production implementation delegating to the Win32 primitives.
#[cfg(windows)]
pub struct RealWinOps;

#[cfg(windows)]
impl WinOps for RealWinOps {
    fn list_windows(&self, pid: u32) -> Vec<WindowInfo> {
        crate::window::platform::list_windows(pid)
    }

    fn move_window(&self, handle: WindowHandle, rect: Rect) -> WinResult<()> {
        crate::window::platform::move_window(handle, rect)
    }

    fn screen_size(&self) -> (i32, i32) {
        crate::window::platform::screen_size()
    }
}

/// No-op implementation for hosts without window management. Reports itself
/// unsupported so watchers can skip placement up front.
pub struct NoopWinOps;

impl WinOps for NoopWinOps {
    fn supported(&self) -> bool {
        false
    }

    fn list_windows(&self, _pid: u32) -> Vec<WindowInfo> {
        Vec::new()
    }

    fn move_window(&self, _handle: WindowHandle, _rect: Rect) -> WinResult<()> {
        Err(crate::Error::Unsupported)
    }

    fn screen_size(&self) -> (i32, i32) {
        (0, 0)
    }
}

/// The window capability for the current host.
#[cfg(windows)]
#[must_use]
pub fn platform() -> Arc<dyn WinOps> {
    Arc::new(RealWinOps)
}

/// The window capability for the current host.
#[cfg(not(windows))]
#[must_use]
pub fn platform() -> Arc<dyn WinOps> {
    Arc::new(NoopWinOps)
}

/// Simple mock implementation for tests.
#[derive(Clone, Default)]
pub struct MockWinOps {
    /// Scripted window lists, keyed by pid.
    windows: Arc<Mutex<Vec<WindowInfo>>>,
    /// Recorded successful and refused move attempts.
    moves: Arc<Mutex<Vec<(WindowHandle, Rect)>>>,
    /// When set, every move attempt is refused.
    fail_move: Arc<AtomicBool>,
    /// Screen dimensions reported to callers.
    screen: Arc<Mutex<(i32, i32)>>,
}

impl MockWinOps {
    /// Create a mock with no windows and a zero-size screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scripted window list.
    pub fn set_windows(&self, windows: Vec<WindowInfo>) {
        *self.windows.lock() = windows;
    }

    /// Make all subsequent move attempts fail.
    pub fn set_fail_move(&self, fail: bool) {
        self.fail_move.store(fail, Ordering::SeqCst);
    }

    /// Set the reported screen dimensions.
    pub fn set_screen(&self, width: i32, height: i32) {
        *self.screen.lock() = (width, height);
    }

    /// Every move attempt observed so far, in order.
    #[must_use]
    pub fn moves(&self) -> Vec<(WindowHandle, Rect)> {
        self.moves.lock().clone()
    }
}

impl WinOps for MockWinOps {
    fn list_windows(&self, pid: u32) -> Vec<WindowInfo> {
        self.windows
            .lock()
            .iter()
            .filter(|w| w.pid == pid)
            .cloned()
            .collect()
    }

    fn move_window(&self, handle: WindowHandle, rect: Rect) -> WinResult<()> {
        self.moves.lock().push((handle, rect));
        if self.fail_move.load(Ordering::SeqCst) {
            return Err(crate::Error::MoveRefused { handle, code: 5 });
        }
        Ok(())
    }

    fn screen_size(&self) -> (i32, i32) {
        *self.screen.lock()
    }
}
