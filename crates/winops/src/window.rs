//! Top-level window records and the platform enumeration primitives.

/// Opaque platform handle for a top-level window.
pub type WindowHandle = isize;

/// A visible top-level window owned by a tracked process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Platform handle used for move requests.
    pub handle: WindowHandle,
    /// Owning process id.
    pub pid: u32,
    /// Window title. Enumeration only reports windows with a non-empty
    /// title; untitled helper windows are filtered out.
    pub title: String,
}

#[cfg(windows)]
pub(crate) mod platform {
    //! Win32 bindings: enumerate, move, and measure via user32.

    use tracing::{debug, trace};
    use windows_sys::Win32::{
        Foundation::{HWND, LPARAM},
        UI::WindowsAndMessaging::{
            EnumWindows, GetSystemMetrics, GetWindowTextLengthW, GetWindowTextW,
            GetWindowThreadProcessId, IsWindowVisible, MoveWindow, SM_CXSCREEN, SM_CYSCREEN,
        },
    };

    use super::{WindowHandle, WindowInfo};
    use crate::{
        error::{Error, Result},
        geom::Rect,
    };

    /// State threaded through the `EnumWindows` callback.
    struct EnumState {
        pid: u32,
        found: Vec<WindowInfo>,
    }

    unsafe extern "system" fn enum_proc(hwnd: HWND, lparam: LPARAM) -> i32 {
        let state = unsafe { &mut *(lparam as *mut EnumState) };
        unsafe {
            if IsWindowVisible(hwnd) == 0 {
                return 1;
            }
            let mut owner: u32 = 0;
            GetWindowThreadProcessId(hwnd, &mut owner);
            if owner != state.pid {
                return 1;
            }
            let title = window_title(hwnd);
            if title.is_empty() {
                return 1;
            }
            state.found.push(WindowInfo {
                handle: hwnd as WindowHandle,
                pid: owner,
                title,
            });
        }
        1
    }

    unsafe fn window_title(hwnd: HWND) -> String {
        unsafe {
            let len = GetWindowTextLengthW(hwnd);
            if len <= 0 {
                return String::new();
            }
            let mut buf = vec![0u16; (len + 1) as usize];
            let copied = GetWindowTextW(hwnd, buf.as_mut_ptr(), len + 1);
            if copied <= 0 {
                return String::new();
            }
            String::from_utf16_lossy(&buf[..copied as usize])
                .trim()
                .to_string()
        }
    }

    /// Enumerate visible, titled top-level windows owned by `pid`.
    ///
    /// Enumeration order is whatever the platform reports and is not stable
    /// across calls. A pid that no longer exists yields an empty list.
    pub(crate) fn list_windows(pid: u32) -> Vec<WindowInfo> {
        trace!(pid, "list_windows");
        let mut state = EnumState {
            pid,
            found: Vec::new(),
        };
        unsafe {
            if EnumWindows(Some(enum_proc), &mut state as *mut EnumState as LPARAM) == 0 {
                debug!(pid, "EnumWindows returned FALSE");
            }
        }
        state.found
    }

    /// Move `handle` to `rect`, repainting. Platform refusal is an error the
    /// caller absorbs; placement is best-effort.
    pub(crate) fn move_window(handle: WindowHandle, rect: Rect) -> Result<()> {
        let ok = unsafe {
            MoveWindow(
                handle as HWND,
                rect.left,
                rect.top,
                rect.width,
                rect.height,
                1,
            )
        };
        if ok == 0 {
            let code = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            return Err(Error::MoveRefused { handle, code });
        }
        Ok(())
    }

    /// Primary display dimensions in pixels.
    pub(crate) fn screen_size() -> (i32, i32) {
        unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
    }
}
