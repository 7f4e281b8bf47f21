//! Windows backend: key-state polling and the `WH_MOUSE_LL` wheel hook.

use crate::error::{OverlayError, Result};
use crate::geometry::Point;
use crate::input::observer::{InputObserver, ObserverHandle, ScrollCallback, SubscriberRegistry};
use crate::input::raw::{InputSource, ScrollEvent, ScrollOrigin};
use crate::layout::VirtualKey;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use windows::Win32::Foundation::{LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetCursorPos, HC_ACTION, HHOOK, MSLLHOOKSTRUCT, WM_MOUSEWHEEL,
};

/// Polls `GetAsyncKeyState` and `GetCursorPos`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncKeyStateSource;

impl InputSource for AsyncKeyStateSource {
    fn is_pressed(&mut self, key: VirtualKey) -> Result<bool> {
        // The high bit is set while the key is down.
        let state = unsafe { GetAsyncKeyState(key.0 as i32) };
        Ok(state < 0)
    }

    fn pointer_position(&mut self) -> Result<Option<Point>> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| OverlayError::input_read(0, format!("GetCursorPos failed: {e}")))?;
        Ok(Some(Point::new(point.x as f64, point.y as f64)))
    }
}

/// Subscribers of the process-wide hook; the hook thread runs while this is non-empty.
static HOOK: SubscriberRegistry<HookThread> = SubscriberRegistry::new();

#[derive(Debug)]
struct HookThread {
    thread_id: u32,
    join: JoinHandle<()>,
}

/// Global wheel observer backed by a low-level mouse hook on a dedicated message-loop thread.
///
/// All instances share one hook; it is installed with the first registration and removed with
/// the last.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowLevelMouseHook;

impl InputObserver for LowLevelMouseHook {
    fn start(&self, callback: ScrollCallback) -> Result<ObserverHandle> {
        HOOK.subscribe(callback, || {
            let installed = install_hook_thread()?;
            log::info!("Installed global mouse hook");
            Ok(installed)
        })
    }

    fn stop(&self, handle: ObserverHandle) {
        HOOK.unsubscribe(handle, remove_hook_thread);
    }
}

fn remove_hook_thread(thread: HookThread) {
    use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};
    unsafe {
        let _ = PostThreadMessageW(thread.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
    }
    if thread.join.join().is_err() {
        log::warn!("Mouse hook thread panicked");
    }
    log::info!("Removed global mouse hook");
}

fn install_hook_thread() -> Result<HookThread> {
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, PeekMessageW, SetWindowsHookExW, TranslateMessage,
        UnhookWindowsHookEx, MSG, PM_NOREMOVE, WH_MOUSE_LL,
    };

    let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel::<Result<u32>>(1);

    let join = std::thread::Builder::new()
        .name("overlay-mouse-hook".to_string())
        .spawn(move || {
            let mut msg = MSG::default();
            // Create the thread's message queue before anyone can post WM_QUIT to it.
            unsafe {
                let _ = PeekMessageW(&mut msg, None, 0, 0, PM_NOREMOVE);
            }

            let thread_id = unsafe { GetCurrentThreadId() };
            let hmodule = match unsafe { GetModuleHandleW(None) } {
                Ok(h) => h,
                Err(e) => {
                    let _ = ready_tx.send(Err(OverlayError::hook_install(e.to_string())));
                    return;
                }
            };

            let hook = match unsafe {
                SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), hmodule, 0)
            } {
                Ok(h) if !h.0.is_null() => h,
                Ok(_) => {
                    let _ = ready_tx.send(Err(OverlayError::hook_install(
                        windows::core::Error::from_win32().to_string(),
                    )));
                    return;
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(OverlayError::hook_install(e.to_string())));
                    return;
                }
            };

            let _ = ready_tx.send(Ok(thread_id));

            loop {
                let r = unsafe { GetMessageW(&mut msg, None, 0, 0) };
                if r.0 <= 0 {
                    break;
                }
                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            unsafe {
                let _ = UnhookWindowsHookEx(hook);
            }
        })
        .map_err(|e| OverlayError::hook_install(format!("cannot spawn hook thread: {e}")))?;

    let thread_id = ready_rx
        .recv_timeout(Duration::from_secs(2))
        .map_err(|_| OverlayError::hook_install("hook thread did not signal readiness"))??;

    Ok(HookThread { thread_id, join })
}

unsafe extern "system" fn mouse_hook_proc(n_code: i32, w_param: WPARAM, l_param: LPARAM) -> LRESULT {
    if n_code == HC_ACTION as i32 && w_param.0 as u32 == WM_MOUSEWHEEL {
        let info = unsafe { &*(l_param.0 as *const MSLLHOOKSTRUCT) };
        // The wheel delta is the signed high word of mouseData.
        let delta = (info.mouseData >> 16) as u16 as i16 as i32;
        let event = ScrollEvent::new(delta, ScrollOrigin::Global, Instant::now());

        HOOK.dispatch(event);
    }

    unsafe { CallNextHookEx(HHOOK(std::ptr::null_mut()), n_code, w_param, l_param) }
}
