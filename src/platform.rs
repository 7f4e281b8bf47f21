//! Input backends.
//!
//! On Windows the native backend polls `GetAsyncKeyState`/`GetCursorPos` and installs a
//! low-level mouse hook for global wheel events. Elsewhere the host feeds levels through a
//! `SharedInput` and no global observer is available.

#[cfg(windows)]
pub mod win32;

use crate::error::Result;
use crate::geometry::Point;
use crate::input::observer::InputObserver;
use crate::input::raw::InputSource;
use crate::layout::VirtualKey;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ManualLevels {
    down: HashSet<VirtualKey>,
    pointer: Option<Point>,
}

/// Input levels set by the host from its own event loop.
///
/// Clones share state, so one clone can be handed to the overlay while the host keeps another.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    levels: Arc<Mutex<ManualLevels>>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pressed(&self, key: VirtualKey, pressed: bool) {
        let mut levels = self.levels.lock();
        if pressed {
            levels.down.insert(key);
        } else {
            levels.down.remove(&key);
        }
    }

    pub fn set_pointer(&self, position: Option<Point>) {
        self.levels.lock().pointer = position;
    }

    pub fn release_all(&self) {
        self.levels.lock().down.clear();
    }
}

impl InputSource for SharedInput {
    fn is_pressed(&mut self, key: VirtualKey) -> Result<bool> {
        Ok(self.levels.lock().down.contains(&key))
    }

    fn pointer_position(&mut self) -> Result<Option<Point>> {
        Ok(self.levels.lock().pointer)
    }
}

/// Source with nothing pressed and no pointer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl InputSource for NullInput {
    fn is_pressed(&mut self, _key: VirtualKey) -> Result<bool> {
        Ok(false)
    }

    fn pointer_position(&mut self) -> Result<Option<Point>> {
        Ok(None)
    }
}

/// The platform's polling backend.
pub fn native_input() -> Box<dyn InputSource> {
    #[cfg(windows)]
    {
        Box::new(win32::AsyncKeyStateSource)
    }
    #[cfg(not(windows))]
    {
        log::warn!("No native input backend on this platform; nothing will be sampled");
        Box::new(NullInput)
    }
}

/// The platform's global wheel observer.
pub fn native_observer() -> Arc<dyn InputObserver> {
    #[cfg(windows)]
    {
        Arc::new(win32::LowLevelMouseHook)
    }
    #[cfg(not(windows))]
    {
        Arc::new(crate::input::observer::NoopObserver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_input_clones_share_levels() {
        let host = SharedInput::new();
        let mut overlay = host.clone();
        host.set_pressed(VirtualKey::SPACE, true);
        host.set_pointer(Some(Point::new(3.0, 4.0)));
        assert!(overlay.is_pressed(VirtualKey::SPACE).unwrap());
        assert_eq!(overlay.pointer_position().unwrap(), Some(Point::new(3.0, 4.0)));

        host.release_all();
        assert!(!overlay.is_pressed(VirtualKey::SPACE).unwrap());
    }

    #[test]
    fn null_input_reports_nothing() {
        let mut input = NullInput;
        assert!(!input.is_pressed(VirtualKey::LBUTTON).unwrap());
        assert!(input.pointer_position().unwrap().is_none());
    }
}
