//! Low-level input primitives: the polling contract hosts implement, raw scroll events as they
//! arrive from the local and global paths, and the debouncer that turns them into pulses.

use crate::error::Result;
use crate::geometry::Point;
use crate::layout::VirtualKey;
use std::time::{Duration, Instant};

/// Polled view of the physical input devices.
///
/// Called from the engine task once per tick. A failed read is reported as a
/// `TransientInputRead` and treated as "no change" by the sampler.
pub trait InputSource: Send {
    /// Current level of a key or mouse button.
    fn is_pressed(&mut self, key: VirtualKey) -> Result<bool>;

    /// Current pointer position in screen coordinates, if the host can report one.
    fn pointer_position(&mut self) -> Result<Option<Point>>;
}

/// Where a scroll event was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrigin {
    /// Delivered by the host while the pointer is over the overlay window.
    Local,
    /// Delivered by the system-wide observer.
    Global,
}

/// A raw wheel event, before debouncing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub delta: i32,
    pub origin: ScrollOrigin,
    pub at: Instant,
}

impl ScrollEvent {
    pub fn new(delta: i32, origin: ScrollOrigin, at: Instant) -> Self {
        Self { delta, origin, at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Direction of a non-zero wheel delta; positive is away from the user.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta.signum() {
            1 => Some(ScrollDirection::Up),
            -1 => Some(ScrollDirection::Down),
            _ => None,
        }
    }
}

/// One accepted scroll notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPulse {
    pub direction: ScrollDirection,
    pub at: Instant,
}

/// Drops zero deltas and same-direction repeats that arrive inside the debounce window.
///
/// Both delivery paths can report the same physical notch, and some devices emit several events
/// per notch. Only the last *accepted* pulse is remembered, so a burst cannot extend itself.
#[derive(Debug, Clone)]
pub struct PulseDebouncer {
    window: Duration,
    last: Option<ScrollPulse>,
}

impl PulseDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Normalize one raw event. Returns the pulse when it should reach the wheel machines.
    pub fn accept(&mut self, event: &ScrollEvent) -> Option<ScrollPulse> {
        let direction = ScrollDirection::from_delta(event.delta)?;

        if let Some(last) = self.last {
            let elapsed = event.at.saturating_duration_since(last.at);
            if last.direction == direction && elapsed < self.window {
                log::trace!(
                    "Debounced {:?} scroll ({:?} after previous, {:?})",
                    direction,
                    elapsed,
                    event.origin
                );
                return None;
            }
        }

        let pulse = ScrollPulse {
            direction,
            at: event.at,
        };
        self.last = Some(pulse);
        Some(pulse)
    }

    pub fn last_accepted(&self) -> Option<ScrollPulse> {
        self.last
    }
}
