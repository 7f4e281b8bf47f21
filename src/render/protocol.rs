//! Protocol definitions shared between an overlay's handle, its engine task and the host surface.

use crate::geometry::{Bounds, Point, Rect, Size};
use crate::input::raw::ScrollEvent;
use crate::region::Zone;
use crate::sprite::ElementState;
use tokio::sync::oneshot;

pub use crate::cursor::Rotation;

/// Messages processed by the engine task, in arrival order.
#[derive(Debug)]
pub enum EngineMessage {
    /// A raw scroll event from the local or global delivery path.
    Scroll(ScrollEvent),
    /// Classify a window-local point for the host's hit-test handler.
    HitTest {
        point: Point,
        reply: oneshot::Sender<Zone>,
    },
    SetClickThrough(bool),
    /// The overlay window was resized; content bounds are recomputed (letterboxed).
    SetWindowSize(Size),
    /// Explicit rendered content bounds, overriding the letterboxed ones.
    SetContentBounds(Option<Bounds>),
    /// Request the current directives.
    Snapshot(oneshot::Sender<Vec<RenderDirective>>),
}

/// Observable per-element state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    Pressed { id: String },
    Released { id: String },
    WheelChanged { id: String, state: ElementState },
}

impl OverlayEvent {
    pub fn id(&self) -> &str {
        match self {
            OverlayEvent::Pressed { id }
            | OverlayEvent::Released { id }
            | OverlayEvent::WheelChanged { id, .. } => id,
        }
    }
}

/// How one element should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDirective {
    pub id: String,
    /// Texture region to draw.
    pub crop: Rect,
    /// Top-left corner on the canvas.
    pub position: Point,
    pub size: Size,
    pub rotation: Option<Rotation>,
    pub visible: bool,
    pub z: i32,
}

/// Everything one tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub events: Vec<OverlayEvent>,
    /// Set when any directive differs from the previous tick.
    pub directives_changed: bool,
}

impl TickOutput {
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty() && !self.directives_changed
    }
}
