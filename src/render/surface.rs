//! Host drawing contract
//!
//! This module defines the `OverlaySurface` trait the host implements to draw an overlay. The
//! surface is owned by the overlay's engine task, so both hooks run on that task.

use crate::error::Result;
use crate::render::protocol::{OverlayEvent, RenderDirective};

/// Core trait for drawing an overlay and observing its element changes
pub trait OverlaySurface: Send {
    /// Draw a complete frame
    ///
    /// Called with every element's directive, in draw order, whenever any of them changed.
    /// An error is logged and the next change is presented again.
    fn present(&mut self, directives: &[RenderDirective]) -> Result<()>;

    /// Observe a press/release/wheel change. Default: ignore.
    fn on_event(&mut self, _event: &OverlayEvent) {}
}

/// Surface that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl OverlaySurface for NullSurface {
    fn present(&mut self, _directives: &[RenderDirective]) -> Result<()> {
        Ok(())
    }
}
