//! Rendering subsystem.
//!
//! The engine produces one `RenderDirective` per element each tick; the host's `OverlaySurface`
//! draws them. Nothing here touches a window system.

pub mod protocol;
pub mod service;
pub mod surface;

pub use protocol::{EngineMessage, OverlayEvent, RenderDirective, Rotation, TickOutput};
pub use service::OverlayEngine;
pub use surface::{NullSurface, OverlaySurface};
