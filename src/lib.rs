//! # input-overlay - Input-to-Visual State Engine
//!
//! Drives transparent overlays that mirror the live state of keyboard keys, mouse buttons, the
//! scroll wheel and pointer movement. Each overlay is described by a sprite-sheet image and a
//! declarative JSON layout; the engine turns polled key levels and asynchronous wheel events into
//! per-element render directives.
//!
//! ## Features
//!
//! - **Declarative layouts**: Elements with input bindings, sprite regions and z-order
//! - **Wheel fusion**: Debounced global and local scroll pulses merged with the wheel button,
//!   with timed decay and press-over-scroll priority
//! - **Cursor elements**: Arrow (rotates with motion) and dot (bounded drift) modes
//! - **Resize regions**: Hit-testing for borderless, letterboxed overlay windows
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`layout`] - Layout documents, elements and input bindings
//! - [`sprite`] - Sprite-region resolution and texture cropping
//! - [`input`] - Polling, scroll debouncing, wheel state machines and global observers
//! - [`cursor`] - Arrow and dot cursor tracking
//! - [`region`] - Window-region classification
//! - [`render`] - The per-overlay engine and its host protocol
//! - [`app`] - Overlay instance lifecycle

// Core modules
pub mod config;
pub mod error;
pub mod geometry;

// Layout model and element state
pub mod layout;
pub mod sprite;
pub mod state;

// Subsystems
pub mod cursor;
pub mod input;
pub mod region;
pub mod render;

// Core components
pub mod app;
pub mod platform;

// Re-export commonly used types for convenience
pub use error::{OverlayError, Result};

// Public API surface for external usage
pub use app::{load_overlay, OverlayBackend, OverlayHandle, OverlayInstance, OverlaySources};
pub use config::EngineConfig;
pub use layout::{Element, ElementKind, OverlayLayout, VirtualKey};
pub use region::Zone;
pub use render::{OverlayEngine, OverlayEvent, OverlaySurface, RenderDirective};
pub use sprite::{ElementState, SpriteResolver, SpriteSheet};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
