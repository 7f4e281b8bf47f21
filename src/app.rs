//! Overlay instance lifecycle
//!
//! Opening an overlay loads its layout and texture, attaches the global wheel listener (when the
//! layout has a wheel) and spawns the engine task. Closing detaches the listener first, then stops
//! the task, then drops the runtime state.

pub mod runtime;

use crate::config::EngineConfig;
use crate::error::{OverlayError, Result};
use crate::geometry::{Bounds, Point, Size};
use crate::input::listener::WheelListener;
use crate::input::observer::InputObserver;
use crate::input::raw::{InputSource, ScrollEvent, ScrollOrigin};
use crate::layout::{validate_against_texture, OverlayLayout};
use crate::platform;
use crate::region::Zone;
use crate::render::protocol::{EngineMessage, RenderDirective};
use crate::render::service::OverlayEngine;
use crate::render::surface::OverlaySurface;
use crate::sprite::SpriteSheet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Where an overlay's assets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySources {
    pub layout_path: PathBuf,
    /// Overrides `texture.file` from the layout.
    pub texture_path: Option<PathBuf>,
}

impl OverlaySources {
    pub fn new(layout_path: impl Into<PathBuf>) -> Self {
        Self {
            layout_path: layout_path.into(),
            texture_path: None,
        }
    }

    pub fn with_texture(mut self, texture_path: impl Into<PathBuf>) -> Self {
        self.texture_path = Some(texture_path.into());
        self
    }

    /// The texture to load: the override, or `texture.file` next to the layout.
    pub fn resolve_texture(&self, layout: &OverlayLayout) -> PathBuf {
        match &self.texture_path {
            Some(path) => path.clone(),
            None => {
                let dir = self.layout_path.parent().unwrap_or_else(|| Path::new("."));
                layout.texture_path(dir)
            }
        }
    }
}

/// A layout together with its decoded, validated texture.
#[derive(Debug, Clone)]
pub struct LoadedOverlay {
    pub layout: Arc<OverlayLayout>,
    pub sprite_sheet: Arc<SpriteSheet>,
}

/// Load and cross-validate an overlay's layout and texture.
pub fn load_overlay(sources: &OverlaySources) -> Result<LoadedOverlay> {
    let layout = OverlayLayout::from_file(&sources.layout_path)?;
    let texture_path = sources.resolve_texture(&layout);
    let sprite_sheet = SpriteSheet::open(&texture_path)?;
    let (width, height) = sprite_sheet.dimensions();
    validate_against_texture(&layout, width, height)?;

    log::info!(
        "Loaded overlay {} ({} elements, texture {}x{})",
        sources.layout_path.display(),
        layout.elements.len(),
        width,
        height
    );
    Ok(LoadedOverlay {
        layout: Arc::new(layout),
        sprite_sheet: Arc::new(sprite_sheet),
    })
}

/// The collaborators an overlay runs against.
pub struct OverlayBackend {
    pub config: EngineConfig,
    pub input: Box<dyn InputSource>,
    pub observer: Arc<dyn InputObserver>,
    pub surface: Box<dyn OverlaySurface>,
}

impl OverlayBackend {
    pub fn new(
        input: Box<dyn InputSource>,
        observer: Arc<dyn InputObserver>,
        surface: Box<dyn OverlaySurface>,
    ) -> Self {
        Self {
            config: EngineConfig::default(),
            input,
            observer,
            surface,
        }
    }

    /// The platform's input backend and global observer.
    pub fn native(surface: Box<dyn OverlaySurface>) -> Self {
        Self::new(platform::native_input(), platform::native_observer(), surface)
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// One open overlay.
pub struct OverlayInstance {
    handle: OverlayHandle,
    layout: Arc<OverlayLayout>,
    sprite_sheet: Arc<SpriteSheet>,
    listener: Option<WheelListener>,
    observer_degraded: bool,
    cancellation_token: CancellationToken,
    task: Option<JoinHandle<OverlayEngine>>,
}

impl OverlayInstance {
    /// Load the overlay's assets and start its engine task.
    ///
    /// Load failures (`ConfigError`, `AssetError`) are returned and nothing is started. A global
    /// observer that cannot be installed only degrades the instance to local scrolling.
    pub async fn open(sources: OverlaySources, backend: OverlayBackend) -> Result<Self> {
        let loaded = tokio::task::spawn_blocking(move || load_overlay(&sources))
            .await
            .map_err(|e| OverlayError::other(format!("overlay loader failed: {e}")))??;
        Ok(Self::start(loaded, backend))
    }

    /// Start an engine for an already loaded overlay.
    pub fn start(loaded: LoadedOverlay, backend: OverlayBackend) -> Self {
        let LoadedOverlay {
            layout,
            sprite_sheet,
        } = loaded;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut observer_degraded = false;
        let listener = if layout.has_wheel_elements() {
            let mut listener = WheelListener::new(backend.observer);
            if let Err(e) = listener.attach(tx.clone()) {
                log::warn!("{e}; continuing with local scrolling only");
                observer_degraded = true;
            }
            Some(listener)
        } else {
            None
        };

        let engine = OverlayEngine::new(Arc::clone(&layout), backend.config);
        let cancellation_token = CancellationToken::new();
        let task = tokio::spawn(runtime::engine_loop(
            engine,
            backend.input,
            backend.surface,
            rx,
            cancellation_token.clone(),
        ));

        Self {
            handle: OverlayHandle { tx },
            layout,
            sprite_sheet,
            listener,
            observer_degraded,
            cancellation_token,
            task: Some(task),
        }
    }

    /// A cloneable handle for the host window's event handlers.
    pub fn handle(&self) -> OverlayHandle {
        self.handle.clone()
    }

    pub fn layout(&self) -> &Arc<OverlayLayout> {
        &self.layout
    }

    pub fn sprite_sheet(&self) -> &Arc<SpriteSheet> {
        &self.sprite_sheet
    }

    /// True when the layout wanted global wheel events but the observer could not be installed.
    pub fn observer_degraded(&self) -> bool {
        self.observer_degraded
    }

    pub fn has_global_listener(&self) -> bool {
        self.listener.as_ref().map_or(false, WheelListener::is_attached)
    }

    /// Stop the overlay and return its engine with the final runtime state.
    pub async fn close(mut self) -> Result<OverlayEngine> {
        // Removing the last OS hook joins its thread.
        if let Some(mut listener) = self.listener.take() {
            tokio::task::spawn_blocking(move || listener.detach())
                .await
                .map_err(|e| OverlayError::other(format!("listener detach failed: {e}")))?;
        }
        self.cancellation_token.cancel();
        let task = self.task.take().ok_or(OverlayError::EngineStopped)?;
        let engine = task
            .await
            .map_err(|e| OverlayError::other(format!("overlay engine task failed: {e}")))?;
        log::info!("Closed overlay ({} elements)", engine.layout().elements.len());
        Ok(engine)
    }
}

impl Drop for OverlayInstance {
    fn drop(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            listener.detach();
        }
        self.cancellation_token.cancel();
    }
}

/// Sends host events to a running overlay. Every call fails with `EngineStopped` after close.
#[derive(Debug, Clone)]
pub struct OverlayHandle {
    tx: mpsc::UnboundedSender<EngineMessage>,
}

impl OverlayHandle {
    fn send(&self, message: EngineMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| OverlayError::EngineStopped)
    }

    /// Forward a wheel delta received by the overlay window itself.
    pub fn scroll(&self, delta: i32) -> Result<()> {
        self.send(EngineMessage::Scroll(ScrollEvent::new(
            delta,
            ScrollOrigin::Local,
            Instant::now(),
        )))
    }

    /// Classify a window-local point.
    pub async fn hit_test(&self, point: Point) -> Result<Zone> {
        let (reply, response) = oneshot::channel();
        self.send(EngineMessage::HitTest { point, reply })?;
        response.await.map_err(|_| OverlayError::EngineStopped)
    }

    pub fn set_click_through(&self, enabled: bool) -> Result<()> {
        self.send(EngineMessage::SetClickThrough(enabled))
    }

    pub fn set_window_size(&self, size: Size) -> Result<()> {
        self.send(EngineMessage::SetWindowSize(size))
    }

    pub fn set_content_bounds(&self, bounds: Option<Bounds>) -> Result<()> {
        self.send(EngineMessage::SetContentBounds(bounds))
    }

    /// The directives of the most recent tick.
    pub async fn snapshot(&self) -> Result<Vec<RenderDirective>> {
        let (reply, response) = oneshot::channel();
        self.send(EngineMessage::Snapshot(reply))?;
        response.await.map_err(|_| OverlayError::EngineStopped)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
