//! The serialized per-overlay loop.

use crate::input::raw::InputSource;
use crate::render::protocol::{EngineMessage, TickOutput};
use crate::render::service::OverlayEngine;
use crate::render::surface::OverlaySurface;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Drive one engine until cancelled: ticks and queued messages are handled strictly one at a
/// time. Returns the engine so the caller decides when its state is dropped.
pub async fn engine_loop(
    mut engine: OverlayEngine,
    mut input: Box<dyn InputSource>,
    mut surface: Box<dyn OverlaySurface>,
    mut messages: UnboundedReceiver<EngineMessage>,
    cancellation_token: CancellationToken,
) -> OverlayEngine {
    let mut ticker = tokio::time::interval(engine.config().tick_interval);
    // A slow tick delays the next one; missed ticks are never replayed.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut frame_pending = false;

    loop {
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            message = messages.recv() => match message {
                Some(message) => engine.handle_message(message),
                None => break,
            },
            _ = ticker.tick() => {
                let output = engine.tick(input.as_mut(), Instant::now());
                frame_pending |= output.directives_changed;
                frame_pending = dispatch(&engine, &output, surface.as_mut(), frame_pending);
            }
        }
    }

    log::debug!("Overlay engine loop stopped");
    engine
}

/// Hand tick results to the surface. Returns whether a frame is still waiting to be presented.
fn dispatch(
    engine: &OverlayEngine,
    output: &TickOutput,
    surface: &mut dyn OverlaySurface,
    frame_pending: bool,
) -> bool {
    for event in &output.events {
        log::debug!("{event:?}");
        surface.on_event(event);
    }
    if !frame_pending {
        return false;
    }
    match surface.present(engine.directives()) {
        Ok(()) => false,
        Err(e) => {
            log::warn!("Failed to present overlay frame: {e}");
            true
        }
    }
}
