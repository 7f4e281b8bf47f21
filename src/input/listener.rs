//! Global wheel listener: binds an `InputObserver` registration to one engine queue.

use crate::error::Result;
use crate::input::observer::{InputObserver, ObserverHandle, ScrollCallback};
use crate::render::protocol::EngineMessage;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct WheelListener {
    observer: Arc<dyn InputObserver>,
    handle: Option<ObserverHandle>,
}

impl WheelListener {
    pub fn new(observer: Arc<dyn InputObserver>) -> Self {
        Self {
            observer,
            handle: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Start forwarding global scroll events into `tx`.
    ///
    /// The callback only enqueues; once the engine is gone the send fails and the event is
    /// dropped.
    pub fn attach(&mut self, tx: UnboundedSender<EngineMessage>) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let callback: ScrollCallback = Arc::new(move |event| {
            if tx.send(EngineMessage::Scroll(event)).is_err() {
                log::trace!("Dropping global scroll event for a closed overlay");
            }
        });
        self.handle = Some(self.observer.start(callback)?);
        log::debug!("Global wheel listener attached");
        Ok(())
    }

    /// Stop the observer registration. Idempotent.
    pub fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.observer.stop(handle);
            log::debug!("Global wheel listener detached");
        }
    }
}

impl Drop for WheelListener {
    fn drop(&mut self) {
        self.detach();
    }
}
