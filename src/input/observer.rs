//! System-wide scroll observers.
//!
//! An observer delivers wheel events that happen while the pointer is *not* over the overlay
//! window. Implementations call the registered callback from whatever thread the OS uses; the
//! callback only forwards the event into the engine's queue.

use crate::error::Result;
use crate::input::raw::{ScrollEvent, ScrollOrigin};
use parking_lot::{const_mutex, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Receives raw scroll events from an observer.
pub type ScrollCallback = Arc<dyn Fn(ScrollEvent) + Send + Sync>;

/// Token identifying one `start` registration.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

impl ObserverHandle {
    /// Allocate a process-unique handle.
    pub fn next() -> Self {
        ObserverHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A source of global scroll events.
pub trait InputObserver: Send + Sync {
    /// Begin delivering events to `callback`. Fails with `HookInstallError`.
    fn start(&self, callback: ScrollCallback) -> Result<ObserverHandle>;

    /// Stop delivering to the registration identified by `handle`. After this returns the
    /// callback is not invoked again.
    fn stop(&self, handle: ObserverHandle);
}

/// Observer that never fires; used where no global hook exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl InputObserver for NoopObserver {
    fn start(&self, _callback: ScrollCallback) -> Result<ObserverHandle> {
        Ok(ObserverHandle::next())
    }

    fn stop(&self, _handle: ObserverHandle) {}
}

/// Callback registrations sharing one underlying resource, such as an OS hook.
///
/// The resource is installed with the first registration and torn down with the last. Both run
/// under the resource lock, so a registration racing the last `unsubscribe` either keeps the
/// resource alive or installs a fresh one. Delivery only takes the subscriber lock.
pub struct SubscriberRegistry<R> {
    resource: Mutex<Option<R>>,
    subscribers: Mutex<Vec<(u64, ScrollCallback)>>,
}

impl<R> SubscriberRegistry<R> {
    pub const fn new() -> Self {
        Self {
            resource: const_mutex(None),
            subscribers: const_mutex(Vec::new()),
        }
    }

    /// Register `callback`, calling `install` first if no resource is live.
    ///
    /// An install failure leaves the registry unchanged.
    pub fn subscribe(
        &self,
        callback: ScrollCallback,
        install: impl FnOnce() -> Result<R>,
    ) -> Result<ObserverHandle> {
        let mut resource = self.resource.lock();
        if resource.is_none() {
            *resource = Some(install()?);
        }
        let handle = ObserverHandle::next();
        self.subscribers.lock().push((handle.id(), callback));
        Ok(handle)
    }

    /// Remove the registration for `handle`, passing the resource to `teardown` if it was the
    /// last one. Unknown handles are ignored.
    pub fn unsubscribe(&self, handle: ObserverHandle, teardown: impl FnOnce(R)) {
        let mut resource = self.resource.lock();
        let now_empty = {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|(id, _)| *id != handle.id());
            subscribers.is_empty()
        };
        if now_empty {
            if let Some(live) = resource.take() {
                teardown(live);
            }
        }
    }

    /// Deliver `event` to every subscriber. Returns how many were called.
    pub fn dispatch(&self, event: ScrollEvent) -> usize {
        // Clone out of the lock so callbacks never run while holding it.
        let callbacks: Vec<ScrollCallback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in &callbacks {
            callback(event);
        }
        callbacks.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_installed(&self) -> bool {
        self.resource.lock().is_some()
    }
}

impl<R> Default for SubscriberRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer fed by the host (or a test) through a `ScrollInjector`.
///
/// Every registration receives every injected event, so several overlays can share one.
#[derive(Clone, Default)]
pub struct ForwardingObserver {
    registry: Arc<SubscriberRegistry<()>>,
}

impl ForwardingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn injector(&self) -> ScrollInjector {
        ScrollInjector {
            registry: Arc::clone(&self.registry),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.registry.subscriber_count() > 0
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.subscriber_count()
    }
}

impl std::fmt::Debug for ForwardingObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardingObserver")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl InputObserver for ForwardingObserver {
    fn start(&self, callback: ScrollCallback) -> Result<ObserverHandle> {
        self.registry.subscribe(callback, || Ok(()))
    }

    fn stop(&self, handle: ObserverHandle) {
        self.registry.unsubscribe(handle, |()| {});
    }
}

/// Pushes global scroll deltas into a `ForwardingObserver`.
#[derive(Clone)]
pub struct ScrollInjector {
    registry: Arc<SubscriberRegistry<()>>,
}

impl ScrollInjector {
    /// Deliver one wheel delta now. Returns false when no overlay is attached.
    pub fn emit(&self, delta: i32) -> bool {
        self.emit_at(delta, Instant::now())
    }

    pub fn emit_at(&self, delta: i32, at: Instant) -> bool {
        self.registry
            .dispatch(ScrollEvent::new(delta, ScrollOrigin::Global, at))
            > 0
    }
}
