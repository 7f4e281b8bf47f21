//! Input subsystem.
//!
//! Two delivery paths feed an overlay: key and button *levels* are polled every tick through an
//! `InputSource`, while wheel *events* arrive asynchronously from the host (local path) or from a
//! system-wide `InputObserver` (global path). Scroll events are debounced into pulses and fused
//! with the wheel's press channel by a `WheelMachine`.

pub mod listener;
pub mod observer;
pub mod raw;
pub mod sampler;
pub mod wheel;

// Public re-exports for convenience. Modules outside this crate should prefer importing
// from `crate::input` rather than reaching into submodules.
pub use listener::WheelListener;
pub use observer::{
    ForwardingObserver, InputObserver, NoopObserver, ObserverHandle, ScrollCallback,
    ScrollInjector, SubscriberRegistry,
};
pub use raw::{
    InputSource, PulseDebouncer, ScrollDirection, ScrollEvent, ScrollOrigin, ScrollPulse,
};
pub use sampler::{InputSampler, KeyTransition, LevelCache};
pub use wheel::WheelMachine;
