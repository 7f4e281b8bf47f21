//! Per-wheel state machine.
//!
//! Fuses the polled level of the wheel's press channel with the asynchronous scroll pulses into
//! one of the four `ElementState`s. Evaluated once per tick:
//!
//! 1. button down: enter `Pressed` (a pending pulse is discarded)
//! 2. button released while `Pressed`: back to `Normal`
//! 3. pending pulse while not `Pressed`: `ScrollUp` / `ScrollDown`, stamped with the pulse time
//! 4. scrolling, button up and the decay window elapsed: back to `Normal`

use crate::input::raw::{ScrollDirection, ScrollPulse};
use crate::sprite::ElementState;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct WheelMachine {
    state: ElementState,
    changed_at: Option<Instant>,
    pending: Option<ScrollPulse>,
}

impl WheelMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ElementState {
        self.state
    }

    /// Time of the last transition (for scroll states, the time of the pulse).
    pub fn changed_at(&self) -> Option<Instant> {
        self.changed_at
    }

    pub fn has_pending_pulse(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a pulse for the next step. A newer pulse replaces an unapplied one.
    pub fn queue_pulse(&mut self, pulse: ScrollPulse) {
        self.pending = Some(pulse);
    }

    /// Advance one tick. Returns the new state when it differs from the state before the tick.
    pub fn step(&mut self, button_down: bool, now: Instant, decay: Duration) -> Option<ElementState> {
        let before = self.state;
        let pending = self.pending.take();

        if button_down {
            // Press wins over any scroll queued in the same tick.
            if self.state != ElementState::Pressed {
                self.transition(ElementState::Pressed, now);
            }
        } else {
            if self.state == ElementState::Pressed {
                self.transition(ElementState::Normal, now);
            }

            match pending {
                Some(pulse) => {
                    let next = match pulse.direction {
                        ScrollDirection::Up => ElementState::ScrollUp,
                        ScrollDirection::Down => ElementState::ScrollDown,
                    };
                    self.transition(next, pulse.at);
                }
                None if self.state.is_scrolling() => {
                    let expired = self
                        .changed_at
                        .map_or(true, |at| now.saturating_duration_since(at) > decay);
                    if expired {
                        self.transition(ElementState::Normal, now);
                    }
                }
                None => {}
            }
        }

        (self.state != before).then_some(self.state)
    }

    fn transition(&mut self, state: ElementState, at: Instant) {
        self.state = state;
        self.changed_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECAY: Duration = Duration::from_millis(150);

    fn pulse(direction: ScrollDirection, at: Instant) -> ScrollPulse {
        ScrollPulse { direction, at }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn press_wins_over_scroll_in_the_same_tick() {
        let start = Instant::now();
        let mut machine = WheelMachine::new();
        machine.queue_pulse(pulse(ScrollDirection::Up, start));
        assert_eq!(machine.step(true, start, DECAY), Some(ElementState::Pressed));
        assert!(!machine.has_pending_pulse());

        // The discarded pulse does not resurface on release.
        assert_eq!(
            machine.step(false, start + ms(16), DECAY),
            Some(ElementState::Normal)
        );
        assert_eq!(machine.step(false, start + ms(32), DECAY), None);
    }

    #[test]
    fn scroll_decays_exactly_once_after_window() {
        let start = Instant::now();
        let mut machine = WheelMachine::new();
        machine.queue_pulse(pulse(ScrollDirection::Down, start));
        assert_eq!(
            machine.step(false, start + ms(1), DECAY),
            Some(ElementState::ScrollDown)
        );

        let mut decays = 0;
        let mut tick = start + ms(1);
        while tick < start + ms(200) {
            tick += ms(16);
            if let Some(state) = machine.step(false, tick, DECAY) {
                assert_eq!(state, ElementState::Normal);
                let elapsed = tick - start;
                assert!(elapsed > ms(150) && elapsed <= ms(200) + ms(16));
                decays += 1;
            }
        }
        assert_eq!(decays, 1);
        assert_eq!(machine.state(), ElementState::Normal);
    }

    #[test]
    fn no_decay_at_exactly_the_window() {
        let start = Instant::now();
        let mut machine = WheelMachine::new();
        machine.queue_pulse(pulse(ScrollDirection::Up, start));
        machine.step(false, start, DECAY);
        assert_eq!(machine.step(false, start + ms(150), DECAY), None);
        assert_eq!(
            machine.step(false, start + ms(151), DECAY),
            Some(ElementState::Normal)
        );
    }

    #[test]
    fn new_pulse_refreshes_the_scroll_timestamp() {
        let start = Instant::now();
        let mut machine = WheelMachine::new();
        machine.queue_pulse(pulse(ScrollDirection::Up, start));
        machine.step(false, start, DECAY);
        machine.queue_pulse(pulse(ScrollDirection::Up, start + ms(100)));
        assert_eq!(machine.step(false, start + ms(100), DECAY), None);
        assert_eq!(machine.step(false, start + ms(200), DECAY), None);
        assert_eq!(machine.changed_at(), Some(start + ms(100)));
    }

    #[test]
    fn held_button_suppresses_scroll_and_decay() {
        let start = Instant::now();
        let mut machine = WheelMachine::new();
        machine.step(true, start, DECAY);
        machine.queue_pulse(pulse(ScrollDirection::Down, start + ms(20)));
        assert_eq!(machine.step(true, start + ms(32), DECAY), None);
        assert_eq!(machine.state(), ElementState::Pressed);
    }

    #[test]
    fn release_and_scroll_in_one_tick_reports_scroll() {
        let start = Instant::now();
        let mut machine = WheelMachine::new();
        machine.step(true, start, DECAY);
        machine.queue_pulse(pulse(ScrollDirection::Up, start + ms(10)));
        assert_eq!(
            machine.step(false, start + ms(16), DECAY),
            Some(ElementState::ScrollUp)
        );
    }
}
