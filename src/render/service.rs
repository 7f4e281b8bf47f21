//! The per-overlay state engine.
//!
//! `OverlayEngine` owns every runtime record of one overlay. It is driven from a single task:
//! ticks sample input and advance the wheel machines and cursors, messages deliver scroll events
//! and window changes, and after each tick the engine holds one `RenderDirective` per element.

use crate::config::EngineConfig;
use crate::cursor::{self, CursorTuning};
use crate::geometry::{Bounds, Point, Size};
use crate::input::raw::{InputSource, PulseDebouncer, ScrollEvent};
use crate::input::sampler::{InputSampler, LevelCache};
use crate::layout::{ElementKind, OverlayLayout};
use crate::region::{fit_uniform, RegionClassifier, Zone};
use crate::render::protocol::{EngineMessage, OverlayEvent, RenderDirective, TickOutput};
use crate::sprite::{ElementState, SpriteResolver};
use crate::state::{ElementRuntime, RuntimeTable};
use std::sync::Arc;
use std::time::Instant;

pub struct OverlayEngine {
    layout: Arc<OverlayLayout>,
    config: EngineConfig,
    tuning: CursorTuning,
    resolver: SpriteResolver,
    sampler: InputSampler,
    levels: LevelCache,
    runtime: RuntimeTable,
    debouncer: PulseDebouncer,
    classifier: RegionClassifier,
    /// Element indices in draw order.
    draw_order: Vec<usize>,
    window_size: Option<Size>,
    explicit_bounds: Option<Bounds>,
    directives: Vec<RenderDirective>,
    presented: bool,
}

impl OverlayEngine {
    pub fn new(layout: Arc<OverlayLayout>, config: EngineConfig) -> Self {
        let draw_order = {
            let mut order: Vec<usize> = (0..layout.elements.len()).collect();
            order.sort_by_key(|&index| layout.elements[index].z);
            order
        };

        let mut engine = Self {
            tuning: CursorTuning::from(&config),
            resolver: SpriteResolver::for_layout(&layout),
            sampler: InputSampler::for_layout(&layout),
            levels: LevelCache::new(),
            runtime: RuntimeTable::for_layout(&layout),
            debouncer: PulseDebouncer::new(config.scroll_debounce),
            classifier: RegionClassifier::new(config.resize_margin),
            draw_order,
            window_size: None,
            explicit_bounds: None,
            directives: Vec::new(),
            presented: false,
            layout,
            config,
        };
        engine.directives = engine.build_directives();
        engine
    }

    pub fn layout(&self) -> &Arc<OverlayLayout> {
        &self.layout
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current directives, in draw order.
    pub fn directives(&self) -> &[RenderDirective] {
        &self.directives
    }

    /// Logical state of an element, by id.
    pub fn element_state(&self, id: &str) -> Option<ElementState> {
        self.runtime.by_id(id).map(ElementRuntime::visual_state)
    }

    pub fn runtime(&self) -> &RuntimeTable {
        &self.runtime
    }

    /// Advance one tick: sample levels, step wheels and cursors, rebuild directives.
    pub fn tick(&mut self, source: &mut dyn InputSource, now: Instant) -> TickOutput {
        self.levels.clear();
        let mut events = Vec::new();

        for transition in self
            .sampler
            .sample(source, &mut self.levels, &mut self.runtime)
        {
            let id = self.layout.elements[transition.index].id.clone();
            events.push(if transition.pressed {
                OverlayEvent::Pressed { id }
            } else {
                OverlayEvent::Released { id }
            });
        }

        let mut pointer = None;
        let mut pointer_read = false;

        for (index, element) in self.layout.elements.iter().enumerate() {
            let Some(record) = self.runtime.get_mut(index) else {
                continue;
            };
            match (&element.kind, record) {
                (
                    ElementKind::Wheel { button },
                    ElementRuntime::Wheel {
                        machine,
                        button_down,
                    },
                ) => {
                    // An unreadable press channel keeps its last known level.
                    if let Some(level) = self.levels.level(source, *button) {
                        *button_down = level;
                    }
                    if let Some(state) = machine.step(*button_down, now, self.config.scroll_decay)
                    {
                        log::trace!("{} -> {:?}", element.id, state);
                        events.push(OverlayEvent::WheelChanged {
                            id: element.id.clone(),
                            state,
                        });
                    }
                }
                (ElementKind::Cursor(spec), ElementRuntime::Cursor(state)) => {
                    if !pointer_read {
                        pointer = read_pointer(source);
                        pointer_read = true;
                    }
                    *state = cursor::step(state, spec, pointer, now, &self.tuning);
                }
                _ => {}
            }
        }

        let directives = self.build_directives();
        let directives_changed = !self.presented || directives != self.directives;
        self.directives = directives;
        self.presented = true;

        TickOutput {
            events,
            directives_changed,
        }
    }

    /// Debounce a scroll event and queue the resulting pulse on every wheel element.
    ///
    /// Returns true when the event produced a pulse.
    pub fn handle_scroll(&mut self, event: ScrollEvent) -> bool {
        let Some(pulse) = self.debouncer.accept(&event) else {
            return false;
        };
        for (_, record) in self.runtime.iter_mut() {
            if let ElementRuntime::Wheel { machine, .. } = record {
                machine.queue_pulse(pulse);
            }
        }
        true
    }

    pub fn classify(&self, point: Point) -> Zone {
        self.classifier.classify(point, self.content_bounds())
    }

    pub fn set_click_through(&mut self, enabled: bool) {
        self.classifier.set_click_through(enabled);
    }

    pub fn set_window_size(&mut self, size: Size) {
        self.window_size = Some(size);
    }

    /// Override the letterboxed content bounds; `None` returns to the computed ones.
    pub fn set_content_bounds(&mut self, bounds: Option<Bounds>) {
        self.explicit_bounds = bounds;
    }

    /// Rendered content bounds in window coordinates, if known.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.explicit_bounds.or_else(|| {
            let canvas = Size::new(
                self.layout.canvas.width as f64,
                self.layout.canvas.height as f64,
            );
            self.window_size
                .and_then(|window| fit_uniform(window, canvas))
        })
    }

    /// Apply one queued message.
    pub fn handle_message(&mut self, message: EngineMessage) {
        match message {
            EngineMessage::Scroll(event) => {
                self.handle_scroll(event);
            }
            EngineMessage::HitTest { point, reply } => {
                // The requester may have given up waiting.
                let _ = reply.send(self.classify(point));
            }
            EngineMessage::SetClickThrough(enabled) => self.set_click_through(enabled),
            EngineMessage::SetWindowSize(size) => self.set_window_size(size),
            EngineMessage::SetContentBounds(bounds) => self.set_content_bounds(bounds),
            EngineMessage::Snapshot(reply) => {
                let _ = reply.send(self.directives.clone());
            }
        }
    }

    fn build_directives(&self) -> Vec<RenderDirective> {
        self.draw_order
            .iter()
            .filter_map(|&index| {
                let element = self.layout.elements.get(index)?;
                let record = self.runtime.get(index)?;
                let crop = self.resolver.resolve(element, record.visual_state());

                let (position, rotation, visible) = match (&element.kind, record) {
                    (ElementKind::Cursor(spec), ElementRuntime::Cursor(state)) => {
                        let placed = cursor::placement(element, spec, state);
                        (placed.position, placed.rotation, placed.visible)
                    }
                    _ => (element.position, None, true),
                };

                Some(RenderDirective {
                    id: element.id.clone(),
                    crop,
                    position,
                    size: Size::new(crop.width as f64, crop.height as f64),
                    rotation,
                    visible,
                    z: element.z,
                })
            })
            .collect()
    }
}

fn read_pointer(source: &mut dyn InputSource) -> Option<Point> {
    match source.pointer_position() {
        Ok(position) => position,
        Err(e) => {
            log::debug!("Ignoring failed pointer read: {e}");
            None
        }
    }
}
