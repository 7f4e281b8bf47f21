//! Edge-triggered polling of key and button levels.

use crate::input::raw::InputSource;
use crate::layout::{ElementKind, OverlayLayout, VirtualKey};
use crate::state::RuntimeTable;
use std::collections::HashMap;

/// Levels read during one tick, so each distinct code is polled at most once.
///
/// A failed read is cached as `None` ("unknown") for the rest of the tick.
#[derive(Debug, Default)]
pub struct LevelCache {
    levels: HashMap<VirtualKey, Option<bool>>,
}

impl LevelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all levels; call at the start of every tick.
    pub fn clear(&mut self) {
        self.levels.clear();
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level of `key`, reading it from `source` on first use in this tick.
    pub fn level(&mut self, source: &mut dyn InputSource, key: VirtualKey) -> Option<bool> {
        *self.levels.entry(key).or_insert_with(|| match source.is_pressed(key) {
            Ok(level) => Some(level),
            Err(e) => {
                log::debug!("Ignoring failed read of {key}: {e}");
                None
            }
        })
    }
}

/// A button element whose level changed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    pub index: usize,
    pub pressed: bool,
}

/// Polls every button element with a resolved binding. Wheels and cursors are not sampled here.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    tracked: Vec<(usize, VirtualKey)>,
}

impl InputSampler {
    pub fn for_layout(layout: &OverlayLayout) -> Self {
        let tracked = layout
            .elements
            .iter()
            .enumerate()
            .filter_map(|(index, element)| match element.kind {
                ElementKind::Button { key: Some(key) } => Some((index, key)),
                _ => None,
            })
            .collect();
        Self { tracked }
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Read all tracked levels and record the ones that changed.
    pub fn sample(
        &self,
        source: &mut dyn InputSource,
        cache: &mut LevelCache,
        runtime: &mut RuntimeTable,
    ) -> Vec<KeyTransition> {
        let mut transitions = Vec::new();
        for &(index, key) in &self.tracked {
            let Some(level) = cache.level(source, key) else {
                continue;
            };
            if let Some(pressed) = runtime.button_mut(index) {
                if *pressed != level {
                    *pressed = level;
                    transitions.push(KeyTransition {
                        index,
                        pressed: level,
                    });
                }
            }
        }
        transitions
    }
}
