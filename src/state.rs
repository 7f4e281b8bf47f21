//! Per-element runtime records.

use crate::cursor::CursorState;
use crate::input::wheel::WheelMachine;
use crate::layout::{ElementKind, OverlayLayout};
use crate::sprite::ElementState;
use std::collections::HashMap;

/// Mutable state of one element, shaped by its kind.
#[derive(Debug, Clone)]
pub enum ElementRuntime {
    Button { pressed: bool },
    Wheel { machine: WheelMachine, button_down: bool },
    Cursor(CursorState),
}

impl ElementRuntime {
    fn for_kind(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Button { .. } => ElementRuntime::Button { pressed: false },
            ElementKind::Wheel { .. } => ElementRuntime::Wheel {
                machine: WheelMachine::new(),
                button_down: false,
            },
            ElementKind::Cursor(spec) => ElementRuntime::Cursor(CursorState::new(spec.mode)),
        }
    }

    /// The logical state used for sprite resolution.
    pub fn visual_state(&self) -> ElementState {
        match self {
            ElementRuntime::Button { pressed: true } => ElementState::Pressed,
            ElementRuntime::Button { pressed: false } | ElementRuntime::Cursor(_) => {
                ElementState::Normal
            }
            ElementRuntime::Wheel { machine, .. } => machine.state(),
        }
    }
}

/// Runtime records in layout order, addressable by element id.
#[derive(Debug, Clone, Default)]
pub struct RuntimeTable {
    records: Vec<ElementRuntime>,
    by_id: HashMap<String, usize>,
}

impl RuntimeTable {
    pub fn for_layout(layout: &OverlayLayout) -> Self {
        let records = layout
            .elements
            .iter()
            .map(|element| ElementRuntime::for_kind(&element.kind))
            .collect();
        let by_id = layout
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| (element.id.clone(), index))
            .collect();
        Self { records, by_id }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, index: usize) -> Option<&ElementRuntime> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ElementRuntime> {
        self.records.get_mut(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&ElementRuntime> {
        self.index_of(id).and_then(|index| self.get(index))
    }

    /// The pressed flag of a button record.
    pub fn button_mut(&mut self, index: usize) -> Option<&mut bool> {
        match self.records.get_mut(index) {
            Some(ElementRuntime::Button { pressed }) => Some(pressed),
            _ => None,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut ElementRuntime)> {
        self.records.iter_mut().enumerate()
    }
}
