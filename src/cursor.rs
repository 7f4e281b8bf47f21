//! Pointer-driven cursor elements.
//!
//! Arrow cursors rotate toward the direction of pointer motion and hide when the pointer rests.
//! Dot cursors drift from their anchor by a scaled copy of the pointer motion, bounded by a
//! radius. The tracker is a set of pure functions over `CursorState`; the engine owns the state.

use crate::config::EngineConfig;
use crate::geometry::{Point, Vector};
use crate::layout::{CursorMode, CursorSpec, Element};
use std::time::{Duration, Instant};

/// Arrow sprites point up at 0 degrees; `atan2` measures from the +x axis.
const ARROW_HEADING_CORRECTION: f64 = 90.0;

/// Motion thresholds and timeouts for cursor elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorTuning {
    pub arrow_min_motion: f64,
    pub arrow_hide_after: Duration,
    pub dot_min_motion: f64,
}

impl Default for CursorTuning {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for CursorTuning {
    fn from(config: &EngineConfig) -> Self {
        Self {
            arrow_min_motion: config.arrow_min_motion,
            arrow_hide_after: config.arrow_hide_after,
            dot_min_motion: config.dot_min_motion,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    pub last_pointer: Option<Point>,
    /// Dot mode: displacement of the sprite centre from the anchor.
    pub offset: Vector,
    /// Arrow mode: rotation in degrees, clockwise from "up".
    pub rotation: f64,
    pub visible: bool,
    pub last_motion: Option<Instant>,
}

impl CursorState {
    /// Arrows start hidden until the first qualifying motion; dots start centred and visible.
    pub fn new(mode: CursorMode) -> Self {
        Self {
            last_pointer: None,
            offset: Vector::ZERO,
            rotation: 0.0,
            visible: mode == CursorMode::Dot,
            last_motion: None,
        }
    }
}

/// Rotation of a sprite around a pivot given in element-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub pivot: Point,
}

/// Where and how a cursor element is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPlacement {
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    pub rotation: Option<Rotation>,
    pub visible: bool,
}

/// Advance a cursor by one tick. `sample` is `None` when the pointer could not be read.
pub fn step(
    state: &CursorState,
    spec: &CursorSpec,
    sample: Option<Point>,
    now: Instant,
    tuning: &CursorTuning,
) -> CursorState {
    let moved = match sample {
        Some(pointer) if state.last_pointer != Some(pointer) => match spec.mode {
            CursorMode::Arrow => step_arrow(state, pointer, now, tuning),
            CursorMode::Dot => step_dot(state, spec, pointer, tuning),
        },
        _ => state.clone(),
    };

    match spec.mode {
        CursorMode::Arrow => expire_arrow(&moved, now, tuning),
        CursorMode::Dot => moved,
    }
}

/// Re-orient an arrow if the pointer moved far enough since the previous sample.
pub fn step_arrow(
    state: &CursorState,
    pointer: Point,
    now: Instant,
    tuning: &CursorTuning,
) -> CursorState {
    let mut next = state.clone();
    next.last_pointer = Some(pointer);

    let Some(previous) = state.last_pointer else {
        return next;
    };
    let motion = pointer - previous;
    if motion.length() > tuning.arrow_min_motion {
        next.rotation = motion.heading_degrees() + ARROW_HEADING_CORRECTION;
        next.visible = true;
        next.last_motion = Some(now);
    }
    next
}

/// Hide an arrow that has not moved within the hide timeout.
pub fn expire_arrow(state: &CursorState, now: Instant, tuning: &CursorTuning) -> CursorState {
    let idle = state
        .last_motion
        .map_or(true, |at| now.saturating_duration_since(at) > tuning.arrow_hide_after);
    if state.visible && idle {
        CursorState {
            visible: false,
            ..state.clone()
        }
    } else {
        state.clone()
    }
}

/// Move a dot by the scaled pointer motion, keeping it within `spec.radius` of its anchor.
pub fn step_dot(
    state: &CursorState,
    spec: &CursorSpec,
    pointer: Point,
    tuning: &CursorTuning,
) -> CursorState {
    let mut next = state.clone();
    next.last_pointer = Some(pointer);
    let radius = spec.radius as f64;

    if spec.use_monitor_center {
        if let Some(center) = spec.monitor_center {
            if let Some(previous) = state.last_pointer {
                if (pointer - previous).length() <= tuning.dot_min_motion {
                    return next;
                }
            }
            next.offset = ((pointer - center) * spec.sensitivity).clamp_length(radius);
            next.visible = true;
            return next;
        }
    }

    let Some(previous) = state.last_pointer else {
        return next;
    };
    let motion = pointer - previous;
    if motion.length() > tuning.dot_min_motion {
        next.offset = (state.offset + motion * spec.sensitivity).clamp_length(radius);
        next.visible = true;
    }
    next
}

/// Compute the draw placement of a cursor element.
pub fn placement(element: &Element, spec: &CursorSpec, state: &CursorState) -> CursorPlacement {
    let (width, height) = element.size();
    match spec.mode {
        CursorMode::Arrow => CursorPlacement {
            position: element.position,
            rotation: Some(Rotation {
                degrees: state.rotation,
                pivot: Point::new(width / 2.0, height / 2.0),
            }),
            visible: state.visible,
        },
        CursorMode::Dot => {
            let centre = element.position + state.offset;
            CursorPlacement {
                position: Point::new(centre.x - width / 2.0, centre.y - height / 2.0),
                rotation: None,
                visible: state.visible,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn dot(radius: u32, sensitivity: f64) -> CursorSpec {
        CursorSpec {
            radius,
            sensitivity,
            ..CursorSpec::new(CursorMode::Dot)
        }
    }

    #[test]
    fn arrow_points_along_motion() {
        let tuning = CursorTuning::default();
        let spec = CursorSpec::new(CursorMode::Arrow);
        let start = Instant::now();
        let mut state = CursorState::new(CursorMode::Arrow);
        assert!(!state.visible);

        state = step(&state, &spec, Some(Point::new(100.0, 100.0)), start, &tuning);
        assert!(!state.visible);

        // Moving right: atan2 = 0, arrow turns to 90 degrees.
        state = step(&state, &spec, Some(Point::new(110.0, 100.0)), start + ms(16), &tuning);
        assert!(state.visible);
        assert!((state.rotation - 90.0).abs() < 1e-9);

        // Moving down: atan2 = 90.
        state = step(&state, &spec, Some(Point::new(110.0, 120.0)), start + ms(32), &tuning);
        assert!((state.rotation - 180.0).abs() < 1e-9);
    }

    #[test]
    fn arrow_ignores_small_motion_and_hides_when_idle() {
        let tuning = CursorTuning::default();
        let spec = CursorSpec::new(CursorMode::Arrow);
        let start = Instant::now();
        let mut state = CursorState::new(CursorMode::Arrow);
        state = step(&state, &spec, Some(Point::new(0.0, 0.0)), start, &tuning);
        state = step(&state, &spec, Some(Point::new(0.0, 10.0)), start, &tuning);
        let rotation = state.rotation;

        state = step(&state, &spec, Some(Point::new(1.0, 10.0)), start + ms(50), &tuning);
        assert_eq!(state.rotation, rotation);
        assert!(state.visible);

        // Pointer stopped; the timeout is checked even without new samples.
        state = step(&state, &spec, Some(Point::new(1.0, 10.0)), start + ms(199), &tuning);
        assert!(state.visible);
        state = step(&state, &spec, None, start + ms(201), &tuning);
        assert!(!state.visible);
    }

    #[test]
    fn dot_accumulates_scaled_motion() {
        let tuning = CursorTuning::default();
        let spec = dot(50, 0.5);
        let now = Instant::now();
        let mut state = CursorState::new(CursorMode::Dot);
        assert!(state.visible);
        state = step(&state, &spec, Some(Point::new(0.0, 0.0)), now, &tuning);
        state = step(&state, &spec, Some(Point::new(10.0, 0.0)), now, &tuning);
        state = step(&state, &spec, Some(Point::new(10.0, 20.0)), now, &tuning);
        assert_eq!(state.offset, Vector::new(5.0, 10.0));

        // Below the motion threshold nothing moves, but the sample is remembered.
        state = step(&state, &spec, Some(Point::new(10.3, 20.0)), now, &tuning);
        assert_eq!(state.offset, Vector::new(5.0, 10.0));
        assert_eq!(state.last_pointer, Some(Point::new(10.3, 20.0)));
    }

    #[test]
    fn dot_clamps_to_radius_keeping_direction() {
        let tuning = CursorTuning::default();
        let spec = dot(10, 1.0);
        let now = Instant::now();
        let mut state = CursorState::new(CursorMode::Dot);
        state = step(&state, &spec, Some(Point::new(0.0, 0.0)), now, &tuning);
        state = step(&state, &spec, Some(Point::new(30.0, 40.0)), now, &tuning);
        assert!((state.offset.length() - 10.0).abs() < 1e-9);
        assert!((state.offset.dx - 6.0).abs() < 1e-9);
    }

    #[test]
    fn dot_follows_monitor_center_absolutely() {
        let tuning = CursorTuning::default();
        let spec = CursorSpec {
            use_monitor_center: true,
            monitor_center: Some(Point::new(960.0, 540.0)),
            ..dot(100, 0.1)
        };
        let now = Instant::now();
        let state = step(
            &CursorState::new(CursorMode::Dot),
            &spec,
            Some(Point::new(1060.0, 540.0)),
            now,
            &tuning,
        );
        assert!((state.offset.dx - 10.0).abs() < 1e-9);
        assert_eq!(state.offset.dy, 0.0);
    }

    #[test]
    fn placement_centres_dot_and_pivots_arrow() {
        use crate::geometry::Rect;
        use crate::layout::{ElementKind, InputBinding, SpriteSet};

        let spec = dot(50, 1.0);
        let element = Element {
            id: "dot".to_string(),
            binding: InputBinding::default(),
            position: Point::new(100.0, 100.0),
            z: 1,
            sprite: SpriteSet::with_normal(Rect::new(0, 0, 10, 20)),
            kind: ElementKind::Cursor(spec.clone()),
        };
        let mut state = CursorState::new(CursorMode::Dot);
        state.offset = Vector::new(5.0, 0.0);
        let placed = placement(&element, &spec, &state);
        assert_eq!(placed.position, Point::new(100.0, 90.0));
        assert!(placed.rotation.is_none());

        let arrow = CursorSpec::new(CursorMode::Arrow);
        let placed = placement(&element, &arrow, &CursorState::new(CursorMode::Arrow));
        assert_eq!(placed.position, Point::new(100.0, 100.0));
        assert_eq!(placed.rotation.unwrap().pivot, Point::new(5.0, 10.0));
        assert!(!placed.visible);
    }

    proptest! {
        #[test]
        fn dot_offset_never_exceeds_radius(
            radius in 0u32..200,
            sensitivity in 0.0f64..5.0,
            moves in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..40),
        ) {
            let tuning = CursorTuning::default();
            let spec = dot(radius, sensitivity);
            let now = Instant::now();
            let mut state = CursorState::new(CursorMode::Dot);
            let mut pointer = Point::new(0.0, 0.0);
            state = step(&state, &spec, Some(pointer), now, &tuning);
            for (dx, dy) in moves {
                pointer = pointer + Vector::new(dx, dy);
                state = step(&state, &spec, Some(pointer), now, &tuning);
                prop_assert!(state.offset.length() <= radius as f64 + 1e-9);
            }
        }
    }
}
