//! Layout elements and their load-time classification.

use crate::error::{OverlayError, Result};
use crate::geometry::{Point, Rect};
use crate::layout::codes::{InputBinding, VirtualKey};
use crate::layout::document::{CursorDocument, ElementDocument, SpriteDocument};
use std::str::FromStr;

/// Id substring that marks an element as a scroll wheel.
pub const WHEEL_MARKER: &str = "wheel";
/// Default z-order for elements that do not specify one.
pub const DEFAULT_Z: i32 = 1;
/// Default dot-mode radius.
pub const DEFAULT_CURSOR_RADIUS: u32 = 50;
/// Default dot-mode sensitivity.
pub const DEFAULT_CURSOR_SENSITIVITY: f64 = 0.3;

/// Sprite regions of one element. `normal` is always present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpriteSet {
    pub normal: Rect,
    pub pressed: Option<Rect>,
    pub up: Option<Rect>,
    pub down: Option<Rect>,
    pub left: Option<Rect>,
    pub right: Option<Rect>,
    pub up_left: Option<Rect>,
    pub up_right: Option<Rect>,
    pub down_left: Option<Rect>,
    pub down_right: Option<Rect>,
}

impl SpriteSet {
    /// A sprite set with only the required region.
    pub fn with_normal(normal: Rect) -> Self {
        Self {
            normal,
            ..Self::default()
        }
    }

    /// Every present region with its document name.
    pub fn regions(&self) -> Vec<(&'static str, Rect)> {
        let optional = [
            ("pressed", self.pressed),
            ("up", self.up),
            ("down", self.down),
            ("left", self.left),
            ("right", self.right),
            ("up_left", self.up_left),
            ("up_right", self.up_right),
            ("down_left", self.down_left),
            ("down_right", self.down_right),
        ];
        std::iter::once(("normal", self.normal))
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(name, rect)| rect.map(|r| (name, r))),
            )
            .collect()
    }

    fn has_scroll_regions(&self) -> bool {
        self.up.is_some() || self.down.is_some()
    }

    fn from_document(doc: &SpriteDocument, path: &str) -> Result<Self> {
        let normal = match &doc.normal {
            Some(values) => read_rect(values, &format!("{path}.normal"))?,
            None => return Err(OverlayError::config(format!("{path}.normal is required"))),
        };
        let optional = |values: &Option<Vec<i64>>, name: &str| -> Result<Option<Rect>> {
            values
                .as_ref()
                .map(|v| read_rect(v, &format!("{path}.{name}")))
                .transpose()
        };

        Ok(Self {
            normal,
            pressed: optional(&doc.pressed, "pressed")?,
            up: optional(&doc.up, "up")?,
            down: optional(&doc.down, "down")?,
            left: optional(&doc.left, "left")?,
            right: optional(&doc.right, "right")?,
            up_left: optional(&doc.up_left, "up_left")?,
            up_right: optional(&doc.up_right, "up_right")?,
            down_left: optional(&doc.down_left, "down_left")?,
            down_right: optional(&doc.down_right, "down_right")?,
        })
    }
}

/// Cursor sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Rotates toward the direction of pointer motion.
    Arrow,
    /// Drifts from its anchor proportionally to pointer motion.
    Dot,
}

impl FromStr for CursorMode {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrow" => Ok(CursorMode::Arrow),
            "dot" => Ok(CursorMode::Dot),
            other => Err(OverlayError::config(format!(
                "unknown cursor mode '{other}' (expected 'arrow' or 'dot')"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorSpec {
    pub mode: CursorMode,
    pub radius: u32,
    pub sensitivity: f64,
    pub use_monitor_center: bool,
    pub monitor_center: Option<Point>,
}

impl CursorSpec {
    pub fn new(mode: CursorMode) -> Self {
        Self {
            mode,
            radius: DEFAULT_CURSOR_RADIUS,
            sensitivity: DEFAULT_CURSOR_SENSITIVITY,
            use_monitor_center: false,
            monitor_center: None,
        }
    }

    /// Parse a cursor block. Returns `None` when the mode is empty (not a cursor element).
    fn from_document(doc: &CursorDocument, path: &str) -> Result<Option<Self>> {
        let mode = match doc.mode.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(mode) => mode
                .parse::<CursorMode>()
                .map_err(|e| OverlayError::config(format!("{path}.mode: {e}")))?,
        };

        let radius = match doc.radius {
            None => DEFAULT_CURSOR_RADIUS,
            Some(r) => u32::try_from(r).map_err(|_| {
                OverlayError::config(format!("{path}.radius must be a non-negative integer"))
            })?,
        };

        let sensitivity = doc.sensitivity.unwrap_or(DEFAULT_CURSOR_SENSITIVITY);
        if !sensitivity.is_finite() || sensitivity < 0.0 {
            return Err(OverlayError::config(format!(
                "{path}.sensitivity must be a non-negative number"
            )));
        }

        let monitor_center = match (&doc.monitor_center, doc.monitor_center_x, doc.monitor_center_y)
        {
            (Some(values), _, _) => {
                let (x, y) = read_pair(values, &format!("{path}.monitor_center"))?;
                Some(Point::new(x as f64, y as f64))
            }
            (None, Some(x), Some(y)) => Some(Point::new(x as f64, y as f64)),
            _ => None,
        };

        Ok(Some(Self {
            mode,
            radius,
            sensitivity,
            use_monitor_center: doc.use_monitor_center.unwrap_or(false),
            monitor_center,
        }))
    }
}

/// Element variant, decided once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Key or mouse button; `None` when the binding could not be resolved.
    Button { key: Option<VirtualKey> },
    /// Scroll wheel with its own press channel.
    Wheel { button: VirtualKey },
    /// Pointer-driven marker.
    Cursor(CursorSpec),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Button { .. } => "button",
            ElementKind::Wheel { .. } => "wheel",
            ElementKind::Cursor(spec) => match spec.mode {
                CursorMode::Arrow => "cursor(arrow)",
                CursorMode::Dot => "cursor(dot)",
            },
        }
    }
}

/// One visual unit of a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    pub binding: InputBinding,
    pub position: Point,
    pub z: i32,
    pub sprite: SpriteSet,
    pub kind: ElementKind,
}

impl Element {
    pub fn is_wheel(&self) -> bool {
        matches!(self.kind, ElementKind::Wheel { .. })
    }

    pub fn is_cursor(&self) -> bool {
        matches!(self.kind, ElementKind::Cursor(_))
    }

    /// Rendered size of the element (its `normal` region).
    pub fn size(&self) -> (f64, f64) {
        (self.sprite.normal.width as f64, self.sprite.normal.height as f64)
    }

    /// Whether this element belongs to a mouse overlay (buttons, wheel or cursor).
    pub fn is_mouse_related(&self) -> bool {
        match &self.kind {
            ElementKind::Wheel { .. } | ElementKind::Cursor(_) => true,
            ElementKind::Button { key } => key.map_or(false, VirtualKey::is_mouse_button),
        }
    }

    pub(crate) fn from_document(doc: &ElementDocument, index: usize) -> Result<Self> {
        let path = format!("elements[{index}]");
        let id = match doc.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(OverlayError::config(format!("{path}.id is required"))),
        };
        let path = format!("{path} ('{id}')");

        let sprite = match &doc.sprite {
            Some(sprite) => SpriteSet::from_document(sprite, &format!("{path}.sprite"))?,
            None => {
                return Err(OverlayError::config(format!(
                    "{path}.sprite.normal is required"
                )))
            }
        };

        let position = match &doc.pos {
            Some(values) => {
                let (x, y) = read_pair(values, &format!("{path}.pos"))?;
                Point::new(x as f64, y as f64)
            }
            None => Point::default(),
        };

        let binding = doc
            .codes
            .as_ref()
            .map(|codes| InputBinding {
                winvk: codes.winvk,
                hid: codes.hid,
                evdev: codes.evdev,
            })
            .unwrap_or_default();

        let cursor = match &doc.cursor {
            Some(cursor) => CursorSpec::from_document(cursor, &format!("{path}.cursor"))?,
            None => None,
        };
        let explicit_wheel = doc.wheel.unwrap_or(false);

        let kind = match cursor {
            Some(_) if explicit_wheel => {
                return Err(OverlayError::config(format!(
                    "{path} cannot be both a cursor and a wheel"
                )))
            }
            Some(spec) => ElementKind::Cursor(spec),
            None if explicit_wheel
                || id.to_ascii_lowercase().contains(WHEEL_MARKER)
                || sprite.has_scroll_regions() =>
            {
                ElementKind::Wheel {
                    button: binding.resolve().unwrap_or(VirtualKey::MBUTTON),
                }
            }
            None => {
                let key = binding.resolve();
                if binding.is_empty() {
                    log::warn!("{path}: no input code, element will stay idle");
                } else if key.is_none() {
                    log::warn!("{path}: unknown input code {binding:?}, element will stay idle");
                }
                ElementKind::Button { key }
            }
        };

        Ok(Self {
            id,
            binding,
            position,
            z: doc.z.unwrap_or(DEFAULT_Z),
            sprite,
            kind,
        })
    }
}

/// Read a `[x, y]` array.
pub(crate) fn read_pair(values: &[i64], path: &str) -> Result<(i32, i32)> {
    match values {
        [x, y] => Ok((to_i32(*x, path)?, to_i32(*y, path)?)),
        _ => Err(OverlayError::config(format!(
            "{path} must have 2 values, found {}",
            values.len()
        ))),
    }
}

/// Read a `[x, y, w, h]` array.
pub(crate) fn read_rect(values: &[i64], path: &str) -> Result<Rect> {
    match values {
        [x, y, w, h] => {
            let rect = Rect::new(
                to_i32(*x, path)?,
                to_i32(*y, path)?,
                to_i32(*w, path)?,
                to_i32(*h, path)?,
            );
            if rect.width < 0 || rect.height < 0 {
                return Err(OverlayError::config(format!(
                    "{path} has a negative width or height"
                )));
            }
            Ok(rect)
        }
        _ => Err(OverlayError::config(format!(
            "{path} must have 4 values, found {}",
            values.len()
        ))),
    }
}

fn to_i32(value: i64, path: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| OverlayError::config(format!("{path}: {value} is out of range")))
}
