//! Declarative overlay layouts.
//!
//! A layout describes one overlay: the sprite texture, the canvas the elements are placed on and
//! the ordered element list. It is parsed once when an overlay opens and is immutable afterwards.
//!
//! ```json
//! {
//!   "version": 1,
//!   "texture": { "file": "keys.png", "size": [256, 256] },
//!   "canvas": { "size": [300, 120], "background": [0, 0, 0, 0] },
//!   "defaults": { "pressed_offset": [0, 64] },
//!   "elements": [
//!     { "id": "w", "codes": { "hid": 26 }, "pos": [60, 0], "sprite": { "normal": [0, 0, 56, 56] } }
//!   ]
//! }
//! ```

pub mod codes;
pub mod document;
pub mod element;
pub mod validation;

pub use codes::{InputBinding, VirtualKey};
pub use element::{CursorMode, CursorSpec, Element, ElementKind, SpriteSet};
pub use validation::validate_against_texture;

use crate::error::{OverlayError, Result};
use document::LayoutDocument;
use element::read_pair;
use std::path::Path;

pub const DEFAULT_LAYOUT_VERSION: i64 = 1;

/// The sprite texture referenced by a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    /// Path as written in the layout; relative paths resolve against the layout's directory.
    pub file: String,
    pub size: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// RGBA, transparent by default.
    pub background: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutDefaults {
    /// Present only when the document gives one.
    pub pressed_offset: Option<(i32, i32)>,
}

/// A fully parsed and validated layout.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub version: i64,
    pub texture: TextureInfo,
    pub canvas: Canvas,
    pub defaults: LayoutDefaults,
    pub elements: Vec<Element>,
}

impl OverlayLayout {
    /// Parse and validate a layout document. Nothing is returned unless every element is valid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: LayoutDocument = serde_json::from_str(json)
            .map_err(|e| OverlayError::config(format!("malformed layout JSON: {e}")))?;
        let layout = Self::from_document(document)?;
        validation::validate_layout(&layout)?;

        log::debug!(
            "Parsed layout v{} with {} elements ({} wheel, {} cursor)",
            layout.version,
            layout.elements.len(),
            layout.elements.iter().filter(|e| e.is_wheel()).count(),
            layout.elements.iter().filter(|e| e.is_cursor()).count()
        );
        Ok(layout)
    }

    /// Read and parse a layout file. Read failures are `AssetError`s, content errors `ConfigError`s.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| OverlayError::asset_io(path, e))?;
        Self::from_json_str(&json)
    }

    fn from_document(document: LayoutDocument) -> Result<Self> {
        let texture = document
            .texture
            .ok_or_else(|| OverlayError::config("texture is required"))?;
        let file = texture
            .file
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| OverlayError::config("texture.file is required"))?;
        let texture_size = texture
            .size
            .as_deref()
            .map(|values| read_size(values, "texture.size"))
            .transpose()?;

        let canvas = document
            .canvas
            .ok_or_else(|| OverlayError::config("canvas.size is required"))?;
        let (width, height) = match canvas.size.as_deref() {
            Some(values) => read_size(values, "canvas.size")?,
            None => return Err(OverlayError::config("canvas.size is required")),
        };
        let background = match canvas.background.as_deref() {
            Some(values) => read_color(values, "canvas.background")?,
            None => [0, 0, 0, 0],
        };

        let pressed_offset = document
            .defaults
            .and_then(|d| d.pressed_offset)
            .map(|values| read_pair(&values, "defaults.pressed_offset"))
            .transpose()?;

        let elements = document
            .elements
            .iter()
            .enumerate()
            .map(|(index, doc)| Element::from_document(doc, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            version: document.version.unwrap_or(DEFAULT_LAYOUT_VERSION),
            texture: TextureInfo {
                file,
                size: texture_size,
            },
            canvas: Canvas {
                width,
                height,
                background,
            },
            defaults: LayoutDefaults { pressed_offset },
            elements,
        })
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements in draw order: ascending z, document order within equal z.
    pub fn elements_by_z(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|e| e.z);
        sorted
    }

    pub fn has_wheel_elements(&self) -> bool {
        self.elements.iter().any(Element::is_wheel)
    }

    /// A mouse overlay is one with any wheel, cursor or mouse-button element.
    pub fn has_mouse_elements(&self) -> bool {
        self.elements.iter().any(Element::is_mouse_related)
    }

    /// Resolve the texture path relative to the directory holding the layout file.
    pub fn texture_path(&self, layout_dir: &Path) -> std::path::PathBuf {
        let file = Path::new(&self.texture.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            layout_dir.join(file)
        }
    }
}

fn read_size(values: &[i64], path: &str) -> Result<(u32, u32)> {
    let (width, height) = read_pair(values, path)?;
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(OverlayError::config(format!("{path} must not be negative"))),
    }
}

fn read_color(values: &[i64], path: &str) -> Result<[u8; 4]> {
    let [r, g, b, a] = values else {
        return Err(OverlayError::config(format!(
            "{path} must have 4 values, found {}",
            values.len()
        )));
    };
    let channel = |v: i64| {
        u8::try_from(v).map_err(|_| OverlayError::config(format!("{path}: {v} is not in 0-255")))
    };
    Ok([channel(*r)?, channel(*g)?, channel(*b)?, channel(*a)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MOUSE_LAYOUT: &str = r#"{
        "version": 2,
        "texture": { "file": "mouse.png", "size": [128, 128] },
        "canvas": { "size": [120, 160], "background": [10, 20, 30, 255] },
        "defaults": { "pressed_offset": [0, 32] },
        "elements": [
            { "id": "body", "sprite": { "normal": [0, 0, 64, 64] }, "z": 0 },
            { "id": "lmb", "codes": { "hid": 1 }, "pos": [0, 0], "sprite": { "normal": [64, 0, 32, 32] }, "z": 2 },
            { "id": "wheel", "pos": [40, 10], "sprite": { "normal": [96, 0, 16, 16], "up": [96, 16, 16, 16], "down": [112, 16, 16, 16] } },
            { "id": "pointer", "position": [60, 80], "sprite": { "normal": [0, 64, 16, 16] },
              "cursor": { "mode": "arrow" }, "extra": "ignored" }
        ]
    }"#;

    #[test]
    fn parses_full_document() {
        let layout = OverlayLayout::from_json_str(MOUSE_LAYOUT).unwrap();
        assert_eq!(layout.version, 2);
        assert_eq!(layout.texture.size, Some((128, 128)));
        assert_eq!(layout.canvas.background, [10, 20, 30, 255]);
        assert_eq!(layout.defaults.pressed_offset, Some((0, 32)));
        assert_eq!(layout.elements.len(), 4);

        let pointer = layout.element("pointer").unwrap();
        assert_eq!(pointer.position, Point::new(60.0, 80.0));
        assert_eq!(pointer.z, 1);
        assert!(pointer.is_cursor());

        let wheel = layout.element("wheel").unwrap();
        assert_eq!(wheel.sprite.up, Some(Rect::new(96, 16, 16, 16)));
        assert!(layout.has_wheel_elements());
        assert!(layout.has_mouse_elements());
    }

    #[test]
    fn orders_by_z_stably() {
        let layout = OverlayLayout::from_json_str(MOUSE_LAYOUT).unwrap();
        let ids: Vec<_> = layout.elements_by_z().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["body", "wheel", "pointer", "lmb"]);
    }

    #[test]
    fn missing_canvas_size_is_config_error() {
        let err = OverlayLayout::from_json_str(r#"{ "texture": { "file": "a.png" }, "canvas": {} }"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid layout: canvas.size is required");
    }

    #[test]
    fn missing_normal_sprite_is_config_error() {
        let json = MOUSE_LAYOUT.replace(r#""normal": [0, 64, 16, 16]"#, r#""pressed": [0, 64, 16, 16]"#);
        let err = OverlayLayout::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("sprite.normal is required"));
    }

    #[test]
    fn wrong_array_lengths_are_rejected() {
        let bad_bg = MOUSE_LAYOUT.replace("[10, 20, 30, 255]", "[10, 20, 30]");
        assert!(OverlayLayout::from_json_str(&bad_bg).is_err());

        let bad_color = MOUSE_LAYOUT.replace("[10, 20, 30, 255]", "[10, 20, 30, 256]");
        assert!(OverlayLayout::from_json_str(&bad_color).is_err());

        let bad_pos = MOUSE_LAYOUT.replace("\"pos\": [0, 0]", "\"pos\": [0]");
        assert!(OverlayLayout::from_json_str(&bad_pos).is_err());
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = OverlayLayout::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, OverlayError::ConfigError { .. }));
    }

    #[test]
    fn from_file_distinguishes_io_and_content_errors() {
        let missing = OverlayLayout::from_file(Path::new("/nonexistent/layout.json")).unwrap_err();
        assert!(matches!(missing, OverlayError::AssetError { .. }));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MOUSE_LAYOUT.as_bytes()).unwrap();
        let layout = OverlayLayout::from_file(file.path()).unwrap();
        assert_eq!(layout.elements.len(), 4);
    }

    #[test]
    fn texture_path_resolves_relative_to_layout() {
        let layout = OverlayLayout::from_json_str(MOUSE_LAYOUT).unwrap();
        assert_eq!(
            layout.texture_path(Path::new("/overlays/mouse")),
            Path::new("/overlays/mouse/mouse.png")
        );
    }
}
