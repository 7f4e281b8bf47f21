//! Structural checks run on a parsed layout.
//!
//! Parsing catches malformed arrays and missing required fields; this module checks the
//! relationships between fields: unique element ids and sprite regions that fit the texture.

use crate::error::{OverlayError, Result};
use crate::layout::element::{Element, ElementKind};
use crate::layout::OverlayLayout;
use std::collections::HashSet;

/// Validate everything that can be checked without decoding the texture.
///
/// # Validations Performed
/// - Element ids are unique
/// - Sprite regions lie inside `texture.size`, when the layout declares it
pub fn validate_layout(layout: &OverlayLayout) -> Result<()> {
    validate_unique_ids(&layout.elements)?;
    if let Some((width, height)) = layout.texture.size {
        validate_sprite_bounds(layout, width, height)?;
    }
    Ok(())
}

/// Re-check every sprite region against the size of the decoded texture.
///
/// The declared `texture.size` is optional and may be stale, so this runs again at open time.
pub fn validate_against_texture(layout: &OverlayLayout, width: u32, height: u32) -> Result<()> {
    if let Some(declared) = layout.texture.size {
        if declared != (width, height) {
            log::warn!(
                "texture.size {}x{} does not match the image ({}x{})",
                declared.0,
                declared.1,
                width,
                height
            );
        }
    }
    validate_sprite_bounds(layout, width, height)
}

fn validate_unique_ids(elements: &[Element]) -> Result<()> {
    let mut seen = HashSet::with_capacity(elements.len());
    for element in elements {
        if !seen.insert(element.id.as_str()) {
            return Err(OverlayError::config(format!(
                "duplicate element id '{}'",
                element.id
            )));
        }
    }
    Ok(())
}

fn validate_sprite_bounds(layout: &OverlayLayout, width: u32, height: u32) -> Result<()> {
    for element in &layout.elements {
        for (name, rect) in element.sprite.regions() {
            if !rect.fits_within(width, height) {
                return Err(OverlayError::config(format!(
                    "element '{}': sprite.{name} [{}, {}, {}, {}] lies outside the {width}x{height} texture",
                    element.id, rect.x, rect.y, rect.width, rect.height
                )));
            }
        }

        // Buttons without an explicit pressed region render the offset copy of `normal`.
        let derives_pressed = matches!(element.kind, ElementKind::Button { .. })
            && element.sprite.pressed.is_none();
        if let (true, Some((_, dy))) = (derives_pressed, layout.defaults.pressed_offset) {
            let derived = element.sprite.normal.shifted_y(dy);
            if !derived.fits_within(width, height) {
                return Err(OverlayError::config(format!(
                    "element '{}': pressed offset moves sprite.normal outside the {width}x{height} texture",
                    element.id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_KEYS: &str = r#"{
        "texture": { "file": "keys.png", "size": [100, 100] },
        "canvas": { "size": [200, 100] },
        "defaults": { "pressed_offset": [0, 50] },
        "elements": [
            { "id": "w", "codes": { "hid": 26 }, "sprite": { "normal": [0, 0, 40, 40] } },
            { "id": "s", "codes": { "hid": 22 }, "sprite": { "normal": [40, 0, 40, 40] } }
        ]
    }"#;

    #[test]
    fn accepts_regions_inside_texture() {
        let layout = OverlayLayout::from_json_str(TWO_KEYS).unwrap();
        assert!(validate_against_texture(&layout, 100, 100).is_ok());
    }

    #[test]
    fn derived_pressed_region_must_fit() {
        let layout = OverlayLayout::from_json_str(TWO_KEYS).unwrap();
        // normal [0,0,40,40] shifted by 50 needs 90 rows
        let err = validate_against_texture(&layout, 100, 80).unwrap_err();
        assert!(err.to_string().contains("pressed offset"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = TWO_KEYS.replace("\"id\": \"s\"", "\"id\": \"w\"");
        let err = OverlayLayout::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate element id 'w'"));
    }

    #[test]
    fn rejects_region_outside_declared_size() {
        let json = TWO_KEYS.replace("[40, 0, 40, 40]", "[80, 0, 40, 40]");
        let err = OverlayLayout::from_json_str(&json).unwrap_err();
        assert!(matches!(err, OverlayError::ConfigError { .. }));
        assert!(err.to_string().contains("sprite.normal"));
    }
}
