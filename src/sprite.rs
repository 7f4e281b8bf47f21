//! Sprite region resolution.
//!
//! Maps an element and its logical state to the texture rectangle that should be drawn.

pub mod texture;

pub use texture::SpriteSheet;

use crate::geometry::Rect;
use crate::layout::{Element, ElementKind, OverlayLayout};

/// Logical visual state of an element.
///
/// Buttons only use `Normal` and `Pressed`. The discriminants are the wheel machine's state
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ElementState {
    #[default]
    Normal = 0,
    Pressed = 1,
    ScrollUp = 2,
    ScrollDown = 3,
}

impl ElementState {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_scrolling(self) -> bool {
        matches!(self, ElementState::ScrollUp | ElementState::ScrollDown)
    }
}

/// Resolves sprite regions for one layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteResolver {
    pressed_offset: Option<(i32, i32)>,
}

impl SpriteResolver {
    pub fn new(pressed_offset: Option<(i32, i32)>) -> Self {
        Self { pressed_offset }
    }

    pub fn for_layout(layout: &OverlayLayout) -> Self {
        Self::new(layout.defaults.pressed_offset)
    }

    /// Texture rectangle for `element` in `state`. Falls back to `normal`; never fails.
    pub fn resolve(&self, element: &Element, state: ElementState) -> Rect {
        let sprite = &element.sprite;
        match element.kind {
            ElementKind::Cursor(_) => sprite.normal,
            ElementKind::Wheel { .. } => match state {
                ElementState::Normal => sprite.normal,
                ElementState::Pressed => sprite.pressed.unwrap_or(sprite.normal),
                ElementState::ScrollUp => sprite.up.unwrap_or(sprite.normal),
                ElementState::ScrollDown => sprite.down.unwrap_or(sprite.normal),
            },
            ElementKind::Button { .. } => {
                if state != ElementState::Pressed {
                    return sprite.normal;
                }
                match (sprite.pressed, self.pressed_offset) {
                    (Some(pressed), _) => pressed,
                    // Only the vertical component of the offset applies.
                    (None, Some((_, dy))) => sprite.normal.shifted_y(dy),
                    (None, None) => sprite.normal,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::layout::{CursorMode, CursorSpec, InputBinding, SpriteSet, VirtualKey};

    fn element(kind: ElementKind, sprite: SpriteSet) -> Element {
        Element {
            id: "e".to_string(),
            binding: InputBinding::default(),
            position: Point::default(),
            z: 1,
            sprite,
            kind,
        }
    }

    fn wheel(sprite: SpriteSet) -> Element {
        element(
            ElementKind::Wheel {
                button: VirtualKey::MBUTTON,
            },
            sprite,
        )
    }

    #[test]
    fn wheel_without_scroll_regions_falls_back_to_normal() {
        let normal = Rect::new(0, 0, 10, 10);
        let e = wheel(SpriteSet::with_normal(normal));
        let resolver = SpriteResolver::default();
        for state in [
            ElementState::Normal,
            ElementState::Pressed,
            ElementState::ScrollUp,
            ElementState::ScrollDown,
        ] {
            assert_eq!(resolver.resolve(&e, state), normal);
        }
    }

    #[test]
    fn wheel_uses_directional_regions() {
        let mut sprite = SpriteSet::with_normal(Rect::new(0, 0, 10, 10));
        sprite.up = Some(Rect::new(0, 10, 10, 10));
        sprite.down = Some(Rect::new(0, 20, 10, 10));
        sprite.pressed = Some(Rect::new(0, 30, 10, 10));
        let e = wheel(sprite.clone());
        let resolver = SpriteResolver::default();
        assert_eq!(resolver.resolve(&e, ElementState::ScrollUp), sprite.up.unwrap());
        assert_eq!(resolver.resolve(&e, ElementState::ScrollDown), sprite.down.unwrap());
        assert_eq!(resolver.resolve(&e, ElementState::Pressed), sprite.pressed.unwrap());
    }

    #[test]
    fn pressed_offset_moves_only_vertically() {
        let e = element(
            ElementKind::Button {
                key: Some(VirtualKey::SPACE),
            },
            SpriteSet::with_normal(Rect::new(0, 0, 10, 10)),
        );
        let resolver = SpriteResolver::new(Some((3, 4)));
        assert_eq!(resolver.resolve(&e, ElementState::Pressed), Rect::new(0, 4, 10, 10));
        assert_eq!(resolver.resolve(&e, ElementState::Normal), Rect::new(0, 0, 10, 10));
        assert_eq!(
            SpriteResolver::default().resolve(&e, ElementState::Pressed),
            Rect::new(0, 0, 10, 10)
        );
    }

    #[test]
    fn explicit_pressed_region_wins_over_offset() {
        let mut sprite = SpriteSet::with_normal(Rect::new(0, 0, 10, 10));
        sprite.pressed = Some(Rect::new(50, 50, 10, 10));
        let e = element(ElementKind::Button { key: None }, sprite);
        let resolver = SpriteResolver::new(Some((0, 20)));
        assert_eq!(resolver.resolve(&e, ElementState::Pressed), Rect::new(50, 50, 10, 10));
    }

    #[test]
    fn cursor_always_draws_normal_and_resolution_is_stable() {
        let normal = Rect::new(5, 5, 8, 8);
        let e = element(
            ElementKind::Cursor(CursorSpec::new(CursorMode::Arrow)),
            SpriteSet::with_normal(normal),
        );
        let resolver = SpriteResolver::new(Some((0, 8)));
        let first = resolver.resolve(&e, ElementState::Pressed);
        assert_eq!(first, normal);
        assert_eq!(resolver.resolve(&e, ElementState::Pressed), first);
    }

    #[test]
    fn state_codes() {
        assert_eq!(ElementState::Normal.code(), 0);
        assert_eq!(ElementState::ScrollDown.code(), 3);
        assert!(ElementState::ScrollUp.is_scrolling());
        assert!(!ElementState::Pressed.is_scrolling());
    }
}
