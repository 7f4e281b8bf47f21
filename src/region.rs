//! Window-region classification for the host's hit-test handler.
//!
//! The overlay window is borderless; resizing is done by grabbing a band around the rendered
//! content. Everything else inside the window drags it.

use crate::geometry::{Bounds, Point, Size};

/// Region of the overlay window a point falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Interior,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    /// The window ignores the pointer entirely (click-through).
    Transparent,
}

impl Zone {
    /// The Win32 `WM_NCHITTEST` result for this zone.
    pub fn hit_test_code(self) -> isize {
        match self {
            Zone::Transparent => -1,
            Zone::Interior => 1,
            Zone::West => 10,
            Zone::East => 11,
            Zone::North => 12,
            Zone::NorthWest => 13,
            Zone::NorthEast => 14,
            Zone::South => 15,
            Zone::SouthWest => 16,
            Zone::SouthEast => 17,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionClassifier {
    margin: f64,
    click_through: bool,
}

impl RegionClassifier {
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            click_through: false,
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn click_through(&self) -> bool {
        self.click_through
    }

    pub fn set_click_through(&mut self, enabled: bool) {
        self.click_through = enabled;
    }

    /// Classify a window-local point against the rendered content bounds.
    ///
    /// Each band extends `margin` to both sides of its content edge. Corners are checked before
    /// edges; unknown bounds classify as `Interior`.
    pub fn classify(&self, point: Point, content: Option<Bounds>) -> Zone {
        if self.click_through {
            return Zone::Transparent;
        }
        let Some(bounds) = content else {
            return Zone::Interior;
        };

        let near = |value: f64, edge: f64| value >= edge - self.margin && value <= edge + self.margin;
        let left = near(point.x, bounds.left);
        let right = near(point.x, bounds.right);
        let top = near(point.y, bounds.top);
        let bottom = near(point.y, bounds.bottom);

        match (left, right, top, bottom) {
            (true, _, true, _) => Zone::NorthWest,
            (_, true, true, _) => Zone::NorthEast,
            (true, _, _, true) => Zone::SouthWest,
            (_, true, _, true) => Zone::SouthEast,
            (true, _, _, _) => Zone::West,
            (_, true, _, _) => Zone::East,
            (_, _, true, _) => Zone::North,
            (_, _, _, true) => Zone::South,
            _ => Zone::Interior,
        }
    }
}

/// Bounds of a `canvas` scaled uniformly to fit `window` and centred (letterboxed).
///
/// Returns `None` when either size is empty.
pub fn fit_uniform(window: Size, canvas: Size) -> Option<Bounds> {
    if window.is_empty() || canvas.is_empty() {
        return None;
    }
    let scale = (window.width / canvas.width).min(window.height / canvas.height);
    let content = Size::new(canvas.width * scale, canvas.height * scale);
    let origin = Point::new(
        (window.width - content.width) / 2.0,
        (window.height - content.height) / 2.0,
    );
    Some(Bounds::from_origin_size(origin, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> Option<Bounds> {
        Some(Bounds::new(0.0, 0.0, 200.0, 100.0))
    }

    #[test]
    fn left_band_is_west() {
        let classifier = RegionClassifier::new(15.0);
        assert_eq!(classifier.classify(Point::new(5.0, 50.0), content()), Zone::West);
        assert_eq!(classifier.classify(Point::new(-15.0, 50.0), content()), Zone::West);
    }

    #[test]
    fn left_band_boundaries() {
        let classifier = RegionClassifier::new(15.0);
        // Points inside the left edge of content at x = 0.
        assert_eq!(classifier.classify(Point::new(10.0, 50.0), content()), Zone::West);
        assert_eq!(classifier.classify(Point::new(15.0, 50.0), content()), Zone::West);
        assert_eq!(classifier.classify(Point::new(20.0, 50.0), content()), Zone::Interior);

        // The same distances measured from shifted content.
        let shifted = Some(Bounds::new(40.0, 0.0, 240.0, 100.0));
        assert_eq!(classifier.classify(Point::new(50.0, 50.0), shifted), Zone::West);
        assert_eq!(classifier.classify(Point::new(60.0, 50.0), shifted), Zone::Interior);
    }

    #[test]
    fn corners_take_priority_over_edges() {
        let classifier = RegionClassifier::new(15.0);
        let bounds = content();
        assert_eq!(classifier.classify(Point::new(2.0, 3.0), bounds), Zone::NorthWest);
        assert_eq!(classifier.classify(Point::new(198.0, 3.0), bounds), Zone::NorthEast);
        assert_eq!(classifier.classify(Point::new(2.0, 97.0), bounds), Zone::SouthWest);
        assert_eq!(classifier.classify(Point::new(198.0, 97.0), bounds), Zone::SouthEast);
        assert_eq!(classifier.classify(Point::new(100.0, 110.0), bounds), Zone::South);
        assert_eq!(classifier.classify(Point::new(100.0, -10.0), bounds), Zone::North);
        assert_eq!(classifier.classify(Point::new(210.0, 50.0), bounds), Zone::East);
    }

    #[test]
    fn click_through_wins_everywhere() {
        let mut classifier = RegionClassifier::new(15.0);
        classifier.set_click_through(true);
        assert_eq!(classifier.classify(Point::new(5.0, 5.0), content()), Zone::Transparent);
        assert_eq!(classifier.classify(Point::new(50.0, 50.0), None), Zone::Transparent);
    }

    #[test]
    fn unknown_bounds_are_interior() {
        let classifier = RegionClassifier::new(15.0);
        assert_eq!(classifier.classify(Point::new(0.0, 0.0), None), Zone::Interior);
    }

    #[test]
    fn hit_test_codes_match_win32() {
        assert_eq!(Zone::Transparent.hit_test_code(), -1);
        assert_eq!(Zone::Interior.hit_test_code(), 1);
        assert_eq!(Zone::West.hit_test_code(), 10);
        assert_eq!(Zone::SouthEast.hit_test_code(), 17);
    }

    #[test]
    fn fit_uniform_letterboxes() {
        let bounds = fit_uniform(Size::new(400.0, 400.0), Size::new(200.0, 100.0)).unwrap();
        assert_eq!(bounds, Bounds::new(0.0, 100.0, 400.0, 300.0));

        let bounds = fit_uniform(Size::new(100.0, 300.0), Size::new(100.0, 100.0)).unwrap();
        assert_eq!(bounds, Bounds::new(0.0, 100.0, 100.0, 200.0));

        assert!(fit_uniform(Size::new(0.0, 100.0), Size::new(100.0, 100.0)).is_none());
    }
}
