//! Measurement snapshots consumed by the motion controller.
//!
//! The view layer measures the live DOM and hands the result over as an
//! immutable [`Geometry`]. The controller never reads layout on its own, so
//! the motion logic stays testable without a browser.

use smallvec::SmallVec;

/// One slide, as measured by the layout engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemRect {
    /// Left edge relative to the track origin, px.
    pub left: f32,
    pub width: f32,
}

/// Snapshot of a slider's layout at one instant.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    /// Visible container width, px.
    pub container_width: f32,
    /// Full track width including overflow, px.
    pub track_width: f32,
    pub items: SmallVec<[ItemRect; 8]>,
}

impl Geometry {
    pub fn new(
        container_width: f32,
        track_width: f32,
        items: impl IntoIterator<Item = ItemRect>,
    ) -> Self {
        Self {
            container_width,
            track_width,
            items: items.into_iter().collect(),
        }
    }

    /// Minimum reachable offset. Non-negative means the track fits and
    /// sliding is disabled.
    pub fn limit(&self) -> f32 {
        self.container_width - self.track_width
    }

    /// True when the whole track fits within the container.
    pub fn is_short(&self) -> bool {
        self.container_width >= self.track_width
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Index of the first item whose visible right edge crosses the origin
    /// under the given offset.
    pub fn current_item(&self, offset: f32) -> Option<usize> {
        self.items
            .iter()
            .position(|item| offset + item.left + item.width > 0.0)
    }

    /// Committed offset that places the item's left edge at the origin.
    /// Out-of-range indices resolve to the track start.
    pub fn item_offset(&self, index: usize) -> f32 {
        self.items.get(index).map(|item| -item.left).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(widths: &[f32]) -> Vec<ItemRect> {
        let mut left = 0.0;
        widths
            .iter()
            .map(|&width| {
                let rect = ItemRect { left, width };
                left += width;
                rect
            })
            .collect()
    }

    #[test]
    fn limit_is_container_minus_track() {
        let g = Geometry::new(300.0, 1000.0, row(&[250.0; 4]));
        assert_eq!(g.limit(), -700.0);
        assert!(!g.is_short());
    }

    #[test]
    fn short_track_has_non_negative_limit() {
        let g = Geometry::new(300.0, 200.0, row(&[100.0, 100.0]));
        assert_eq!(g.limit(), 100.0);
        assert!(g.is_short());
    }

    #[test]
    fn current_item_scans_under_offset() {
        let g = Geometry::new(300.0, 900.0, row(&[300.0; 3]));
        assert_eq!(g.current_item(0.0), Some(0));
        // First item fully scrolled out, second partially visible.
        assert_eq!(g.current_item(-300.0), Some(1));
        assert_eq!(g.current_item(-450.0), Some(1));
        assert_eq!(g.current_item(-600.0), Some(2));
    }

    #[test]
    fn current_item_on_empty_track_is_none() {
        let g = Geometry::new(300.0, 0.0, row(&[]));
        assert_eq!(g.current_item(0.0), None);
    }

    #[test]
    fn item_offset_aligns_left_edges() {
        let g = Geometry::new(300.0, 900.0, row(&[300.0, 200.0, 400.0]));
        assert_eq!(g.item_offset(0), 0.0);
        assert_eq!(g.item_offset(1), -300.0);
        assert_eq!(g.item_offset(2), -500.0);
        assert_eq!(g.item_offset(9), 0.0);
    }
}
