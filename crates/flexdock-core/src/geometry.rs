#![forbid(unsafe_code)]

//! Geometric primitives.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rectangle in screen coordinates (origin at top-left, y grows downward).
///
/// Coordinates are fractional so weighted splits never lose space to
/// rounding; renderers snap to pixels or cells themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal midpoint.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical midpoint.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Extent along an orientation (width for horizontal, height for vertical).
    #[inline]
    pub fn extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    /// Leading coordinate along an orientation.
    #[inline]
    pub fn start(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if `other` lies entirely within this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrink by `amount` on every side, never producing negative sizes.
    pub fn inset(&self, amount: f64) -> Rect {
        let width = (self.width - 2.0 * amount).max(0.0);
        let height = (self.height - 2.0 * amount).max(0.0);
        Rect::new(self.x + amount, self.y + amount, width, height)
    }
}

/// Layout direction of a row or a dock location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Children laid out left to right.
    Horizontal,
    /// Children laid out top to bottom.
    Vertical,
}

impl Orientation {
    /// The other orientation.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Where a dragged node lands relative to a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DockLocation {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl DockLocation {
    /// All five locations.
    pub const ALL: [Self; 5] = [
        Self::Center,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
    ];

    /// Axis along which a split toward this location divides space.
    ///
    /// `Center` reports horizontal; it never splits.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Top | Self::Bottom => Orientation::Vertical,
            Self::Center | Self::Left | Self::Right => Orientation::Horizontal,
        }
    }

    /// Mirror location (`Center` maps to itself).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Center => Self::Center,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The two edge locations perpendicular to this one.
    #[must_use]
    pub const fn perpendicular(self) -> [Self; 2] {
        match self {
            Self::Top | Self::Bottom => [Self::Left, Self::Right],
            Self::Left | Self::Right => [Self::Top, Self::Bottom],
            Self::Center => [Self::Center, Self::Center],
        }
    }

    /// Offset added to a target's index when inserting a sibling on this side.
    #[must_use]
    pub const fn index_offset(self) -> usize {
        match self {
            Self::Right | Self::Bottom => 1,
            Self::Center | Self::Top | Self::Left => 0,
        }
    }

    /// Whether this is one of the four edges.
    #[must_use]
    pub const fn is_edge(self) -> bool {
        !matches!(self, Self::Center)
    }

    /// Classify a point inside `rect`.
    ///
    /// The middle half in both axes is `Center`; the rest is divided by the
    /// two diagonals into the nearest edge.
    #[must_use]
    pub fn classify(rect: Rect, x: f64, y: f64) -> Self {
        if rect.is_empty() {
            return Self::Center;
        }
        let fx = (x - rect.x) / rect.width;
        let fy = (y - rect.y) / rect.height;
        if (0.25..0.75).contains(&fx) && (0.25..0.75).contains(&fy) {
            return Self::Center;
        }
        let below_main = fy >= fx;
        let below_anti = fy >= 1.0 - fx;
        match (below_main, below_anti) {
            (true, true) => Self::Bottom,
            (true, false) => Self::Left,
            (false, true) => Self::Right,
            (false, false) => Self::Top,
        }
    }

    /// Half of `rect` on this side (the whole rect for `Center`).
    #[must_use]
    pub fn dock_rect(self, rect: Rect) -> Rect {
        let half_w = rect.width / 2.0;
        let half_h = rect.height / 2.0;
        match self {
            Self::Center => rect,
            Self::Top => Rect::new(rect.x, rect.y, rect.width, half_h),
            Self::Bottom => Rect::new(rect.x, rect.bottom() - half_h, rect.width, half_h),
            Self::Left => Rect::new(rect.x, rect.y, half_w, rect.height),
            Self::Right => Rect::new(rect.right() - half_w, rect.y, half_w, rect.height),
        }
    }

    /// Split `rect` into the slice of `size` on this side and the remainder.
    ///
    /// `size` is clamped to the available extent.
    #[must_use]
    pub fn split(self, rect: Rect, size: f64) -> (Rect, Rect) {
        match self {
            Self::Top => {
                let size = size.max(0.0).min(rect.height.max(0.0));
                (
                    Rect::new(rect.x, rect.y, rect.width, size),
                    Rect::new(rect.x, rect.y + size, rect.width, rect.height - size),
                )
            }
            Self::Bottom => {
                let size = size.max(0.0).min(rect.height.max(0.0));
                (
                    Rect::new(rect.x, rect.bottom() - size, rect.width, size),
                    Rect::new(rect.x, rect.y, rect.width, rect.height - size),
                )
            }
            Self::Left => {
                let size = size.max(0.0).min(rect.width.max(0.0));
                (
                    Rect::new(rect.x, rect.y, size, rect.height),
                    Rect::new(rect.x + size, rect.y, rect.width - size, rect.height),
                )
            }
            Self::Right => {
                let size = size.max(0.0).min(rect.width.max(0.0));
                (
                    Rect::new(rect.right() - size, rect.y, size, rect.height),
                    Rect::new(rect.x, rect.y, rect.width - size, rect.height),
                )
            }
            Self::Center => (rect, Rect::new(rect.x, rect.y, 0.0, 0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DockLocation, Orientation, Rect};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(2.0, 3.0));
        assert!(rect.contains(5.9, 7.9));
        assert!(!rect.contains(6.0, 3.0));
        assert!(!rect.contains(2.0, 8.0));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 2.0, 4.0, 4.0);
        assert_eq!(a.intersection(&b), Rect::new(2.0, 2.0, 2.0, 2.0));
        let c = Rect::new(10.0, 10.0, 1.0, 1.0);
        assert_eq!(a.intersection_opt(&c), None);
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn rect_union_and_inset() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(4.0, 1.0, 2.0, 4.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 6.0, 5.0));
        assert_eq!(
            Rect::new(0.0, 0.0, 10.0, 4.0).inset(3.0),
            Rect::new(3.0, 3.0, 4.0, 0.0)
        );
    }

    #[test]
    fn classify_center_and_edges() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(DockLocation::classify(rect, 50.0, 50.0), DockLocation::Center);
        assert_eq!(DockLocation::classify(rect, 5.0, 50.0), DockLocation::Left);
        assert_eq!(DockLocation::classify(rect, 95.0, 50.0), DockLocation::Right);
        assert_eq!(DockLocation::classify(rect, 50.0, 5.0), DockLocation::Top);
        assert_eq!(DockLocation::classify(rect, 50.0, 95.0), DockLocation::Bottom);
    }

    #[test]
    fn dock_rect_halves() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(
            DockLocation::Right.dock_rect(rect),
            Rect::new(60.0, 20.0, 50.0, 50.0)
        );
        assert_eq!(
            DockLocation::Bottom.dock_rect(rect),
            Rect::new(10.0, 45.0, 100.0, 25.0)
        );
        assert_eq!(DockLocation::Center.dock_rect(rect), rect);
    }

    #[test]
    fn split_clamps_to_extent() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        let (slice, rest) = DockLocation::Bottom.split(rect, 60.0);
        assert_eq!(slice, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert!(rest.is_empty());
        let (slice, rest) = DockLocation::Left.split(rect, 30.0);
        assert_eq!(slice, Rect::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(rest, Rect::new(30.0, 0.0, 70.0, 40.0));
    }

    #[test]
    fn location_lookups() {
        assert_eq!(DockLocation::Top.opposite(), DockLocation::Bottom);
        assert_eq!(DockLocation::Center.opposite(), DockLocation::Center);
        assert_eq!(DockLocation::Left.orientation(), Orientation::Horizontal);
        assert_eq!(DockLocation::Bottom.orientation(), Orientation::Vertical);
        assert_eq!(
            DockLocation::Left.perpendicular(),
            [DockLocation::Top, DockLocation::Bottom]
        );
        assert_eq!(DockLocation::Right.index_offset(), 1);
        assert_eq!(DockLocation::Top.index_offset(), 0);
        assert_eq!(Orientation::Vertical.flip(), Orientation::Horizontal);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn dock_location_serializes_snake_case() {
        let json = serde_json::to_string(&DockLocation::Right).expect("serialize");
        assert_eq!(json, "\"right\"");
    }

    mod props {
        use super::super::{DockLocation, Rect};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn classify_edge_matches_dock_rect(
                fx in 0.0f64..1.0,
                fy in 0.0f64..1.0,
            ) {
                let rect = Rect::new(0.0, 0.0, 200.0, 120.0);
                let x = fx * rect.width;
                let y = fy * rect.height;
                let location = DockLocation::classify(rect, x, y);
                let half = location.dock_rect(rect);
                prop_assert!(rect.contains_rect(&half));
                if location.is_edge() {
                    prop_assert!(half.contains(x, y));
                }
            }
        }
    }
}
