//! The four edge docks and their nesting order.

use std::fmt;

use flexdock_core::{DockLocation, Orientation};
use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Edge a border is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderLocation {
    Top,
    Bottom,
    Left,
    Right,
}

impl BorderLocation {
    /// Canonical order, also the tie-break order for nesting.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    #[must_use]
    pub const fn dock_location(self) -> DockLocation {
        match self {
            Self::Top => DockLocation::Top,
            Self::Bottom => DockLocation::Bottom,
            Self::Left => DockLocation::Left,
            Self::Right => DockLocation::Right,
        }
    }

    /// Direction in which the tab headers of this border run.
    #[must_use]
    pub const fn tab_orientation(self) -> Orientation {
        match self {
            Self::Top | Self::Bottom => Orientation::Horizontal,
            Self::Left | Self::Right => Orientation::Vertical,
        }
    }

    /// Whether the content size grows as the splitter moves toward larger
    /// coordinates.
    #[must_use]
    pub const fn grows_with_position(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }
}

impl fmt::Display for BorderLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly four borders, one per edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderSet {
    borders: [NodeId; 4],
}

impl BorderSet {
    /// Ids ordered top, bottom, left, right.
    pub(crate) fn new(borders: [NodeId; 4]) -> Self {
        Self { borders }
    }

    #[must_use]
    pub fn get(&self, location: BorderLocation) -> &NodeId {
        &self.borders[location.index()]
    }

    /// Borders in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (BorderLocation, &NodeId)> {
        BorderLocation::ALL
            .into_iter()
            .map(|location| (location, &self.borders[location.index()]))
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.borders.contains(id)
    }
}

/// Order in which borders claim window edges, outermost first.
///
/// Higher priority nests further out; ties keep top, bottom, left, right.
#[must_use]
pub fn compute_nesting_order(borders: &[(BorderLocation, i32)]) -> Vec<BorderLocation> {
    let mut sorted = borders.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.index().cmp(&b.0.index())));
    sorted.into_iter().map(|(location, _)| location).collect()
}
