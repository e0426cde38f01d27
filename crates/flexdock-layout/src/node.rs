//! Node records stored in the model registry.
//!
//! Nodes never own each other: parents list child ids and children point
//! back at their parent id. The [`Model`](crate::Model) is the only owner.

use std::fmt;

use flexdock_core::Rect;
use serde::{Deserialize, Serialize};

use crate::attributes::{
    BorderAttributes, GlobalAttributes, RowAttributes, TabAttributes, TabSetAttributes,
};
use crate::border::BorderLocation;
use crate::id::NodeId;

/// Discriminant of [`NodeKind`], also the JSON `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Row,
    TabSet,
    Tab,
    Border,
}

impl NodeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::TabSet => "tabset",
            Self::Tab => "tab",
            Self::Border => "border",
        }
    }

    /// Parse a JSON `type` string.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "row" => Some(Self::Row),
            "tabset" => Some(Self::TabSet),
            "tab" => Some(Self::Tab),
            "border" => Some(Self::Border),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a border shows its content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockState {
    #[default]
    Expanded,
    Collapsed,
}

/// Tabbed group state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabSetNode {
    pub attrs: TabSetAttributes,
    /// Index of the selected tab.
    pub selected: Option<usize>,
}

/// Edge dock state.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderNode {
    pub location: BorderLocation,
    pub attrs: BorderAttributes,
    pub selected: Option<usize>,
    /// Tiled tab indices; empty means "show `selected` alone".
    pub visible_tabs: Vec<usize>,
    pub dock_state: DockState,
    /// Unpinned borders overlay their content as a flyout.
    pub pinned: bool,
    pub flyout_tab: Option<NodeId>,
}

impl BorderNode {
    #[must_use]
    pub fn new(location: BorderLocation) -> Self {
        Self {
            location,
            attrs: BorderAttributes::default(),
            selected: None,
            visible_tabs: Vec::new(),
            dock_state: DockState::Expanded,
            pinned: true,
            flyout_tab: None,
        }
    }

    /// Tab indices currently displayed: the tiled set, else the selection.
    #[must_use]
    pub fn displayed_tabs(&self) -> Vec<usize> {
        if self.visible_tabs.is_empty() {
            self.selected.into_iter().collect()
        } else {
            self.visible_tabs.clone()
        }
    }

    /// Whether the border reserves space for content in the tiled layout.
    #[must_use]
    pub fn shows_docked_content(&self) -> bool {
        self.pinned && self.dock_state == DockState::Expanded && self.selected.is_some()
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Row(RowAttributes),
    TabSet(TabSetNode),
    Tab(TabAttributes),
    Border(BorderNode),
}

impl NodeKind {
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Row(_) => NodeType::Row,
            Self::TabSet(_) => NodeType::TabSet,
            Self::Tab(_) => NodeType::Tab,
            Self::Border(_) => NodeType::Border,
        }
    }
}

/// Rectangles derived by the geometry solver. Never serialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeGeometry {
    /// Full area of the node (tab: its content area, empty when hidden).
    pub rect: Rect,
    /// Tab strip of a tabset or tab bar of a border.
    pub tab_strip_rect: Rect,
    /// Content area of a tabset or border.
    pub content_rect: Rect,
    /// Header rectangle of a tab inside its parent's strip.
    pub tab_rect: Rect,
    /// Splitters between row children, or the single splitter of a border.
    pub splitters: Vec<Rect>,
    /// Overlay of an unpinned border with an open flyout.
    pub flyout_rect: Option<Rect>,
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) geometry: NodeGeometry,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            kind,
            geometry: NodeGeometry::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    #[must_use]
    pub fn geometry(&self) -> &NodeGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn as_row(&self) -> Option<&RowAttributes> {
        match &self.kind {
            NodeKind::Row(row) => Some(row),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tabset(&self) -> Option<&TabSetNode> {
        match &self.kind {
            NodeKind::TabSet(tabset) => Some(tabset),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tab(&self) -> Option<&TabAttributes> {
        match &self.kind {
            NodeKind::Tab(tab) => Some(tab),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_border(&self) -> Option<&BorderNode> {
        match &self.kind {
            NodeKind::Border(border) => Some(border),
            _ => None,
        }
    }

    pub(crate) fn as_tabset_mut(&mut self) -> Option<&mut TabSetNode> {
        match &mut self.kind {
            NodeKind::TabSet(tabset) => Some(tabset),
            _ => None,
        }
    }

    pub(crate) fn as_tab_mut(&mut self) -> Option<&mut TabAttributes> {
        match &mut self.kind {
            NodeKind::Tab(tab) => Some(tab),
            _ => None,
        }
    }

    pub(crate) fn as_border_mut(&mut self) -> Option<&mut BorderNode> {
        match &mut self.kind {
            NodeKind::Border(border) => Some(border),
            _ => None,
        }
    }

    /// Selected child index of a tabset or border.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::TabSet(tabset) => tabset.selected,
            NodeKind::Border(border) => border.selected,
            NodeKind::Row(_) | NodeKind::Tab(_) => None,
        }
    }

    /// Id of the selected child, if any.
    #[must_use]
    pub fn selected_child(&self) -> Option<&NodeId> {
        self.selected().and_then(|index| self.children.get(index))
    }

    /// Layout weight of rows and tabsets (`None` for tabs and borders).
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Row(row) => Some(row.weight),
            NodeKind::TabSet(tabset) => Some(tabset.attrs.weight),
            NodeKind::Tab(_) | NodeKind::Border(_) => None,
        }
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        match &mut self.kind {
            NodeKind::Row(row) => row.weight = weight,
            NodeKind::TabSet(tabset) => tabset.attrs.weight = weight,
            NodeKind::Tab(_) | NodeKind::Border(_) => {}
        }
    }

    /// Whether the node may be dragged, resolved against the model defaults.
    #[must_use]
    pub fn enable_drag(&self, global: &GlobalAttributes) -> bool {
        match &self.kind {
            NodeKind::Tab(tab) => tab.enable_drag(global),
            NodeKind::TabSet(tabset) => tabset.attrs.enable_drag(global),
            NodeKind::Row(_) | NodeKind::Border(_) => false,
        }
    }

    /// Whether the node accepts center drops.
    #[must_use]
    pub fn enable_drop(&self, global: &GlobalAttributes) -> bool {
        match &self.kind {
            NodeKind::TabSet(tabset) => tabset.attrs.enable_drop(global),
            NodeKind::Border(border) => border.attrs.enable_drop(global),
            NodeKind::Row(_) => global.enable_edge_dock,
            NodeKind::Tab(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_strings_round_trip() {
        for kind in [NodeType::Row, NodeType::TabSet, NodeType::Tab, NodeType::Border] {
            assert_eq!(NodeType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeType::parse("splitter"), None);
    }

    #[test]
    fn border_displays_selection_when_not_tiled() {
        let mut border = BorderNode::new(BorderLocation::Left);
        assert!(border.displayed_tabs().is_empty());
        border.selected = Some(2);
        assert_eq!(border.displayed_tabs(), vec![2]);
        border.visible_tabs = vec![0, 2];
        assert_eq!(border.displayed_tabs(), vec![0, 2]);
        assert!(border.shows_docked_content());
        border.dock_state = DockState::Collapsed;
        assert!(!border.shows_docked_content());
    }

    #[test]
    fn weights_only_apply_to_rows_and_tabsets() {
        let mut tab = Node::new(NodeId::new("t"), NodeKind::Tab(TabAttributes::default()));
        tab.set_weight(10.0);
        assert_eq!(tab.weight(), None);
        let mut row = Node::new(NodeId::new("r"), NodeKind::Row(RowAttributes::default()));
        row.set_weight(10.0);
        assert_eq!(row.weight(), Some(10.0));
    }
}
