//! Drop-target resolution and drop edits.
//!
//! Hit-testing (`can_drop`, `find_drop_target`) reads the solved geometry and
//! never mutates. The edit (`drop_node`) backs `MOVE_NODE` and `ADD_NODE`.

use flexdock_core::{DockLocation, Orientation, Rect};

use crate::Model;
use crate::attributes::RowAttributes;
use crate::dispatch::IgnoreReason;
use crate::id::NodeId;
use crate::node::{DockState, Node, NodeKind, NodeType};
use crate::selection;

/// Thickness of the insertion marker drawn between tab headers.
const INSERT_MARKER: f64 = 3.0;

/// A resolved drop: where the dragged node would land.
#[derive(Debug, Clone, PartialEq)]
pub struct DropInfo {
    /// Row, tabset or border receiving the drop.
    pub target: NodeId,
    /// Preview rectangle for the host to draw.
    pub outline_rect: Rect,
    pub location: DockLocation,
    /// Tab-strip insertion slot; `None` means append, or a tiling drop when
    /// the target is a border and `location` is an edge.
    pub index: Option<usize>,
}

impl DropInfo {
    /// The `MOVE_NODE` action performing this drop.
    #[must_use]
    pub fn into_action(self, drag: impl Into<NodeId>) -> crate::Action {
        crate::Action::move_node(drag, self.target, self.location, self.index, None)
    }
}

impl Model {
    /// Where `drag` would land if released at `(x, y)` over `target`.
    #[must_use]
    pub fn can_drop<Q, R>(&self, target: &Q, drag: &R, x: f64, y: f64) -> Option<DropInfo>
    where
        Q: AsRef<str> + ?Sized,
        R: AsRef<str> + ?Sized,
    {
        let target = self.node(target)?;
        let drag = self.node(drag)?;
        if target.id == drag.id || !drag.enable_drag(&self.global) {
            return None;
        }
        let info = match &target.kind {
            NodeKind::TabSet(_) => self.tabset_drop_info(target, x, y)?,
            NodeKind::Border(_) => {
                if drag.node_type() != NodeType::Tab {
                    return None;
                }
                self.border_drop_info(target, x, y)?
            }
            NodeKind::Row(_) => self.row_drop_info(target, x, y)?,
            NodeKind::Tab(_) => return None,
        };
        self.accepts_drop(drag, target, &info).then_some(info)
    }

    /// Search a window for the drop under the pointer: borders (main window
    /// only), then root-row edges, then tabsets.
    #[must_use]
    pub fn find_drop_target<Q, R>(&self, drag: &Q, window: &R, x: f64, y: f64) -> Option<DropInfo>
    where
        Q: AsRef<str> + ?Sized,
        R: AsRef<str> + ?Sized,
    {
        let window = self.window(window)?;
        if window.id.is_main() {
            for (_, border) in self.borders.iter() {
                if let Some(info) = self.can_drop(border, drag, x, y) {
                    return Some(info);
                }
            }
        }
        if let Some(maximized) = &window.maximized_tabset {
            return self.can_drop(maximized, drag, x, y);
        }
        if let Some(info) = self.can_drop(&window.root, drag, x, y) {
            return Some(info);
        }
        self.tabsets_in_window(&window.id)
            .into_iter()
            .find(|tabset| {
                self.nodes
                    .get(tabset)
                    .is_some_and(|node| node.geometry.rect.contains(x, y))
            })
            .and_then(|tabset| self.can_drop(&tabset, drag, x, y))
    }

    fn accepts_drop(&self, drag: &Node, target: &Node, info: &DropInfo) -> bool {
        let allowed = match &target.kind {
            NodeKind::TabSet(tabset) => {
                if info.location == DockLocation::Center {
                    let named_tabset = drag
                        .as_tabset()
                        .is_some_and(|dragged| dragged.attrs.name.is_some());
                    tabset.attrs.enable_drop(&self.global) && !named_tabset
                } else {
                    tabset.attrs.enable_divide(&self.global)
                }
            }
            NodeKind::Border(border) => border.attrs.enable_drop(&self.global),
            NodeKind::Row(_) => self.global.enable_edge_dock,
            NodeKind::Tab(_) => false,
        };
        allowed
            && self
                .drop_filter
                .as_ref()
                .is_none_or(|filter| filter(self, &drag.id, info))
    }

    fn tabset_drop_info(&self, target: &Node, x: f64, y: f64) -> Option<DropInfo> {
        let maximized = self
            .window_of(&target.id)
            .and_then(|window| self.maximized_tabset(&window).cloned());
        if maximized.as_ref().is_some_and(|id| id != &target.id) {
            return None;
        }
        let geometry = &target.geometry;
        if geometry.tab_strip_rect.contains(x, y) {
            let (index, outline_rect) = self.header_slot(target, x, y, Orientation::Horizontal);
            return Some(DropInfo {
                target: target.id.clone(),
                outline_rect,
                location: DockLocation::Center,
                index: Some(index),
            });
        }
        if !geometry.content_rect.contains(x, y) {
            return None;
        }
        let location = if maximized.is_some() {
            DockLocation::Center
        } else {
            DockLocation::classify(geometry.content_rect, x, y)
        };
        Some(DropInfo {
            target: target.id.clone(),
            outline_rect: location.dock_rect(geometry.rect),
            location,
            index: None,
        })
    }

    fn border_drop_info(&self, target: &Node, x: f64, y: f64) -> Option<DropInfo> {
        let border = target.as_border()?;
        let geometry = &target.geometry;
        if geometry.tab_strip_rect.contains(x, y) {
            let along = border.location.tab_orientation();
            let (index, outline_rect) = self.header_slot(target, x, y, along);
            return Some(DropInfo {
                target: target.id.clone(),
                outline_rect,
                location: DockLocation::Center,
                index: Some(index),
            });
        }
        let content = geometry.content_rect;
        if content.is_empty() || !content.contains(x, y) {
            return None;
        }
        let location = match border.location.tab_orientation() {
            Orientation::Vertical if x < content.center_x() => DockLocation::Left,
            Orientation::Vertical => DockLocation::Right,
            Orientation::Horizontal if y < content.center_y() => DockLocation::Top,
            Orientation::Horizontal => DockLocation::Bottom,
        };
        Some(DropInfo {
            target: target.id.clone(),
            outline_rect: location.dock_rect(content),
            location,
            index: None,
        })
    }

    fn row_drop_info(&self, target: &Node, x: f64, y: f64) -> Option<DropInfo> {
        let window = self.windows.values().find(|window| window.root == target.id)?;
        if window.maximized_tabset.is_some() {
            return None;
        }
        let rect = target.geometry.rect;
        if !rect.contains(x, y) {
            return None;
        }
        let margin = self.global.edge_dock_margin;
        let location = if x < rect.x + margin {
            DockLocation::Left
        } else if x >= rect.right() - margin {
            DockLocation::Right
        } else if y < rect.y + margin {
            DockLocation::Top
        } else if y >= rect.bottom() - margin {
            DockLocation::Bottom
        } else {
            return None;
        };
        let extent = rect.extent(location.orientation());
        let (outline_rect, _) = location.split(rect, extent / 4.0);
        Some(DropInfo {
            target: target.id.clone(),
            outline_rect,
            location,
            index: None,
        })
    }

    /// Insertion slot among a container's tab headers: the first header whose
    /// midpoint lies past the pointer, else one past the last.
    fn header_slot(&self, container: &Node, x: f64, y: f64, along: Orientation) -> (usize, Rect) {
        let pointer = match along {
            Orientation::Horizontal => x,
            Orientation::Vertical => y,
        };
        let strip = container.geometry.tab_strip_rect;
        let mut trailing_edge = strip.start(along);
        for (index, child) in container.children.iter().enumerate() {
            let Some(header) = self.nodes.get(child).map(|node| node.geometry.tab_rect) else {
                continue;
            };
            let mid = match along {
                Orientation::Horizontal => header.center_x(),
                Orientation::Vertical => header.center_y(),
            };
            if pointer < mid {
                return (index, insert_marker(strip, header.start(along), along));
            }
            trailing_edge = header.start(along) + header.extent(along);
        }
        (
            container.children.len(),
            insert_marker(strip, trailing_edge, along),
        )
    }

    // ------------------------------------------------------------------
    // Drop edits
    // ------------------------------------------------------------------

    /// Move `drag` (a tab or tabset, possibly not yet attached) onto `target`.
    pub(crate) fn drop_node(
        &mut self,
        drag: &NodeId,
        target: &NodeId,
        location: DockLocation,
        index: Option<usize>,
        select: Option<bool>,
    ) -> Result<(), IgnoreReason> {
        let drag_type = self
            .nodes
            .get(drag)
            .ok_or(IgnoreReason::StaleNode)?
            .node_type();
        let target_node = self.nodes.get(target).ok_or(IgnoreReason::StaleNode)?;
        if !matches!(drag_type, NodeType::Tab | NodeType::TabSet) {
            return Err(IgnoreReason::TypeMismatch);
        }
        if drag == target {
            return Err(IgnoreReason::Rejected);
        }
        match target_node.node_type() {
            NodeType::TabSet => {
                if location.is_edge() && target_node.parent.is_none() {
                    return Err(IgnoreReason::Rejected);
                }
                self.drop_on_tabset(drag, target, location, index, select);
            }
            NodeType::Border => {
                if drag_type != NodeType::Tab {
                    return Err(IgnoreReason::TypeMismatch);
                }
                self.drop_on_border(drag, target, location, index, select);
            }
            NodeType::Row => {
                let is_window_root = self.windows.values().any(|window| &window.root == target);
                if !is_window_root || !location.is_edge() {
                    return Err(IgnoreReason::Rejected);
                }
                self.drop_on_row(drag, target, location);
            }
            NodeType::Tab => return Err(IgnoreReason::TypeMismatch),
        }
        Ok(())
    }

    fn drop_on_tabset(
        &mut self,
        drag: &NodeId,
        target: &NodeId,
        location: DockLocation,
        index: Option<usize>,
        select: Option<bool>,
    ) {
        let drag_is_tab = self
            .nodes
            .get(drag)
            .is_some_and(|node| node.node_type() == NodeType::Tab);
        let detached = self.detach(drag);
        let index = same_parent_adjust(index, detached.as_ref(), target, drag_is_tab);

        if location == DockLocation::Center {
            let len = self.nodes.get(target).map_or(0, |node| node.children.len());
            let insert_at = index.unwrap_or(len).min(len);
            if drag_is_tab {
                let at = self.attach(target, insert_at, drag.clone());
                if select.unwrap_or(true) {
                    if let Some(tabset) = self.node_mut(target).and_then(Node::as_tabset_mut) {
                        tabset.selected = Some(at);
                    }
                }
            } else {
                let moved = self
                    .nodes
                    .get(drag)
                    .map(|node| node.children.clone())
                    .unwrap_or_default();
                for (offset, child) in moved.into_iter().enumerate() {
                    let _ = self.detach(&child);
                    let _ = self.attach(target, insert_at + offset, child);
                }
                let _ = self.nodes.remove(drag);
                if let Some(node) = self.nodes.get_mut(target) {
                    let has_children = !node.children.is_empty();
                    if let Some(tabset) = node.as_tabset_mut() {
                        if tabset.selected.is_none() && has_children {
                            tabset.selected = Some(0);
                        }
                    }
                }
            }
            self.set_active_tabset_for(target);
            return;
        }

        let moving = if drag_is_tab {
            self.wrap_in_tabset(drag)
        } else {
            drag.clone()
        };
        let Some(parent_row) = self.nodes.get(target).and_then(|node| node.parent.clone()) else {
            return;
        };
        let Some(position) = self.index_in_parent(target) else {
            return;
        };
        let weight = self.weight_of(target);
        if self.row_orientation(&parent_row) == Some(location.orientation()) {
            self.set_weight(target, weight / 2.0);
            self.set_weight(&moving, weight / 2.0);
            let _ = self.attach(&parent_row, position + location.index_offset(), moving.clone());
        } else {
            let wrapper = self.insert_node(NodeKind::Row(RowAttributes { weight }));
            let _ = self.detach(target);
            let _ = self.attach(&parent_row, position, wrapper.clone());
            let _ = self.attach(&wrapper, 0, target.clone());
            self.set_weight(target, 50.0);
            self.set_weight(&moving, 50.0);
            let _ = self.attach(&wrapper, location.index_offset(), moving.clone());
        }
        self.set_active_tabset_for(&moving);
    }

    /// Dock against a window root row edge.
    pub(crate) fn drop_on_row(&mut self, drag: &NodeId, row: &NodeId, location: DockLocation) {
        let drag_is_tab = self
            .nodes
            .get(drag)
            .is_some_and(|node| node.node_type() == NodeType::Tab);
        let moving = if drag_is_tab {
            self.wrap_in_tabset(drag)
        } else {
            let _ = self.detach(drag);
            drag.clone()
        };
        let children = self
            .nodes
            .get(row)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        let total: f64 = children.iter().map(|child| self.weight_of(child)).sum();
        let total = if total > 0.0 {
            total
        } else {
            crate::attributes::DEFAULT_WEIGHT
        };
        let leading = matches!(location, DockLocation::Left | DockLocation::Top);

        if self.row_orientation(row) == Some(location.orientation()) {
            self.set_weight(&moving, total / 3.0);
            let at = if leading { 0 } else { children.len() };
            let _ = self.attach(row, at, moving.clone());
        } else {
            // root -> cross row -> [moving, inner row -> old children]
            let cross = self.insert_node(NodeKind::Row(RowAttributes::default()));
            let inner = self.insert_node(NodeKind::Row(RowAttributes { weight: 75.0 }));
            for child in children {
                let _ = self.detach(&child);
                let len = self.nodes.get(&inner).map_or(0, |node| node.children.len());
                let _ = self.attach(&inner, len, child);
            }
            self.set_weight(&moving, 25.0);
            let _ = self.attach(row, 0, cross.clone());
            let _ = self.attach(&cross, 0, inner);
            let at = if leading { 0 } else { 1 };
            let _ = self.attach(&cross, at, moving.clone());
        }
        self.set_active_tabset_for(&moving);
    }

    fn drop_on_border(
        &mut self,
        drag: &NodeId,
        border: &NodeId,
        location: DockLocation,
        index: Option<usize>,
        select: Option<bool>,
    ) {
        let detached = self.detach(drag);
        let index = same_parent_adjust(index, detached.as_ref(), border, true);
        let len = self.nodes.get(border).map_or(0, |node| node.children.len());

        if location.is_edge() && index.is_none() {
            let at = self.attach(border, len, drag.clone());
            if let Some(state) = self.node_mut(border).and_then(Node::as_border_mut) {
                let mut tiles = state.displayed_tabs();
                if matches!(location, DockLocation::Left | DockLocation::Top) {
                    tiles.insert(0, at);
                } else {
                    tiles.push(at);
                }
                (state.selected, state.visible_tabs) = selection::normalize(Some(at), &tiles, len + 1);
                state.dock_state = DockState::Expanded;
            }
            return;
        }

        let at = self.attach(border, index.unwrap_or(len).min(len), drag.clone());
        if select.unwrap_or(false) {
            if let Some(state) = self.node_mut(border).and_then(Node::as_border_mut) {
                if !state.visible_tabs.contains(&at) {
                    state.visible_tabs.clear();
                }
                state.selected = Some(at);
                state.dock_state = DockState::Expanded;
            }
        }
    }
}

/// Moving a tab forward within its own container shifts the slot left by one.
fn same_parent_adjust(
    index: Option<usize>,
    detached: Option<&(NodeId, usize)>,
    target: &NodeId,
    drag_is_tab: bool,
) -> Option<usize> {
    match (index, detached) {
        (Some(index), Some((parent, from)))
            if drag_is_tab && parent == target && *from < index && index > 0 =>
        {
            Some(index - 1)
        }
        _ => index,
    }
}

fn insert_marker(strip: Rect, edge: f64, along: Orientation) -> Rect {
    let half = INSERT_MARKER / 2.0;
    match along {
        Orientation::Horizontal => Rect::new(edge - half, strip.y, INSERT_MARKER, strip.height),
        Orientation::Vertical => Rect::new(strip.x, edge - half, strip.width, INSERT_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_move_within_parent_shifts_slot() {
        let parent = NodeId::new("ts");
        let detached = (parent.clone(), 0);
        assert_eq!(
            same_parent_adjust(Some(3), Some(&detached), &parent, true),
            Some(2)
        );
        assert_eq!(
            same_parent_adjust(Some(0), Some(&detached), &parent, true),
            Some(0)
        );
        let other = NodeId::new("other");
        assert_eq!(
            same_parent_adjust(Some(3), Some(&detached), &other, true),
            Some(3)
        );
        assert_eq!(same_parent_adjust(None, Some(&detached), &parent, true), None);
    }

    #[test]
    fn marker_straddles_header_edge() {
        let strip = Rect::new(0.0, 10.0, 300.0, 26.0);
        assert_eq!(
            insert_marker(strip, 100.0, Orientation::Horizontal),
            Rect::new(98.5, 10.0, 3.0, 26.0)
        );
    }
}
