//! Action dispatch: one private transition per action kind.
//!
//! Every dispatch runs against a working copy of the model. A transition
//! that bails out leaves the original untouched; a transition that succeeds
//! is followed by tidy, window-pointer repair, empty-window collection and a
//! geometry re-solve before the working copy replaces the model.

use std::fmt;

use flexdock_core::{DockLocation, Rect, debug, debug_span};
use serde_json::Value;

use crate::action::Action;
use crate::attributes::{TabAttributes, TabSetMode, merge_attributes};
use crate::id::{NodeId, WindowId};
use crate::node::{DockState, Node, NodeKind, NodeType, TabSetNode};
use crate::selection;
use crate::window::{LayoutWindow, WindowKind};
use crate::{Model, json};

/// Why a dispatch left the model unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// A referenced node id is not in the registry.
    StaleNode,
    /// A referenced window id does not exist.
    StaleWindow,
    /// A referenced node exists but has the wrong kind.
    TypeMismatch,
    /// A policy or validity check refused the action.
    Rejected,
    /// `UNDO` / `REDO`.
    Reserved,
}

impl IgnoreReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StaleNode => "stale_node",
            Self::StaleWindow => "stale_window",
            Self::TypeMismatch => "type_mismatch",
            Self::Rejected => "rejected",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`Model::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl DispatchOutcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Ignored(reason) => write!(f, "ignored ({reason})"),
        }
    }
}

type Transition = Result<(), IgnoreReason>;

fn valid_rect(rect: &Rect) -> bool {
    rect.x.is_finite()
        && rect.y.is_finite()
        && rect.width.is_finite()
        && rect.height.is_finite()
        && rect.width >= 0.0
        && rect.height >= 0.0
}

impl Model {
    /// Apply one action.
    ///
    /// Synchronous and total: the action either applies fully (followed by
    /// tidy and geometry re-solve) or is ignored without any mutation.
    pub fn dispatch(&mut self, action: Action) -> DispatchOutcome {
        let kind = action.kind();
        let _span = debug_span!("flexdock.dispatch", action = kind.as_str()).entered();

        let mut working = self.clone();
        match working.apply_action(action) {
            Ok(()) => {
                working.finish_mutation();
                *self = working;
                debug!(
                    message = "dispatch.applied",
                    action = kind.as_str(),
                    nodes = self.nodes.len(),
                    windows = self.windows.len()
                );
                DispatchOutcome::Applied
            }
            Err(reason) => {
                debug!(
                    message = "dispatch.ignored",
                    action = kind.as_str(),
                    reason = reason.as_str()
                );
                DispatchOutcome::Ignored(reason)
            }
        }
    }

    /// Derived-state pipeline run after every applied mutation.
    pub(crate) fn finish_mutation(&mut self) {
        self.tidy();
        self.repair_window_pointers();
        self.collect_empty_windows();
        self.solve_geometry();
    }

    fn apply_action(&mut self, action: Action) -> Transition {
        match action {
            Action::AddNode {
                json,
                to_node,
                location,
                index,
                select,
            } => self.apply_add_node(&json, &to_node, location, index, select),
            Action::MoveNode {
                from_node,
                to_node,
                location,
                index,
                select,
            } => self.drop_node(&from_node, &to_node, location, index, select),
            Action::DeleteTab { node } => self.apply_delete_tab(&node),
            Action::DeleteTabset { node } => self.apply_delete_tabset(&node),
            Action::DockTab { node } => self.apply_dock_tab(&node),
            Action::DockTabset { node } => self.apply_dock_tabset(&node),
            Action::FloatTab { node, rect } => {
                self.apply_detach_to_window(&node, rect, WindowKind::Float, NodeType::Tab)
            }
            Action::FloatTabset { node, rect } => {
                self.apply_detach_to_window(&node, rect, WindowKind::Float, NodeType::TabSet)
            }
            Action::PopoutTab { node, rect } => {
                self.apply_detach_to_window(&node, rect, WindowKind::Popout, NodeType::Tab)
            }
            Action::PopoutTabset { node, rect } => {
                self.apply_detach_to_window(&node, rect, WindowKind::Popout, NodeType::TabSet)
            }
            Action::RenameTab { node, name } => self.update_tab(&node, |tab| tab.name = name),
            Action::SelectTab { node } => self.apply_select_tab(&node),
            Action::SetActiveTabset { window, tabset } => {
                self.apply_set_active_tabset(&window, tabset)
            }
            Action::SetVisibleTabs { node, indices } => self.apply_set_visible_tabs(&node, &indices),
            Action::AdjustWeights { node, weights } => self.apply_adjust_weights(&node, &weights),
            Action::AdjustBorderSplit { node, position } => {
                self.apply_adjust_border_split(&node, position)
            }
            Action::MaximizeToggle { node } => self.apply_maximize_toggle(&node),
            Action::CreateWindow { layout, rect, kind } => {
                self.apply_create_window(&layout, rect, kind)
            }
            Action::CloseWindow { window } => self.apply_close_window(&window),
            Action::MoveWindow { window, rect } => self.apply_move_window(&window, rect),
            Action::UpdateModelAttributes { json } => {
                self.global = merge_attributes(&self.global, &json).ok_or(IgnoreReason::Rejected)?;
                Ok(())
            }
            Action::UpdateNodeAttributes { node, json } => {
                self.apply_update_node_attributes(&node, &json)
            }
            Action::SetTabIcon { node, icon } => self.update_tab(&node, |tab| tab.icon = icon),
            Action::SetTabComponent { node, component } => {
                self.update_tab(&node, |tab| tab.component = Some(component))
            }
            Action::SetTabConfig { node, config } => {
                self.update_tab(&node, |tab| tab.config = config)
            }
            Action::SetTabEnableClose { node, enable_close } => {
                self.update_tab(&node, |tab| tab.enable_close = enable_close)
            }
            Action::SetDockState { node, state } => {
                self.update_border(&node, |border| border.dock_state = state)
            }
            Action::PinTab { node, pinned } => self.apply_pin_tab(&node, pinned),
            Action::PinBorder { node, pinned } => self.update_border(&node, |border| {
                border.pinned = pinned;
                if pinned {
                    border.flyout_tab = None;
                }
            }),
            Action::OpenFlyout { node, tab } => self.apply_open_flyout(&node, &tab),
            Action::CloseFlyout { node } => {
                self.update_border(&node, |border| border.flyout_tab = None)
            }
            Action::SetFlyoutSize { node, size } => self.apply_set_flyout_size(&node, size),
            Action::SetTabsetMode { node, mode } => self.apply_set_tabset_mode(&node, mode),
            Action::Undo | Action::Redo => Err(IgnoreReason::Reserved),
        }
    }

    // ------------------------------------------------------------------
    // Lookup guards
    // ------------------------------------------------------------------

    pub(crate) fn require_node(&self, id: &NodeId, expected: NodeType) -> Result<&Node, IgnoreReason> {
        let node = self.nodes.get(id).ok_or(IgnoreReason::StaleNode)?;
        if node.node_type() == expected {
            Ok(node)
        } else {
            Err(IgnoreReason::TypeMismatch)
        }
    }

    fn require_window(&self, id: &WindowId) -> Result<&LayoutWindow, IgnoreReason> {
        self.windows.get(id).ok_or(IgnoreReason::StaleWindow)
    }

    fn update_tab(&mut self, id: &NodeId, edit: impl FnOnce(&mut TabAttributes)) -> Transition {
        let node = self.nodes.get_mut(id).ok_or(IgnoreReason::StaleNode)?;
        let tab = node.as_tab_mut().ok_or(IgnoreReason::TypeMismatch)?;
        edit(tab);
        Ok(())
    }

    fn update_border(
        &mut self,
        id: &NodeId,
        edit: impl FnOnce(&mut crate::node::BorderNode),
    ) -> Transition {
        let node = self.nodes.get_mut(id).ok_or(IgnoreReason::StaleNode)?;
        let border = node.as_border_mut().ok_or(IgnoreReason::TypeMismatch)?;
        edit(border);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structural transitions
    // ------------------------------------------------------------------

    fn apply_add_node(
        &mut self,
        json: &Value,
        to_node: &NodeId,
        location: DockLocation,
        index: Option<usize>,
        select: Option<bool>,
    ) -> Transition {
        if !self.nodes.contains_key(to_node) {
            return Err(IgnoreReason::StaleNode);
        }
        let Value::Object(object) = json else {
            return Err(IgnoreReason::Rejected);
        };
        match object.get("type").and_then(Value::as_str) {
            None | Some("tab") => {}
            Some(_) => return Err(IgnoreReason::TypeMismatch),
        }
        let attrs: TabAttributes =
            serde_json::from_value(json.clone()).map_err(|_| IgnoreReason::Rejected)?;
        let id = match object.get("id") {
            Some(Value::String(raw)) => {
                let id = NodeId::new(raw.as_str());
                if self.nodes.contains_key(&id) || self.windows.contains_key(raw.as_str()) {
                    return Err(IgnoreReason::Rejected);
                }
                let _ = self.nodes.insert(id.clone(), Node::new(id.clone(), NodeKind::Tab(attrs)));
                id
            }
            Some(_) => return Err(IgnoreReason::Rejected),
            None => self.insert_node(NodeKind::Tab(attrs)),
        };
        self.drop_node(&id, to_node, location, index, select)
    }

    fn apply_delete_tab(&mut self, id: &NodeId) -> Transition {
        self.require_node(id, NodeType::Tab)?;
        self.remove_subtree(id);
        Ok(())
    }

    fn apply_delete_tabset(&mut self, id: &NodeId) -> Transition {
        self.require_node(id, NodeType::TabSet)?;
        self.remove_subtree(id);
        Ok(())
    }

    fn apply_dock_tab(&mut self, id: &NodeId) -> Transition {
        self.require_node(id, NodeType::Tab)?;
        if self.window_of(id).is_none_or(|window| window.is_main()) {
            return Err(IgnoreReason::Rejected);
        }
        self.dock_into_main(id);
        Ok(())
    }

    /// Move a tab into the main window's active tabset (else its first one).
    fn dock_into_main(&mut self, tab: &NodeId) {
        let target = self.main_dock_target();
        let _ = self.detach(tab);
        let len = self.nodes.get(&target).map_or(0, |node| node.children.len());
        let at = self.attach(&target, len, tab.clone());
        if let Some(tabset) = self.nodes.get_mut(&target).and_then(Node::as_tabset_mut) {
            tabset.selected = Some(at);
        }
        self.set_active_tabset_for(&target);
    }

    fn main_dock_target(&mut self) -> NodeId {
        let main = WindowId::main();
        if let Some(active) = self.active_tabset(&main).cloned() {
            if self.window_of(&active).is_some_and(|window| window.is_main()) {
                return active;
            }
        }
        if let Some(first) = self.tabsets_in_window(&main).into_iter().next() {
            return first;
        }
        let tabset = self.insert_node(NodeKind::TabSet(TabSetNode::default()));
        if let Some(root) = self.windows.get(&main).map(|window| window.root.clone()) {
            let len = self.nodes.get(&root).map_or(0, |node| node.children.len());
            let _ = self.attach(&root, len, tabset.clone());
        }
        tabset
    }

    fn apply_dock_tabset(&mut self, id: &NodeId) -> Transition {
        self.require_node(id, NodeType::TabSet)?;
        if self.window_of(id).is_none_or(|window| window.is_main()) {
            return Err(IgnoreReason::Rejected);
        }
        let root = self.require_window(&WindowId::main())?.root.clone();
        let trailing = match self.root_orientation() {
            flexdock_core::Orientation::Horizontal => DockLocation::Right,
            flexdock_core::Orientation::Vertical => DockLocation::Bottom,
        };
        self.drop_on_row(id, &root, trailing);
        Ok(())
    }

    fn apply_detach_to_window(
        &mut self,
        id: &NodeId,
        rect: Rect,
        kind: WindowKind,
        expected: NodeType,
    ) -> Transition {
        let node = self.require_node(id, expected)?;
        let allowed = match &node.kind {
            NodeKind::Tab(tab) => tab.enable_popout(&self.global),
            NodeKind::TabSet(tabset) => tabset.attrs.enable_popout(&self.global),
            NodeKind::Row(_) | NodeKind::Border(_) => false,
        };
        if !allowed || !valid_rect(&rect) {
            return Err(IgnoreReason::Rejected);
        }
        let tabset = if expected == NodeType::Tab {
            self.wrap_in_tabset(id)
        } else {
            let _ = self.detach(id);
            id.clone()
        };
        let window_id = self.alloc_window_id();
        let root = self.insert_node(NodeKind::Row(Default::default()));
        let _ = self.attach(&root, 0, tabset.clone());
        let mut window = LayoutWindow::new(window_id.clone(), kind, rect, root);
        window.active_tabset = Some(tabset);
        let _ = self.windows.insert(window_id, window);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection transitions
    // ------------------------------------------------------------------

    fn apply_select_tab(&mut self, id: &NodeId) -> Transition {
        let node = self.require_node(id, NodeType::Tab)?;
        let parent = node.parent.clone().ok_or(IgnoreReason::Rejected)?;
        let index = self.index_in_parent(id).ok_or(IgnoreReason::Rejected)?;
        let parent_node = self.nodes.get_mut(&parent).ok_or(IgnoreReason::StaleNode)?;
        match &mut parent_node.kind {
            NodeKind::TabSet(tabset) => {
                tabset.selected = Some(index);
                self.set_active_tabset_for(&parent);
            }
            NodeKind::Border(border) => {
                if border.pinned {
                    if border.selected == Some(index) && border.visible_tabs.is_empty() {
                        border.selected = None;
                    } else {
                        if !border.visible_tabs.contains(&index) {
                            border.visible_tabs.clear();
                        }
                        border.selected = Some(index);
                    }
                    border.dock_state = DockState::Expanded;
                } else if border.flyout_tab.as_ref() == Some(id) {
                    border.flyout_tab = None;
                } else {
                    if !border.visible_tabs.contains(&index) {
                        border.visible_tabs.clear();
                    }
                    border.flyout_tab = Some(id.clone());
                    border.selected = Some(index);
                }
            }
            NodeKind::Row(_) | NodeKind::Tab(_) => return Err(IgnoreReason::Rejected),
        }
        Ok(())
    }

    fn apply_set_active_tabset(&mut self, window: &WindowId, tabset: Option<NodeId>) -> Transition {
        self.require_window(window)?;
        if let Some(tabset) = &tabset {
            self.require_node(tabset, NodeType::TabSet)?;
            if self.window_of(tabset).as_ref() != Some(window) {
                return Err(IgnoreReason::Rejected);
            }
        }
        if let Some(window) = self.windows.get_mut(window) {
            window.active_tabset = tabset;
        }
        Ok(())
    }

    fn apply_set_visible_tabs(&mut self, id: &NodeId, indices: &[usize]) -> Transition {
        let node = self.require_node(id, NodeType::Border)?;
        let len = node.children.len();
        if indices.iter().any(|&index| index >= len) {
            return Err(IgnoreReason::Rejected);
        }
        self.update_border(id, |border| {
            (border.selected, border.visible_tabs) =
                selection::normalize(border.selected, indices, len);
        })
    }

    // ------------------------------------------------------------------
    // Sizing transitions
    // ------------------------------------------------------------------

    fn apply_adjust_weights(&mut self, id: &NodeId, weights: &[f64]) -> Transition {
        let node = self.require_node(id, NodeType::Row)?;
        if node.children.len() != weights.len()
            || weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(IgnoreReason::Rejected);
        }
        let children = node.children.clone();
        for (child, weight) in children.iter().zip(weights) {
            self.set_weight(child, *weight);
        }
        Ok(())
    }

    fn apply_adjust_border_split(&mut self, id: &NodeId, position: f64) -> Transition {
        self.require_node(id, NodeType::Border)?;
        if !position.is_finite() {
            return Err(IgnoreReason::Rejected);
        }
        let size = self
            .calculate_border_split(id, position)
            .ok_or(IgnoreReason::Rejected)?;
        self.update_border(id, |border| border.attrs.size = Some(size))
    }

    fn apply_maximize_toggle(&mut self, id: &NodeId) -> Transition {
        let node = self.require_node(id, NodeType::TabSet)?;
        let enabled = node
            .as_tabset()
            .is_some_and(|tabset| tabset.attrs.enable_maximize(&self.global));
        if !enabled {
            return Err(IgnoreReason::Rejected);
        }
        let window_id = self.window_of(id).ok_or(IgnoreReason::Rejected)?;
        let window = self
            .windows
            .get_mut(&window_id)
            .ok_or(IgnoreReason::StaleWindow)?;
        window.maximized_tabset = if window.maximized_tabset.as_ref() == Some(id) {
            None
        } else {
            Some(id.clone())
        };
        window.active_tabset = Some(id.clone());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Window lifecycle
    // ------------------------------------------------------------------

    fn apply_create_window(&mut self, layout: &Value, rect: Rect, kind: WindowKind) -> Transition {
        if kind == WindowKind::Main || !valid_rect(&rect) {
            return Err(IgnoreReason::Rejected);
        }
        let imported = json::import_window_layout(self, layout).map_err(|_| IgnoreReason::Rejected)?;
        let window_id = self.alloc_window_id();
        let mut window = LayoutWindow::new(window_id.clone(), kind, rect, imported.root);
        window.active_tabset = imported.active;
        window.maximized_tabset = imported.maximized;
        let _ = self.windows.insert(window_id, window);
        Ok(())
    }

    fn apply_close_window(&mut self, id: &WindowId) -> Transition {
        let window = self.require_window(id)?;
        if window.id.is_main() {
            return Err(IgnoreReason::Rejected);
        }
        for tab in self.tabs_in_window(id) {
            self.dock_into_main(&tab);
        }
        if let Some(window) = self.windows.remove(id) {
            self.remove_subtree(&window.root);
        }
        Ok(())
    }

    fn apply_move_window(&mut self, id: &WindowId, rect: Rect) -> Transition {
        if !valid_rect(&rect) {
            return Err(IgnoreReason::Rejected);
        }
        let window = self.windows.get_mut(id).ok_or(IgnoreReason::StaleWindow)?;
        window.rect = rect;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Attribute and metadata transitions
    // ------------------------------------------------------------------

    fn apply_update_node_attributes(&mut self, id: &NodeId, patch: &Value) -> Transition {
        let node = self.nodes.get_mut(id).ok_or(IgnoreReason::StaleNode)?;
        match &mut node.kind {
            NodeKind::Row(attrs) => {
                *attrs = merge_attributes(attrs, patch).ok_or(IgnoreReason::Rejected)?;
            }
            NodeKind::TabSet(tabset) => {
                tabset.attrs =
                    merge_attributes(&tabset.attrs, patch).ok_or(IgnoreReason::Rejected)?;
            }
            NodeKind::Tab(attrs) => {
                *attrs = merge_attributes(attrs, patch).ok_or(IgnoreReason::Rejected)?;
            }
            NodeKind::Border(border) => {
                border.attrs =
                    merge_attributes(&border.attrs, patch).ok_or(IgnoreReason::Rejected)?;
            }
        }
        Ok(())
    }

    fn apply_pin_tab(&mut self, id: &NodeId, pinned: bool) -> Transition {
        self.update_tab(id, |tab| tab.pinned = pinned)?;
        let Some(parent) = self.nodes.get(id).and_then(|node| node.parent.clone()) else {
            return Ok(());
        };
        let Some(children) = self.nodes.get(&parent).map(|node| node.children.clone()) else {
            return Ok(());
        };
        let flags: Vec<bool> = children
            .iter()
            .map(|child| {
                self.nodes
                    .get(child)
                    .and_then(Node::as_tab)
                    .is_some_and(|tab| tab.pinned)
            })
            .collect();
        let order = selection::pinned_first_order(&flags);
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return Ok(());
        };
        parent_node.children = order.iter().map(|&old| children[old].clone()).collect();
        match &mut parent_node.kind {
            NodeKind::TabSet(tabset) => {
                tabset.selected = tabset
                    .selected
                    .and_then(|index| selection::remap_index(&order, index));
            }
            NodeKind::Border(border) => {
                border.selected = border
                    .selected
                    .and_then(|index| selection::remap_index(&order, index));
                border.visible_tabs = border
                    .visible_tabs
                    .iter()
                    .filter_map(|&index| selection::remap_index(&order, index))
                    .collect();
            }
            NodeKind::Row(_) | NodeKind::Tab(_) => {}
        }
        Ok(())
    }

    fn apply_open_flyout(&mut self, id: &NodeId, tab: &NodeId) -> Transition {
        let border = self.require_node(id, NodeType::Border)?;
        if !border.children.contains(tab) {
            return Err(if self.nodes.contains_key(tab) {
                IgnoreReason::Rejected
            } else {
                IgnoreReason::StaleNode
            });
        }
        let tab = tab.clone();
        self.update_border(id, |border| border.flyout_tab = Some(tab))
    }

    fn apply_set_flyout_size(&mut self, id: &NodeId, size: f64) -> Transition {
        self.require_node(id, NodeType::Border)?;
        if !size.is_finite() {
            return Err(IgnoreReason::Rejected);
        }
        let global = self.global.clone();
        self.update_border(id, |border| {
            let size = size.clamp(border.attrs.min_size(&global), border.attrs.max_size(&global));
            border.attrs.flyout_size = Some(size);
        })
    }

    fn apply_set_tabset_mode(&mut self, id: &NodeId, mode: TabSetMode) -> Transition {
        let node = self.nodes.get_mut(id).ok_or(IgnoreReason::StaleNode)?;
        let tabset = node.as_tabset_mut().ok_or(IgnoreReason::TypeMismatch)?;
        tabset.attrs.mode = mode;
        Ok(())
    }
}
