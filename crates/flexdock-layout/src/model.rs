//! The docking model: node registry, windows, borders and model defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use flexdock_core::{Orientation, Rect};
use rustc_hash::FxHashMap;

use crate::attributes::{GlobalAttributes, RowAttributes};
use crate::border::{BorderLocation, BorderSet};
use crate::drop::DropInfo;
use crate::id::{IdGenerator, NodeId, WindowId};
use crate::node::{BorderNode, DockState, Node, NodeKind, NodeType, TabSetNode};
use crate::selection;
use crate::window::{LayoutWindow, WindowKind};

/// Host veto for drops, consulted after the built-in rules accept one.
///
/// Receives the model, the dragged node and the proposed drop.
pub type DropFilter = Rc<dyn Fn(&Model, &NodeId, &DropInfo) -> bool>;

/// A complete docking layout.
///
/// All mutation goes through [`Model::dispatch`]; everything else is a read.
#[derive(Clone)]
pub struct Model {
    pub(crate) global: GlobalAttributes,
    pub(crate) nodes: FxHashMap<NodeId, Node>,
    pub(crate) windows: BTreeMap<WindowId, LayoutWindow>,
    pub(crate) borders: BorderSet,
    pub(crate) ids: IdGenerator,
    pub(crate) drop_filter: Option<DropFilter>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("global", &self.global)
            .field("nodes", &self.nodes.len())
            .field("windows", &self.windows)
            .field("borders", &self.borders)
            .field("drop_filter", &self.drop_filter.is_some())
            .finish()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Main window with one empty tabset and four empty borders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_global(GlobalAttributes::default())
    }

    #[must_use]
    pub fn with_global(global: GlobalAttributes) -> Self {
        let mut ids = IdGenerator::default();
        let border_ids = BorderLocation::ALL.map(|_| NodeId::new(ids.next_id(|_| false)));
        let mut nodes = FxHashMap::default();
        for (location, id) in BorderLocation::ALL.into_iter().zip(border_ids.iter()) {
            let _ = nodes.insert(
                id.clone(),
                Node::new(id.clone(), NodeKind::Border(BorderNode::new(location))),
            );
        }
        let mut model = Self {
            global,
            nodes,
            windows: BTreeMap::new(),
            borders: BorderSet::new(border_ids),
            ids,
            drop_filter: None,
        };
        let root = model.insert_node(NodeKind::Row(RowAttributes::default()));
        let tabset = model.insert_node(NodeKind::TabSet(TabSetNode::default()));
        let _ = model.attach(&root, 0, tabset);
        let _ = model.windows.insert(
            WindowId::main(),
            LayoutWindow::new(WindowId::main(), WindowKind::Main, Rect::default(), root),
        );
        model.solve_geometry();
        model
    }

    // ------------------------------------------------------------------
    // Read API
    // ------------------------------------------------------------------

    /// Model-wide defaults.
    #[must_use]
    pub fn global(&self) -> &GlobalAttributes {
        &self.global
    }

    #[must_use]
    pub fn node<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> Option<&Node> {
        self.nodes.get(id.as_ref())
    }

    /// Every registered node, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn window<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> Option<&LayoutWindow> {
        self.windows.get(id.as_ref())
    }

    /// Windows ordered by id.
    pub fn windows(&self) -> impl Iterator<Item = &LayoutWindow> {
        self.windows.values()
    }

    /// Root row of a window.
    #[must_use]
    pub fn root<Q: AsRef<str> + ?Sized>(&self, window: &Q) -> Option<&Node> {
        self.window(window)
            .and_then(|window| self.nodes.get(&window.root))
    }

    #[must_use]
    pub fn border_set(&self) -> &BorderSet {
        &self.borders
    }

    #[must_use]
    pub fn border(&self, location: BorderLocation) -> Option<&Node> {
        self.nodes.get(self.borders.get(location))
    }

    #[must_use]
    pub fn active_tabset<Q: AsRef<str> + ?Sized>(&self, window: &Q) -> Option<&NodeId> {
        self.window(window)
            .and_then(|window| window.active_tabset.as_ref())
    }

    #[must_use]
    pub fn maximized_tabset<Q: AsRef<str> + ?Sized>(&self, window: &Q) -> Option<&NodeId> {
        self.window(window)
            .and_then(|window| window.maximized_tabset.as_ref())
    }

    /// Install a host veto for drops.
    pub fn set_drop_filter<F>(&mut self, filter: F)
    where
        F: Fn(&Model, &NodeId, &DropInfo) -> bool + 'static,
    {
        self.drop_filter = Some(Rc::new(filter));
    }

    pub fn clear_drop_filter(&mut self) {
        self.drop_filter = None;
    }

    /// Window a node lives in. Borders and their tabs belong to the main window.
    #[must_use]
    pub fn window_of<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> Option<WindowId> {
        let mut current = self.nodes.get(id.as_ref())?;
        while let Some(parent) = &current.parent {
            current = self.nodes.get(parent)?;
        }
        if self.borders.contains(&current.id) {
            return Some(WindowId::main());
        }
        self.windows
            .values()
            .find(|window| window.root == current.id)
            .map(|window| window.id.clone())
    }

    /// Layout direction of a row, derived from its depth below the window root.
    #[must_use]
    pub fn row_orientation<Q: AsRef<str> + ?Sized>(&self, row: &Q) -> Option<Orientation> {
        let mut current = self.nodes.get(row.as_ref())?;
        if current.node_type() != NodeType::Row {
            return None;
        }
        let mut orientation = self.root_orientation();
        while let Some(parent) = &current.parent {
            orientation = orientation.flip();
            current = self.nodes.get(parent)?;
        }
        Some(orientation)
    }

    /// Orientation of every window's root row.
    #[must_use]
    pub fn root_orientation(&self) -> Orientation {
        if self.global.root_orientation_vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Position of a node within its parent's children.
    #[must_use]
    pub fn index_in_parent<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> Option<usize> {
        let node = self.nodes.get(id.as_ref())?;
        let parent = self.nodes.get(node.parent.as_ref()?)?;
        parent.children.iter().position(|child| child == &node.id)
    }

    /// Tabs under a window's root row in depth-first order (borders excluded).
    #[must_use]
    pub fn tabs_in_window<Q: AsRef<str> + ?Sized>(&self, window: &Q) -> Vec<NodeId> {
        self.nodes_in_window(window, NodeType::Tab)
    }

    /// Tabsets under a window's root row in depth-first order.
    #[must_use]
    pub fn tabsets_in_window<Q: AsRef<str> + ?Sized>(&self, window: &Q) -> Vec<NodeId> {
        self.nodes_in_window(window, NodeType::TabSet)
    }

    fn nodes_in_window<Q: AsRef<str> + ?Sized>(&self, window: &Q, kind: NodeType) -> Vec<NodeId> {
        let Some(window) = self.window(window) else {
            return Vec::new();
        };
        self.subtree(&window.root)
            .into_iter()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|node| node.node_type() == kind)
            })
            .collect()
    }

    /// Pre-order ids of `id` and everything below it.
    #[must_use]
    pub fn subtree<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(start) = self.nodes.get(id.as_ref()) else {
            return out;
        };
        let mut stack = vec![start.id.clone()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
            }
            out.push(current);
        }
        out
    }

    // ------------------------------------------------------------------
    // Structural primitives used by transitions
    // ------------------------------------------------------------------

    pub(crate) fn alloc_id(&mut self) -> NodeId {
        let nodes = &self.nodes;
        let windows = &self.windows;
        NodeId::new(
            self.ids
                .next_id(|candidate| nodes.contains_key(candidate) || windows.contains_key(candidate)),
        )
    }

    pub(crate) fn alloc_window_id(&mut self) -> WindowId {
        let nodes = &self.nodes;
        let windows = &self.windows;
        WindowId::new(
            self.ids
                .next_id(|candidate| nodes.contains_key(candidate) || windows.contains_key(candidate)),
        )
    }

    /// Register a detached node under a fresh id.
    pub(crate) fn insert_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.alloc_id();
        let _ = self.nodes.insert(id.clone(), Node::new(id.clone(), kind));
        id
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Unlink `child` from its parent, adjusting the parent's selection state.
    ///
    /// Returns the former parent and index.
    pub(crate) fn detach(&mut self, child: &NodeId) -> Option<(NodeId, usize)> {
        let parent_id = self.nodes.get(child)?.parent.clone()?;
        let parent = self.nodes.get_mut(&parent_id)?;
        let index = parent.children.iter().position(|id| id == child)?;
        let _ = parent.children.remove(index);
        let remaining = parent.children.len();
        match &mut parent.kind {
            NodeKind::TabSet(tabset) => {
                tabset.selected = selection::selected_after_remove(tabset.selected, index, remaining);
            }
            NodeKind::Border(border) => {
                let selected = selection::selected_after_remove(border.selected, index, remaining);
                let visible = selection::visible_after_remove(&border.visible_tabs, index);
                (border.selected, border.visible_tabs) =
                    selection::normalize(selected, &visible, remaining);
                if border.flyout_tab.as_ref() == Some(child) {
                    border.flyout_tab = None;
                }
                if remaining == 0 {
                    border.dock_state = DockState::Collapsed;
                }
            }
            NodeKind::Row(_) | NodeKind::Tab(_) => {}
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        Some((parent_id, index))
    }

    /// Link `child` under `parent` at `index` (clamped), shifting selection
    /// indices at or after it. Returns the index used.
    pub(crate) fn attach(&mut self, parent_id: &NodeId, index: usize, child: NodeId) -> usize {
        let Some(parent) = self.nodes.get_mut(parent_id) else {
            return index;
        };
        let index = index.min(parent.children.len());
        parent.children.insert(index, child.clone());
        match &mut parent.kind {
            NodeKind::TabSet(tabset) => {
                tabset.selected = selection::selected_after_insert(tabset.selected, index);
            }
            NodeKind::Border(border) => {
                border.selected = selection::selected_after_insert(border.selected, index);
                border.visible_tabs = selection::visible_after_insert(&border.visible_tabs, index);
            }
            NodeKind::Row(_) | NodeKind::Tab(_) => {}
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent_id.clone());
        }
        index
    }

    /// Detach `id` and drop it and all its descendants from the registry.
    pub(crate) fn remove_subtree(&mut self, id: &NodeId) {
        let _ = self.detach(id);
        for node_id in self.subtree(id) {
            let _ = self.nodes.remove(&node_id);
        }
    }

    /// New tabset holding `tab` as its selected child.
    pub(crate) fn wrap_in_tabset(&mut self, tab: &NodeId) -> NodeId {
        let _ = self.detach(tab);
        let tabset = self.insert_node(NodeKind::TabSet(TabSetNode::default()));
        let _ = self.attach(&tabset, 0, tab.clone());
        if let Some(state) = self.nodes.get_mut(&tabset).and_then(Node::as_tabset_mut) {
            state.selected = Some(0);
        }
        tabset
    }

    pub(crate) fn set_active_tabset_for(&mut self, tabset: &NodeId) {
        let Some(window) = self.window_of(tabset) else {
            return;
        };
        if let Some(window) = self.windows.get_mut(&window) {
            window.active_tabset = Some(tabset.clone());
        }
    }

    pub(crate) fn set_weight(&mut self, id: &NodeId, weight: f64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.set_weight(weight);
        }
    }

    pub(crate) fn weight_of(&self, id: &NodeId) -> f64 {
        self.nodes
            .get(id)
            .and_then(Node::weight)
            .unwrap_or(crate::attributes::DEFAULT_WEIGHT)
    }
}
