//! Structural clean-up run after every applied dispatch.

use flexdock_core::trace;

use crate::Model;
use crate::id::{NodeId, WindowId};
use crate::node::{NodeKind, TabSetNode};

impl Model {
    /// Remove empty rows, collapse single-child rows and drop empty tabsets
    /// that allow it. The main root always keeps at least one tabset.
    pub(crate) fn tidy(&mut self) {
        let roots: Vec<(WindowId, NodeId)> = self
            .windows
            .values()
            .map(|window| (window.id.clone(), window.root.clone()))
            .collect();
        for (window, root) in roots {
            self.tidy_row(&root, window.is_main());
            if window.is_main() && self.nodes.get(&root).is_some_and(|node| node.children.is_empty()) {
                let tabset = self.insert_node(NodeKind::TabSet(TabSetNode::default()));
                trace!(message = "tidy.main_root_refilled", tabset = tabset.as_str());
                let _ = self.attach(&root, 0, tabset);
            }
        }
    }

    fn tidy_row(&mut self, row: &NodeId, is_main_root: bool) {
        let children = self
            .nodes
            .get(row)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        for child in &children {
            if matches!(self.nodes.get(child).map(|node| &node.kind), Some(NodeKind::Row(_))) {
                self.tidy_row(child, false);
            }
        }

        let mut index = 0;
        loop {
            let Some(child) = self
                .nodes
                .get(row)
                .and_then(|node| node.children.get(index))
                .cloned()
            else {
                break;
            };
            let Some(node) = self.nodes.get(&child) else {
                break;
            };
            match &node.kind {
                NodeKind::Row(attrs) => match node.children.as_slice() {
                    [] => {
                        trace!(message = "tidy.remove_empty_row", row = child.as_str());
                        self.remove_subtree(&child);
                        continue;
                    }
                    [only] => {
                        let weight = attrs.weight;
                        let only = only.clone();
                        self.collapse_row(row, index, &child, &only, weight);
                        continue;
                    }
                    _ => {}
                },
                NodeKind::TabSet(tabset) => {
                    let sole_main_child = is_main_root
                        && self.nodes.get(row).is_some_and(|node| node.children.len() == 1);
                    if node.children.is_empty()
                        && tabset.attrs.enable_delete_when_empty(&self.global)
                        && !sole_main_child
                    {
                        trace!(message = "tidy.remove_empty_tabset", tabset = child.as_str());
                        self.remove_subtree(&child);
                        continue;
                    }
                }
                NodeKind::Tab(_) | NodeKind::Border(_) => {}
            }
            index += 1;
        }
    }

    /// Replace a single-child row at `index` of `parent` by its content.
    ///
    /// A tabset takes the row's slot and weight; a nested row's children are
    /// spliced in with weights rescaled to sum to the removed row's weight.
    fn collapse_row(&mut self, parent: &NodeId, index: usize, row: &NodeId, only: &NodeId, weight: f64) {
        trace!(message = "tidy.collapse_row", row = row.as_str());
        let only_is_row = matches!(self.nodes.get(only).map(|node| &node.kind), Some(NodeKind::Row(_)));
        let _ = self.detach(row);
        let _ = self.detach(only);
        let _ = self.nodes.remove(row);
        if !only_is_row {
            self.set_weight(only, weight);
            let _ = self.attach(parent, index, only.clone());
            return;
        }
        let grandchildren = self
            .nodes
            .get(only)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        let total: f64 = grandchildren.iter().map(|child| self.weight_of(child)).sum();
        let count = grandchildren.len().max(1) as f64;
        for (offset, grandchild) in grandchildren.into_iter().enumerate() {
            let share = if total > 0.0 {
                self.weight_of(&grandchild) / total
            } else {
                1.0 / count
            };
            let _ = self.detach(&grandchild);
            self.set_weight(&grandchild, share * weight);
            let _ = self.attach(parent, index + offset, grandchild);
        }
        let _ = self.nodes.remove(only);
    }

    /// Clear active and maximized pointers that no longer name a tabset in
    /// their window.
    pub(crate) fn repair_window_pointers(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().cloned().collect();
        for id in ids {
            let Some(window) = self.windows.get(&id) else {
                continue;
            };
            let active_ok = window
                .active_tabset
                .as_ref()
                .is_none_or(|tabset| self.is_tabset_in(tabset, &id));
            let maximized_ok = window
                .maximized_tabset
                .as_ref()
                .is_none_or(|tabset| self.is_tabset_in(tabset, &id));
            if let Some(window) = self.windows.get_mut(&id) {
                if !active_ok {
                    window.active_tabset = None;
                }
                if !maximized_ok {
                    window.maximized_tabset = None;
                }
            }
        }
    }

    fn is_tabset_in(&self, tabset: &NodeId, window: &WindowId) -> bool {
        self.nodes
            .get(tabset)
            .is_some_and(|node| matches!(node.kind, NodeKind::TabSet(_)))
            && self.window_of(tabset).as_ref() == Some(window)
    }

    /// Delete non-main windows that no longer hold any tab.
    pub(crate) fn collect_empty_windows(&mut self) {
        let empty: Vec<WindowId> = self
            .windows
            .values()
            .filter(|window| !window.id.is_main() && self.tabs_in_window(&window.id).is_empty())
            .map(|window| window.id.clone())
            .collect();
        for id in empty {
            if let Some(window) = self.windows.remove(&id) {
                trace!(message = "tidy.remove_empty_window", window = id.as_str());
                self.remove_subtree(&window.root);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Model;
    use crate::attributes::RowAttributes;
    use crate::node::{NodeKind, NodeType, TabSetNode};

    #[test]
    fn single_child_row_is_replaced_by_its_tabset() {
        let mut model = Model::new();
        let root = model.root("main").expect("root").id().clone();
        let row = model.insert_node(NodeKind::Row(RowAttributes { weight: 40.0 }));
        let tabset = model.insert_node(NodeKind::TabSet(TabSetNode::default()));
        let tab = model.insert_node(NodeKind::Tab(Default::default()));
        let _ = model.attach(&tabset, 0, tab);
        let _ = model.attach(&row, 0, tabset.clone());
        let _ = model.attach(&root, 1, row.clone());
        model.tidy();
        assert!(model.node(&row).is_none());
        let node = model.node(&tabset).expect("tabset");
        assert_eq!(node.parent(), Some(&root));
        assert_eq!(node.weight(), Some(40.0));
    }

    #[test]
    fn nested_single_row_splices_with_scaled_weights() {
        let mut model = Model::new();
        let root = model.root("main").expect("root").id().clone();
        let outer = model.insert_node(NodeKind::Row(RowAttributes { weight: 60.0 }));
        let inner = model.insert_node(NodeKind::Row(RowAttributes::default()));
        let _ = model.attach(&root, 1, outer.clone());
        let _ = model.attach(&outer, 0, inner.clone());
        let mut leaves = Vec::new();
        for weight in [1.0, 3.0] {
            let tabset = model.insert_node(NodeKind::TabSet(TabSetNode::default()));
            let tab = model.insert_node(NodeKind::Tab(Default::default()));
            let _ = model.attach(&tabset, 0, tab);
            model.set_weight(&tabset, weight);
            let len = model.node(&inner).map_or(0, |node| node.children().len());
            let _ = model.attach(&inner, len, tabset.clone());
            leaves.push(tabset);
        }
        model.tidy();
        assert!(model.node(&outer).is_none());
        assert!(model.node(&inner).is_none());
        let weights: Vec<_> = leaves
            .iter()
            .map(|id| model.node(id).and_then(|node| node.weight()))
            .collect();
        assert_eq!(weights, vec![Some(15.0), Some(45.0)]);
        assert_eq!(model.node(&leaves[0]).and_then(|node| node.parent()), Some(&root));
    }

    #[test]
    fn last_empty_tabset_in_main_root_survives() {
        let mut model = Model::new();
        let before = model.tabsets_in_window("main");
        model.tidy();
        assert_eq!(model.tabsets_in_window("main"), before);
        let root = model.root("main").expect("root");
        assert_eq!(root.children().len(), 1);
        assert_eq!(
            model.node(&root.children()[0]).map(|node| node.node_type()),
            Some(NodeType::TabSet)
        );
    }
}
