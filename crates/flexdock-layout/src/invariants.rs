//! Structural invariant checker.
//!
//! [`Model::validate`] is what the fuzz and property suites assert after
//! every dispatch. Applied transitions must never leave a model that fails
//! it.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::Model;
use crate::border::BorderLocation;
use crate::id::{NodeId, WindowId};
use crate::node::{NodeKind, NodeType};
use crate::window::WindowKind;

/// The first broken invariant found by [`Model::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("the main window is missing")]
    MissingMainWindow,
    #[error("window {window} has root {root} which is not a parentless row")]
    BadRoot { window: WindowId, root: NodeId },
    #[error("border slot {location} does not hold a {location} border")]
    BorderMismatch { location: BorderLocation },
    #[error("{parent} lists child {child} which is not registered")]
    DanglingChild { parent: NodeId, child: NodeId },
    #[error("{node} does not point back at its parent")]
    ParentMismatch { node: NodeId },
    #[error("{child} ({child_type}) cannot be a child of {parent} ({parent_type})")]
    InvalidChildKind {
        parent: NodeId,
        parent_type: NodeType,
        child: NodeId,
        child_type: NodeType,
    },
    #[error("{node} is reachable more than once")]
    SharedNode { node: NodeId },
    #[error("{node} is not reachable from any window or border")]
    Unreachable { node: NodeId },
    #[error("{node} selects an index past its last child")]
    SelectionOutOfRange { node: NodeId },
    #[error("{node} has an invalid visible tab set")]
    InvalidVisibleTabs { node: NodeId },
    #[error("{border} has a flyout tab that is not one of its children")]
    DanglingFlyout { border: NodeId },
    #[error("window {window} holds no tabs")]
    EmptyWindow { window: WindowId },
    #[error("window {window} points at {tabset} which is not one of its tabsets")]
    DanglingPointer { window: WindowId, tabset: NodeId },
}

impl Model {
    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let main = self
            .windows
            .get(WindowId::MAIN)
            .ok_or(InvariantViolation::MissingMainWindow)?;
        if main.kind != WindowKind::Main {
            return Err(InvariantViolation::MissingMainWindow);
        }

        let mut seen = FxHashSet::default();
        for location in BorderLocation::ALL {
            let id = self.borders.get(location);
            let matches = self
                .nodes
                .get(id)
                .and_then(|node| node.as_border())
                .is_some_and(|border| border.location == location);
            let parentless = self.nodes.get(id).is_some_and(|node| node.parent.is_none());
            if !matches || !parentless {
                return Err(InvariantViolation::BorderMismatch { location });
            }
            self.check_subtree(id, &mut seen)?;
        }

        for window in self.windows.values() {
            let root_ok = self.nodes.get(&window.root).is_some_and(|node| {
                node.parent.is_none() && matches!(node.kind, NodeKind::Row(_))
            });
            if !root_ok {
                return Err(InvariantViolation::BadRoot {
                    window: window.id.clone(),
                    root: window.root.clone(),
                });
            }
            self.check_subtree(&window.root, &mut seen)?;
            if !window.id.is_main() && self.tabs_in_window(&window.id).is_empty() {
                return Err(InvariantViolation::EmptyWindow {
                    window: window.id.clone(),
                });
            }
            for pointer in [&window.active_tabset, &window.maximized_tabset]
                .into_iter()
                .flatten()
            {
                let owned = self.nodes.get(pointer).is_some_and(|node| {
                    matches!(node.kind, NodeKind::TabSet(_))
                }) && self.window_of(pointer).as_ref() == Some(&window.id);
                if !owned {
                    return Err(InvariantViolation::DanglingPointer {
                        window: window.id.clone(),
                        tabset: pointer.clone(),
                    });
                }
            }
        }

        if let Some(node) = self.nodes.keys().find(|id| !seen.contains(*id)) {
            return Err(InvariantViolation::Unreachable { node: node.clone() });
        }
        Ok(())
    }

    fn check_subtree(
        &self,
        id: &NodeId,
        seen: &mut FxHashSet<NodeId>,
    ) -> Result<(), InvariantViolation> {
        if !seen.insert(id.clone()) {
            return Err(InvariantViolation::SharedNode { node: id.clone() });
        }
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        let parent_type = node.node_type();
        for child_id in &node.children {
            let child = self
                .nodes
                .get(child_id)
                .ok_or_else(|| InvariantViolation::DanglingChild {
                    parent: id.clone(),
                    child: child_id.clone(),
                })?;
            if child.parent.as_ref() != Some(id) {
                return Err(InvariantViolation::ParentMismatch {
                    node: child_id.clone(),
                });
            }
            let child_type = child.node_type();
            let allowed = match parent_type {
                NodeType::Row => matches!(child_type, NodeType::Row | NodeType::TabSet),
                NodeType::TabSet | NodeType::Border => child_type == NodeType::Tab,
                NodeType::Tab => false,
            };
            if !allowed {
                return Err(InvariantViolation::InvalidChildKind {
                    parent: id.clone(),
                    parent_type,
                    child: child_id.clone(),
                    child_type,
                });
            }
            self.check_subtree(child_id, seen)?;
        }

        let len = node.children.len();
        match &node.kind {
            NodeKind::TabSet(tabset) => {
                if tabset.selected.is_some_and(|index| index >= len) {
                    return Err(InvariantViolation::SelectionOutOfRange { node: id.clone() });
                }
            }
            NodeKind::Border(border) => {
                if border.selected.is_some_and(|index| index >= len) {
                    return Err(InvariantViolation::SelectionOutOfRange { node: id.clone() });
                }
                let mut unique = FxHashSet::default();
                let tiles_ok = border.visible_tabs.len() != 1
                    && border
                        .visible_tabs
                        .iter()
                        .all(|index| *index < len && unique.insert(*index))
                    && (border.visible_tabs.is_empty()
                        || border
                            .selected
                            .is_some_and(|index| border.visible_tabs.contains(&index)));
                if !tiles_ok {
                    return Err(InvariantViolation::InvalidVisibleTabs { node: id.clone() });
                }
                if border
                    .flyout_tab
                    .as_ref()
                    .is_some_and(|tab| !node.children.contains(tab))
                {
                    return Err(InvariantViolation::DanglingFlyout { border: id.clone() });
                }
            }
            NodeKind::Row(_) | NodeKind::Tab(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;
    use crate::node::TabSetNode;
    use flexdock_core::DockLocation;
    use serde_json::json;

    #[test]
    fn fresh_model_is_valid() {
        assert_eq!(Model::new().validate(), Ok(()));
    }

    #[test]
    fn detects_out_of_range_selection() {
        let mut model = Model::new();
        let tabset = model.tabsets_in_window("main")[0].clone();
        if let Some(state) = model.node_mut(&tabset).and_then(|node| node.as_tabset_mut()) {
            state.selected = Some(2);
        }
        assert_eq!(
            model.validate(),
            Err(InvariantViolation::SelectionOutOfRange { node: tabset })
        );
    }

    #[test]
    fn detects_orphans() {
        let mut model = Model::new();
        let orphan = model.insert_node(NodeKind::TabSet(TabSetNode::default()));
        assert_eq!(
            model.validate(),
            Err(InvariantViolation::Unreachable { node: orphan })
        );
    }

    #[test]
    fn detects_tab_under_row() {
        let mut model = Model::new();
        let root = model.root("main").expect("root").id().clone();
        let tab = model.insert_node(NodeKind::Tab(Default::default()));
        let _ = model.attach(&root, 0, tab.clone());
        assert!(matches!(
            model.validate(),
            Err(InvariantViolation::InvalidChildKind { child, .. }) if child == tab
        ));
    }

    #[test]
    fn applied_actions_keep_the_model_valid() {
        let mut model = Model::new();
        let tabset = model.tabsets_in_window("main")[0].clone();
        for id in ["a", "b", "c"] {
            let _ = model.dispatch(Action::add_node(
                json!({ "id": id }),
                tabset.clone(),
                DockLocation::Center,
                None,
                None,
            ));
        }
        let _ = model.dispatch(Action::move_node("c", tabset.clone(), DockLocation::Bottom, None, None));
        let _ = model.dispatch(Action::delete_tab("a"));
        assert_eq!(model.validate(), Ok(()));
    }
}
