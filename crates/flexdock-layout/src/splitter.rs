//! Splitter bounds and the conversions from a dragged splitter position back
//! into border sizes and row weights.

use flexdock_core::Orientation;

use crate::Model;
use crate::border::BorderLocation;
use crate::id::{NodeId, WindowId};
use crate::node::NodeKind;

/// Screen-coordinate range a splitter's leading edge may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitterBounds {
    pub min: f64,
    pub max: f64,
}

impl SplitterBounds {
    /// Build bounds, widening `max` up to `min` when they cross.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        position.max(self.min).min(self.max)
    }

    #[must_use]
    pub fn contains(&self, position: f64) -> bool {
        (self.min..=self.max).contains(&position)
    }
}

impl Model {
    /// Bounds for the splitter between a border's content and the main root.
    ///
    /// The outer side is the border's size limits measured from its tab
    /// strip; the inner side leaves the root row its minimum extent.
    pub fn border_splitter_bounds<Q: AsRef<str> + ?Sized>(
        &self,
        border: &Q,
    ) -> Option<SplitterBounds> {
        let node = self.nodes.get(border.as_ref())?;
        let state = node.as_border()?;
        let strip = node.geometry.tab_strip_rect;
        let root = self.root(WindowId::MAIN)?;
        let root_rect = root.geometry.rect;
        let splitter = self.global.splitter_size;
        let min_size = state.attrs.min_size(&self.global);
        let max_size = state.attrs.max_size(&self.global);
        let along = state.location.tab_orientation().flip();
        let root_min = self.min_extent(&root.id, along);

        let bounds = match state.location {
            BorderLocation::Top => {
                let edge = strip.bottom();
                let min = edge + min_size;
                SplitterBounds::new(min, (edge + max_size).min(root_rect.bottom() - splitter - root_min))
            }
            BorderLocation::Left => {
                let edge = strip.right();
                let min = edge + min_size;
                SplitterBounds::new(min, (edge + max_size).min(root_rect.right() - splitter - root_min))
            }
            BorderLocation::Bottom => {
                let edge = strip.y;
                let max = edge - splitter - min_size;
                let min = (edge - splitter - max_size).max(root_rect.y + root_min).min(max);
                SplitterBounds::new(min, max)
            }
            BorderLocation::Right => {
                let edge = strip.x;
                let max = edge - splitter - min_size;
                let min = (edge - splitter - max_size).max(root_rect.x + root_min).min(max);
                SplitterBounds::new(min, max)
            }
        };
        Some(bounds)
    }

    /// Convert a proposed splitter position into a border content size.
    ///
    /// The position is clamped to [`Self::border_splitter_bounds`] first.
    pub fn calculate_border_split<Q: AsRef<str> + ?Sized>(
        &self,
        border: &Q,
        position: f64,
    ) -> Option<f64> {
        let bounds = self.border_splitter_bounds(border)?;
        let node = self.nodes.get(border.as_ref())?;
        let location = node.as_border()?.location;
        let strip = node.geometry.tab_strip_rect;
        let splitter = self.global.splitter_size;
        let position = bounds.clamp(position);
        let size = match location {
            BorderLocation::Top => position - strip.bottom(),
            BorderLocation::Left => position - strip.right(),
            BorderLocation::Bottom => strip.y - splitter - position,
            BorderLocation::Right => strip.x - splitter - position,
        };
        Some(size.max(0.0))
    }

    /// Bounds for the splitter after child `index` of `row`.
    ///
    /// Only the two neighbours of the splitter resize, so the range keeps
    /// both at or above their minimum extent.
    pub fn row_splitter_bounds<Q: AsRef<str> + ?Sized>(
        &self,
        row: &Q,
        index: usize,
    ) -> Option<SplitterBounds> {
        let (orientation, before, after) = self.splitter_neighbours(row.as_ref(), index)?;
        let splitter = self.global.splitter_size;
        let before_rect = self.nodes.get(&before)?.geometry.rect;
        let after_rect = self.nodes.get(&after)?.geometry.rect;
        let min = before_rect.start(orientation) + self.min_extent(&before, orientation);
        let max = after_rect.start(orientation) + after_rect.extent(orientation)
            - self.min_extent(&after, orientation)
            - splitter;
        Some(SplitterBounds::new(min, max))
    }

    /// Weights for every child of `row` after dragging splitter `index` to
    /// `position`, scaled to keep the row's total weight.
    ///
    /// The result is suitable for an `ADJUST_WEIGHTS` action.
    pub fn calculate_row_weights<Q: AsRef<str> + ?Sized>(
        &self,
        row: &Q,
        index: usize,
        position: f64,
    ) -> Option<Vec<f64>> {
        let row = row.as_ref();
        let bounds = self.row_splitter_bounds(row, index)?;
        let (orientation, before, _) = self.splitter_neighbours(row, index)?;
        let children = &self.nodes.get(row)?.children;
        let mut sizes: Vec<f64> = children
            .iter()
            .map(|child| {
                self.nodes
                    .get(child)
                    .map_or(0.0, |node| node.geometry.rect.extent(orientation))
            })
            .collect();
        let before_rect = self.nodes.get(&before)?.geometry.rect;
        let pair = sizes[index] + sizes[index + 1];
        let resized = bounds.clamp(position) - before_rect.start(orientation);
        sizes[index] = resized.max(0.0).min(pair);
        sizes[index + 1] = pair - sizes[index];

        let total_size: f64 = sizes.iter().sum();
        if total_size <= 0.0 || !total_size.is_finite() {
            return None;
        }
        let total_weight: f64 = children.iter().map(|child| self.weight_of(child)).sum();
        Some(
            sizes
                .iter()
                .map(|size| size / total_size * total_weight)
                .collect(),
        )
    }

    fn splitter_neighbours(&self, row: &str, index: usize) -> Option<(Orientation, NodeId, NodeId)> {
        let node = self.nodes.get(row)?;
        if !matches!(node.kind, NodeKind::Row(_)) {
            return None;
        }
        let orientation = self.row_orientation(row)?;
        let before = node.children.get(index)?.clone();
        let after = node.children.get(index + 1)?.clone();
        Some((orientation, before, after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;
    use flexdock_core::{DockLocation, Rect};
    use serde_json::json;

    fn model_with_left_border() -> (Model, NodeId) {
        let mut model = Model::new();
        assert!(
            model
                .dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1000.0, 800.0)))
                .is_applied()
        );
        let left = model.border_set().get(BorderLocation::Left).clone();
        assert!(
            model
                .dispatch(Action::add_node(
                    json!({ "id": "files" }),
                    left.clone(),
                    DockLocation::Center,
                    None,
                    Some(true)
                ))
                .is_applied()
        );
        (model, left)
    }

    #[test]
    fn bounds_widen_max_to_min() {
        let bounds = SplitterBounds::new(10.0, 5.0);
        assert_eq!(bounds.max, 10.0);
        assert_eq!(bounds.clamp(-3.0), 10.0);
    }

    #[test]
    fn left_border_split_grows_with_position() {
        let (model, left) = model_with_left_border();
        let bar = model.global().border_bar_size;
        assert_eq!(model.calculate_border_split(&left, bar + 150.0), Some(150.0));
        assert_eq!(model.calculate_border_split(&left, bar + 90.0), Some(90.0));
    }

    #[test]
    fn left_border_split_leaves_root_minimum() {
        let (model, left) = model_with_left_border();
        let bounds = model.border_splitter_bounds(&left).expect("bounds");
        let root = model.root("main").expect("root").geometry().rect;
        assert_eq!(bounds.max, root.right() - model.global().splitter_size);
        let size = model.calculate_border_split(&left, 5000.0).expect("size");
        assert_eq!(size, bounds.max - model.global().border_bar_size);
    }

    #[test]
    fn right_border_split_shrinks_with_position() {
        let mut model = Model::new();
        assert!(
            model
                .dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1000.0, 800.0)))
                .is_applied()
        );
        let right = model.border_set().get(BorderLocation::Right).clone();
        assert!(
            model
                .dispatch(Action::add_node(
                    json!({ "id": "log" }),
                    right.clone(),
                    DockLocation::Center,
                    None,
                    Some(true)
                ))
                .is_applied()
        );
        let strip_x = model.node(&right).expect("border").geometry().tab_strip_rect.x;
        let splitter = model.global().splitter_size;
        let size = model.calculate_border_split(&right, strip_x - splitter - 120.0);
        assert_eq!(size, Some(120.0));
    }

    #[test]
    fn adjust_border_split_updates_size() {
        let (mut model, left) = model_with_left_border();
        let bar = model.global().border_bar_size;
        assert!(
            model
                .dispatch(Action::adjust_border_split(left.clone(), bar + 120.0))
                .is_applied()
        );
        let border = model.node(&left).and_then(|node| node.as_border()).expect("border");
        assert_eq!(border.attrs.size, Some(120.0));
        assert_eq!(model.node(&left).expect("border").geometry().content_rect.width, 120.0);
    }

    #[test]
    fn row_weights_follow_splitter() {
        let mut model = Model::new();
        assert!(
            model
                .dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1000.0, 800.0)))
                .is_applied()
        );
        let tabset = model.tabsets_in_window("main")[0].clone();
        for id in ["a", "b"] {
            assert!(
                model
                    .dispatch(Action::add_node(
                        json!({ "id": id }),
                        tabset.clone(),
                        DockLocation::Center,
                        None,
                        None
                    ))
                    .is_applied()
            );
        }
        assert!(
            model
                .dispatch(Action::move_node("b", tabset.clone(), DockLocation::Right, None, None))
                .is_applied()
        );
        let root = model.root("main").expect("root");
        let root_id = root.id().clone();
        let rect = root.geometry().rect;
        let splitter = model.global().splitter_size;
        let quarter = (rect.width - splitter) / 4.0;
        let weights = model
            .calculate_row_weights(&root_id, 0, rect.x + quarter)
            .expect("weights");
        assert_eq!(weights.len(), 2);
        assert!((weights[0] - 25.0).abs() < 1e-9);
        assert!((weights[1] - 75.0).abs() < 1e-9);
        assert!(
            model
                .dispatch(Action::adjust_weights(root_id.clone(), weights))
                .is_applied()
        );
        let first = model.root("main").expect("root").children()[0].clone();
        let width = model.node(&first).expect("first").geometry().rect.width;
        assert!((width - quarter).abs() < 1e-9);
    }

    #[test]
    fn row_splitter_out_of_range_index() {
        let model = Model::new();
        let root = model.root("main").expect("root").id().clone();
        assert!(model.row_splitter_bounds(&root, 0).is_none());
    }
}
