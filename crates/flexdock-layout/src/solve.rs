//! Geometry solver: derives every node's rectangles from window rects,
//! weights, minimum sizes and border state.

use flexdock_core::{Orientation, Rect};

use crate::Model;
use crate::attributes::TabSetMode;
use crate::border::{BorderLocation, compute_nesting_order};
use crate::id::NodeId;
use crate::node::{NodeGeometry, NodeKind};

/// Split `available` among children by weight, honouring minimum sizes.
///
/// Children whose weighted share falls below their minimum are pinned to it
/// and the rest is redistributed. Non-positive or non-finite weights count as
/// zero; when every weight is zero the space is shared equally.
pub(crate) fn distribute(available: f64, weights: &[f64], mins: &[f64]) -> Vec<f64> {
    let count = weights.len();
    let mut weights: Vec<f64> = weights
        .iter()
        .map(|weight| if weight.is_finite() && *weight > 0.0 { *weight } else { 0.0 })
        .collect();
    if weights.iter().all(|weight| *weight == 0.0) {
        weights = vec![1.0; count];
    }
    let available = available.max(0.0);
    let mut sizes = vec![0.0; count];
    let mut fixed = vec![false; count];
    loop {
        let used: f64 = (0..count).filter(|&i| fixed[i]).map(|i| sizes[i]).sum();
        let free_weight: f64 = (0..count).filter(|&i| !fixed[i]).map(|i| weights[i]).sum();
        let free_space = (available - used).max(0.0);
        for i in (0..count).filter(|&i| !fixed[i]) {
            sizes[i] = if free_weight > 0.0 {
                free_space * weights[i] / free_weight
            } else {
                0.0
            };
        }
        let mut changed = false;
        for i in 0..count {
            let min = mins.get(i).copied().unwrap_or(0.0);
            if !fixed[i] && sizes[i] < min {
                sizes[i] = min;
                fixed[i] = true;
                changed = true;
            }
        }
        if !changed {
            return sizes;
        }
    }
}

/// Split `rect` into `count` equal slices along `along`.
fn slices(rect: Rect, count: usize, along: Orientation) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let step = rect.extent(along) / count as f64;
    (0..count)
        .map(|i| {
            let offset = step * i as f64;
            match along {
                Orientation::Horizontal => Rect::new(rect.x + offset, rect.y, step, rect.height),
                Orientation::Vertical => Rect::new(rect.x, rect.y + offset, rect.width, step),
            }
        })
        .collect()
}

impl Model {
    /// Recompute geometry for every window.
    pub(crate) fn solve_geometry(&mut self) {
        for node in self.nodes.values_mut() {
            node.geometry = NodeGeometry::default();
        }
        let windows: Vec<_> = self
            .windows
            .values()
            .map(|window| {
                (
                    window.id.is_main(),
                    window.rect,
                    window.root.clone(),
                    window.maximized_tabset.clone(),
                )
            })
            .collect();
        for (is_main, rect, root, maximized) in windows {
            let inner = if is_main { self.layout_borders(rect) } else { rect };
            self.layout_row(&root, inner);
            if let Some(tabset) = maximized {
                self.layout_tabset(&tabset, inner);
            }
        }
    }

    /// Smallest extent a subtree accepts along `along`.
    pub(crate) fn min_extent(&self, id: &NodeId, along: Orientation) -> f64 {
        let Some(node) = self.nodes.get(id) else {
            return 0.0;
        };
        match &node.kind {
            NodeKind::TabSet(tabset) => match along {
                Orientation::Horizontal => tabset.attrs.min_width(&self.global),
                Orientation::Vertical => {
                    tabset.attrs.min_height(&self.global) + self.global.tab_strip_height
                }
            },
            NodeKind::Row(_) => {
                let mins = node.children.iter().map(|child| self.min_extent(child, along));
                if self.row_orientation(id) == Some(along) {
                    let splitters = node.children.len().saturating_sub(1) as f64;
                    mins.sum::<f64>() + splitters * self.global.splitter_size
                } else {
                    mins.fold(0.0, f64::max)
                }
            }
            NodeKind::Tab(_) | NodeKind::Border(_) => 0.0,
        }
    }

    /// Peel borders off the main window rect; returns the rect left for the
    /// root row.
    fn layout_borders(&mut self, rect: Rect) -> Rect {
        let priorities: Vec<(BorderLocation, i32)> = self
            .borders
            .iter()
            .map(|(location, id)| {
                let priority = self
                    .nodes
                    .get(id)
                    .and_then(|node| node.as_border())
                    .map_or(0, |border| border.attrs.priority);
                (location, priority)
            })
            .collect();
        let bar = self.global.border_bar_size;
        let splitter = self.global.splitter_size;
        let mut remaining = rect;
        let mut flyouts = Vec::new();

        for location in compute_nesting_order(&priorities) {
            let id = self.borders.get(location).clone();
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let Some(border) = node.as_border() else {
                continue;
            };
            if node.children.is_empty() && border.attrs.enable_auto_hide(&self.global) {
                continue;
            }
            let dock = location.dock_location();
            let (strip, rest) = dock.split(remaining, bar);
            remaining = rest;
            let mut geometry = NodeGeometry {
                rect: strip,
                tab_strip_rect: strip,
                ..NodeGeometry::default()
            };
            if border.shows_docked_content() {
                let (content, rest) = dock.split(remaining, border.attrs.size(&self.global));
                let (splitter_rect, rest) = dock.split(rest, splitter);
                remaining = rest;
                geometry.rect = strip.union(&content).union(&splitter_rect);
                geometry.content_rect = content;
                geometry.splitters = vec![splitter_rect];
            } else if !border.pinned && border.flyout_tab.is_some() {
                flyouts.push(id.clone());
            }
            let headers = self.header_rects(&id, strip, location.tab_orientation());
            let tiles = if geometry.content_rect.is_empty() {
                Vec::new()
            } else {
                border.displayed_tabs()
            };
            let children = node.children.clone();
            if let Some(node) = self.nodes.get_mut(&id) {
                node.geometry = geometry.clone();
            }
            self.place_headers(&children, &headers);
            let along = location.tab_orientation().flip();
            let tile_rects = slices(geometry.content_rect, tiles.len(), along);
            for (index, tile) in tiles.iter().zip(tile_rects) {
                if let Some(tab) = children.get(*index).and_then(|child| self.nodes.get_mut(child)) {
                    tab.geometry.rect = tile;
                }
            }
        }

        for id in flyouts {
            let Some((location, size, flyout_tab)) = self.nodes.get(&id).and_then(|node| {
                let border = node.as_border()?;
                Some((
                    border.location,
                    border.attrs.flyout_size(&self.global),
                    border.flyout_tab.clone()?,
                ))
            }) else {
                continue;
            };
            let (flyout, _) = location.dock_location().split(remaining, size);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.geometry.flyout_rect = Some(flyout);
                node.geometry.content_rect = flyout;
            }
            if let Some(tab) = self.nodes.get_mut(&flyout_tab) {
                tab.geometry.rect = flyout;
            }
        }
        remaining
    }

    /// Header rectangles for a container's tabs, laid out at the configured
    /// header width along `along`.
    fn header_rects(&self, id: &NodeId, strip: Rect, along: Orientation) -> Vec<Rect> {
        let count = self.nodes.get(id).map_or(0, |node| node.children.len());
        let width = self.global.tab_header_width;
        (0..count)
            .map(|i| {
                let offset = width * i as f64;
                match along {
                    Orientation::Horizontal => {
                        Rect::new(strip.x + offset, strip.y, width, strip.height)
                    }
                    Orientation::Vertical => Rect::new(strip.x, strip.y + offset, strip.width, width),
                }
            })
            .collect()
    }

    fn place_headers(&mut self, children: &[NodeId], headers: &[Rect]) {
        for (child, header) in children.iter().zip(headers) {
            if let Some(tab) = self.nodes.get_mut(child) {
                tab.geometry.tab_rect = *header;
            }
        }
    }

    fn layout_row(&mut self, row: &NodeId, rect: Rect) {
        let Some(orientation) = self.row_orientation(row) else {
            return;
        };
        let children = self
            .nodes
            .get(row)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        let splitter = self.global.splitter_size;
        let gaps = children.len().saturating_sub(1) as f64 * splitter;
        let available = rect.extent(orientation) - gaps;
        let weights: Vec<f64> = children.iter().map(|child| self.weight_of(child)).collect();
        let mins: Vec<f64> = children
            .iter()
            .map(|child| self.min_extent(child, orientation))
            .collect();
        let sizes = distribute(available, &weights, &mins);

        let mut cursor = rect.start(orientation);
        let mut splitters = Vec::with_capacity(children.len().saturating_sub(1));
        let mut placed = Vec::with_capacity(children.len());
        for (index, size) in sizes.iter().enumerate() {
            let child_rect = match orientation {
                Orientation::Horizontal => Rect::new(cursor, rect.y, *size, rect.height),
                Orientation::Vertical => Rect::new(rect.x, cursor, rect.width, *size),
            };
            cursor += size;
            placed.push(child_rect);
            if index + 1 < sizes.len() {
                splitters.push(match orientation {
                    Orientation::Horizontal => Rect::new(cursor, rect.y, splitter, rect.height),
                    Orientation::Vertical => Rect::new(rect.x, cursor, rect.width, splitter),
                });
                cursor += splitter;
            }
        }
        if let Some(node) = self.nodes.get_mut(row) {
            node.geometry.rect = rect;
            node.geometry.splitters = splitters;
        }
        for (child, child_rect) in children.iter().zip(placed) {
            match self.nodes.get(child).map(|node| &node.kind) {
                Some(NodeKind::Row(_)) => self.layout_row(child, child_rect),
                Some(NodeKind::TabSet(_)) => self.layout_tabset(child, child_rect),
                _ => {}
            }
        }
    }

    fn layout_tabset(&mut self, tabset: &NodeId, rect: Rect) {
        let Some(node) = self.nodes.get(tabset) else {
            return;
        };
        let Some(state) = node.as_tabset() else {
            return;
        };
        let mode = state.attrs.mode;
        let selected = state.selected;
        let children = node.children.clone();
        let strip_height = self.global.tab_strip_height.clamp(0.0, rect.height.max(0.0));
        let strip = Rect::new(rect.x, rect.y, rect.width, strip_height);
        let content = Rect::new(
            rect.x,
            rect.y + strip_height,
            rect.width,
            (rect.height - strip_height).max(0.0),
        );
        let headers = self.header_rects(tabset, strip, Orientation::Horizontal);
        if let Some(node) = self.nodes.get_mut(tabset) {
            node.geometry.rect = rect;
            node.geometry.tab_strip_rect = strip;
            node.geometry.content_rect = content;
        }
        self.place_headers(&children, &headers);
        let shown: Vec<(usize, Rect)> = match mode {
            TabSetMode::Tabbed => selected.map(|index| (index, content)).into_iter().collect(),
            TabSetMode::Stacked => slices(content, children.len(), Orientation::Vertical)
                .into_iter()
                .enumerate()
                .collect(),
        };
        for child in &children {
            if let Some(tab) = self.nodes.get_mut(child) {
                tab.geometry.rect = Rect::default();
            }
        }
        for (index, tab_rect) in shown {
            if let Some(tab) = children.get(index).and_then(|child| self.nodes.get_mut(child)) {
                tab.geometry.rect = tab_rect;
            }
        }
    }
}
