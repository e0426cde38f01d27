//! JSON document codec.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "global": { "splitterSize": 4 },
//!   "borders": [{ "type": "border", "location": "left", "children": [] }],
//!   "layout": { "type": "row", "weight": 100, "children": [] },
//!   "windows": { "#9": { "layout": {}, "rect": {}, "kind": "float" } }
//! }
//! ```
//!
//! Generated `#<n>` ids are left out unless something refers to them and are
//! regenerated depth-first on load (borders, then the main layout, then the
//! other windows in id order). The main window's rect is host state and is
//! not saved.

use std::collections::BTreeMap;

use flexdock_core::{Rect, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::Model;
use crate::attributes::{GlobalAttributes, RowAttributes, TabAttributes, TabSetAttributes};
use crate::border::{BorderLocation, BorderSet};
use crate::id::{IdGenerator, NodeId, WindowId};
use crate::node::{BorderNode, DockState, Node, NodeKind, NodeType, TabSetNode};
use crate::selection;
use crate::window::{LayoutWindow, WindowKind};

/// A saved layout that could not be loaded.
///
/// Every structural variant names the JSON path of the offending node, such
/// as `layout.children[1].children[0]`.
#[derive(Debug, Error)]
pub enum LayoutJsonError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("{path}: expected an object")]
    NotAnObject { path: String },
    #[error("{path}: missing \"type\"")]
    MissingType { path: String },
    #[error("{path}: unknown node type {found:?}")]
    UnknownType { path: String, found: String },
    #[error("{path}: a {found} node is not allowed here")]
    UnexpectedType { path: String, found: NodeType },
    #[error("{path}: invalid attributes: {source}")]
    InvalidAttributes {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: invalid or missing \"{field}\"")]
    InvalidField { path: String, field: &'static str },
    #[error("{path}: duplicate id {id:?}")]
    DuplicateId { path: String, id: String },
    #[error("{path}: second border at {location}")]
    DuplicateBorder {
        path: String,
        location: BorderLocation,
    },
    #[error("windows: {0:?} is reserved for the main window")]
    ReservedWindowId(String),
}

impl LayoutJsonError {
    /// Path of the offending node, when the error is structural.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Syntax(_) | Self::ReservedWindowId(_) => None,
            Self::NotAnObject { path }
            | Self::MissingType { path }
            | Self::UnknownType { path, .. }
            | Self::UnexpectedType { path, .. }
            | Self::InvalidAttributes { path, .. }
            | Self::InvalidField { path, .. }
            | Self::DuplicateId { path, .. }
            | Self::DuplicateBorder { path, .. } => Some(path),
        }
    }
}

/// Root and window pointers of a freshly imported window layout.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImportedLayout {
    pub root: NodeId,
    pub active: Option<NodeId>,
    pub maximized: Option<NodeId>,
}

// ----------------------------------------------------------------------
// Save
// ----------------------------------------------------------------------

impl Model {
    /// Serialize the whole model.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let referenced: FxHashSet<&NodeId> = self
            .nodes
            .values()
            .filter_map(|node| node.as_border()?.flyout_tab.as_ref())
            .collect();
        let writer = Writer {
            model: self,
            referenced,
        };

        let mut doc = Map::new();
        let _ = doc.insert("global".into(), self.global.to_json_diff());
        let borders = BorderLocation::ALL
            .into_iter()
            .filter_map(|location| writer.border(self.borders.get(location)))
            .collect();
        let _ = doc.insert("borders".into(), Value::Array(borders));
        if let Some(main) = self.windows.get(WindowId::MAIN) {
            let _ = doc.insert("layout".into(), writer.node(&main.root, main));
        }
        let windows: Map<String, Value> = self
            .windows
            .values()
            .filter(|window| !window.id.is_main())
            .map(|window| {
                let mut entry = Map::new();
                let _ = entry.insert("layout".into(), writer.node(&window.root, window));
                let _ = entry.insert("rect".into(), to_value_or_null(&window.rect));
                let _ = entry.insert("kind".into(), to_value_or_null(&window.kind));
                (window.id.as_str().to_owned(), Value::Object(entry))
            })
            .collect();
        if !windows.is_empty() {
            let _ = doc.insert("windows".into(), Value::Object(windows));
        }
        Value::Object(doc)
    }

    /// Serialize the whole model to a JSON string.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Load a model from a parsed document.
    pub fn from_json(doc: &Value) -> Result<Self, LayoutJsonError> {
        Self::load(doc).inspect_err(|err| {
            warn!(
                message = "layout.load_rejected",
                path = err.path().unwrap_or_default(),
                error = %err
            );
        })
    }

    fn load(doc: &Value) -> Result<Self, LayoutJsonError> {
        let Value::Object(fields) = doc else {
            return Err(LayoutJsonError::NotAnObject {
                path: String::new(),
            });
        };
        let global: GlobalAttributes = match fields.get("global") {
            Some(value) => serde_json::from_value(value.clone()).map_err(|source| {
                LayoutJsonError::InvalidAttributes {
                    path: "global".into(),
                    source,
                }
            })?,
            None => GlobalAttributes::default(),
        };
        let layout = fields.get("layout").ok_or(LayoutJsonError::InvalidField {
            path: String::new(),
            field: "layout",
        })?;
        let windows = match fields.get("windows") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(windows)) => windows.clone(),
            Some(_) => {
                return Err(LayoutJsonError::NotAnObject {
                    path: "windows".into(),
                });
            }
        };
        if windows.contains_key(WindowId::MAIN) {
            return Err(LayoutJsonError::ReservedWindowId(WindowId::MAIN.into()));
        }
        let border_values = match fields.get("borders") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(borders)) => borders.clone(),
            Some(_) => {
                return Err(LayoutJsonError::InvalidField {
                    path: String::new(),
                    field: "borders",
                });
            }
        };

        let mut explicit = FxHashSet::default();
        for (index, border) in border_values.iter().enumerate() {
            collect_ids(border, &format!("borders[{index}]"), &mut explicit)?;
        }
        collect_ids(layout, "layout", &mut explicit)?;
        for (id, window) in &windows {
            let path = format!("windows.{id}");
            let window_layout = window_field(window, &path, "layout")?;
            collect_ids(window_layout, &format!("{path}.layout"), &mut explicit)?;
        }
        for id in windows.keys() {
            if explicit.contains(id.as_str()) {
                return Err(LayoutJsonError::DuplicateId {
                    path: format!("windows.{id}"),
                    id: id.clone(),
                });
            }
            let _ = explicit.insert(id.clone());
        }

        let mut model = Model {
            global,
            nodes: FxHashMap::default(),
            windows: BTreeMap::new(),
            borders: BorderSet::new(BorderLocation::ALL.map(|_| NodeId::new(""))),
            ids: IdGenerator::default(),
            drop_filter: None,
        };
        let mut reader = Reader::new(&mut model, explicit);

        let mut by_location: FxHashMap<BorderLocation, (usize, &Value)> = FxHashMap::default();
        for (index, value) in border_values.iter().enumerate() {
            let path = format!("borders[{index}]");
            let location = border_location(value, &path)?;
            if by_location.insert(location, (index, value)).is_some() {
                return Err(LayoutJsonError::DuplicateBorder { path, location });
            }
        }
        let mut border_ids = Vec::with_capacity(BorderLocation::ALL.len());
        for location in BorderLocation::ALL {
            let id = match by_location.get(&location) {
                Some((index, value)) => reader.border(value, &format!("borders[{index}]"), location)?,
                None => reader.insert(None, NodeKind::Border(BorderNode::new(location))),
            };
            border_ids.push(id);
        }

        let main = reader.window_layout(layout, "layout")?;
        let mut loaded = vec![(WindowId::main(), WindowKind::Main, Rect::default(), main)];
        for (id, window) in &windows {
            let path = format!("windows.{id}");
            let rect: Rect = parse_field(window, &path, "rect")?;
            let kind: WindowKind = parse_field(window, &path, "kind")?;
            if kind == WindowKind::Main {
                return Err(LayoutJsonError::InvalidField { path, field: "kind" });
            }
            let imported =
                reader.window_layout(window_field(window, &path, "layout")?, &format!("{path}.layout"))?;
            loaded.push((WindowId::new(id.as_str()), kind, rect, imported));
        }

        let mut border_ids = border_ids.into_iter();
        model.borders = BorderSet::new(BorderLocation::ALL.map(|_| {
            border_ids.next().unwrap_or_else(|| NodeId::new(""))
        }));
        for (id, kind, rect, imported) in loaded {
            let mut window = LayoutWindow::new(id.clone(), kind, rect, imported.root);
            window.active_tabset = imported.active;
            window.maximized_tabset = imported.maximized;
            let _ = model.windows.insert(id, window);
        }
        model.finish_mutation();
        Ok(model)
    }

    /// Parse and load a model from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, LayoutJsonError> {
        let doc: Value = serde_json::from_str(raw)?;
        Self::from_json(&doc)
    }
}

/// Import a window layout (a row object) into an existing model.
///
/// Explicit ids must not collide with nodes or windows already present.
pub(crate) fn import_window_layout(
    model: &mut Model,
    layout: &Value,
) -> Result<ImportedLayout, LayoutJsonError> {
    let mut explicit = FxHashSet::default();
    collect_ids(layout, "layout", &mut explicit)?;
    if let Some(clash) = explicit
        .iter()
        .find(|id| model.nodes.contains_key(id.as_str()) || model.windows.contains_key(id.as_str()))
    {
        return Err(LayoutJsonError::DuplicateId {
            path: "layout".into(),
            id: clash.clone(),
        });
    }
    Reader::new(model, explicit).window_layout(layout, "layout")
}

fn to_value_or_null<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

struct Writer<'a> {
    model: &'a Model,
    referenced: FxHashSet<&'a NodeId>,
}

impl Writer<'_> {
    fn header(&self, node: &Node) -> Map<String, Value> {
        let mut map = Map::new();
        let _ = map.insert("type".into(), Value::from(node.node_type().as_str()));
        if !node.id.is_generated() || self.referenced.contains(&node.id) {
            let _ = map.insert("id".into(), Value::from(node.id.as_str()));
        }
        map
    }

    fn children(&self, node: &Node, window: Option<&LayoutWindow>) -> Value {
        Value::Array(
            node.children
                .iter()
                .filter_map(|child| {
                    let child = self.model.nodes.get(child)?;
                    Some(self.node_value(child, window))
                })
                .collect(),
        )
    }

    fn node(&self, id: &NodeId, window: &LayoutWindow) -> Value {
        self.model
            .nodes
            .get(id)
            .map_or(Value::Null, |node| self.node_value(node, Some(window)))
    }

    fn node_value(&self, node: &Node, window: Option<&LayoutWindow>) -> Value {
        let mut map = self.header(node);
        match &node.kind {
            NodeKind::Row(attrs) => {
                merge_object(&mut map, attrs);
                let _ = map.insert("children".into(), self.children(node, window));
            }
            NodeKind::TabSet(tabset) => {
                merge_object(&mut map, &tabset.attrs);
                let default_selected = if node.children.is_empty() { None } else { Some(0) };
                if tabset.selected != default_selected {
                    let _ = map.insert("selected".into(), selected_value(tabset.selected));
                }
                if window.is_some_and(|window| window.active_tabset.as_ref() == Some(&node.id)) {
                    let _ = map.insert("active".into(), Value::Bool(true));
                }
                if window.is_some_and(|window| window.maximized_tabset.as_ref() == Some(&node.id)) {
                    let _ = map.insert("maximized".into(), Value::Bool(true));
                }
                let _ = map.insert("children".into(), self.children(node, window));
            }
            NodeKind::Tab(attrs) => merge_object(&mut map, attrs),
            NodeKind::Border(border) => {
                let _ = map.insert("location".into(), Value::from(border.location.as_str()));
                merge_object(&mut map, &border.attrs);
                if let Some(selected) = border.selected {
                    let _ = map.insert("selected".into(), Value::from(selected));
                }
                if !border.visible_tabs.is_empty() {
                    let _ = map.insert("visibleTabs".into(), to_value_or_null(&border.visible_tabs));
                }
                if border.dock_state != DockState::Expanded {
                    let _ = map.insert("dockState".into(), to_value_or_null(&border.dock_state));
                }
                let _ = map.insert("pinned".into(), Value::Bool(border.pinned));
                if let Some(tab) = &border.flyout_tab {
                    let _ = map.insert("flyoutTabId".into(), Value::from(tab.as_str()));
                }
                let _ = map.insert("children".into(), self.children(node, None));
            }
        }
        Value::Object(map)
    }

    fn border(&self, id: &NodeId) -> Option<Value> {
        let node = self.model.nodes.get(id)?;
        Some(self.node_value(node, None))
    }
}

fn merge_object<T: serde::Serialize>(map: &mut Map<String, Value>, attrs: &T) {
    if let Ok(Value::Object(fields)) = serde_json::to_value(attrs) {
        map.extend(fields);
    }
}

fn selected_value(selected: Option<usize>) -> Value {
    selected.map_or(Value::from(-1), Value::from)
}

// ----------------------------------------------------------------------
// Load
// ----------------------------------------------------------------------

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, LayoutJsonError> {
    value.as_object().ok_or_else(|| LayoutJsonError::NotAnObject {
        path: path.to_owned(),
    })
}

fn window_field<'a>(
    window: &'a Value,
    path: &str,
    field: &'static str,
) -> Result<&'a Value, LayoutJsonError> {
    object(window, path)?
        .get(field)
        .ok_or_else(|| LayoutJsonError::InvalidField {
            path: path.to_owned(),
            field,
        })
}

fn parse_field<T: DeserializeOwned>(
    value: &Value,
    path: &str,
    field: &'static str,
) -> Result<T, LayoutJsonError> {
    let raw = window_field(value, path, field)?;
    serde_json::from_value(raw.clone()).map_err(|_| LayoutJsonError::InvalidField {
        path: path.to_owned(),
        field,
    })
}

fn child_values<'a>(
    fields: &'a Map<String, Value>,
    path: &str,
) -> Result<&'a [Value], LayoutJsonError> {
    match fields.get("children") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(children)) => Ok(children),
        Some(_) => Err(LayoutJsonError::InvalidField {
            path: path.to_owned(),
            field: "children",
        }),
    }
}

fn explicit_id(fields: &Map<String, Value>, path: &str) -> Result<Option<String>, LayoutJsonError> {
    match fields.get("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) if !id.is_empty() => Ok(Some(id.clone())),
        Some(_) => Err(LayoutJsonError::InvalidField {
            path: path.to_owned(),
            field: "id",
        }),
    }
}

/// First pass: gather every explicit id so generated ids never collide.
fn collect_ids(
    value: &Value,
    path: &str,
    out: &mut FxHashSet<String>,
) -> Result<(), LayoutJsonError> {
    let fields = object(value, path)?;
    if let Some(id) = explicit_id(fields, path)? {
        if !out.insert(id.clone()) {
            return Err(LayoutJsonError::DuplicateId {
                path: path.to_owned(),
                id,
            });
        }
    }
    for (index, child) in child_values(fields, path)?.iter().enumerate() {
        collect_ids(child, &format!("{path}.children[{index}]"), out)?;
    }
    Ok(())
}

fn node_type(fields: &Map<String, Value>, path: &str) -> Result<NodeType, LayoutJsonError> {
    let raw = fields
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| LayoutJsonError::MissingType {
            path: path.to_owned(),
        })?;
    NodeType::parse(raw).ok_or_else(|| LayoutJsonError::UnknownType {
        path: path.to_owned(),
        found: raw.to_owned(),
    })
}

fn border_location(value: &Value, path: &str) -> Result<BorderLocation, LayoutJsonError> {
    let fields = object(value, path)?;
    let found = node_type(fields, path)?;
    if found != NodeType::Border {
        return Err(LayoutJsonError::UnexpectedType {
            path: path.to_owned(),
            found,
        });
    }
    fields
        .get("location")
        .cloned()
        .and_then(|location| serde_json::from_value(location).ok())
        .ok_or_else(|| LayoutJsonError::InvalidField {
            path: path.to_owned(),
            field: "location",
        })
}

/// Deserialize an attribute struct from a node object, ignoring the
/// structural members.
fn attributes<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    path: &str,
) -> Result<T, LayoutJsonError> {
    let attrs: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != "children")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    serde_json::from_value(Value::Object(attrs)).map_err(|source| {
        LayoutJsonError::InvalidAttributes {
            path: path.to_owned(),
            source,
        }
    })
}

/// A `selected` member: absent uses `default`, `-1` means none.
fn selected_field(
    fields: &Map<String, Value>,
    path: &str,
    len: usize,
    default: Option<usize>,
) -> Result<Option<usize>, LayoutJsonError> {
    let invalid = || LayoutJsonError::InvalidField {
        path: path.to_owned(),
        field: "selected",
    };
    match fields.get("selected") {
        None | Some(Value::Null) => Ok(default),
        Some(value) if value.as_i64() == Some(-1) => Ok(None),
        Some(value) => {
            let index = value
                .as_u64()
                .and_then(|index| usize::try_from(index).ok())
                .ok_or_else(invalid)?;
            if index < len { Ok(Some(index)) } else { Err(invalid()) }
        }
    }
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}

struct Reader<'a> {
    model: &'a mut Model,
    explicit: FxHashSet<String>,
    active: Option<NodeId>,
    maximized: Option<NodeId>,
}

impl<'a> Reader<'a> {
    fn new(model: &'a mut Model, explicit: FxHashSet<String>) -> Self {
        Self {
            model,
            explicit,
            active: None,
            maximized: None,
        }
    }

    /// Register a node under its explicit id or a fresh generated one.
    fn insert(&mut self, id: Option<String>, kind: NodeKind) -> NodeId {
        let id = match id {
            Some(id) => NodeId::new(id),
            None => {
                let explicit = &self.explicit;
                let nodes = &self.model.nodes;
                let windows = &self.model.windows;
                NodeId::new(self.model.ids.next_id(|candidate| {
                    explicit.contains(candidate)
                        || nodes.contains_key(candidate)
                        || windows.contains_key(candidate)
                }))
            }
        };
        let _ = self
            .model
            .nodes
            .insert(id.clone(), Node::new(id.clone(), kind));
        id
    }

    fn adopt(&mut self, parent: &NodeId, children: Vec<NodeId>) {
        for child in &children {
            if let Some(node) = self.model.nodes.get_mut(child) {
                node.parent = Some(parent.clone());
            }
        }
        if let Some(node) = self.model.nodes.get_mut(parent) {
            node.children = children;
        }
    }

    fn window_layout(&mut self, layout: &Value, path: &str) -> Result<ImportedLayout, LayoutJsonError> {
        self.active = None;
        self.maximized = None;
        let root = self.node(layout, path, &[NodeType::Row])?;
        Ok(ImportedLayout {
            root,
            active: self.active.take(),
            maximized: self.maximized.take(),
        })
    }

    fn node(&mut self, value: &Value, path: &str, allowed: &[NodeType]) -> Result<NodeId, LayoutJsonError> {
        let fields = object(value, path)?;
        let found = node_type(fields, path)?;
        if !allowed.contains(&found) {
            return Err(LayoutJsonError::UnexpectedType {
                path: path.to_owned(),
                found,
            });
        }
        let explicit = explicit_id(fields, path)?;
        let child_values = child_values(fields, path)?;
        match found {
            NodeType::Row => {
                let attrs: RowAttributes = attributes(fields, path)?;
                let id = self.insert(explicit, NodeKind::Row(attrs));
                let children =
                    self.children(child_values, path, &[NodeType::Row, NodeType::TabSet])?;
                self.adopt(&id, children);
                Ok(id)
            }
            NodeType::TabSet => {
                let attrs: TabSetAttributes = attributes(fields, path)?;
                let default = if child_values.is_empty() { None } else { Some(0) };
                let selected = selected_field(fields, path, child_values.len(), default)?;
                let id = self.insert(explicit, NodeKind::TabSet(TabSetNode { attrs, selected }));
                let children = self.children(child_values, path, &[NodeType::Tab])?;
                self.adopt(&id, children);
                if flag(fields, "active") {
                    self.active = Some(id.clone());
                }
                if flag(fields, "maximized") {
                    self.maximized = Some(id.clone());
                }
                Ok(id)
            }
            NodeType::Tab => {
                if !child_values.is_empty() {
                    return Err(LayoutJsonError::InvalidField {
                        path: path.to_owned(),
                        field: "children",
                    });
                }
                let attrs: TabAttributes = attributes(fields, path)?;
                Ok(self.insert(explicit, NodeKind::Tab(attrs)))
            }
            NodeType::Border => Err(LayoutJsonError::UnexpectedType {
                path: path.to_owned(),
                found,
            }),
        }
    }

    fn children(
        &mut self,
        values: &[Value],
        path: &str,
        allowed: &[NodeType],
    ) -> Result<Vec<NodeId>, LayoutJsonError> {
        values
            .iter()
            .enumerate()
            .map(|(index, child)| self.node(child, &format!("{path}.children[{index}]"), allowed))
            .collect()
    }

    fn border(
        &mut self,
        value: &Value,
        path: &str,
        location: BorderLocation,
    ) -> Result<NodeId, LayoutJsonError> {
        let fields = object(value, path)?;
        let explicit = explicit_id(fields, path)?;
        let child_values = child_values(fields, path)?;
        let len = child_values.len();
        let mut border = BorderNode::new(location);
        border.attrs = attributes(fields, path)?;
        let selected = selected_field(fields, path, len, None)?;
        let visible: Vec<usize> = match fields.get("visibleTabs") {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|_| {
                LayoutJsonError::InvalidField {
                    path: path.to_owned(),
                    field: "visibleTabs",
                }
            })?,
        };
        (border.selected, border.visible_tabs) = selection::normalize(selected, &visible, len);
        if let Some(raw) = fields.get("dockState") {
            border.dock_state =
                serde_json::from_value(raw.clone()).map_err(|_| LayoutJsonError::InvalidField {
                    path: path.to_owned(),
                    field: "dockState",
                })?;
        }
        if let Some(raw) = fields.get("pinned") {
            border.pinned = raw.as_bool().ok_or_else(|| LayoutJsonError::InvalidField {
                path: path.to_owned(),
                field: "pinned",
            })?;
        }
        let flyout = match fields.get("flyoutTabId") {
            None | Some(Value::Null) => None,
            Some(Value::String(tab)) => Some(NodeId::new(tab.as_str())),
            Some(_) => {
                return Err(LayoutJsonError::InvalidField {
                    path: path.to_owned(),
                    field: "flyoutTabId",
                });
            }
        };

        let id = self.insert(explicit, NodeKind::Border(border));
        let children = self.children(child_values, path, &[NodeType::Tab])?;
        if let Some(tab) = &flyout {
            if !children.contains(tab) {
                return Err(LayoutJsonError::InvalidField {
                    path: path.to_owned(),
                    field: "flyoutTabId",
                });
            }
        }
        self.adopt(&id, children);
        if let Some(state) = self.model.nodes.get_mut(&id).and_then(Node::as_border_mut) {
            state.flyout_tab = flyout;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;
    use flexdock_core::DockLocation;
    use serde_json::json;

    #[test]
    fn default_model_saves_minimal_document() {
        let doc = Model::new().to_json();
        assert_eq!(doc["global"], json!({}));
        assert_eq!(doc["borders"].as_array().map(Vec::len), Some(4));
        assert_eq!(doc["layout"]["type"], "row");
        assert!(doc["layout"].get("id").is_none());
        assert_eq!(doc["layout"]["children"][0]["type"], "tabset");
        assert!(doc.get("windows").is_none());
    }

    #[test]
    fn explicit_ids_survive_and_generated_ids_are_omitted() {
        let mut model = Model::new();
        let tabset = model.tabsets_in_window("main")[0].clone();
        assert!(
            model
                .dispatch(Action::add_node(
                    json!({ "id": "editor", "name": "Editor", "component": "text" }),
                    tabset,
                    DockLocation::Center,
                    None,
                    None
                ))
                .is_applied()
        );
        let doc = model.to_json();
        let tab = &doc["layout"]["children"][0]["children"][0];
        assert_eq!(tab["id"], "editor");
        assert_eq!(tab["component"], "text");
        assert!(doc["layout"]["children"][0].get("id").is_none());
        let reloaded = Model::from_json(&doc).expect("reload");
        assert_eq!(reloaded.to_json(), doc);
        assert!(reloaded.node("editor").is_some());
    }

    #[test]
    fn missing_type_reports_path() {
        let doc = json!({
            "layout": {
                "type": "row",
                "children": [
                    { "type": "tabset", "children": [] },
                    { "type": "row", "children": [{ "weight": 50 }] }
                ]
            }
        });
        let err = Model::from_json(&doc).expect_err("missing type");
        assert!(matches!(err, LayoutJsonError::MissingType { .. }));
        assert_eq!(err.path(), Some("layout.children[1].children[0]"));
    }

    #[test]
    fn unknown_and_misplaced_types_are_rejected() {
        let unknown = json!({ "layout": { "type": "grid" } });
        assert!(matches!(
            Model::from_json(&unknown),
            Err(LayoutJsonError::UnknownType { .. })
        ));
        let misplaced = json!({ "layout": { "type": "tabset" } });
        assert!(matches!(
            Model::from_json(&misplaced),
            Err(LayoutJsonError::UnexpectedType { found: NodeType::TabSet, .. })
        ));
        let tab_in_row = json!({
            "layout": { "type": "row", "children": [{ "type": "tab" }] }
        });
        let err = Model::from_json(&tab_in_row).expect_err("tab in row");
        assert_eq!(err.path(), Some("layout.children[0]"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let doc = json!({
            "layout": {
                "type": "row",
                "children": [{
                    "type": "tabset",
                    "children": [
                        { "type": "tab", "id": "x" },
                        { "type": "tab", "id": "x" }
                    ]
                }]
            }
        });
        assert!(matches!(
            Model::from_json(&doc),
            Err(LayoutJsonError::DuplicateId { .. })
        ));
    }

    #[test]
    fn main_window_id_is_reserved() {
        let doc = json!({
            "layout": { "type": "row" },
            "windows": { "main": { "layout": { "type": "row" }, "rect": Rect::default(), "kind": "float" } }
        });
        assert!(matches!(
            Model::from_json(&doc),
            Err(LayoutJsonError::ReservedWindowId(_))
        ));
    }

    #[test]
    fn selected_out_of_range_is_rejected() {
        let doc = json!({
            "layout": {
                "type": "row",
                "children": [{ "type": "tabset", "selected": 3, "children": [{ "type": "tab" }] }]
            }
        });
        let err = Model::from_json(&doc).expect_err("bad selection");
        assert!(matches!(err, LayoutJsonError::InvalidField { field: "selected", .. }));
    }

    #[test]
    fn syntax_errors_come_from_serde_json() {
        assert!(matches!(
            Model::from_json_str("{ not json"),
            Err(LayoutJsonError::Syntax(_))
        ));
    }

    #[test]
    fn border_state_round_trips() {
        let doc = json!({
            "borders": [{
                "type": "border",
                "location": "left",
                "size": 250.0,
                "selected": 1,
                "visibleTabs": [0, 1],
                "pinned": false,
                "flyoutTabId": "b",
                "children": [
                    { "type": "tab", "id": "a", "name": "A" },
                    { "type": "tab", "id": "b", "name": "B" }
                ]
            }],
            "layout": { "type": "row", "children": [{ "type": "tabset", "children": [] }] }
        });
        let model = Model::from_json(&doc).expect("load");
        let left = model.border(BorderLocation::Left).expect("left border");
        let state = left.as_border().expect("border state");
        assert_eq!(state.selected, Some(1));
        assert_eq!(state.visible_tabs, vec![0, 1]);
        assert!(!state.pinned);
        assert_eq!(state.flyout_tab.as_ref().map(NodeId::as_str), Some("b"));
        assert_eq!(state.attrs.size, Some(250.0));
        let saved = model.to_json();
        assert_eq!(Model::from_json(&saved).expect("reload").to_json(), saved);
    }

    #[test]
    fn flyout_tab_must_be_a_child() {
        let doc = json!({
            "borders": [{
                "type": "border",
                "location": "top",
                "flyoutTabId": "ghost",
                "children": []
            }],
            "layout": { "type": "row" }
        });
        let err = Model::from_json(&doc).expect_err("dangling flyout");
        assert!(matches!(err, LayoutJsonError::InvalidField { field: "flyoutTabId", .. }));
        assert_eq!(err.path(), Some("borders[0]"));
    }

    #[test]
    fn windows_and_pointers_round_trip() {
        let mut model = Model::new();
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
                .dispatch(Action::float_tab("b", Rect::new(10.0, 10.0, 300.0, 200.0)))
                .is_applied()
        );
        assert!(model.dispatch(Action::maximize_toggle(tabset.clone())).is_applied());
        let doc = model.to_json();
        let windows = doc["windows"].as_object().expect("windows");
        assert_eq!(windows.len(), 1);
        let reloaded = Model::from_json(&doc).expect("reload");
        assert_eq!(reloaded.to_json(), doc);
        assert_eq!(reloaded.windows().count(), 2);
        let main_max = reloaded.maximized_tabset("main").expect("maximized");
        assert_eq!(reloaded.node(main_max).map(|node| node.children().len()), Some(1));
        let float = reloaded
            .windows()
            .find(|window| !window.id().is_main())
            .expect("float window");
        assert_eq!(float.kind(), WindowKind::Float);
        assert_eq!(float.rect(), Rect::new(10.0, 10.0, 300.0, 200.0));
    }

    #[test]
    fn create_window_rejects_clashing_ids() {
        let mut model = Model::new();
        let tabset = model.tabsets_in_window("main")[0].clone();
        assert!(
            model
                .dispatch(Action::add_node(
                    json!({ "id": "a" }),
                    tabset,
                    DockLocation::Center,
                    None,
                    None
                ))
                .is_applied()
        );
        let layout = json!({
            "type": "row",
            "children": [{ "type": "tabset", "children": [{ "type": "tab", "id": "a" }] }]
        });
        let mut scratch = model.clone();
        let err = import_window_layout(&mut scratch, &layout).expect_err("clash");
        assert!(matches!(err, LayoutJsonError::DuplicateId { .. }));
    }
}
