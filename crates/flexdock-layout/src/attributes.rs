//! Typed attribute sets for every node kind plus the model-wide defaults.
//!
//! Per-node fields are `Option`s: `None` means "inherit", and the effective
//! value is resolved against [`GlobalAttributes`]. Unset fields are skipped
//! when serializing, so saved layouts only carry what was explicitly set.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default relative weight of rows and tabsets.
pub const DEFAULT_WEIGHT: f64 = 100.0;

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Model-wide configuration and inherited defaults.
///
/// Serialized as a diff against [`GlobalAttributes::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalAttributes {
    /// Thickness of row and border splitters.
    pub splitter_size: f64,
    /// Height of a tabset's tab strip.
    #[serde(rename = "tabSetTabStripHeight")]
    pub tab_strip_height: f64,
    /// Width assigned to each tab header by the geometry solver.
    pub tab_header_width: f64,
    /// Thickness of a border's tab bar.
    pub border_bar_size: f64,
    /// Content size of borders that do not set their own.
    pub border_size: f64,
    /// Minimum border content size.
    pub border_min_size: f64,
    /// Maximum border content size (`None` = bounded only by the layout).
    pub border_max_size: Option<f64>,
    /// Size of an unpinned border's flyout overlay.
    pub border_flyout_size: f64,
    pub border_enable_drop: bool,
    /// Hide borders that hold no tabs.
    pub border_enable_auto_hide: bool,
    /// Width of the strip along a window's root row that offers edge docking.
    pub edge_dock_margin: f64,
    pub enable_edge_dock: bool,
    /// Lay the root row out vertically instead of horizontally.
    pub root_orientation_vertical: bool,
    pub tab_enable_close: bool,
    pub tab_enable_drag: bool,
    pub tab_enable_popout: bool,
    #[serde(rename = "tabSetEnableMaximize")]
    pub tabset_enable_maximize: bool,
    #[serde(rename = "tabSetEnableClose")]
    pub tabset_enable_close: bool,
    #[serde(rename = "tabSetEnableDrop")]
    pub tabset_enable_drop: bool,
    #[serde(rename = "tabSetEnableDivide")]
    pub tabset_enable_divide: bool,
    #[serde(rename = "tabSetEnableDrag")]
    pub tabset_enable_drag: bool,
    #[serde(rename = "tabSetEnablePopout")]
    pub tabset_enable_popout: bool,
    /// Remove tabsets as soon as their last tab leaves.
    #[serde(rename = "tabSetEnableDeleteWhenEmpty")]
    pub tabset_enable_delete_when_empty: bool,
    #[serde(rename = "tabSetMinWidth")]
    pub tabset_min_width: f64,
    #[serde(rename = "tabSetMinHeight")]
    pub tabset_min_height: f64,
}

impl Default for GlobalAttributes {
    fn default() -> Self {
        Self {
            splitter_size: 8.0,
            tab_strip_height: 26.0,
            tab_header_width: 100.0,
            border_bar_size: 30.0,
            border_size: 200.0,
            border_min_size: 0.0,
            border_max_size: None,
            border_flyout_size: 300.0,
            border_enable_drop: true,
            border_enable_auto_hide: false,
            edge_dock_margin: 10.0,
            enable_edge_dock: true,
            root_orientation_vertical: false,
            tab_enable_close: true,
            tab_enable_drag: true,
            tab_enable_popout: true,
            tabset_enable_maximize: true,
            tabset_enable_close: false,
            tabset_enable_drop: true,
            tabset_enable_divide: true,
            tabset_enable_drag: true,
            tabset_enable_popout: true,
            tabset_enable_delete_when_empty: true,
            tabset_min_width: 0.0,
            tabset_min_height: 0.0,
        }
    }
}

impl GlobalAttributes {
    /// Serialize only the fields that differ from the defaults.
    #[must_use]
    pub fn to_json_diff(&self) -> Value {
        let current = serde_json::to_value(self).unwrap_or(Value::Null);
        let defaults = serde_json::to_value(Self::default()).unwrap_or(Value::Null);
        let (Value::Object(current), Value::Object(defaults)) = (current, defaults) else {
            return Value::Object(Map::new());
        };
        let diff = current
            .into_iter()
            .filter(|(key, value)| defaults.get(key) != Some(value))
            .collect::<Map<_, _>>();
        Value::Object(diff)
    }
}

/// Attributes of a [`Row`](crate::node::NodeKind::Row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowAttributes {
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Default for RowAttributes {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
        }
    }
}

/// How a tabset displays its tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabSetMode {
    /// One selected tab fills the content area.
    #[default]
    Tabbed,
    /// Every tab gets a slice of the content area, top to bottom.
    Stacked,
}

impl TabSetMode {
    fn is_default(&self) -> bool {
        *self == Self::Tabbed
    }
}

/// Attributes of a [`TabSet`](crate::node::NodeKind::TabSet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSetAttributes {
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "TabSetMode::is_default")]
    pub mode: TabSetMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_maximize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_close: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_divide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_popout: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_delete_when_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
}

impl Default for TabSetAttributes {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            name: None,
            mode: TabSetMode::Tabbed,
            enable_maximize: None,
            enable_close: None,
            enable_drop: None,
            enable_divide: None,
            enable_drag: None,
            enable_popout: None,
            enable_delete_when_empty: None,
            min_width: None,
            min_height: None,
        }
    }
}

impl TabSetAttributes {
    #[must_use]
    pub fn enable_maximize(&self, global: &GlobalAttributes) -> bool {
        self.enable_maximize.unwrap_or(global.tabset_enable_maximize)
    }

    #[must_use]
    pub fn enable_close(&self, global: &GlobalAttributes) -> bool {
        self.enable_close.unwrap_or(global.tabset_enable_close)
    }

    #[must_use]
    pub fn enable_drop(&self, global: &GlobalAttributes) -> bool {
        self.enable_drop.unwrap_or(global.tabset_enable_drop)
    }

    #[must_use]
    pub fn enable_divide(&self, global: &GlobalAttributes) -> bool {
        self.enable_divide.unwrap_or(global.tabset_enable_divide)
    }

    #[must_use]
    pub fn enable_drag(&self, global: &GlobalAttributes) -> bool {
        self.enable_drag.unwrap_or(global.tabset_enable_drag)
    }

    #[must_use]
    pub fn enable_popout(&self, global: &GlobalAttributes) -> bool {
        self.enable_popout.unwrap_or(global.tabset_enable_popout)
    }

    #[must_use]
    pub fn enable_delete_when_empty(&self, global: &GlobalAttributes) -> bool {
        self.enable_delete_when_empty
            .unwrap_or(global.tabset_enable_delete_when_empty)
    }

    /// Minimum content width (tab strip excluded).
    #[must_use]
    pub fn min_width(&self, global: &GlobalAttributes) -> f64 {
        self.min_width.unwrap_or(global.tabset_min_width).max(0.0)
    }

    /// Minimum content height (tab strip excluded).
    #[must_use]
    pub fn min_height(&self, global: &GlobalAttributes) -> f64 {
        self.min_height.unwrap_or(global.tabset_min_height).max(0.0)
    }
}

/// Attributes of a [`Tab`](crate::node::NodeKind::Tab).
///
/// `component` names the content type; the host resolves it against its own
/// registry. `config` is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Unsaved-changes marker.
    #[serde(default, skip_serializing_if = "is_false")]
    pub dirty: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_close: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_popout: Option<bool>,
}

impl TabAttributes {
    /// Tab with a name and component.
    #[must_use]
    pub fn new(name: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component: Some(component.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn enable_close(&self, global: &GlobalAttributes) -> bool {
        self.enable_close.unwrap_or(global.tab_enable_close)
    }

    #[must_use]
    pub fn enable_drag(&self, global: &GlobalAttributes) -> bool {
        self.enable_drag.unwrap_or(global.tab_enable_drag)
    }

    #[must_use]
    pub fn enable_popout(&self, global: &GlobalAttributes) -> bool {
        self.enable_popout.unwrap_or(global.tab_enable_popout)
    }
}

/// Attributes of a [`Border`](crate::node::NodeKind::Border).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderAttributes {
    /// Content size when expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flyout_size: Option<f64>,
    /// Nesting priority; higher priorities take the outer edge.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_hide: Option<bool>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl BorderAttributes {
    #[must_use]
    pub fn min_size(&self, global: &GlobalAttributes) -> f64 {
        self.min_size.unwrap_or(global.border_min_size).max(0.0)
    }

    /// Upper bound on the content size, never below [`Self::min_size`].
    #[must_use]
    pub fn max_size(&self, global: &GlobalAttributes) -> f64 {
        let max = self
            .max_size
            .or(global.border_max_size)
            .unwrap_or(f64::INFINITY);
        max.max(self.min_size(global))
    }

    /// Content size clamped to the min/max bounds.
    #[must_use]
    pub fn size(&self, global: &GlobalAttributes) -> f64 {
        self.size
            .unwrap_or(global.border_size)
            .clamp(self.min_size(global), self.max_size(global))
    }

    #[must_use]
    pub fn flyout_size(&self, global: &GlobalAttributes) -> f64 {
        self.flyout_size
            .unwrap_or(global.border_flyout_size)
            .clamp(self.min_size(global), self.max_size(global))
    }

    #[must_use]
    pub fn enable_drop(&self, global: &GlobalAttributes) -> bool {
        self.enable_drop.unwrap_or(global.border_enable_drop)
    }

    #[must_use]
    pub fn enable_auto_hide(&self, global: &GlobalAttributes) -> bool {
        self.enable_auto_hide
            .unwrap_or(global.border_enable_auto_hide)
    }
}

/// Keys that partial attribute updates may never touch.
pub(crate) const STRUCTURAL_KEYS: [&str; 3] = ["id", "type", "children"];

/// Apply a JSON object patch to a typed attribute set.
///
/// The patch's keys overwrite the serialized form of `current` and the result
/// is deserialized again, so type errors leave `current` untouched.
pub(crate) fn merge_attributes<T>(current: &T, patch: &Value) -> Option<T>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(patch) = patch else {
        return None;
    };
    if patch.keys().any(|key| STRUCTURAL_KEYS.contains(&key.as_str())) {
        return None;
    }
    let Ok(Value::Object(mut merged)) = serde_json::to_value(current) else {
        return None;
    };
    for (key, value) in patch {
        let _ = merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn global_diff_omits_defaults() {
        let mut global = GlobalAttributes::default();
        assert_eq!(global.to_json_diff(), json!({}));
        global.splitter_size = 4.0;
        global.tabset_enable_close = true;
        assert_eq!(
            global.to_json_diff(),
            json!({ "splitterSize": 4.0, "tabSetEnableClose": true })
        );
    }

    #[test]
    fn global_loads_partial_object() {
        let global: GlobalAttributes =
            serde_json::from_value(json!({ "borderSize": 150.0 })).expect("partial global");
        assert_eq!(global.border_size, 150.0);
        assert_eq!(global.splitter_size, 8.0);
    }

    #[test]
    fn tab_attributes_skip_unset_fields() {
        let tab = TabAttributes::new("Files", "file-browser");
        assert_eq!(
            serde_json::to_value(&tab).expect("serialize"),
            json!({ "name": "Files", "component": "file-browser" })
        );
    }

    #[test]
    fn inherited_flags_fall_back_to_global() {
        let mut global = GlobalAttributes::default();
        let mut tab = TabAttributes::default();
        assert!(tab.enable_close(&global));
        global.tab_enable_close = false;
        assert!(!tab.enable_close(&global));
        tab.enable_close = Some(true);
        assert!(tab.enable_close(&global));
    }

    #[test]
    fn border_size_respects_bounds() {
        let global = GlobalAttributes::default();
        let attrs = BorderAttributes {
            size: Some(500.0),
            min_size: Some(50.0),
            max_size: Some(300.0),
            ..BorderAttributes::default()
        };
        assert_eq!(attrs.size(&global), 300.0);
        let inverted = BorderAttributes {
            min_size: Some(80.0),
            max_size: Some(40.0),
            ..BorderAttributes::default()
        };
        assert_eq!(inverted.max_size(&global), 80.0);
    }

    #[test]
    fn merge_rejects_structural_keys_and_type_errors() {
        let attrs = TabSetAttributes::default();
        assert!(merge_attributes(&attrs, &json!({ "id": "x" })).is_none());
        assert!(merge_attributes(&attrs, &json!({ "weight": "heavy" })).is_none());
        assert!(merge_attributes(&attrs, &json!([1, 2])).is_none());
        let merged =
            merge_attributes(&attrs, &json!({ "weight": 30.0, "enableMaximize": false }))
                .expect("valid patch");
        assert_eq!(merged.weight, 30.0);
        assert_eq!(merged.enable_maximize, Some(false));
    }
}
