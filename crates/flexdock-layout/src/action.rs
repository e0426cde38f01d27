//! The closed set of model mutations.
//!
//! Actions serialize as `{ "type": "MOVE_NODE", "data": { ... } }` so hosts
//! can log, replay or ship them across a process boundary.

use std::fmt;

use flexdock_core::{DockLocation, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attributes::TabSetMode;
use crate::id::{NodeId, WindowId};
use crate::node::DockState;
use crate::window::WindowKind;

/// A discrete request to change the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// Create a tab from `json` and drop it on `to_node`.
    AddNode {
        json: Value,
        to_node: NodeId,
        location: DockLocation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select: Option<bool>,
    },
    /// Drop an existing tab or tabset on `to_node`.
    MoveNode {
        from_node: NodeId,
        to_node: NodeId,
        location: DockLocation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select: Option<bool>,
    },
    DeleteTab {
        node: NodeId,
    },
    /// Remove a tabset together with its tabs.
    DeleteTabset {
        node: NodeId,
    },
    /// Bring a tab from a floating or popped-out window back into the main window.
    DockTab {
        node: NodeId,
    },
    DockTabset {
        node: NodeId,
    },
    FloatTab {
        node: NodeId,
        rect: Rect,
    },
    FloatTabset {
        node: NodeId,
        rect: Rect,
    },
    PopoutTab {
        node: NodeId,
        rect: Rect,
    },
    PopoutTabset {
        node: NodeId,
        rect: Rect,
    },
    RenameTab {
        node: NodeId,
        name: String,
    },
    SelectTab {
        node: NodeId,
    },
    SetActiveTabset {
        window: WindowId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tabset: Option<NodeId>,
    },
    /// Replace a border's tiled tab set.
    SetVisibleTabs {
        node: NodeId,
        indices: Vec<usize>,
    },
    AdjustWeights {
        node: NodeId,
        weights: Vec<f64>,
    },
    /// Resize a border from a splitter position.
    AdjustBorderSplit {
        node: NodeId,
        position: f64,
    },
    MaximizeToggle {
        node: NodeId,
    },
    /// Open a new floating or popped-out window holding `layout` (row JSON).
    CreateWindow {
        layout: Value,
        rect: Rect,
        kind: WindowKind,
    },
    CloseWindow {
        window: WindowId,
    },
    MoveWindow {
        window: WindowId,
        rect: Rect,
    },
    UpdateModelAttributes {
        json: Value,
    },
    UpdateNodeAttributes {
        node: NodeId,
        json: Value,
    },
    SetTabIcon {
        node: NodeId,
        #[serde(default)]
        icon: Option<String>,
    },
    SetTabComponent {
        node: NodeId,
        component: String,
    },
    SetTabConfig {
        node: NodeId,
        #[serde(default)]
        config: Option<Value>,
    },
    SetTabEnableClose {
        node: NodeId,
        #[serde(default)]
        enable_close: Option<bool>,
    },
    SetDockState {
        node: NodeId,
        state: DockState,
    },
    PinTab {
        node: NodeId,
        pinned: bool,
    },
    PinBorder {
        node: NodeId,
        pinned: bool,
    },
    OpenFlyout {
        node: NodeId,
        tab: NodeId,
    },
    CloseFlyout {
        node: NodeId,
    },
    SetFlyoutSize {
        node: NodeId,
        size: f64,
    },
    SetTabsetMode {
        node: NodeId,
        mode: TabSetMode,
    },
    /// Reserved; history is left to the host.
    Undo,
    /// Reserved; history is left to the host.
    Redo,
}

impl Action {
    #[must_use]
    pub fn add_node(
        json: Value,
        to_node: impl Into<NodeId>,
        location: DockLocation,
        index: Option<usize>,
        select: Option<bool>,
    ) -> Self {
        Self::AddNode {
            json,
            to_node: to_node.into(),
            location,
            index,
            select,
        }
    }

    #[must_use]
    pub fn move_node(
        from_node: impl Into<NodeId>,
        to_node: impl Into<NodeId>,
        location: DockLocation,
        index: Option<usize>,
        select: Option<bool>,
    ) -> Self {
        Self::MoveNode {
            from_node: from_node.into(),
            to_node: to_node.into(),
            location,
            index,
            select,
        }
    }

    #[must_use]
    pub fn delete_tab(node: impl Into<NodeId>) -> Self {
        Self::DeleteTab { node: node.into() }
    }

    #[must_use]
    pub fn delete_tabset(node: impl Into<NodeId>) -> Self {
        Self::DeleteTabset { node: node.into() }
    }

    #[must_use]
    pub fn dock_tab(node: impl Into<NodeId>) -> Self {
        Self::DockTab { node: node.into() }
    }

    #[must_use]
    pub fn dock_tabset(node: impl Into<NodeId>) -> Self {
        Self::DockTabset { node: node.into() }
    }

    #[must_use]
    pub fn float_tab(node: impl Into<NodeId>, rect: Rect) -> Self {
        Self::FloatTab {
            node: node.into(),
            rect,
        }
    }

    #[must_use]
    pub fn float_tabset(node: impl Into<NodeId>, rect: Rect) -> Self {
        Self::FloatTabset {
            node: node.into(),
            rect,
        }
    }

    #[must_use]
    pub fn popout_tab(node: impl Into<NodeId>, rect: Rect) -> Self {
        Self::PopoutTab {
            node: node.into(),
            rect,
        }
    }

    #[must_use]
    pub fn popout_tabset(node: impl Into<NodeId>, rect: Rect) -> Self {
        Self::PopoutTabset {
            node: node.into(),
            rect,
        }
    }

    #[must_use]
    pub fn rename_tab(node: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::RenameTab {
            node: node.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn select_tab(node: impl Into<NodeId>) -> Self {
        Self::SelectTab { node: node.into() }
    }

    #[must_use]
    pub fn set_active_tabset(window: impl Into<WindowId>, tabset: Option<NodeId>) -> Self {
        Self::SetActiveTabset {
            window: window.into(),
            tabset,
        }
    }

    #[must_use]
    pub fn set_visible_tabs(node: impl Into<NodeId>, indices: Vec<usize>) -> Self {
        Self::SetVisibleTabs {
            node: node.into(),
            indices,
        }
    }

    #[must_use]
    pub fn adjust_weights(node: impl Into<NodeId>, weights: Vec<f64>) -> Self {
        Self::AdjustWeights {
            node: node.into(),
            weights,
        }
    }

    #[must_use]
    pub fn adjust_border_split(node: impl Into<NodeId>, position: f64) -> Self {
        Self::AdjustBorderSplit {
            node: node.into(),
            position,
        }
    }

    #[must_use]
    pub fn maximize_toggle(node: impl Into<NodeId>) -> Self {
        Self::MaximizeToggle { node: node.into() }
    }

    #[must_use]
    pub fn create_window(layout: Value, rect: Rect, kind: WindowKind) -> Self {
        Self::CreateWindow { layout, rect, kind }
    }

    #[must_use]
    pub fn close_window(window: impl Into<WindowId>) -> Self {
        Self::CloseWindow {
            window: window.into(),
        }
    }

    #[must_use]
    pub fn move_window(window: impl Into<WindowId>, rect: Rect) -> Self {
        Self::MoveWindow {
            window: window.into(),
            rect,
        }
    }

    #[must_use]
    pub fn update_model_attributes(json: Value) -> Self {
        Self::UpdateModelAttributes { json }
    }

    #[must_use]
    pub fn update_node_attributes(node: impl Into<NodeId>, json: Value) -> Self {
        Self::UpdateNodeAttributes {
            node: node.into(),
            json,
        }
    }

    #[must_use]
    pub fn set_tab_icon(node: impl Into<NodeId>, icon: Option<String>) -> Self {
        Self::SetTabIcon {
            node: node.into(),
            icon,
        }
    }

    #[must_use]
    pub fn set_tab_component(node: impl Into<NodeId>, component: impl Into<String>) -> Self {
        Self::SetTabComponent {
            node: node.into(),
            component: component.into(),
        }
    }

    #[must_use]
    pub fn set_tab_config(node: impl Into<NodeId>, config: Option<Value>) -> Self {
        Self::SetTabConfig {
            node: node.into(),
            config,
        }
    }

    #[must_use]
    pub fn set_tab_enable_close(node: impl Into<NodeId>, enable_close: Option<bool>) -> Self {
        Self::SetTabEnableClose {
            node: node.into(),
            enable_close,
        }
    }

    #[must_use]
    pub fn set_dock_state(node: impl Into<NodeId>, state: DockState) -> Self {
        Self::SetDockState {
            node: node.into(),
            state,
        }
    }

    #[must_use]
    pub fn pin_tab(node: impl Into<NodeId>, pinned: bool) -> Self {
        Self::PinTab {
            node: node.into(),
            pinned,
        }
    }

    #[must_use]
    pub fn pin_border(node: impl Into<NodeId>, pinned: bool) -> Self {
        Self::PinBorder {
            node: node.into(),
            pinned,
        }
    }

    #[must_use]
    pub fn open_flyout(node: impl Into<NodeId>, tab: impl Into<NodeId>) -> Self {
        Self::OpenFlyout {
            node: node.into(),
            tab: tab.into(),
        }
    }

    #[must_use]
    pub fn close_flyout(node: impl Into<NodeId>) -> Self {
        Self::CloseFlyout { node: node.into() }
    }

    #[must_use]
    pub fn set_flyout_size(node: impl Into<NodeId>, size: f64) -> Self {
        Self::SetFlyoutSize {
            node: node.into(),
            size,
        }
    }

    #[must_use]
    pub fn set_tabset_mode(node: impl Into<NodeId>, mode: TabSetMode) -> Self {
        Self::SetTabsetMode {
            node: node.into(),
            mode,
        }
    }

    #[must_use]
    pub const fn undo() -> Self {
        Self::Undo
    }

    #[must_use]
    pub const fn redo() -> Self {
        Self::Redo
    }

    /// Action family.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::AddNode { .. } => ActionKind::AddNode,
            Self::MoveNode { .. } => ActionKind::MoveNode,
            Self::DeleteTab { .. } => ActionKind::DeleteTab,
            Self::DeleteTabset { .. } => ActionKind::DeleteTabset,
            Self::DockTab { .. } => ActionKind::DockTab,
            Self::DockTabset { .. } => ActionKind::DockTabset,
            Self::FloatTab { .. } => ActionKind::FloatTab,
            Self::FloatTabset { .. } => ActionKind::FloatTabset,
            Self::PopoutTab { .. } => ActionKind::PopoutTab,
            Self::PopoutTabset { .. } => ActionKind::PopoutTabset,
            Self::RenameTab { .. } => ActionKind::RenameTab,
            Self::SelectTab { .. } => ActionKind::SelectTab,
            Self::SetActiveTabset { .. } => ActionKind::SetActiveTabset,
            Self::SetVisibleTabs { .. } => ActionKind::SetVisibleTabs,
            Self::AdjustWeights { .. } => ActionKind::AdjustWeights,
            Self::AdjustBorderSplit { .. } => ActionKind::AdjustBorderSplit,
            Self::MaximizeToggle { .. } => ActionKind::MaximizeToggle,
            Self::CreateWindow { .. } => ActionKind::CreateWindow,
            Self::CloseWindow { .. } => ActionKind::CloseWindow,
            Self::MoveWindow { .. } => ActionKind::MoveWindow,
            Self::UpdateModelAttributes { .. } => ActionKind::UpdateModelAttributes,
            Self::UpdateNodeAttributes { .. } => ActionKind::UpdateNodeAttributes,
            Self::SetTabIcon { .. } => ActionKind::SetTabIcon,
            Self::SetTabComponent { .. } => ActionKind::SetTabComponent,
            Self::SetTabConfig { .. } => ActionKind::SetTabConfig,
            Self::SetTabEnableClose { .. } => ActionKind::SetTabEnableClose,
            Self::SetDockState { .. } => ActionKind::SetDockState,
            Self::PinTab { .. } => ActionKind::PinTab,
            Self::PinBorder { .. } => ActionKind::PinBorder,
            Self::OpenFlyout { .. } => ActionKind::OpenFlyout,
            Self::CloseFlyout { .. } => ActionKind::CloseFlyout,
            Self::SetFlyoutSize { .. } => ActionKind::SetFlyoutSize,
            Self::SetTabsetMode { .. } => ActionKind::SetTabsetMode,
            Self::Undo => ActionKind::Undo,
            Self::Redo => ActionKind::Redo,
        }
    }
}

/// Stable action discriminator used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    AddNode,
    MoveNode,
    DeleteTab,
    DeleteTabset,
    DockTab,
    DockTabset,
    FloatTab,
    FloatTabset,
    PopoutTab,
    PopoutTabset,
    RenameTab,
    SelectTab,
    SetActiveTabset,
    SetVisibleTabs,
    AdjustWeights,
    AdjustBorderSplit,
    MaximizeToggle,
    CreateWindow,
    CloseWindow,
    MoveWindow,
    UpdateModelAttributes,
    UpdateNodeAttributes,
    SetTabIcon,
    SetTabComponent,
    SetTabConfig,
    SetTabEnableClose,
    SetDockState,
    PinTab,
    PinBorder,
    OpenFlyout,
    CloseFlyout,
    SetFlyoutSize,
    SetTabsetMode,
    Undo,
    Redo,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddNode => "ADD_NODE",
            Self::MoveNode => "MOVE_NODE",
            Self::DeleteTab => "DELETE_TAB",
            Self::DeleteTabset => "DELETE_TABSET",
            Self::DockTab => "DOCK_TAB",
            Self::DockTabset => "DOCK_TABSET",
            Self::FloatTab => "FLOAT_TAB",
            Self::FloatTabset => "FLOAT_TABSET",
            Self::PopoutTab => "POPOUT_TAB",
            Self::PopoutTabset => "POPOUT_TABSET",
            Self::RenameTab => "RENAME_TAB",
            Self::SelectTab => "SELECT_TAB",
            Self::SetActiveTabset => "SET_ACTIVE_TABSET",
            Self::SetVisibleTabs => "SET_VISIBLE_TABS",
            Self::AdjustWeights => "ADJUST_WEIGHTS",
            Self::AdjustBorderSplit => "ADJUST_BORDER_SPLIT",
            Self::MaximizeToggle => "MAXIMIZE_TOGGLE",
            Self::CreateWindow => "CREATE_WINDOW",
            Self::CloseWindow => "CLOSE_WINDOW",
            Self::MoveWindow => "MOVE_WINDOW",
            Self::UpdateModelAttributes => "UPDATE_MODEL_ATTRIBUTES",
            Self::UpdateNodeAttributes => "UPDATE_NODE_ATTRIBUTES",
            Self::SetTabIcon => "SET_TAB_ICON",
            Self::SetTabComponent => "SET_TAB_COMPONENT",
            Self::SetTabConfig => "SET_TAB_CONFIG",
            Self::SetTabEnableClose => "SET_TAB_ENABLE_CLOSE",
            Self::SetDockState => "SET_DOCK_STATE",
            Self::PinTab => "PIN_TAB",
            Self::PinBorder => "PIN_BORDER",
            Self::OpenFlyout => "OPEN_FLYOUT",
            Self::CloseFlyout => "CLOSE_FLYOUT",
            Self::SetFlyoutSize => "SET_FLYOUT_SIZE",
            Self::SetTabsetMode => "SET_TABSET_MODE",
            Self::Undo => "UNDO",
            Self::Redo => "REDO",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
