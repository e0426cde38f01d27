//! Top-level layout windows.

use flexdock_core::Rect;
use serde::{Deserialize, Serialize};

use crate::id::{NodeId, WindowId};

/// How a window is presented by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// The application window; owns the borders.
    Main,
    /// A separate OS window.
    Popout,
    /// A floating panel inside the application window.
    Float,
}

/// A window with its own root row.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutWindow {
    pub(crate) id: WindowId,
    pub(crate) kind: WindowKind,
    pub(crate) rect: Rect,
    pub(crate) root: NodeId,
    pub(crate) active_tabset: Option<NodeId>,
    pub(crate) maximized_tabset: Option<NodeId>,
}

impl LayoutWindow {
    pub(crate) fn new(id: WindowId, kind: WindowKind, rect: Rect, root: NodeId) -> Self {
        Self {
            id,
            kind,
            rect,
            root,
            active_tabset: None,
            maximized_tabset: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &WindowId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Screen rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Root row id.
    #[must_use]
    pub fn root(&self) -> &NodeId {
        &self.root
    }

    #[must_use]
    pub fn active_tabset(&self) -> Option<&NodeId> {
        self.active_tabset.as_ref()
    }

    #[must_use]
    pub fn maximized_tabset(&self) -> Option<&NodeId> {
        self.maximized_tabset.as_ref()
    }
}
