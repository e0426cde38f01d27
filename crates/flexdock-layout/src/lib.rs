#![forbid(unsafe_code)]

//! Headless docking layout engine.
//!
//! A [`Model`] holds a tree of rows, tabsets and tabs for every window, plus
//! four edge borders around the main window. The host reads the model to
//! render, turns gestures into [`Action`]s and feeds them to
//! [`Model::dispatch`]. Every dispatch either applies completely (followed by
//! tidy, garbage collection of empty windows and a geometry re-solve) or
//! leaves the model untouched and reports why.
//!
//! ```
//! use flexdock_layout::{Action, DockLocation, Model, Rect};
//! use serde_json::json;
//!
//! let mut model = Model::new();
//! model.dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1200.0, 800.0)));
//! let tabset = model.tabsets_in_window("main")[0].clone();
//! let outcome = model.dispatch(Action::add_node(
//!     json!({ "id": "editor", "name": "Editor", "component": "text" }),
//!     tabset,
//!     DockLocation::Center,
//!     None,
//!     None,
//! ));
//! assert!(outcome.is_applied());
//! let saved = model.to_json();
//! let restored = Model::from_json(&saved).unwrap();
//! assert_eq!(restored.to_json(), saved);
//! ```

pub mod action;
pub mod attributes;
pub mod border;
pub mod dispatch;
pub mod drop;
pub mod id;
pub mod invariants;
pub mod json;
pub mod model;
pub mod node;
pub mod selection;
mod solve;
pub mod splitter;
mod tidy;
pub mod window;

pub use action::{Action, ActionKind};
pub use attributes::{
    BorderAttributes, DEFAULT_WEIGHT, GlobalAttributes, RowAttributes, TabAttributes,
    TabSetAttributes, TabSetMode,
};
pub use border::{BorderLocation, BorderSet, compute_nesting_order};
pub use dispatch::{DispatchOutcome, IgnoreReason};
pub use drop::DropInfo;
pub use id::{NodeId, WindowId};
pub use invariants::InvariantViolation;
pub use json::LayoutJsonError;
pub use model::{DropFilter, Model};
pub use node::{BorderNode, DockState, Node, NodeGeometry, NodeKind, NodeType, TabSetNode};
pub use splitter::SplitterBounds;
pub use window::{LayoutWindow, WindowKind};

pub use flexdock_core::{DockLocation, Orientation, Rect};
