#![forbid(unsafe_code)]

//! Core primitives for the flexdock docking engine.
//!
//! `flexdock-core` holds the pieces every layer agrees on: screen geometry
//! ([`geometry::Rect`]), orientations, dock locations with their hit-test and
//! split helpers, and the logging shims used by `flexdock-layout`.

pub mod geometry;
pub mod logging;

pub use geometry::{DockLocation, Orientation, Rect};

#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
