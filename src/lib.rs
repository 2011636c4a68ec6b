//! chart-overlays: interactive chart overlay objects on a small layout toolkit.
//!
//! The crate computes geometry, hit-testing and draw commands for price-level
//! alerts, price notes and price-range measurements. Hosts own the render
//! loop, coordinate mapping and alert delivery; they plug in through the
//! `ChartCoordinates`, `AlertSink` and `Renderer` traits.
//!
//! Labels and legends are composed with the retained-mode `layout` toolkit
//! (`Flex`, `Text`, `Bar`) on a shared box model.

pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod layout;
pub mod objects;
pub mod render;
pub mod telemetry;
pub mod theme;

pub use error::{OverlayError, OverlayResult};
pub use objects::{ChartObject, ObjectRegistry};
