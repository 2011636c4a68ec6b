//! Retained-mode layout toolkit: a box model shared by flex containers and
//! leaf components.
//!
//! Layout runs top-down, one pass per axis. A node's size depends only on its
//! own settings, its descendants and the space its parent offers.

mod bar;
mod box_model;
mod component;
mod flex;
mod text;

pub use bar::{Bar, Side};
pub use box_model::{Border, BoxSpec, Dimension, Edges};
pub use component::{BoxRects, Component, render_base};
pub use flex::{Direction, Flex, HorizontalAlign, VerticalAlign};
pub use text::{MonospaceMetrics, Text, TextExtent, TextMeasure};
