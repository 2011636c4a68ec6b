//! Chart overlay objects and the host contracts they run against.
//!
//! Every object follows the same per-frame lifecycle: the host calls
//! `prepare` once with the current coordinate mapping, then any number of
//! draw and hit-test calls read the snapshot `prepare` produced. Until the
//! first `prepare` all queries answer with neutral values and drawing is a
//! no-op.

mod alert;
mod anchor;
mod host;
mod price_note;
mod price_range;
mod registry;

use std::time::Instant;

use smallvec::SmallVec;

pub use alert::{Alert, AlertFrame, AlertStyle};
pub use anchor::ChartPoint;
pub use host::{
    AlertSettings, AlertSink, ChartCoordinates, ChartView, DeliveredAlert, MarketSnapshot,
    MemoryAlertSink,
};
pub use price_note::{PriceNote, PriceNoteFrame, PriceNoteStyle};
pub use price_range::{PriceRange, PriceRangeFrame, PriceRangeStyle};
pub use registry::ObjectRegistry;

use crate::core::{Point, Shape, nearest_hit_distance};
use crate::interaction::{CONTROL_POINT_RADIUS, NudgeDirection, find_control_point};
use crate::render::{Color, RectPrimitive, RenderFrame, Stroke, debug};
use crate::theme::Theme;

pub type ShapeList = SmallVec<[Shape; 8]>;
pub type PointList = SmallVec<[Point; 4]>;

/// Price-axis label requested by an object during `draw`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub price: f64,
    pub text: String,
    pub background: Color,
    pub foreground: Color,
}

/// Hooks a host calls on every overlay object.
pub trait ChartObject {
    fn id(&self) -> &str;

    /// Recomputes the frame snapshot. Must run before any other call in a
    /// frame.
    fn prepare(&mut self, chart: &dyn ChartCoordinates);

    /// Whether `prepare` has produced a snapshot yet.
    fn is_prepared(&self) -> bool;

    /// Pushes the object's primitives and price-axis labels.
    fn draw(&self, frame: &mut RenderFrame, labels: &mut Vec<AxisLabel>);

    /// Hit-testable regions of the current snapshot, empty before `prepare`.
    fn shapes(&self) -> ShapeList;

    /// Screen positions of draggable control points, empty before `prepare`.
    fn control_points(&self) -> PointList;

    /// Secondary handles (edges, labels), empty when the object has none.
    fn extra_points(&self) -> PointList {
        PointList::new()
    }

    /// Any part of the object intersects the visible canvas.
    fn is_object_on_chart(&self) -> bool;

    /// Every control point lies inside the visible canvas.
    fn is_object_in_area(&self) -> bool;

    fn move_control_point(&mut self, index: usize, x: f64, y: f64, chart: &dyn ChartCoordinates);

    fn move_extra_point(&mut self, _index: usize, _x: f64, _y: f64, _chart: &dyn ChartCoordinates) {
    }

    /// Shifts a control point's price by one tick, throttled by `now`.
    ///
    /// Returns whether the nudge was applied.
    fn nudge_control_point(&mut self, index: usize, direction: NudgeDirection, now: Instant)
    -> bool;

    /// Evaluates alert conditions against the latest market move.
    fn check_alert(&mut self, _market: &MarketSnapshot, _sink: &mut dyn AlertSink) -> bool {
        false
    }

    fn apply_theme(&mut self, theme: &Theme);

    fn in_object(&self, x: f64, y: f64) -> bool {
        self.min_dist(x, y).is_some()
    }

    fn control_point(&self, x: f64, y: f64) -> Option<usize> {
        find_control_point(&self.control_points(), Point::new(x, y))
    }

    fn extra_point(&self, x: f64, y: f64) -> Option<usize> {
        find_control_point(&self.extra_points(), Point::new(x, y))
    }

    /// Distance from the pointer to the closest hit region, `None` on a miss.
    fn min_dist(&self, x: f64, y: f64) -> Option<f64> {
        nearest_hit_distance(&self.shapes(), Point::new(x, y))
    }

    fn draw_control_points(&self, frame: &mut RenderFrame);

    /// Visualizes hit zones and handles for debugging pointer tolerances.
    fn draw_debug(&self, frame: &mut RenderFrame) {
        debug::hit_zones(frame, &self.shapes());
        for point in self.control_points().iter().chain(self.extra_points().iter()) {
            debug::cross(frame, *point, CONTROL_POINT_RADIUS, debug::BASE_COLOR);
        }
    }
}

/// Copies appearance, and optionally settings, from another object of the
/// same type. Positions are never copied.
pub trait Template {
    fn copy_template(&mut self, other: &Self, style_only: bool);
}

/// Square handles drawn for each control point.
pub(crate) fn draw_handles(frame: &mut RenderFrame, points: &[Point], fill: Color, border: Color) {
    for point in points {
        frame.push_rect(RectPrimitive {
            x: point.x - CONTROL_POINT_RADIUS,
            y: point.y - CONTROL_POINT_RADIUS,
            width: 2.0 * CONTROL_POINT_RADIUS,
            height: 2.0 * CONTROL_POINT_RADIUS,
            fill: Some(fill),
            border: Some(Stroke::solid(border, 1.0)),
            corner_radius: 0.0,
        });
    }
}
