//! Debug overlays for layout boxes and hit zones.

use crate::core::{Point, Rect, Shape};
use crate::layout::Component;
use crate::render::{Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, Stroke};

pub const MARGIN_COLOR: Color = Color::rgba(0.96, 0.62, 0.04, 0.9);
pub const INNER_COLOR: Color = Color::rgba(0.93, 0.26, 0.21, 0.9);
pub const BASE_COLOR: Color = Color::rgba(0.13, 0.59, 0.95, 0.9);
pub const HIT_ZONE_COLOR: Color = Color::rgba(0.30, 0.69, 0.31, 0.35);

/// Outlines the outer, inner and base boxes of a component at `(x, y)`.
pub fn outline_component<C: Component + ?Sized>(
    frame: &mut RenderFrame,
    component: &C,
    x: f64,
    y: f64,
    parent_width: f64,
    parent_height: f64,
) {
    let boxes = component.layout_boxes(x, y, parent_width, parent_height);
    outline(frame, boxes.outer, MARGIN_COLOR);
    outline(frame, boxes.inner, INNER_COLOR);
    outline(frame, boxes.base, BASE_COLOR);
}

/// Fills the hit zone of every shape so pointer tolerances become visible.
pub fn hit_zones<'a>(frame: &mut RenderFrame, shapes: impl IntoIterator<Item = &'a Shape>) {
    for shape in shapes {
        match *shape {
            Shape::Line(line) => {
                frame.push_line(LinePrimitive::new(
                    line.start.x,
                    line.start.y,
                    line.end.x,
                    line.end.y,
                    Stroke::solid(HIT_ZONE_COLOR, (2.0 * line.hitbox).max(1.0)),
                ));
            }
            Shape::Rect(_) | Shape::Handle { .. } => {
                let bounds = shape.bounds();
                frame.push_rect(RectPrimitive::filled(
                    bounds.x,
                    bounds.y,
                    bounds.width,
                    bounds.height,
                    HIT_ZONE_COLOR,
                ));
            }
        }
    }
}

/// Small cross marking a single point.
pub fn cross(frame: &mut RenderFrame, point: Point, size: f64, color: Color) {
    let stroke = Stroke::solid(color, 1.0);
    frame.push_line(LinePrimitive::new(
        point.x - size,
        point.y,
        point.x + size,
        point.y,
        stroke,
    ));
    frame.push_line(LinePrimitive::new(
        point.x,
        point.y - size,
        point.x,
        point.y + size,
        stroke,
    ));
}

fn outline(frame: &mut RenderFrame, rect: Rect, color: Color) {
    frame.push_rect(RectPrimitive::outlined(
        rect.x,
        rect.y,
        rect.width.max(0.0),
        rect.height.max(0.0),
        Stroke::new(color, 1.0, LineStrokeStyle::Dotted),
    ));
}
