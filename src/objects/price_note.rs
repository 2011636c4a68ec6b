use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{LineSegment, Point, Rect, Shape, format_price};
use crate::interaction::{LINE_HITBOX, NudgeDirection, NudgeThrottle, control_point_shape};
use crate::layout::{Border, BoxSpec, Component, Edges, Flex, Text};
use crate::objects::{
    AxisLabel, ChartCoordinates, ChartObject, ChartPoint, PointList, ShapeList, Template,
    draw_handles,
};
use crate::render::{Color, Font, LinePrimitive, RenderFrame, Stroke};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceNoteStyle {
    pub connector: Stroke,
    pub background: Color,
    pub border: Option<Border>,
    pub text: Color,
    pub font: Font,
    pub show_price: bool,
}

impl Default for PriceNoteStyle {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            connector: Stroke::solid(theme.foreground, 1.0),
            background: theme.background,
            border: Some(Border::solid(theme.foreground, 1.0)),
            text: theme.foreground,
            font: theme.label_font,
            show_price: true,
        }
    }
}

/// Frame-local geometry of a `PriceNote`.
#[derive(Debug)]
pub struct PriceNoteFrame {
    pub canvas: Rect,
    pub anchor: Point,
    pub label_rect: Rect,
    pub label: Flex,
    pub connector: LineSegment,
    pub tick_size: f64,
    pub anchor_visible: bool,
    pub label_visible: bool,
    pub connector_visible: bool,
}

/// Text note pinned to a bar and price, drawn in a box offset from its
/// anchor and joined to it by a connector line.
#[derive(Debug)]
pub struct PriceNote {
    id: String,
    pub anchor: ChartPoint,
    pub text: String,
    /// Pixel offset of the label's top-left corner from the anchor.
    pub label_offset: (f64, f64),
    pub style: PriceNoteStyle,
    throttle: NudgeThrottle,
    info: Option<PriceNoteFrame>,
}

impl PriceNote {
    #[must_use]
    pub fn new(id: impl Into<String>, anchor: ChartPoint, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            anchor,
            text: text.into(),
            label_offset: (16.0, -40.0),
            style: PriceNoteStyle::default(),
            throttle: NudgeThrottle::default(),
            info: None,
        }
    }

    #[must_use]
    pub fn with_label_offset(mut self, dx: f64, dy: f64) -> Self {
        self.label_offset = (dx, dy);
        self
    }

    #[must_use]
    pub fn frame(&self) -> Option<&PriceNoteFrame> {
        self.info.as_ref()
    }

    fn build_label(&self, tick_size: f64) -> Flex {
        let mut spec = BoxSpec::default()
            .with_padding(Edges::symmetric(6.0, 4.0))
            .with_background(self.style.background)
            .with_corner_radius(2.0);
        if let Some(border) = self.style.border {
            spec = spec.with_border(border);
        }

        let mut label = Flex::column().with_box(spec).with_gap(2.0);
        if self.style.show_price {
            label = label.with_child(
                Text::new(
                    format_price(self.anchor.price, tick_size),
                    self.style.font.clone().bold(),
                )
                .with_color(self.style.text),
            );
        }
        if !self.text.is_empty() {
            label = label.with_child(
                Text::new(self.text.clone(), self.style.font.clone()).with_color(self.style.text),
            );
        }
        label
    }
}

/// Closest point of `rect` to `point`.
fn nearest_point_on_rect(rect: Rect, point: Point) -> Point {
    Point::new(
        point.x.clamp(rect.x, rect.right().max(rect.x)),
        point.y.clamp(rect.y, rect.bottom().max(rect.y)),
    )
}

impl ChartObject for PriceNote {
    fn id(&self) -> &str {
        &self.id
    }

    fn prepare(&mut self, chart: &dyn ChartCoordinates) {
        let canvas = chart.canvas();
        let tick_size = chart.tick_size();
        let anchor = self.anchor.to_screen(chart);

        let label = self.build_label(tick_size);
        let label_rect = Rect::new(
            anchor.x + self.label_offset.0,
            anchor.y + self.label_offset.1,
            label.outer_width(canvas.width),
            label.outer_height(canvas.height),
        );
        let connector = LineSegment::new(
            anchor,
            nearest_point_on_rect(label_rect, anchor),
            LINE_HITBOX,
        );

        let anchor_visible = canvas.contains(anchor);
        let label_visible = label_rect.intersects(canvas);
        let connector_visible = connector.intersects(canvas);
        trace!(id = %self.id, anchor_visible, label_visible, "prepared price note");
        self.info = Some(PriceNoteFrame {
            canvas,
            anchor,
            label_rect,
            label,
            connector,
            tick_size,
            anchor_visible,
            label_visible,
            connector_visible,
        });
    }

    fn is_prepared(&self) -> bool {
        self.info.is_some()
    }

    fn draw(&self, frame: &mut RenderFrame, labels: &mut Vec<AxisLabel>) {
        let Some(info) = &self.info else {
            return;
        };

        if info.connector_visible {
            frame.push_line(LinePrimitive::new(
                info.connector.start.x,
                info.connector.start.y,
                info.connector.end.x,
                info.connector.end.y,
                self.style.connector,
            ));
        }
        if info.label_visible {
            info.label.render(
                frame,
                info.label_rect.x,
                info.label_rect.y,
                info.canvas.width,
                info.canvas.height,
            );
        }
        if info.anchor_visible {
            labels.push(AxisLabel {
                price: self.anchor.price,
                text: format_price(self.anchor.price, info.tick_size),
                background: self.style.background,
                foreground: self.style.text,
            });
        }
    }

    fn shapes(&self) -> ShapeList {
        let mut shapes = ShapeList::new();
        if let Some(info) = &self.info {
            shapes.push(Shape::Rect(info.label_rect));
            shapes.push(Shape::Line(info.connector));
            shapes.push(control_point_shape(info.anchor));
        }
        shapes
    }

    /// Anchor first, then the label's top-left corner.
    fn control_points(&self) -> PointList {
        let mut points = PointList::new();
        if let Some(info) = &self.info {
            points.push(info.anchor);
            points.push(Point::new(info.label_rect.x, info.label_rect.y));
        }
        points
    }

    fn is_object_on_chart(&self) -> bool {
        self.info.as_ref().is_some_and(|info| {
            info.anchor_visible || info.label_visible || info.connector_visible
        })
    }

    fn is_object_in_area(&self) -> bool {
        self.info.as_ref().is_some_and(|info| {
            info.anchor_visible
                && info
                    .canvas
                    .contains(Point::new(info.label_rect.x, info.label_rect.y))
        })
    }

    fn move_control_point(&mut self, index: usize, x: f64, y: f64, chart: &dyn ChartCoordinates) {
        match index {
            0 => self.anchor = ChartPoint::from_screen(Point::new(x, y), chart),
            1 => {
                let anchor = self.anchor.to_screen(chart);
                self.label_offset = (x - anchor.x, y - anchor.y);
            }
            _ => {}
        }
    }

    fn nudge_control_point(&mut self, index: usize, direction: NudgeDirection, now: Instant) -> bool {
        let Some(tick_size) = self.info.as_ref().map(|info| info.tick_size) else {
            return false;
        };
        if index != 0 || !self.throttle.try_acquire(now) {
            return false;
        }
        self.anchor = self.anchor.nudged(direction.ticks(), tick_size);
        true
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.style.connector.color = theme.foreground;
        self.style.background = theme.background;
        if let Some(border) = self.style.border.as_mut() {
            border.color = theme.foreground;
        }
        self.style.text = theme.foreground;
        self.style.font = theme.label_font.clone();
    }

    fn draw_control_points(&self, frame: &mut RenderFrame) {
        draw_handles(
            frame,
            &self.control_points(),
            self.style.background,
            self.style.connector.color,
        );
    }
}

impl Template for PriceNote {
    fn copy_template(&mut self, other: &Self, style_only: bool) {
        self.style = other.style.clone();
        if !style_only {
            self.text = other.text.clone();
            self.label_offset = other.label_offset;
        }
    }
}
