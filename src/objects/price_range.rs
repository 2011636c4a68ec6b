use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{LineSegment, Point, Rect, Shape, Unit, format_percent, format_price};
use crate::interaction::{LINE_HITBOX, NudgeDirection, NudgeThrottle, control_point_shape};
use crate::layout::{Bar, BoxSpec, Component, Edges, Flex, HorizontalAlign, Side, Text};
use crate::objects::{
    AlertSettings, AlertSink, AxisLabel, ChartCoordinates, ChartObject, ChartPoint,
    MarketSnapshot, PointList, ShapeList, Template, draw_handles,
};
use crate::render::{Color, Font, RectPrimitive, RenderFrame, Stroke};
use crate::theme::Theme;

const LABEL_GAP: f64 = 6.0;
const PROGRESS_WIDTH: f64 = 96.0;
const PROGRESS_HEIGHT: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeStyle {
    pub up: Color,
    pub down: Color,
    pub body_alpha: f64,
    pub border_width: f64,
    pub label_background: Color,
    pub label_text: Color,
    pub font: Font,
    /// Percentage shown as a full progress bar in the label.
    pub max_percent: f64,
}

impl Default for PriceRangeStyle {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            up: theme.positive,
            down: theme.negative,
            body_alpha: 0.18,
            border_width: 1.0,
            label_background: theme.background.with_alpha(0.9),
            label_text: theme.foreground,
            font: theme.label_font,
            max_percent: 5.0,
        }
    }
}

/// Frame-local geometry of a `PriceRange`.
#[derive(Debug)]
pub struct PriceRangeFrame {
    pub canvas: Rect,
    pub start: Point,
    pub end: Point,
    pub body: Rect,
    pub label_rect: Rect,
    pub label: Flex,
    pub tick_size: f64,
    pub body_visible: bool,
    pub label_visible: bool,
}

impl PriceRangeFrame {
    /// Midpoints of the left, top, right and bottom body edges.
    #[must_use]
    pub fn edge_handles(&self) -> [Point; 4] {
        let center = self.body.center();
        [
            Point::new(self.body.x, center.y),
            Point::new(center.x, self.body.y),
            Point::new(self.body.right(), center.y),
            Point::new(center.x, self.body.bottom()),
        ]
    }
}

/// Measures the move between two chart points: price delta, percent change
/// and bar count, drawn as a shaded box with a summary label.
#[derive(Debug)]
pub struct PriceRange {
    id: String,
    pub start: ChartPoint,
    pub end: ChartPoint,
    pub style: PriceRangeStyle,
    pub settings: AlertSettings,
    triggered: bool,
    throttle: NudgeThrottle,
    info: Option<PriceRangeFrame>,
}

impl PriceRange {
    #[must_use]
    pub fn new(id: impl Into<String>, start: ChartPoint, end: ChartPoint) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            style: PriceRangeStyle::default(),
            settings: AlertSettings {
                enabled: false,
                ..AlertSettings::default()
            },
            triggered: false,
            throttle: NudgeThrottle::default(),
            info: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: AlertSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn frame(&self) -> Option<&PriceRangeFrame> {
        self.info.as_ref()
    }

    #[must_use]
    pub fn delta(&self) -> f64 {
        self.end.price - self.start.price
    }

    /// Change relative to the start price; non-finite when it is zero.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.delta() / self.start.price * 100.0
    }

    #[must_use]
    pub fn bars(&self) -> f64 {
        (self.end.bar - self.start.bar).abs()
    }

    #[must_use]
    pub fn low(&self) -> f64 {
        self.start.price.min(self.end.price)
    }

    #[must_use]
    pub fn high(&self) -> f64 {
        self.start.price.max(self.end.price)
    }

    fn color(&self) -> Color {
        if self.delta() >= 0.0 {
            self.style.up
        } else {
            self.style.down
        }
    }

    fn build_label(&self, tick_size: f64) -> Flex {
        let color = self.color();
        let font = self.style.font.clone();
        let percent = self.percent();
        Flex::column()
            .with_gap(3.0)
            .with_horizontal_align(HorizontalAlign::Center)
            .with_box(
                BoxSpec::default()
                    .with_padding(Edges::symmetric(8.0, 5.0))
                    .with_background(self.style.label_background)
                    .with_corner_radius(3.0),
            )
            .with_child(
                Text::new(
                    format!(
                        "{} ({})",
                        format_price(self.delta(), tick_size),
                        format_percent(percent)
                    ),
                    font.clone().bold(),
                )
                .with_color(color),
            )
            .with_child(
                Text::new(format!("{} bars", self.bars()), font).with_color(self.style.label_text),
            )
            .with_child(
                Bar::new(percent.abs(), self.style.max_percent)
                    .with_fill(color)
                    .with_box(
                        BoxSpec::default()
                            .with_width(PROGRESS_WIDTH, Unit::Pixel)
                            .with_height(PROGRESS_HEIGHT, Unit::Pixel)
                            .with_max_width(PROGRESS_WIDTH, Unit::Pixel)
                            .with_background(color.with_alpha(0.25)),
                    )
                    .with_side(Side::Left),
            )
    }

    fn set_point(&mut self, index: usize, point: ChartPoint) {
        match index {
            0 => self.start = point,
            1 => self.end = point,
            _ => {}
        }
    }
}

impl ChartObject for PriceRange {
    fn id(&self) -> &str {
        &self.id
    }

    fn prepare(&mut self, chart: &dyn ChartCoordinates) {
        let canvas = chart.canvas();
        let tick_size = chart.tick_size();
        let start = self.start.to_screen(chart);
        let end = self.end.to_screen(chart);
        let body = Rect::from_corners(start, end);

        let label = self.build_label(tick_size);
        let width = label.outer_width(canvas.width);
        let height = label.outer_height(canvas.height);
        let x = body.center().x - width / 2.0;
        let below = body.bottom() + LABEL_GAP;
        let y = if below + height > canvas.bottom() {
            body.y - LABEL_GAP - height
        } else {
            below
        };
        let label_rect = Rect::new(x, y, width, height);

        let body_visible = body.intersects(canvas);
        let label_visible = label_rect.intersects(canvas);
        trace!(id = %self.id, body_visible, label_visible, "prepared price range");
        self.info = Some(PriceRangeFrame {
            canvas,
            start,
            end,
            body,
            label_rect,
            label,
            tick_size,
            body_visible,
            label_visible,
        });
    }

    fn is_prepared(&self) -> bool {
        self.info.is_some()
    }

    fn draw(&self, frame: &mut RenderFrame, labels: &mut Vec<AxisLabel>) {
        let Some(info) = &self.info else {
            return;
        };

        let color = self.color();
        if info.body_visible {
            frame.push_rect(RectPrimitive {
                x: info.body.x,
                y: info.body.y,
                width: info.body.width,
                height: info.body.height,
                fill: Some(color.with_alpha(self.style.body_alpha)),
                border: Some(Stroke::solid(color, self.style.border_width)),
                corner_radius: 0.0,
            });
            for point in [self.start, self.end] {
                labels.push(AxisLabel {
                    price: point.price,
                    text: format_price(point.price, info.tick_size),
                    background: color,
                    foreground: self.style.label_text,
                });
            }
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
    }

    fn shapes(&self) -> ShapeList {
        let mut shapes = ShapeList::new();
        if let Some(info) = &self.info {
            shapes.push(control_point_shape(info.start));
            shapes.push(control_point_shape(info.end));
            shapes.push(Shape::Rect(info.body));
            shapes.push(Shape::Rect(info.label_rect));
            // Thin ranges stay grabbable through their diagonal.
            shapes.push(Shape::Line(LineSegment::new(info.start, info.end, LINE_HITBOX)));
        }
        shapes
    }

    fn control_points(&self) -> PointList {
        let mut points = PointList::new();
        if let Some(info) = &self.info {
            points.push(info.start);
            points.push(info.end);
        }
        points
    }

    fn extra_points(&self) -> PointList {
        self.info
            .iter()
            .flat_map(|info| info.edge_handles())
            .collect()
    }

    fn is_object_on_chart(&self) -> bool {
        self.info
            .as_ref()
            .is_some_and(|info| info.body_visible || info.label_visible)
    }

    fn is_object_in_area(&self) -> bool {
        self.info
            .as_ref()
            .is_some_and(|info| info.canvas.contains(info.start) && info.canvas.contains(info.end))
    }

    fn move_control_point(&mut self, index: usize, x: f64, y: f64, chart: &dyn ChartCoordinates) {
        self.set_point(index, ChartPoint::from_screen(Point::new(x, y), chart));
    }

    /// Edge handles move one coordinate of whichever anchor owns that edge.
    fn move_extra_point(&mut self, index: usize, x: f64, y: f64, chart: &dyn ChartCoordinates) {
        let target = ChartPoint::from_screen(Point::new(x, y), chart);
        let start_is_left = self.start.bar <= self.end.bar;
        let start_is_top = self.start.price >= self.end.price;
        match index {
            0 | 2 => {
                let moves_start = (index == 0) == start_is_left;
                if moves_start {
                    self.start.bar = target.bar;
                } else {
                    self.end.bar = target.bar;
                }
            }
            1 | 3 => {
                let moves_start = (index == 1) == start_is_top;
                if moves_start {
                    self.start.price = target.price;
                } else {
                    self.end.price = target.price;
                }
            }
            _ => {}
        }
    }

    fn nudge_control_point(&mut self, index: usize, direction: NudgeDirection, now: Instant) -> bool {
        let Some(tick_size) = self.info.as_ref().map(|info| info.tick_size) else {
            return false;
        };
        if index > 1 || !self.throttle.try_acquire(now) {
            return false;
        }
        let point = match index {
            0 => self.start,
            _ => self.end,
        };
        self.set_point(index, point.nudged(direction.ticks(), tick_size));
        true
    }

    /// Fires when the market leaves the range.
    fn check_alert(&mut self, market: &MarketSnapshot, sink: &mut dyn AlertSink) -> bool {
        if !self.settings.enabled || (self.triggered && !self.settings.repeat) {
            return false;
        }
        let (low, high) = (self.low(), self.high());
        let was_inside = (low..=high).contains(&market.previous_price);
        let is_inside = (low..=high).contains(&market.last_price);
        if !was_inside || is_inside {
            return false;
        }
        if sink.is_throttled(&market.symbol, self.settings.throttle_ms, market.time) {
            debug!(id = %self.id, symbol = %market.symbol, "range alert throttled");
            return false;
        }

        let direction = if market.last_price > high { "above" } else { "below" };
        let message = if self.settings.message.is_empty() {
            format!(
                "{} left range {}-{} {} at {}",
                market.symbol,
                low,
                high,
                direction,
                market.time.format("%H:%M:%S")
            )
        } else {
            self.settings.message.clone()
        };
        sink.add_alert(&market.symbol, &self.settings, &message, market.time);
        self.triggered = true;
        debug!(id = %self.id, direction, "range alert fired");
        true
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.style.up = theme.positive;
        self.style.down = theme.negative;
        self.style.label_background = theme.background.with_alpha(0.9);
        self.style.label_text = theme.foreground;
        self.style.font = theme.label_font.clone();
    }

    fn draw_control_points(&self, frame: &mut RenderFrame) {
        draw_handles(
            frame,
            &self.control_points(),
            self.style.label_background,
            self.color(),
        );
    }
}

impl Template for PriceRange {
    fn copy_template(&mut self, other: &Self, style_only: bool) {
        self.style = other.style.clone();
        if !style_only {
            self.settings = other.settings.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::PriceRange;
    use crate::core::Rect;
    use crate::objects::{ChartObject, ChartPoint, ChartView};

    fn view() -> ChartView {
        ChartView::new(Rect::new(0.0, 0.0, 1000.0, 500.0), (0.0, 100.0), (0.0, 200.0), 0.01)
            .expect("view")
    }

    #[test]
    fn measures_delta_and_percent() {
        let range = PriceRange::new("r", ChartPoint::new(10.0, 100.0), ChartPoint::new(30.0, 105.0));
        assert_relative_eq!(range.delta(), 5.0);
        assert_relative_eq!(range.percent(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(range.bars(), 20.0);
    }

    #[test]
    fn label_flips_above_when_no_room_below() {
        let chart = view();
        let mut low = PriceRange::new("r", ChartPoint::new(10.0, 10.0), ChartPoint::new(30.0, 2.0));
        low.prepare(&chart);
        let info = low.frame().expect("prepared");
        assert!(info.label_rect.bottom() <= info.body.y);

        let mut high = PriceRange::new("r", ChartPoint::new(10.0, 150.0), ChartPoint::new(30.0, 140.0));
        high.prepare(&chart);
        let info = high.frame().expect("prepared");
        assert!(info.label_rect.y >= info.body.bottom());
    }

    #[test]
    fn edge_handle_moves_owning_anchor() {
        let chart = view();
        let mut range = PriceRange::new("r", ChartPoint::new(30.0, 100.0), ChartPoint::new(10.0, 120.0));
        range.prepare(&chart);

        // right edge belongs to the start anchor here
        range.move_extra_point(2, 500.0, 0.0, &chart);
        assert_eq!(range.start.bar, 50.0);
        assert_eq!(range.end.bar, 10.0);

        // top edge belongs to the end anchor (higher price)
        range.move_extra_point(1, 0.0, 150.0, &chart);
        assert_relative_eq!(range.end.price, 140.0);
        assert_relative_eq!(range.start.price, 100.0);
    }
}
