use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{LineSegment, Point, Rect, Shape, format_price};
use crate::interaction::{LINE_HITBOX, NudgeDirection, NudgeThrottle, control_point_shape};
use crate::layout::{BoxSpec, Component, Edges, Flex, Text};
use crate::objects::{
    AlertSettings, AlertSink, AxisLabel, ChartCoordinates, ChartObject, ChartPoint,
    MarketSnapshot, PointList, ShapeList, Template, draw_handles,
};
use crate::render::{Color, Font, LinePrimitive, LineStrokeStyle, RenderFrame, Stroke};
use crate::theme::Theme;

const LABEL_EDGE_GAP: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertStyle {
    pub line: Stroke,
    pub triggered_line: Stroke,
    pub label_background: Color,
    pub label_text: Color,
    pub label_font: Font,
}

impl Default for AlertStyle {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            line: Stroke::new(theme.accent, 1.0, LineStrokeStyle::Dashed),
            triggered_line: Stroke::new(theme.foreground.with_alpha(0.5), 1.0, LineStrokeStyle::Dotted),
            label_background: theme.accent,
            label_text: theme.background,
            label_font: theme.label_font,
        }
    }
}

/// Frame-local geometry of an `Alert`.
#[derive(Debug)]
pub struct AlertFrame {
    pub canvas: Rect,
    pub line: LineSegment,
    pub anchor: Point,
    pub label_rect: Rect,
    pub label: Flex,
    pub tick_size: f64,
    pub line_visible: bool,
    pub label_visible: bool,
}

/// Horizontal price level that fires a host alert when the market crosses it.
#[derive(Debug)]
pub struct Alert {
    id: String,
    pub price: f64,
    pub settings: AlertSettings,
    pub style: AlertStyle,
    triggered: bool,
    throttle: NudgeThrottle,
    info: Option<AlertFrame>,
}

impl Alert {
    #[must_use]
    pub fn new(id: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            price,
            settings: AlertSettings::default(),
            style: AlertStyle::default(),
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
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Arms the alert again after it fired.
    pub fn rearm(&mut self) {
        self.triggered = false;
    }

    #[must_use]
    pub fn frame(&self) -> Option<&AlertFrame> {
        self.info.as_ref()
    }

    fn current_line_stroke(&self) -> Stroke {
        if self.triggered {
            self.style.triggered_line
        } else {
            self.style.line
        }
    }

    fn build_label(&self, text: String) -> Flex {
        Flex::row()
            .with_box(
                BoxSpec::default()
                    .with_padding(Edges::symmetric(6.0, 2.0))
                    .with_background(self.style.label_background)
                    .with_corner_radius(3.0),
            )
            .with_child(Text::new(text, self.style.label_font.clone()).with_color(self.style.label_text))
    }

    fn set_price(&mut self, price: f64) {
        self.price = price;
        if self.settings.repeat {
            self.triggered = false;
        }
    }
}

impl ChartObject for Alert {
    fn id(&self) -> &str {
        &self.id
    }

    fn prepare(&mut self, chart: &dyn ChartCoordinates) {
        let canvas = chart.canvas();
        let tick_size = chart.tick_size();
        let y = chart.y_for_price(self.price);
        let line = LineSegment::new(
            Point::new(canvas.x, y),
            Point::new(canvas.right(), y),
            LINE_HITBOX,
        );

        let label = self.build_label(format_price(self.price, tick_size));
        let width = label.outer_width(canvas.width);
        let height = label.outer_height(canvas.height);
        let label_rect = Rect::new(
            canvas.right() - width - LABEL_EDGE_GAP,
            y - height / 2.0,
            width,
            height,
        );

        let line_visible = line.intersects(canvas);
        let label_visible = label_rect.intersects(canvas);
        trace!(id = %self.id, y, line_visible, label_visible, "prepared alert");
        self.info = Some(AlertFrame {
            canvas,
            line,
            anchor: Point::new(canvas.center().x, y),
            label_rect,
            label,
            tick_size,
            line_visible,
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

        if info.line_visible {
            frame.push_line(LinePrimitive::new(
                info.line.start.x,
                info.line.start.y,
                info.line.end.x,
                info.line.end.y,
                self.current_line_stroke(),
            ));
            labels.push(AxisLabel {
                price: self.price,
                text: format_price(self.price, info.tick_size),
                background: self.style.label_background,
                foreground: self.style.label_text,
            });
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
            shapes.push(Shape::Line(info.line));
            shapes.push(Shape::Rect(info.label_rect));
            shapes.push(control_point_shape(info.anchor));
        }
        shapes
    }

    fn control_points(&self) -> PointList {
        self.info.iter().map(|info| info.anchor).collect()
    }

    /// The price label drags the whole level.
    fn extra_points(&self) -> PointList {
        self.info.iter().map(|info| info.label_rect.center()).collect()
    }

    fn extra_point(&self, x: f64, y: f64) -> Option<usize> {
        let info = self.info.as_ref()?;
        info.label_rect.contains(Point::new(x, y)).then_some(0)
    }

    fn is_object_on_chart(&self) -> bool {
        self.info
            .as_ref()
            .is_some_and(|info| info.line_visible || info.label_visible)
    }

    fn is_object_in_area(&self) -> bool {
        self.info
            .as_ref()
            .is_some_and(|info| info.canvas.contains(info.anchor))
    }

    fn move_control_point(&mut self, index: usize, x: f64, y: f64, chart: &dyn ChartCoordinates) {
        if index != 0 {
            return;
        }
        let point = ChartPoint::from_screen(Point::new(x, y), chart);
        self.set_price(point.price);
    }

    fn move_extra_point(&mut self, index: usize, x: f64, y: f64, chart: &dyn ChartCoordinates) {
        self.move_control_point(index, x, y, chart);
    }

    fn nudge_control_point(&mut self, index: usize, direction: NudgeDirection, now: Instant) -> bool {
        let Some(tick_size) = self.info.as_ref().map(|info| info.tick_size) else {
            return false;
        };
        if index != 0 || !self.throttle.try_acquire(now) {
            return false;
        }
        let point = ChartPoint::new(0.0, self.price).nudged(direction.ticks(), tick_size);
        self.set_price(point.price);
        true
    }

    fn check_alert(&mut self, market: &MarketSnapshot, sink: &mut dyn AlertSink) -> bool {
        if !self.settings.enabled || (self.triggered && !self.settings.repeat) {
            return false;
        }
        if !market.crossed(self.price) {
            return false;
        }
        if sink.is_throttled(&market.symbol, self.settings.throttle_ms, market.time) {
            debug!(id = %self.id, symbol = %market.symbol, "alert throttled");
            return false;
        }

        let message = if self.settings.message.is_empty() {
            format!(
                "{} crossed {} at {}",
                market.symbol,
                self.price,
                market.time.format("%H:%M:%S")
            )
        } else {
            self.settings.message.clone()
        };
        sink.add_alert(&market.symbol, &self.settings, &message, market.time);
        self.triggered = true;
        debug!(id = %self.id, price = self.price, "alert fired");
        true
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.style.line.color = theme.accent;
        self.style.triggered_line.color = theme.foreground.with_alpha(0.5);
        self.style.label_background = theme.accent;
        self.style.label_text = theme.background;
        self.style.label_font = theme.label_font.clone();
    }

    fn draw_control_points(&self, frame: &mut RenderFrame) {
        draw_handles(
            frame,
            &self.control_points(),
            self.style.label_text,
            self.style.line.color,
        );
    }
}

impl Template for Alert {
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
    use chrono::{TimeZone, Utc};

    use super::Alert;
    use crate::core::{Rect, Viewport};
    use crate::objects::{ChartObject, ChartView, MarketSnapshot, MemoryAlertSink};
    use crate::render::RenderFrame;

    fn view() -> ChartView {
        ChartView::new(Rect::new(0.0, 0.0, 800.0, 400.0), (0.0, 100.0), (90.0, 110.0), 0.25)
            .expect("view")
    }

    #[test]
    fn label_sits_at_the_right_edge_on_the_line() {
        let mut alert = Alert::new("a", 100.0);
        alert.prepare(&view());
        let info = alert.frame().expect("prepared");
        assert_relative_eq!(info.line.start.y, 200.0);
        assert!(info.label_rect.right() <= 800.0);
        assert_relative_eq!(info.label_rect.center().y, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn off_canvas_level_draws_nothing() {
        let mut alert = Alert::new("a", 150.0);
        alert.prepare(&view());
        let mut frame = RenderFrame::new(Viewport::new(800, 400));
        let mut labels = Vec::new();
        alert.draw(&mut frame, &mut labels);
        assert!(frame.is_empty());
        assert!(labels.is_empty());
        assert!(!alert.is_object_on_chart());
    }

    #[test]
    fn fires_once_without_repeat() {
        let mut alert = Alert::new("a", 100.0);
        let mut sink = MemoryAlertSink::default();
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        assert!(alert.check_alert(&MarketSnapshot::new("ES", 99.0, 100.5, time), &mut sink));
        let later = time + chrono::Duration::seconds(10);
        assert!(!alert.check_alert(&MarketSnapshot::new("ES", 100.5, 99.0, later), &mut sink));
        assert_eq!(sink.delivered().len(), 1);
        assert!(sink.delivered()[0].message.contains("ES crossed 100"));
    }
}
