use serde::{Deserialize, Serialize};

use crate::core::Rect;
use crate::layout::{Border, BoxSpec, Component, render_base};
use crate::render::{Color, RectPrimitive, RenderFrame};

/// Edge the proportional fill grows from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Left,
    Top,
    Right,
    Bottom,
}

/// Progress-style leaf: a box with a proportional fill inside its content.
///
/// `complete / total` is not bounded or guarded; ratios outside `[0, 1]`
/// overflow the box and a zero total yields non-finite geometry, which the
/// frame drops.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    spec: BoxSpec,
    pub complete: f64,
    pub total: f64,
    pub side: Side,
    pub fill: Option<Color>,
    pub fill_border: Option<Border>,
    pub fill_corner_radius: f64,
}

impl Default for Bar {
    fn default() -> Self {
        Self {
            spec: BoxSpec::default(),
            complete: 0.0,
            total: 100.0,
            side: Side::Left,
            fill: None,
            fill_border: None,
            fill_corner_radius: 0.0,
        }
    }
}

impl Bar {
    #[must_use]
    pub fn new(complete: f64, total: f64) -> Self {
        Self {
            complete,
            total,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_box(mut self, spec: BoxSpec) -> Self {
        self.spec = spec;
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    #[must_use]
    pub fn with_fill_border(mut self, border: Border) -> Self {
        self.fill_border = Some(border);
        self
    }

    #[must_use]
    pub fn with_fill_corner_radius(mut self, radius: f64) -> Self {
        self.fill_corner_radius = radius;
        self
    }

    pub fn box_spec_mut(&mut self) -> &mut BoxSpec {
        &mut self.spec
    }

    pub fn set_progress(&mut self, complete: f64, total: f64) {
        self.complete = complete;
        self.total = total;
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.complete / self.total
    }

    /// Portion of `content` covered by the fill, anchored at `side`.
    #[must_use]
    pub fn fill_rect(&self, content: Rect) -> Rect {
        let ratio = self.ratio();
        let mut rect = content;
        match self.side {
            Side::Left => rect.width *= ratio,
            Side::Right => {
                rect.x += rect.width * (1.0 - ratio);
                rect.width *= ratio;
            }
            Side::Top => rect.height *= ratio,
            Side::Bottom => {
                rect.y += rect.height * (1.0 - ratio);
                rect.height *= ratio;
            }
        }
        rect
    }
}

impl Component for Bar {
    fn box_spec(&self) -> &BoxSpec {
        &self.spec
    }

    fn base_width(&self, parent_width: f64) -> f64 {
        self.spec.explicit_width(parent_width)
    }

    fn base_height(&self, parent_height: f64) -> f64 {
        self.spec.explicit_height(parent_height)
    }

    fn render(
        &self,
        frame: &mut RenderFrame,
        x: f64,
        y: f64,
        parent_width: f64,
        parent_height: f64,
    ) {
        render_base(self, frame, x, y, parent_width, parent_height);
        if self.fill.is_none() && self.fill_border.is_none() {
            return;
        }

        let content = Rect::new(
            self.base_x(x),
            self.base_y(y),
            self.base_width(parent_width),
            self.base_height(parent_height),
        );
        let fill = self.fill_rect(content);
        frame.push_rect(RectPrimitive {
            x: fill.x,
            y: fill.y,
            width: fill.width,
            height: fill.height,
            fill: self.fill,
            border: self.fill_border.map(Border::stroke),
            corner_radius: self.fill_corner_radius.max(0.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{Bar, Side};
    use crate::core::{Rect, Unit, Viewport};
    use crate::layout::{BoxSpec, Component};
    use crate::render::{Color, RenderFrame};

    #[test]
    fn left_fill_keeps_origin() {
        let bar = Bar::new(50.0, 200.0);
        let fill = bar.fill_rect(Rect::new(10.0, 0.0, 100.0, 8.0));
        assert_relative_eq!(fill.x, 10.0);
        assert_relative_eq!(fill.width, 25.0);
    }

    #[test]
    fn right_fill_moves_origin_by_remainder() {
        let bar = Bar::new(50.0, 200.0).with_side(Side::Right);
        let fill = bar.fill_rect(Rect::new(10.0, 0.0, 100.0, 8.0));
        assert_relative_eq!(fill.x, 85.0);
        assert_relative_eq!(fill.width, 25.0);
    }

    #[test]
    fn bottom_fill_grows_upwards() {
        let bar = Bar::new(3.0, 4.0).with_side(Side::Bottom);
        let fill = bar.fill_rect(Rect::new(0.0, 0.0, 10.0, 40.0));
        assert_relative_eq!(fill.y, 10.0);
        assert_relative_eq!(fill.height, 30.0);
    }

    #[test]
    fn overfull_bar_is_not_clamped() {
        let bar = Bar::new(150.0, 100.0);
        let fill = bar.fill_rect(Rect::new(0.0, 0.0, 100.0, 10.0));
        assert_relative_eq!(fill.width, 150.0);
    }

    #[test]
    fn zero_total_renders_only_the_frame() {
        let bar = Bar::new(10.0, 0.0)
            .with_fill(Color::WHITE)
            .with_box(
                BoxSpec::default()
                    .with_width(100.0, Unit::Pixel)
                    .with_height(10.0, Unit::Pixel)
                    .with_background(Color::BLACK),
            );
        let mut frame = RenderFrame::new(Viewport::new(200, 50));
        bar.render(&mut frame, 0.0, 0.0, 200.0, 50.0);
        assert_eq!(frame.rects.len(), 1);
        assert_eq!(frame.rects[0].fill, Some(Color::BLACK));
    }
}
