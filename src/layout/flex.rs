use serde::{Deserialize, Serialize};

use crate::core::Unit;
use crate::layout::{BoxSpec, Component, render_base};
use crate::render::{RenderFrame, debug};

/// Main (stacking) axis of a `Flex`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Cross-axis placement for vertical containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Cross-axis placement for horizontal containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Container stacking its children along one axis.
///
/// Children are measured against the container's own resolved size minus the
/// gaps, and the container grows to fit them. Nothing is cached: every
/// measurement and every render walks the subtree again.
#[derive(Default)]
pub struct Flex {
    spec: BoxSpec,
    children: Vec<Box<dyn Component>>,
    pub direction: Direction,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub gap: f64,
    pub debug: bool,
}

impl std::fmt::Debug for Flex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flex")
            .field("spec", &self.spec)
            .field("children", &self.children.len())
            .field("direction", &self.direction)
            .field("gap", &self.gap)
            .finish()
    }
}

impl Flex {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn row() -> Self {
        Self::new(Direction::Horizontal)
    }

    #[must_use]
    pub fn column() -> Self {
        Self::new(Direction::Vertical)
    }

    #[must_use]
    pub fn with_box(mut self, spec: BoxSpec) -> Self {
        self.spec = spec;
        self
    }

    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn with_horizontal_align(mut self, align: HorizontalAlign) -> Self {
        self.horizontal_align = align;
        self
    }

    #[must_use]
    pub fn with_vertical_align(mut self, align: VerticalAlign) -> Self {
        self.vertical_align = align;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Component + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn push(&mut self, child: Box<dyn Component>) {
        self.children.push(child);
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn box_spec_mut(&mut self) -> &mut BoxSpec {
        &mut self.spec
    }

    #[must_use]
    pub fn children(&self) -> &[Box<dyn Component>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut self.children
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total gap along the main axis; zero for fewer than two children.
    fn total_gap(&self) -> f64 {
        if self.children.len() > 1 {
            self.gap * (self.children.len() - 1) as f64
        } else {
            0.0
        }
    }
}

impl Component for Flex {
    fn box_spec(&self) -> &BoxSpec {
        &self.spec
    }

    fn base_width(&self, parent_width: f64) -> f64 {
        let mut child_width = self.spec.pixel_width(parent_width);
        let base = match self.direction {
            Direction::Horizontal => {
                child_width -= self.total_gap();
                self.children
                    .iter()
                    .map(|child| child.outer_width(child_width))
                    .sum::<f64>()
                    + self.total_gap()
            }
            Direction::Vertical => self
                .children
                .iter()
                .map(|child| child.outer_width(child_width))
                .fold(0.0, f64::max),
        };

        let base = self.spec.clamp_width(base, parent_width);
        let width = child_width.max(base);
        if self.spec.width.unit == Unit::Percent {
            width - self.spec.margin.horizontal()
        } else {
            width
        }
    }

    fn base_height(&self, parent_height: f64) -> f64 {
        let mut child_height = self.spec.pixel_height(parent_height);
        let base = match self.direction {
            Direction::Vertical => {
                child_height -= self.total_gap();
                self.children
                    .iter()
                    .map(|child| child.outer_height(child_height))
                    .sum::<f64>()
                    + self.total_gap()
            }
            Direction::Horizontal => self
                .children
                .iter()
                .map(|child| child.outer_height(child_height))
                .fold(0.0, f64::max),
        };

        let base = self.spec.clamp_height(base, parent_height);
        let height = child_height.max(base);
        if self.spec.height.unit == Unit::Percent {
            height - self.spec.margin.vertical()
        } else {
            height
        }
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

        let mut width = self.base_width(parent_width);
        let mut height = self.base_height(parent_height);
        match self.direction {
            Direction::Horizontal => width -= self.total_gap(),
            Direction::Vertical => height -= self.total_gap(),
        }

        let origin_x = self.base_x(x);
        let origin_y = self.base_y(y);
        let mut cursor = match self.direction {
            Direction::Horizontal => origin_x,
            Direction::Vertical => origin_y,
        };

        for child in &self.children {
            let (child_x, child_y) = match self.direction {
                Direction::Horizontal => {
                    let free = height - child.outer_height(height);
                    let offset = match self.vertical_align {
                        VerticalAlign::Top => 0.0,
                        VerticalAlign::Center => free / 2.0,
                        VerticalAlign::Bottom => free,
                    };
                    (cursor, origin_y + offset)
                }
                Direction::Vertical => {
                    let free = width - child.outer_width(width);
                    let offset = match self.horizontal_align {
                        HorizontalAlign::Left => 0.0,
                        HorizontalAlign::Center => free / 2.0,
                        HorizontalAlign::Right => free,
                    };
                    (origin_x + offset, cursor)
                }
            };

            child.render(frame, child_x, child_y, width, height);
            if self.debug {
                debug::outline_component(frame, child.as_ref(), child_x, child_y, width, height);
            }

            cursor += match self.direction {
                Direction::Horizontal => child.outer_width(width) + self.gap,
                Direction::Vertical => child.outer_height(height) + self.gap,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{Direction, Flex, HorizontalAlign};
    use crate::core::{Unit, Viewport};
    use crate::layout::{Bar, BoxSpec, Component, Edges};
    use crate::render::{Color, RenderFrame};

    fn fixed(width: f64, height: f64) -> Bar {
        Bar::new(0.0, 100.0).with_box(
            BoxSpec::default()
                .with_width(width, Unit::Pixel)
                .with_height(height, Unit::Pixel)
                .with_background(Color::BLACK),
        )
    }

    fn three_children(direction: Direction) -> Flex {
        Flex::new(direction)
            .with_gap(5.0)
            .with_child(fixed(10.0, 4.0))
            .with_child(fixed(20.0, 4.0))
            .with_child(fixed(30.0, 4.0))
    }

    #[test]
    fn horizontal_width_sums_children_and_gaps() {
        let flex = three_children(Direction::Horizontal);
        assert_relative_eq!(flex.base_width(500.0), 70.0);
        assert_relative_eq!(flex.base_width(0.0), 70.0);
    }

    #[test]
    fn vertical_width_takes_widest_child() {
        let flex = three_children(Direction::Vertical);
        assert_relative_eq!(flex.base_width(500.0), 30.0);
        assert_relative_eq!(flex.base_height(500.0), 4.0 * 3.0 + 10.0);
    }

    #[test]
    fn container_keeps_its_requested_width() {
        let flex = three_children(Direction::Horizontal)
            .with_box(BoxSpec::default().with_width(200.0, Unit::Pixel));
        assert_relative_eq!(flex.base_width(500.0), 190.0);
    }

    #[test]
    fn percent_width_drops_margins() {
        let flex = Flex::row().with_box(
            BoxSpec::default()
                .with_width(50.0, Unit::Percent)
                .with_margin(Edges::symmetric(10.0, 0.0)),
        );
        assert_relative_eq!(flex.base_width(400.0), 180.0);
        assert_relative_eq!(flex.outer_width(400.0), 200.0);
    }

    #[test]
    fn empty_flex_measures_zero() {
        let flex = Flex::column().with_gap(8.0);
        assert_relative_eq!(flex.base_width(100.0), 0.0);
        assert_relative_eq!(flex.base_height(100.0), 0.0);
    }

    #[test]
    fn render_advances_cursor_by_outer_size_plus_gap() {
        let flex = three_children(Direction::Horizontal);
        let mut frame = RenderFrame::new(Viewport::new(200, 100));
        flex.render(&mut frame, 3.0, 7.0, 200.0, 100.0);

        let xs: Vec<f64> = frame.rects.iter().map(|rect| rect.x).collect();
        assert_eq!(xs, vec![3.0, 18.0, 43.0]);
        assert!(frame.rects.iter().all(|rect| rect.y == 7.0));
    }

    #[test]
    fn vertical_center_alignment_uses_slot_width() {
        let flex = three_children(Direction::Vertical)
            .with_horizontal_align(HorizontalAlign::Center);
        let mut frame = RenderFrame::new(Viewport::new(200, 100));
        flex.render(&mut frame, 0.0, 0.0, 200.0, 100.0);

        let xs: Vec<f64> = frame.rects.iter().map(|rect| rect.x).collect();
        assert_eq!(xs, vec![10.0, 5.0, 0.0]);
        let ys: Vec<f64> = frame.rects.iter().map(|rect| rect.y).collect();
        assert_eq!(ys, vec![0.0, 9.0, 18.0]);
    }
}
