use serde::{Deserialize, Serialize};

use crate::core::Unit;
use crate::render::{Color, LineStrokeStyle, RectPrimitive, RenderFrame, Stroke};

/// Per-side pixel distances. Margin and padding never use percent units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Edges {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub const fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub const fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: Color,
    pub thickness: f64,
    pub style: LineStrokeStyle,
}

impl Border {
    #[must_use]
    pub const fn new(color: Color, thickness: f64, style: LineStrokeStyle) -> Self {
        Self {
            color,
            thickness,
            style,
        }
    }

    #[must_use]
    pub const fn solid(color: Color, thickness: f64) -> Self {
        Self::new(color, thickness, LineStrokeStyle::Solid)
    }

    #[must_use]
    pub fn stroke(self) -> Stroke {
        Stroke::new(self.color, self.thickness, self.style)
    }
}

/// A dimension together with the unit it is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: Unit,
}

impl Dimension {
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self::new(value, Unit::Pixel)
    }

    #[must_use]
    pub const fn percent(value: f64) -> Self {
        Self::new(value, Unit::Percent)
    }

    #[must_use]
    pub fn resolve(self, parent: f64) -> f64 {
        self.unit.resolve(self.value, parent)
    }

    #[must_use]
    pub fn is_set(self) -> bool {
        self.unit.is_set()
    }
}

/// Box-model settings shared by every layout component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub width: Dimension,
    pub min_width: Dimension,
    pub max_width: Dimension,
    pub height: Dimension,
    pub min_height: Dimension,
    pub max_height: Dimension,
    pub margin: Edges,
    pub padding: Edges,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub corner_radius: f64,
}

impl BoxSpec {
    #[must_use]
    pub fn with_width(mut self, value: f64, unit: Unit) -> Self {
        self.width = Dimension::new(value, unit);
        self
    }

    #[must_use]
    pub fn with_min_width(mut self, value: f64, unit: Unit) -> Self {
        self.min_width = Dimension::new(value, unit);
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, value: f64, unit: Unit) -> Self {
        self.max_width = Dimension::new(value, unit);
        self
    }

    #[must_use]
    pub fn with_height(mut self, value: f64, unit: Unit) -> Self {
        self.height = Dimension::new(value, unit);
        self
    }

    #[must_use]
    pub fn with_min_height(mut self, value: f64, unit: Unit) -> Self {
        self.min_height = Dimension::new(value, unit);
        self
    }

    #[must_use]
    pub fn with_max_height(mut self, value: f64, unit: Unit) -> Self {
        self.max_height = Dimension::new(value, unit);
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Edges) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Own width resolved against the parent, `value` verbatim when unset.
    #[must_use]
    pub fn pixel_width(&self, parent_width: f64) -> f64 {
        self.width.resolve(parent_width)
    }

    #[must_use]
    pub fn pixel_height(&self, parent_height: f64) -> f64 {
        self.height.resolve(parent_height)
    }

    /// Applies the min clamp, then the max clamp, skipping unset bounds.
    ///
    /// The max clamp runs last, so it wins when min exceeds max.
    #[must_use]
    pub fn clamp_width(&self, base: f64, parent_width: f64) -> f64 {
        clamp_dimension(base, self.min_width, self.max_width, parent_width)
    }

    #[must_use]
    pub fn clamp_height(&self, base: f64, parent_height: f64) -> f64 {
        clamp_dimension(base, self.min_height, self.max_height, parent_height)
    }

    /// Explicit size for leaves without intrinsic content.
    ///
    /// Percent widths include the horizontal margins in the parent's share,
    /// so the margins are taken back out of the resolved value.
    #[must_use]
    pub fn explicit_width(&self, parent_width: f64) -> f64 {
        let width = self.clamp_width(self.pixel_width(parent_width), parent_width);
        if self.width.unit == Unit::Percent {
            width - self.margin.horizontal()
        } else {
            width
        }
    }

    #[must_use]
    pub fn explicit_height(&self, parent_height: f64) -> f64 {
        let height = self.clamp_height(self.pixel_height(parent_height), parent_height);
        if self.height.unit == Unit::Percent {
            height - self.margin.vertical()
        } else {
            height
        }
    }

    /// Paints background and border over the inner (margin-less) rect.
    ///
    /// Nothing is emitted when neither is configured.
    pub fn render_base(&self, frame: &mut RenderFrame, x: f64, y: f64, width: f64, height: f64) {
        if self.background.is_none() && self.border.is_none() {
            return;
        }

        frame.push_rect(RectPrimitive {
            x,
            y,
            width,
            height,
            fill: self.background,
            border: self.border.map(Border::stroke),
            corner_radius: self.corner_radius.max(0.0),
        });
    }
}

fn clamp_dimension(base: f64, min: Dimension, max: Dimension, parent: f64) -> f64 {
    let mut value = base;
    if min.is_set() {
        value = value.max(min.resolve(parent));
    }
    if max.is_set() {
        value = value.min(max.resolve(parent));
    }
    value
}
