use std::fmt;
use std::rc::Rc;

use crate::core::Unit;
use crate::layout::{BoxSpec, Component, render_base};
use crate::render::{Color, Font, RenderFrame, TextHAlign, TextPrimitive};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Font metrics provider used to size text nodes.
pub trait TextMeasure: fmt::Debug {
    fn measure(&self, text: &str, font: &Font) -> TextExtent;
}

/// Fixed-advance approximation of font metrics.
///
/// Every glyph advances `advance_ratio * size_px`; each line is
/// `line_height_ratio * size_px` tall. Good enough for monospace UI fonts
/// and for headless layout where no rasterizer is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance_ratio: f64,
    pub line_height_ratio: f64,
    pub bold_advance_ratio: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.2,
            bold_advance_ratio: 0.65,
        }
    }
}

impl TextMeasure for MonospaceMetrics {
    fn measure(&self, text: &str, font: &Font) -> TextExtent {
        if text.is_empty() {
            return TextExtent::default();
        }
        let advance = if font.bold {
            self.bold_advance_ratio
        } else {
            self.advance_ratio
        };
        let longest_line = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let line_count = text.lines().count().max(1);
        TextExtent {
            width: longest_line as f64 * advance * font.size_px,
            height: line_count as f64 * self.line_height_ratio * font.size_px,
        }
    }
}

/// Leaf that sizes itself from its measured string.
#[derive(Debug, Clone)]
pub struct Text {
    spec: BoxSpec,
    text: String,
    font: Font,
    color: Color,
    measure: Rc<dyn TextMeasure>,
    measured: TextExtent,
}

impl Text {
    #[must_use]
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self::with_measure(text, font, Rc::new(MonospaceMetrics::default()))
    }

    #[must_use]
    pub fn with_measure(text: impl Into<String>, font: Font, measure: Rc<dyn TextMeasure>) -> Self {
        let mut node = Self {
            spec: BoxSpec::default(),
            text: text.into(),
            font,
            color: Color::BLACK,
            measure,
            measured: TextExtent::default(),
        };
        node.recalculate_size();
        node
    }

    #[must_use]
    pub fn with_box(mut self, spec: BoxSpec) -> Self {
        self.spec = spec;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn box_spec_mut(&mut self) -> &mut BoxSpec {
        &mut self.spec
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn measured(&self) -> TextExtent {
        self.measured
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.recalculate_size();
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.recalculate_size();
    }

    pub fn set_measure(&mut self, measure: Rc<dyn TextMeasure>) {
        self.measure = measure;
        self.recalculate_size();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn recalculate_size(&mut self) {
        self.measured = self.measure.measure(&self.text, &self.font);
    }
}

impl Component for Text {
    fn box_spec(&self) -> &BoxSpec {
        &self.spec
    }

    /// Explicit units override the measurement and skip min/max clamping.
    fn base_width(&self, parent_width: f64) -> f64 {
        match self.spec.width.unit {
            Unit::Pixel | Unit::Percent => self.spec.pixel_width(parent_width),
            Unit::None => self.spec.clamp_width(self.measured.width, parent_width),
        }
    }

    fn base_height(&self, parent_height: f64) -> f64 {
        match self.spec.height.unit {
            Unit::Pixel | Unit::Percent => self.spec.pixel_height(parent_height),
            Unit::None => self.spec.clamp_height(self.measured.height, parent_height),
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
        if self.text.is_empty() {
            return;
        }

        frame.push_text(TextPrimitive::new(
            self.text.clone(),
            self.base_x(x),
            self.base_y(y),
            self.font.clone(),
            self.color,
            TextHAlign::Left,
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{MonospaceMetrics, Text, TextExtent, TextMeasure};
    use crate::core::{Unit, Viewport};
    use crate::layout::{BoxSpec, Component};
    use crate::render::{Color, Font, RenderFrame};

    #[derive(Debug, Default)]
    struct CountingMeasure {
        calls: Cell<usize>,
    }

    impl TextMeasure for CountingMeasure {
        fn measure(&self, text: &str, font: &Font) -> TextExtent {
            self.calls.set(self.calls.get() + 1);
            MonospaceMetrics::default().measure(text, font)
        }
    }

    #[test]
    fn every_mutation_remeasures() {
        let measure = Rc::new(CountingMeasure::default());
        let mut text = Text::with_measure("", Font::default(), measure.clone());
        assert_eq!(measure.calls.get(), 1);

        text.set_text("abc");
        let font = Font::new("Mono", 20.0);
        text.set_font(font.clone());
        assert_eq!(measure.calls.get(), 3);

        let direct = MonospaceMetrics::default().measure("abc", &font);
        assert_eq!(text.measured(), direct);

        text.set_font(font);
        assert_eq!(text.measured(), direct);
    }

    #[test]
    fn explicit_width_bypasses_clamps() {
        let text = Text::new("a long label", Font::new("Mono", 10.0)).with_box(
            BoxSpec::default()
                .with_width(200.0, Unit::Pixel)
                .with_max_width(50.0, Unit::Pixel),
        );
        assert_eq!(text.base_width(400.0), 200.0);

        let intrinsic = Text::new("a long label", Font::new("Mono", 10.0))
            .with_box(BoxSpec::default().with_max_width(50.0, Unit::Pixel));
        assert_eq!(intrinsic.base_width(400.0), 50.0);
    }

    #[test]
    fn empty_text_still_paints_background() {
        let text = Text::new("", Font::default())
            .with_box(BoxSpec::default().with_background(Color::WHITE));
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        text.render(&mut frame, 0.0, 0.0, 100.0, 100.0);
        assert_eq!(frame.rects.len(), 1);
        assert!(frame.texts.is_empty());
    }
}
