use tracing::trace;

use crate::core::{Rect, Viewport};
use crate::error::{OverlayError, OverlayResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic draw-command queue for one frame.
///
/// Layout and overlay code push into it; a `Renderer` consumes it. Primitives
/// with non-finite geometry, negative sizes or zero-width strokes are dropped on
/// push so a degenerate layout renders nothing instead of poisoning the whole
/// frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Visible canvas in pixel space.
    #[must_use]
    pub fn canvas(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        )
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        if !line.is_finite() {
            trace!(?line, "dropping non-finite line");
            return;
        }
        if !is_drawable_stroke(line.stroke.width) {
            trace!(?line, "dropping line with non-positive stroke width");
            return;
        }
        self.lines.push(line);
    }

    /// Negative sizes are dropped and zero-width borders stripped, so a
    /// degenerate box draws nothing instead of failing `validate`.
    pub fn push_rect(&mut self, mut rect: RectPrimitive) {
        if !rect.is_finite() {
            trace!(?rect, "dropping non-finite rect");
            return;
        }
        if rect.width < 0.0 || rect.height < 0.0 {
            trace!(?rect, "dropping rect with negative size");
            return;
        }
        if rect
            .border
            .is_some_and(|border| !is_drawable_stroke(border.width))
        {
            trace!(?rect, "stripping border with non-positive width");
            rect.border = None;
            if rect.fill.is_none() {
                return;
            }
        }
        self.rects.push(rect);
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        if !text.x.is_finite() || !text.y.is_finite() {
            trace!(text = %text.text, "dropping text at non-finite position");
            return;
        }
        if text.text.is_empty() || text.font.validate().is_err() {
            trace!(text = %text.text, size_px = text.font.size_px, "dropping undrawable text");
            return;
        }
        self.texts.push(text);
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.push_line(line);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.push_rect(rect);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.push_text(text);
        self
    }

    pub fn validate(&self) -> OverlayResult<()> {
        if !self.viewport.is_valid() {
            return Err(OverlayError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.rects.clear();
        self.texts.clear();
    }
}

fn is_drawable_stroke(width: f64) -> bool {
    width.is_finite() && width > 0.0
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Viewport;
    use crate::render::{Color, Font, LinePrimitive, RectPrimitive, Stroke, TextHAlign, TextPrimitive};

    #[test]
    fn non_finite_geometry_is_dropped() {
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        frame.push_rect(RectPrimitive::filled(0.0, 0.0, f64::NAN, 10.0, Color::BLACK));
        frame.push_line(LinePrimitive::new(
            0.0,
            f64::INFINITY,
            1.0,
            1.0,
            Stroke::solid(Color::BLACK, 1.0),
        ));
        assert!(frame.is_empty());
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn degenerate_sizes_are_dropped() {
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        frame.push_rect(RectPrimitive::filled(0.0, 0.0, -5.0, 10.0, Color::BLACK));
        frame.push_line(LinePrimitive::new(0.0, 0.0, 5.0, 5.0, Stroke::solid(Color::BLACK, 0.0)));
        frame.push_text(TextPrimitive::new("", 0.0, 0.0, Font::default(), Color::BLACK, TextHAlign::Left));
        frame.push_text(TextPrimitive::new("x", 0.0, 0.0, Font::new("Sans", 0.0), Color::BLACK, TextHAlign::Left));
        assert!(frame.is_empty());

        frame.push_rect(RectPrimitive::filled(0.0, 0.0, 0.0, 10.0, Color::BLACK));
        assert_eq!(frame.rects.len(), 1);
        assert!(frame.validate().is_ok());
    }
}
