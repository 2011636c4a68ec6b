use crate::core::Rect;
use crate::layout::BoxSpec;
use crate::render::RenderFrame;

/// Contract shared by every node of the layout tree.
///
/// Implementors supply their content size and content rendering; the box
/// model (margin, padding, positioning) comes from the provided methods.
/// Sizes flow top-down: a node is measured against the size its parent makes
/// available, once per axis.
pub trait Component {
    fn box_spec(&self) -> &BoxSpec;

    /// Content width in pixels, after min/max clamping.
    fn base_width(&self, parent_width: f64) -> f64;

    /// Content height in pixels, after min/max clamping.
    fn base_height(&self, parent_height: f64) -> f64;

    /// Draws the component with its outer (margin) box at `(x, y)`.
    fn render(
        &self,
        frame: &mut RenderFrame,
        x: f64,
        y: f64,
        parent_width: f64,
        parent_height: f64,
    );

    fn base_x(&self, x: f64) -> f64 {
        let spec = self.box_spec();
        x + spec.margin.left + spec.padding.left
    }

    fn base_y(&self, y: f64) -> f64 {
        let spec = self.box_spec();
        y + spec.margin.top + spec.padding.top
    }

    /// Width of the box excluding margins.
    fn inner_width(&self, parent_width: f64) -> f64 {
        self.box_spec().padding.horizontal() + self.base_width(parent_width)
    }

    fn inner_height(&self, parent_height: f64) -> f64 {
        self.box_spec().padding.vertical() + self.base_height(parent_height)
    }

    /// Full footprint used by the parent's layout.
    fn outer_width(&self, parent_width: f64) -> f64 {
        self.box_spec().margin.horizontal() + self.inner_width(parent_width)
    }

    fn outer_height(&self, parent_height: f64) -> f64 {
        self.box_spec().margin.vertical() + self.inner_height(parent_height)
    }

    /// Resolved box rectangles for a component placed at `(x, y)`.
    fn layout_boxes(&self, x: f64, y: f64, parent_width: f64, parent_height: f64) -> BoxRects {
        let spec = self.box_spec();
        let base_width = self.base_width(parent_width);
        let base_height = self.base_height(parent_height);
        let inner_width = spec.padding.horizontal() + base_width;
        let inner_height = spec.padding.vertical() + base_height;
        BoxRects {
            outer: Rect::new(
                x,
                y,
                inner_width + spec.margin.horizontal(),
                inner_height + spec.margin.vertical(),
            ),
            inner: Rect::new(x + spec.margin.left, y + spec.margin.top, inner_width, inner_height),
            base: Rect::new(self.base_x(x), self.base_y(y), base_width, base_height),
        }
    }
}

/// Margin, border and content rectangles of one placed component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRects {
    pub outer: Rect,
    pub inner: Rect,
    pub base: Rect,
}

/// Paints the component's background and border over its inner rect.
///
/// Leaves call this first in `render` and draw their content on top.
pub fn render_base<C: Component + ?Sized>(
    component: &C,
    frame: &mut RenderFrame,
    x: f64,
    y: f64,
    parent_width: f64,
    parent_height: f64,
) {
    let spec = component.box_spec();
    spec.render_base(
        frame,
        x + spec.margin.left,
        y + spec.margin.top,
        component.inner_width(parent_width),
        component.inner_height(parent_height),
    );
}
