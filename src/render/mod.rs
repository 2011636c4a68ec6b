pub mod debug;
mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, Font, LinePrimitive, LineStrokeStyle, RectPrimitive, Stroke, TextHAlign,
    TextPrimitive,
};

use crate::error::OverlayResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame`, so layout and overlay
/// code never touch rasterizer state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> OverlayResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
