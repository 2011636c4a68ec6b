pub mod geometry;
pub mod price_format;
pub mod scale;
pub mod types;
pub mod units;

pub use geometry::{LineSegment, NO_HIT, Point, Rect, Shape, nearest_hit_distance};
pub use price_format::{format_percent, format_price, round_to_tick};
pub use scale::LinearScale;
pub use types::Viewport;
pub use units::Unit;
