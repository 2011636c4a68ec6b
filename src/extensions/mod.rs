//! Indicator configuration built on top of the layout toolkit.

mod delta_tiers;

pub use delta_tiers::{DeltaTier, DeltaTiers};
