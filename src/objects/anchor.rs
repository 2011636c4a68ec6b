use serde::{Deserialize, Serialize};

use crate::core::{Point, round_to_tick};
use crate::objects::ChartCoordinates;

/// Domain-space control point: a bar index and a price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub bar: f64,
    pub price: f64,
}

impl ChartPoint {
    #[must_use]
    pub const fn new(bar: f64, price: f64) -> Self {
        Self { bar, price }
    }

    #[must_use]
    pub fn to_screen(self, chart: &dyn ChartCoordinates) -> Point {
        Point::new(chart.x_for_bar(self.bar), chart.y_for_price(self.price))
    }

    /// Maps a pixel position back to the nearest bar and tick.
    #[must_use]
    pub fn from_screen(point: Point, chart: &dyn ChartCoordinates) -> Self {
        Self::new(
            chart.bar_for_x(point.x).round(),
            round_to_tick(chart.price_for_y(point.y), chart.tick_size()),
        )
    }

    /// Moves the price by `ticks` increments, snapping to the tick grid.
    #[must_use]
    pub fn nudged(self, ticks: f64, tick_size: f64) -> Self {
        Self::new(self.bar, round_to_tick(self.price + ticks * tick_size, tick_size))
    }
}
