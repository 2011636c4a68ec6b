use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{LinearScale, Rect};
use crate::error::{OverlayError, OverlayResult};

/// Host mapping between chart domain values and canvas pixels.
pub trait ChartCoordinates {
    /// Visible plot area in pixels.
    fn canvas(&self) -> Rect;
    fn x_for_bar(&self, bar: f64) -> f64;
    fn bar_for_x(&self, x: f64) -> f64;
    fn y_for_price(&self, price: f64) -> f64;
    fn price_for_y(&self, y: f64) -> f64;
    /// Minimum price increment of the instrument.
    fn tick_size(&self) -> f64;
}

/// Linear `ChartCoordinates` over a bar range and a price range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartView {
    canvas: Rect,
    bars: LinearScale,
    prices: LinearScale,
    tick_size: f64,
}

impl ChartView {
    pub fn new(
        canvas: Rect,
        bar_range: (f64, f64),
        price_range: (f64, f64),
        tick_size: f64,
    ) -> OverlayResult<Self> {
        if !canvas.is_finite() || canvas.width <= 0.0 || canvas.height <= 0.0 {
            return Err(OverlayError::InvalidData(
                "chart canvas must be finite with positive size".to_owned(),
            ));
        }
        if !tick_size.is_finite() || tick_size <= 0.0 {
            return Err(OverlayError::InvalidConfig {
                field: "tick_size",
                reason: "must be finite and > 0".to_owned(),
            });
        }

        let bars = LinearScale::new(bar_range.0, bar_range.1, canvas.x, canvas.right())?;
        let prices = LinearScale::new(price_range.0, price_range.1, canvas.bottom(), canvas.y)?;
        Ok(Self {
            canvas,
            bars,
            prices,
            tick_size,
        })
    }
}

impl ChartCoordinates for ChartView {
    fn canvas(&self) -> Rect {
        self.canvas
    }

    fn x_for_bar(&self, bar: f64) -> f64 {
        self.bars.domain_to_pixel(bar)
    }

    fn bar_for_x(&self, x: f64) -> f64 {
        self.bars.pixel_to_domain(x)
    }

    fn y_for_price(&self, price: f64) -> f64 {
        self.prices.domain_to_pixel(price)
    }

    fn price_for_y(&self, y: f64) -> f64 {
        self.prices.pixel_to_domain(y)
    }

    fn tick_size(&self) -> f64 {
        self.tick_size
    }
}

/// Latest trade information handed to `ChartObject::check_alert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub previous_price: f64,
    pub last_price: f64,
    pub time: DateTime<Utc>,
}

impl MarketSnapshot {
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        previous_price: f64,
        last_price: f64,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            previous_price,
            last_price,
            time,
        }
    }

    /// Whether the last move touched or crossed `level`.
    #[must_use]
    pub fn crossed(&self, level: f64) -> bool {
        (self.previous_price < level && self.last_price >= level)
            || (self.previous_price > level && self.last_price <= level)
    }
}

/// User-facing alert options carried by alerting objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub enabled: bool,
    /// Custom message; a generated one is used when empty.
    pub message: String,
    /// Re-arm after firing instead of firing once.
    pub repeat: bool,
    /// Minimum time between two alerts for the same symbol.
    pub throttle_ms: u64,
    pub sound: Option<String>,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            message: String::new(),
            repeat: false,
            throttle_ms: 1_000,
            sound: None,
        }
    }
}

/// Host alert delivery.
pub trait AlertSink {
    /// Whether an alert for `symbol` fired within the last `window_ms`.
    fn is_throttled(&self, symbol: &str, window_ms: u64, now: DateTime<Utc>) -> bool;

    fn add_alert(
        &mut self,
        symbol: &str,
        settings: &AlertSettings,
        message: &str,
        now: DateTime<Utc>,
    );
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredAlert {
    pub symbol: String,
    pub message: String,
    pub sound: Option<String>,
    pub time: DateTime<Utc>,
}

/// `AlertSink` that keeps delivered alerts in memory.
///
/// Useful for headless hosts and tests; throttling is keyed per symbol.
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertSink {
    last_fired: IndexMap<String, DateTime<Utc>>,
    delivered: Vec<DeliveredAlert>,
}

impl MemoryAlertSink {
    #[must_use]
    pub fn delivered(&self) -> &[DeliveredAlert] {
        &self.delivered
    }

    pub fn drain(&mut self) -> Vec<DeliveredAlert> {
        std::mem::take(&mut self.delivered)
    }
}

impl AlertSink for MemoryAlertSink {
    fn is_throttled(&self, symbol: &str, window_ms: u64, now: DateTime<Utc>) -> bool {
        self.last_fired.get(symbol).is_some_and(|last| {
            let elapsed = now.signed_duration_since(*last).num_milliseconds();
            elapsed >= 0 && (elapsed as u64) < window_ms
        })
    }

    fn add_alert(
        &mut self,
        symbol: &str,
        settings: &AlertSettings,
        message: &str,
        now: DateTime<Utc>,
    ) {
        debug!(symbol, message, "alert delivered");
        self.last_fired.insert(symbol.to_owned(), now);
        self.delivered.push(DeliveredAlert {
            symbol: symbol.to_owned(),
            message: message.to_owned(),
            sound: settings.sound.clone(),
            time: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    use super::{AlertSettings, AlertSink, ChartCoordinates, ChartView, MarketSnapshot, MemoryAlertSink};
    use crate::core::Rect;

    #[test]
    fn chart_view_maps_high_prices_to_the_top() {
        let view = ChartView::new(Rect::new(0.0, 0.0, 800.0, 400.0), (0.0, 100.0), (90.0, 110.0), 0.25)
            .expect("view");
        assert_relative_eq!(view.y_for_price(110.0), 0.0);
        assert_relative_eq!(view.y_for_price(100.0), 200.0);
        assert_relative_eq!(view.x_for_bar(50.0), 400.0);
        assert_relative_eq!(view.price_for_y(100.0), 105.0);
    }

    #[test]
    fn cross_detection_is_directional_and_inclusive() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        assert!(MarketSnapshot::new("ES", 99.0, 100.0, time).crossed(100.0));
        assert!(MarketSnapshot::new("ES", 101.0, 99.5, time).crossed(100.0));
        assert!(!MarketSnapshot::new("ES", 100.0, 100.0, time).crossed(100.0));
        assert!(!MarketSnapshot::new("ES", 98.0, 99.0, time).crossed(100.0));
    }

    #[test]
    fn memory_sink_throttles_per_symbol() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        let mut sink = MemoryAlertSink::default();
        sink.add_alert("ES", &AlertSettings::default(), "hit", time);

        assert!(sink.is_throttled("ES", 1_000, time + Duration::milliseconds(500)));
        assert!(!sink.is_throttled("ES", 1_000, time + Duration::milliseconds(1_000)));
        assert!(!sink.is_throttled("NQ", 1_000, time));
        assert_eq!(sink.delivered().len(), 1);
    }
    #[test]
    fn snapshot_timestamp_survives_json() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        let snapshot = MarketSnapshot::new("ES", 99.0, 100.0, time);
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let parsed: MarketSnapshot = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, snapshot);
    }
}
