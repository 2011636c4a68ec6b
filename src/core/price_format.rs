use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Rounds `price` to the nearest multiple of `tick_size`.
///
/// Non-positive or non-finite tick sizes leave the price untouched.
#[must_use]
pub fn round_to_tick(price: f64, tick_size: f64) -> f64 {
    if !tick_size.is_finite() || tick_size <= 0.0 || !price.is_finite() {
        return price;
    }
    match (Decimal::from_f64(price), Decimal::from_f64(tick_size)) {
        (Some(price_dec), Some(tick_dec)) => {
            let ticks = (price_dec / tick_dec)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            (ticks * tick_dec).to_f64().unwrap_or(price)
        }
        _ => (price / tick_size).round() * tick_size,
    }
}

/// Number of fractional digits needed to print multiples of `tick_size`.
#[must_use]
pub fn tick_precision(tick_size: f64) -> u32 {
    Decimal::from_f64(tick_size)
        .map(|tick| tick.normalize().scale())
        .unwrap_or(2)
}

/// Formats `price` rounded to `tick_size` with the tick's precision.
#[must_use]
pub fn format_price(price: f64, tick_size: f64) -> String {
    if !price.is_finite() {
        return "-".to_owned();
    }
    let precision = tick_precision(tick_size) as usize;
    format!("{:.*}", precision, round_to_tick(price, tick_size))
}

/// Formats a signed percentage with two decimals, e.g. `+1.25%`.
#[must_use]
pub fn format_percent(percent: f64) -> String {
    if !percent.is_finite() {
        return "-".to_owned();
    }
    format!("{percent:+.2}%")
}

#[cfg(test)]
mod tests {
    use super::{format_percent, format_price, round_to_tick, tick_precision};

    #[test]
    fn rounds_to_quarter_ticks() {
        assert_eq!(round_to_tick(100.13, 0.25), 100.25);
        assert_eq!(round_to_tick(100.12, 0.25), 100.0);
    }

    #[test]
    fn precision_follows_tick_size() {
        assert_eq!(tick_precision(0.25), 2);
        assert_eq!(tick_precision(0.1), 1);
        assert_eq!(tick_precision(1.0), 0);
        assert_eq!(format_price(4123.456, 0.01), "4123.46");
        assert_eq!(format_price(4123.456, 0.5), "4123.5");
    }

    #[test]
    fn percent_carries_sign() {
        assert_eq!(format_percent(1.254), "+1.25%");
        assert_eq!(format_percent(-0.5), "-0.50%");
        assert_eq!(format_percent(f64::INFINITY), "-");
    }
}
