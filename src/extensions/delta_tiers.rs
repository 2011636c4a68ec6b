use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Unit;
use crate::error::{OverlayError, OverlayResult};
use crate::layout::{Bar, BoxSpec, Edges, Flex, Text, VerticalAlign};
use crate::render::{Color, Font};
use crate::theme::Theme;

const SWATCH_SIZE: f64 = 10.0;

/// Intensity step applied once the absolute delta reaches `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaTier {
    pub threshold: f64,
    pub alpha: f64,
}

impl DeltaTier {
    #[must_use]
    pub const fn new(threshold: f64, alpha: f64) -> Self {
        Self { threshold, alpha }
    }
}

/// Tier configuration for delta-volume coloring.
///
/// Buy-side deltas use `positive`, sell-side deltas `negative`; the tier
/// reached by the absolute delta picks the opacity. Deltas below the first
/// threshold are drawn with `neutral`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaTiers {
    pub positive: Color,
    pub negative: Color,
    pub neutral: Color,
    pub tiers: Vec<DeltaTier>,
}

impl Default for DeltaTiers {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            positive: theme.positive,
            negative: theme.negative,
            neutral: theme.foreground.with_alpha(0.2),
            tiers: vec![
                DeltaTier::new(100.0, 0.35),
                DeltaTier::new(500.0, 0.6),
                DeltaTier::new(1_000.0, 0.8),
                DeltaTier::new(2_500.0, 1.0),
            ],
        }
    }
}

impl DeltaTiers {
    pub fn from_json(json: &str) -> OverlayResult<Self> {
        let tiers: DeltaTiers = serde_json::from_str(json)?;
        tiers.validate().inspect_err(|err| {
            warn!(error = %err, "rejected delta tier configuration");
        })
    }

    pub fn to_json(&self) -> OverlayResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Thresholds must be finite, non-negative and strictly increasing.
    pub fn validate(self) -> OverlayResult<Self> {
        for color in [self.positive, self.negative, self.neutral] {
            color.validate()?;
        }
        if self.tiers.is_empty() {
            return Err(OverlayError::InvalidConfig {
                field: "tiers",
                reason: "at least one tier is required".to_owned(),
            });
        }

        let mut previous: Option<f64> = None;
        for tier in &self.tiers {
            if !tier.threshold.is_finite() || tier.threshold < 0.0 {
                return Err(OverlayError::InvalidConfig {
                    field: "tiers.threshold",
                    reason: format!("{} must be finite and >= 0", tier.threshold),
                });
            }
            if !(0.0..=1.0).contains(&tier.alpha) {
                return Err(OverlayError::InvalidConfig {
                    field: "tiers.alpha",
                    reason: format!("{} must be in [0, 1]", tier.alpha),
                });
            }
            if previous.is_some_and(|last| tier.threshold <= last) {
                return Err(OverlayError::InvalidConfig {
                    field: "tiers.threshold",
                    reason: "thresholds must be strictly increasing".to_owned(),
                });
            }
            previous = Some(tier.threshold);
        }
        Ok(self)
    }

    /// Highest tier whose threshold the absolute delta reaches.
    #[must_use]
    pub fn tier_for(&self, delta: f64) -> Option<(usize, &DeltaTier)> {
        let magnitude = delta.abs();
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tier)| magnitude >= tier.threshold)
    }

    #[must_use]
    pub fn color_for(&self, delta: f64) -> Color {
        let Some((_, tier)) = self.tier_for(delta) else {
            return self.neutral;
        };
        let base = if delta < 0.0 {
            self.negative
        } else {
            self.positive
        };
        base.with_alpha(base.alpha * tier.alpha)
    }

    /// Legend listing every tier as a swatch and its threshold.
    #[must_use]
    pub fn legend(&self, font: &Font, text_color: Color) -> Flex {
        let mut legend = Flex::column()
            .with_gap(2.0)
            .with_box(BoxSpec::default().with_padding(Edges::all(4.0)));
        for tier in &self.tiers {
            let row = Flex::row()
                .with_gap(6.0)
                .with_vertical_align(VerticalAlign::Center)
                .with_child(swatch(self.negative.with_alpha(tier.alpha)))
                .with_child(swatch(self.positive.with_alpha(tier.alpha)))
                .with_child(
                    Text::new(format!(">= {}", tier.threshold), font.clone()).with_color(text_color),
                );
            legend = legend.with_child(row);
        }
        legend
    }
}

fn swatch(color: Color) -> Bar {
    Bar::new(1.0, 1.0).with_fill(color).with_box(
        BoxSpec::default()
            .with_width(SWATCH_SIZE, Unit::Pixel)
            .with_height(SWATCH_SIZE, Unit::Pixel),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{DeltaTier, DeltaTiers};
    use crate::layout::Component;
    use crate::render::{Color, Font};

    #[test]
    fn picks_highest_reached_tier() {
        let tiers = DeltaTiers::default();
        assert!(tiers.tier_for(50.0).is_none());
        assert_eq!(tiers.tier_for(100.0).map(|(index, _)| index), Some(0));
        assert_eq!(tiers.tier_for(-750.0).map(|(index, _)| index), Some(1));
        assert_eq!(tiers.tier_for(10_000.0).map(|(index, _)| index), Some(3));
    }

    #[test]
    fn sign_selects_palette() {
        let tiers = DeltaTiers::default();
        let sell = tiers.color_for(-3_000.0);
        assert_eq!(sell, tiers.negative);
        let buy = tiers.color_for(120.0);
        assert_relative_eq!(buy.alpha, 0.35);
        assert_eq!(tiers.color_for(0.0), tiers.neutral);
    }

    #[test]
    fn rejects_unsorted_thresholds() {
        let mut tiers = DeltaTiers::default();
        tiers.tiers = vec![DeltaTier::new(500.0, 0.5), DeltaTier::new(100.0, 0.7)];
        assert!(tiers.clone().validate().is_err());

        tiers.tiers = vec![DeltaTier::new(100.0, 0.5), DeltaTier::new(100.0, 0.7)];
        let json = serde_json::to_string(&tiers).expect("serialize");
        assert!(DeltaTiers::from_json(&json).is_err());
    }

    #[test]
    fn legend_has_a_row_per_tier() {
        let tiers = DeltaTiers::default();
        let legend = tiers.legend(&Font::default(), Color::WHITE);
        assert_eq!(legend.len(), tiers.tiers.len());
        assert!(legend.outer_width(400.0) > 2.0 * 10.0);
    }
}
