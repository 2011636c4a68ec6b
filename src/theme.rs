use serde::{Deserialize, Serialize};

use crate::error::OverlayResult;
use crate::render::{Color, Font};

/// Palette and fonts pushed into overlay objects by `ChartObject::apply_theme`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub label_font: Font,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".to_owned(),
            background: Color::rgb(0.09, 0.10, 0.13),
            foreground: Color::rgb(0.86, 0.87, 0.89),
            accent: Color::rgb(0.16, 0.47, 0.96),
            positive: Color::rgb(0.15, 0.65, 0.60),
            negative: Color::rgb(0.94, 0.33, 0.31),
            label_font: Font::new("Sans", 11.0),
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".to_owned(),
            background: Color::rgb(1.0, 1.0, 1.0),
            foreground: Color::rgb(0.13, 0.14, 0.16),
            accent: Color::rgb(0.16, 0.38, 1.0),
            positive: Color::rgb(0.03, 0.60, 0.51),
            negative: Color::rgb(0.95, 0.21, 0.27),
            label_font: Font::new("Sans", 11.0),
        }
    }

    /// Parses and validates a theme from JSON.
    pub fn from_json(json: &str) -> OverlayResult<Self> {
        let theme: Theme = serde_json::from_str(json)?;
        theme.validate()
    }

    pub fn to_json(&self) -> OverlayResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(self) -> OverlayResult<Self> {
        for color in [
            self.background,
            self.foreground,
            self.accent,
            self.positive,
            self.negative,
        ] {
            color.validate()?;
        }
        self.label_font.validate()?;
        Ok(self)
    }
}
