use serde::{Deserialize, Serialize};

/// Tags whether a dimension is absolute or relative to its parent.
///
/// `None` means the dimension is unset and the owner falls back to its
/// intrinsic size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    None,
    Pixel,
    Percent,
}

impl Unit {
    /// Resolves `value` in this unit to pixels against `parent`.
    ///
    /// `None` and `Pixel` return `value` verbatim. Callers branch on `None`
    /// before resolving when they want intrinsic sizing instead.
    #[must_use]
    pub fn resolve(self, value: f64, parent: f64) -> f64 {
        match self {
            Unit::Percent => value * parent / 100.0,
            Unit::Pixel | Unit::None => value,
        }
    }

    #[must_use]
    pub fn is_set(self) -> bool {
        self != Unit::None
    }
}

#[cfg(test)]
mod tests {
    use super::Unit;

    #[test]
    fn percent_resolves_against_parent() {
        assert_eq!(Unit::Percent.resolve(50.0, 300.0), 150.0);
        assert_eq!(Unit::Percent.resolve(150.0, 40.0), 60.0);
    }

    #[test]
    fn pixel_and_none_pass_through() {
        assert_eq!(Unit::Pixel.resolve(42.0, 1000.0), 42.0);
        assert_eq!(Unit::None.resolve(7.0, 1000.0), 7.0);
    }

    #[test]
    fn negative_parent_is_not_rejected() {
        assert_eq!(Unit::Percent.resolve(10.0, -200.0), -20.0);
    }
}
