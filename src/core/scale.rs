use crate::error::{OverlayError, OverlayResult};

/// Linear mapping between a domain interval and a pixel interval.
///
/// The pixel interval may be inverted (`pixel_start > pixel_end`), which is
/// how price axes map higher prices to smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    pixel_start: f64,
    pixel_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> OverlayResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(OverlayError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(OverlayError::InvalidData(
                "scale pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            pixel_start,
            pixel_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.pixel_start + normalized * (self.pixel_end - self.pixel_start)
    }

    /// Inverse of `domain_to_pixel`. A collapsed pixel range maps everything
    /// to the domain start.
    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> f64 {
        let span = self.pixel_end - self.pixel_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.pixel_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}
