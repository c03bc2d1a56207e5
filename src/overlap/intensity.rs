// Overlap count -> visual intensity
//
// intensity(0) = 0
// intensity(n) = min(base + (n - 1) * increment, max)   for n >= 1
//
// Both the legend and every day cell go through IntensityScale::intensity.

use serde::Serialize;

pub const DEFAULT_BASE_OPACITY: f64 = 0.15;
pub const DEFAULT_INCREMENT: f64 = 0.08;
pub const DEFAULT_MAX_OPACITY: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntensityScale {
    pub base: f64,
    pub increment: f64,
    pub max: f64,
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_OPACITY,
            increment: DEFAULT_INCREMENT,
            max: DEFAULT_MAX_OPACITY,
        }
    }
}

/// One legend entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendStop {
    pub count: usize,
    pub intensity: f64,
}

impl IntensityScale {
    pub fn intensity(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        (self.base + (count - 1) as f64 * self.increment).min(self.max)
    }

    /// Legend stops from 0 up to the month's maximum count.
    /// The end-point is calibrated on `max_count`; a month with no activity still
    /// shows the single-company step so the legend is never just "0".
    pub fn legend(&self, max_count: usize) -> Vec<LegendStop> {
        (0..=max_count.max(1))
            .map(|count| LegendStop {
                count,
                intensity: self.intensity(count),
            })
            .collect()
    }
}
