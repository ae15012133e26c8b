use crate::{Result, TableError};

/// A log10-spaced axis over `[chi_min, chi_max]`.
///
/// Lookups outside the bounds clamp to the endpoints; the caller decides what
/// to do with the clamp flag.
#[derive(Debug, Clone, PartialEq)]
pub struct LogGrid {
    log_min: f64,
    log_max: f64,
    step: f64,
    size: usize,
}

impl LogGrid {
    pub fn new(chi_min: f64, chi_max: f64, size: usize) -> Result<Self> {
        if !(chi_min > 0.0) || !(chi_max > chi_min) || size < 2 {
            return Err(TableError::InvalidAxis {
                chi_min,
                chi_max,
                size,
            });
        }
        let log_min = chi_min.log10();
        let log_max = chi_max.log10();
        Ok(Self {
            log_min,
            log_max,
            step: (log_max - log_min) / (size - 1) as f64,
            size,
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn chi_min(&self) -> f64 {
        10f64.powf(self.log_min)
    }

    pub fn chi_max(&self) -> f64 {
        10f64.powf(self.log_max)
    }

    /// The axis value at node `i`.
    pub fn value(&self, i: usize) -> f64 {
        10f64.powf(self.log_min + i as f64 * self.step)
    }

    /// Locates `chi` on the axis.
    ///
    /// Returns the lower node index (at most `size - 2`), the interpolation
    /// fraction in `[0, 1]` towards the upper node, and whether `chi` fell
    /// outside the axis and was clamped.
    #[inline]
    pub fn locate(&self, chi: f64) -> (usize, f64, bool) {
        let log_chi = chi.log10();
        if log_chi <= self.log_min {
            return (0, 0.0, log_chi < self.log_min);
        }
        if log_chi >= self.log_max {
            return (self.size - 2, 1.0, log_chi > self.log_max);
        }
        let t = (log_chi - self.log_min) / self.step;
        let i = (t as usize).min(self.size - 2);
        (i, t - i as f64, false)
    }
}
