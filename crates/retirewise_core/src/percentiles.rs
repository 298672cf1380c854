//! Percentile extraction for Monte Carlo trajectories
//!
//! All percentiles use linear interpolation between order statistics:
//! for `n` sorted values and a fraction `p`, the rank is `p * (n - 1)` and the
//! result blends the two neighbouring values by the rank's fractional part.

use serde::{Deserialize, Serialize};

/// Standard percentiles reported by the simulator
pub mod standard {
    pub const P5: f64 = 0.05;
    pub const P50: f64 = 0.50;
    pub const P95: f64 = 0.95;
}

/// Percentile of an ascending slice, `p` in `[0, 1]`.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            if lower == upper {
                Some(sorted[lower])
            } else {
                let (lo, hi) = (sorted[lower], sorted[upper]);
                Some(lo + (hi - lo) * (rank - lower as f64))
            }
        }
    }
}

/// Sort `values` in place and return the requested percentile
pub fn percentile(values: &mut [f64], p: f64) -> Option<f64> {
    values.sort_by(f64::total_cmp);
    percentile_sorted(values, p)
}

/// Pessimistic, median and optimistic values at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileSet {
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

impl PercentileSet {
    /// Extract P5/P50/P95 from unsorted samples (sorted in place)
    pub fn from_samples(values: &mut [f64]) -> Option<Self> {
        values.sort_by(f64::total_cmp);
        Some(Self {
            p5: percentile_sorted(values, standard::P5)?,
            p50: percentile_sorted(values, standard::P50)?,
            p95: percentile_sorted(values, standard::P95)?,
        })
    }

    /// Width of the band between the pessimistic and optimistic outcome
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.p95 - self.p5
    }
}
