//! Synthetic periodogram.
//!
//! A visual stand-in for a period search: flat low-power noise with a narrow
//! peak at the known orbital period. No transform is computed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{require_non_negative, require_positive, SynthesisError, SynthesisResult};

/// One bar of the periodogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodogramPoint {
    /// Trial period in days
    pub period: f64,
    pub power: f64,
}

/// Sweep range and peak shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodogramParams {
    pub min_period: f64,
    pub max_period: f64,
    pub step: f64,
    /// Trial periods closer than this to the true period form the peak
    pub peak_half_width: f64,
    /// Gaussian width of the peak shape
    pub peak_width: f64,
    /// Baseline power is drawn from `[baseline_floor, baseline_floor + baseline_spread)`
    pub baseline_floor: f64,
    pub baseline_spread: f64,
    /// Peak power is `peak_floor + (1 - peak_floor)·exp(−2u²)` plus jitter
    pub peak_floor: f64,
    pub peak_jitter: f64,
}

impl Default for PeriodogramParams {
    fn default() -> Self {
        Self {
            min_period: 0.5,
            max_period: 20.0,
            step: 0.1,
            peak_half_width: 0.5,
            peak_width: 0.3,
            baseline_floor: 0.1,
            baseline_spread: 0.2,
            peak_floor: 0.8,
            peak_jitter: 0.05,
        }
    }
}

impl PeriodogramParams {
    pub fn validate(&self) -> SynthesisResult<()> {
        require_positive("min_period", self.min_period)?;
        require_positive("step", self.step)?;
        require_positive("max_period", self.max_period)?;
        if self.max_period <= self.min_period {
            return Err(SynthesisError::invalid(
                "max_period",
                "must be greater than min_period",
            ));
        }
        require_positive("peak_width", self.peak_width)?;
        require_non_negative("peak_half_width", self.peak_half_width)?;
        require_non_negative("baseline_floor", self.baseline_floor)?;
        require_non_negative("baseline_spread", self.baseline_spread)?;
        require_non_negative("peak_jitter", self.peak_jitter)?;
        if !(0.0..=1.0).contains(&self.peak_floor) {
            return Err(SynthesisError::invalid("peak_floor", "must be in [0, 1]"));
        }
        Ok(())
    }

    /// Number of trial periods in the sweep (both ends inclusive).
    pub fn trial_count(&self) -> usize {
        ((self.max_period - self.min_period) / self.step + 1e-9).floor() as usize + 1
    }

    /// Trial period `k`, computed by index and rounded to 6 decimals so the
    /// sweep never accumulates drift.
    pub fn trial_period(&self, k: usize) -> f64 {
        let raw = self.min_period + k as f64 * self.step;
        (raw * 1e6).round() / 1e6
    }
}

/// Generate a periodogram peaking at `period`.
///
/// A period outside the sweep simply yields a flat noise baseline.
pub fn synthesize_periodogram<R: Rng + ?Sized>(
    period: f64,
    params: &PeriodogramParams,
    rng: &mut R,
) -> SynthesisResult<Vec<PeriodogramPoint>> {
    require_positive("period", period)?;
    params.validate()?;

    let points = (0..params.trial_count())
        .map(|k| {
            let trial = params.trial_period(k);
            let offset = trial - period;
            let power = if offset.abs() <= params.peak_half_width {
                let u = offset / params.peak_width;
                let shape = (-2.0 * u * u).exp();
                let noise = if params.peak_jitter > 0.0 {
                    (rng.gen::<f64>() - 0.5) * params.peak_jitter
                } else {
                    0.0
                };
                params.peak_floor + (1.0 - params.peak_floor) * shape + noise
            } else {
                params.baseline_floor + rng.gen::<f64>() * params.baseline_spread
            };
            PeriodogramPoint {
                period: trial,
                power: power.clamp(0.0, 1.0),
            }
        })
        .collect();

    Ok(points)
}
