//! Light-curve sample and series types.
//!
//! A light curve is a time-ordered sequence of normalized flux measurements.
//! Series are immutable once built: every generator in [`crate::synthesis`]
//! produces a fresh [`LightCurveSeries`] and nothing mutates one in place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flux of an un-dimmed star.
pub const BASELINE_FLUX: f64 = 1.0;

/// A single (time, flux) point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightCurveSample {
    /// Elapsed time in days
    pub time: f64,
    /// Normalized brightness, 1.0 = baseline
    pub flux: f64,
}

impl LightCurveSample {
    pub fn new(time: f64, flux: f64) -> Self {
        Self { time, flux }
    }
}

/// Raised when raw samples do not form a valid series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("sample {index} has non-finite time or flux")]
    NonFinite { index: usize },

    #[error("time must be strictly increasing (sample {index}: {previous} -> {current})")]
    NonIncreasingTime {
        index: usize,
        previous: f64,
        current: f64,
    },
}

/// Ordered light-curve samples with strictly increasing time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LightCurveSample>", into = "Vec<LightCurveSample>")]
pub struct LightCurveSeries {
    samples: Vec<LightCurveSample>,
}

impl LightCurveSeries {
    /// Build a series, checking that every value is finite and time increases.
    pub fn new(samples: Vec<LightCurveSample>) -> Result<Self, SeriesError> {
        for (index, sample) in samples.iter().enumerate() {
            if !sample.time.is_finite() || !sample.flux.is_finite() {
                return Err(SeriesError::NonFinite { index });
            }
            if index > 0 {
                let previous = samples[index - 1].time;
                if sample.time <= previous {
                    return Err(SeriesError::NonIncreasingTime {
                        index,
                        previous,
                        current: sample.time,
                    });
                }
            }
        }
        Ok(Self { samples })
    }

    /// Build a series from samples the caller already generated in order.
    pub(crate) fn from_ordered(samples: Vec<LightCurveSample>) -> Self {
        debug_assert!(samples.windows(2).all(|w| w[0].time < w[1].time));
        Self { samples }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[LightCurveSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LightCurveSample> {
        self.samples.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn fluxes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.flux).collect()
    }

    /// Lowest flux, `None` for an empty series.
    pub fn min_flux(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.flux).reduce(f64::min)
    }

    /// Highest flux, `None` for an empty series.
    pub fn max_flux(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.flux).reduce(f64::max)
    }

    pub fn into_samples(self) -> Vec<LightCurveSample> {
        self.samples
    }
}

impl TryFrom<Vec<LightCurveSample>> for LightCurveSeries {
    type Error = SeriesError;

    fn try_from(samples: Vec<LightCurveSample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<LightCurveSeries> for Vec<LightCurveSample> {
    fn from(series: LightCurveSeries) -> Self {
        series.samples
    }
}

impl<'a> IntoIterator for &'a LightCurveSeries {
    type Item = &'a LightCurveSample;
    type IntoIter = std::slice::Iter<'a, LightCurveSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Flux-axis bounds handed to chart renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxAxisRange {
    pub min: f64,
    pub max: f64,
}

impl Default for FluxAxisRange {
    fn default() -> Self {
        Self {
            min: 0.992,
            max: 1.002,
        }
    }
}

impl FluxAxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Default range widened to cover the extremes of `series`.
    pub fn for_series(series: &LightCurveSeries) -> Self {
        let base = Self::default();
        match (series.min_flux(), series.max_flux()) {
            (Some(lo), Some(hi)) => Self {
                min: base.min.min(lo),
                max: base.max.max(hi),
            },
            _ => base,
        }
    }

    pub fn contains(&self, flux: f64) -> bool {
        flux >= self.min && flux <= self.max
    }
}
