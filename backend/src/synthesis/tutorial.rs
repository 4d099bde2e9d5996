//! Tutorial curve: one orbital period drawn over a normalized time axis,
//! with a marker that sweeps across it in real time.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

use super::{require_positive, require_points, SynthesisError, SynthesisResult};
use crate::models::{LightCurveSample, LightCurveSeries, BASELINE_FLUX};

/// Position of the sweeping marker at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TutorialMarker {
    /// Fraction of the period elapsed, in `[0, 1)`
    pub fraction: f64,
    pub flux: f64,
    pub in_transit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TutorialCurve {
    pub transit_depth: f64,
    /// Wall-clock length of one animated period
    pub period_seconds: f64,
    /// Number of segments; the curve has `points + 1` samples
    pub points: usize,
    pub dip_center: f64,
    pub dip_half_width: f64,
}

impl Default for TutorialCurve {
    fn default() -> Self {
        Self {
            transit_depth: 0.012,
            period_seconds: 5.0,
            points: 500,
            dip_center: 0.5,
            dip_half_width: 0.2,
        }
    }
}

impl TutorialCurve {
    pub fn validate(&self) -> SynthesisResult<()> {
        require_positive("transit_depth", self.transit_depth)?;
        require_positive("period_seconds", self.period_seconds)?;
        require_points(self.points)?;
        require_positive("dip_half_width", self.dip_half_width)?;
        if !(0.0..=1.0).contains(&self.dip_center) {
            return Err(SynthesisError::invalid("dip_center", "must be in [0, 1]"));
        }
        Ok(())
    }

    pub fn in_transit(&self, fraction: f64) -> bool {
        (fraction - self.dip_center).abs() <= self.dip_half_width
    }

    pub fn flux_at(&self, fraction: f64) -> f64 {
        if self.in_transit(fraction) {
            let u = (fraction - self.dip_center) / self.dip_half_width;
            BASELINE_FLUX - self.transit_depth * (u * FRAC_PI_2).cos()
        } else {
            BASELINE_FLUX
        }
    }

    /// The whole period, noise-free, time in fractions of a period.
    pub fn curve(&self) -> SynthesisResult<LightCurveSeries> {
        self.validate()?;
        let samples = (0..=self.points)
            .map(|i| {
                let t = i as f64 / self.points as f64;
                LightCurveSample::new(t, self.flux_at(t))
            })
            .collect();
        Ok(LightCurveSeries::from_ordered(samples))
    }

    pub fn fraction_at(&self, elapsed: Duration) -> f64 {
        (elapsed.as_secs_f64() % self.period_seconds) / self.period_seconds
    }

    pub fn marker_at(&self, elapsed: Duration) -> TutorialMarker {
        let fraction = self.fraction_at(elapsed);
        TutorialMarker {
            fraction,
            flux: self.flux_at(fraction),
            in_transit: self.in_transit(fraction),
        }
    }
}
