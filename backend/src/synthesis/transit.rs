//! Planetary transit synthesis.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use super::{
    jitter, require_finite, require_non_negative, require_points, require_positive,
    SynthesisError, SynthesisResult,
};
use crate::models::{LightCurveSample, LightCurveSeries, BASELINE_FLUX};

/// Shape of the dip inside the transit window.
///
/// Both profiles are symmetric, peak at `u = 0` and are (near) zero at the
/// window edges `u = ±1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DipProfile {
    /// `cos(u·π/2)`
    #[default]
    Cosine,
    /// `exp(−2u²)`
    Gaussian,
}

impl DipProfile {
    /// Dip multiplier for normalized window position `u ∈ [−1, 1]`.
    pub fn multiplier(&self, u: f64) -> f64 {
        match self {
            DipProfile::Cosine => (u * FRAC_PI_2).cos(),
            DipProfile::Gaussian => (-2.0 * u * u).exp(),
        }
    }
}

fn default_span_multiplier() -> f64 {
    2.0
}

/// Physical parameters of a transit light curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitParameters {
    pub period_days: f64,
    /// Fractional dip depth in (0, 1)
    pub transit_depth: f64,
    pub transit_duration_days: f64,
    /// Uniform jitter amplitude
    pub noise_level: f64,
    pub num_points: usize,
    /// Number of periods covered by the series
    #[serde(default = "default_span_multiplier")]
    pub span_multiplier: f64,
    #[serde(default)]
    pub profile: DipProfile,
}

impl TransitParameters {
    pub fn new(
        period_days: f64,
        transit_depth: f64,
        transit_duration_days: f64,
        noise_level: f64,
        num_points: usize,
    ) -> Self {
        Self {
            period_days,
            transit_depth,
            transit_duration_days,
            noise_level,
            num_points,
            span_multiplier: default_span_multiplier(),
            profile: DipProfile::default(),
        }
    }

    pub fn with_span(mut self, span_multiplier: f64) -> Self {
        self.span_multiplier = span_multiplier;
        self
    }

    pub fn with_profile(mut self, profile: DipProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_noise(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    pub fn half_duration(&self) -> f64 {
        self.transit_duration_days / 2.0
    }

    /// Phase of the dip center within one period.
    pub fn dip_center(&self) -> f64 {
        self.period_days / 2.0
    }

    /// Check every invariant; nothing is clamped.
    pub fn validate(&self) -> SynthesisResult<()> {
        require_points(self.num_points)?;
        require_positive("period_days", self.period_days)?;
        require_finite("transit_depth", self.transit_depth)?;
        if self.transit_depth <= 0.0 || self.transit_depth >= 1.0 {
            return Err(SynthesisError::invalid(
                "transit_depth",
                format!("must be in (0, 1) (got {})", self.transit_depth),
            ));
        }
        require_positive("transit_duration_days", self.transit_duration_days)?;
        if self.transit_duration_days >= self.period_days {
            return Err(SynthesisError::invalid(
                "transit_duration_days",
                format!(
                    "must be shorter than the period ({} >= {})",
                    self.transit_duration_days, self.period_days
                ),
            ));
        }
        require_non_negative("noise_level", self.noise_level)?;
        require_positive("span_multiplier", self.span_multiplier)?;
        self.validate_time_axis()
    }

    /// The sampled window must be finite and resolvable into distinct times.
    fn validate_time_axis(&self) -> SynthesisResult<()> {
        let window = self.period_days * self.span_multiplier;
        if !window.is_normal() {
            return Err(SynthesisError::invalid(
                "span_multiplier",
                format!(
                    "period_days * span_multiplier must be a finite normal number (got {})",
                    window
                ),
            ));
        }
        if self.num_points >= 2 {
            let n = self.num_points;
            let step = self.sample_time(n - 1) - self.sample_time(n - 2);
            if !(step > 0.0 && step.is_normal()) {
                return Err(SynthesisError::invalid(
                    "num_points",
                    format!("too many points for a {} day window", window),
                ));
            }
        }
        Ok(())
    }

    /// Noise-free flux at absolute time `t`.
    pub fn model_flux(&self, t: f64) -> f64 {
        let phase = t.rem_euclid(self.period_days);
        let offset = phase - self.dip_center();
        let half = self.half_duration();
        if offset.abs() <= half {
            let u = offset / half;
            BASELINE_FLUX - self.transit_depth * self.profile.multiplier(u)
        } else {
            BASELINE_FLUX
        }
    }

    /// Time of sample `i`.
    pub fn sample_time(&self, i: usize) -> f64 {
        (i as f64 / self.num_points as f64) * self.period_days * self.span_multiplier
    }
}

/// Synthesize a transit light curve.
///
/// Samples are spread over `span_multiplier` periods; the dip sits in the
/// middle of each period. Noise is drawn independently per sample.
pub fn synthesize_transit<R: Rng + ?Sized>(
    params: &TransitParameters,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    params.validate()?;

    let samples: Vec<LightCurveSample> = (0..params.num_points)
        .map(|i| {
            let time = params.sample_time(i);
            let flux = params.model_flux(time) + jitter(rng, params.noise_level);
            LightCurveSample::new(time, flux)
        })
        .collect();

    debug!(
        "Synthesized transit: {} points, period={}d, depth={}, duration={}d",
        samples.len(),
        params.period_days,
        params.transit_depth,
        params.transit_duration_days
    );

    LightCurveSeries::new(samples)
        .map_err(|e| SynthesisError::invalid("span_multiplier", e.to_string()))
}
