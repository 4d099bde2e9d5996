//! Non-transit signal generators.
//!
//! These reproduce the shapes a reviewer must learn to tell apart from a
//! planetary transit. Time is the sample index scaled by `cadence_days`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    jitter, require_non_negative, require_points, require_positive, SynthesisError,
    SynthesisResult,
};
use crate::models::{LightCurveSample, LightCurveSeries, BASELINE_FLUX};

fn build_series<R, F>(
    num_points: usize,
    cadence_days: f64,
    noise_level: f64,
    rng: &mut R,
    model: F,
) -> LightCurveSeries
where
    R: Rng + ?Sized,
    F: Fn(usize) -> f64,
{
    let samples = (0..num_points)
        .map(|i| {
            let flux = model(i) + jitter(rng, noise_level);
            LightCurveSample::new(i as f64 * cadence_days, flux)
        })
        .collect();
    LightCurveSeries::from_ordered(samples)
}

fn validate_common(num_points: usize, cadence_days: f64, noise_level: f64) -> SynthesisResult<()> {
    require_points(num_points)?;
    require_positive("cadence_days", cadence_days)?;
    require_non_negative("noise_level", noise_level)
}

fn require_index(parameter: &'static str, index: usize, num_points: usize) -> SynthesisResult<()> {
    if index < num_points {
        Ok(())
    } else {
        Err(SynthesisError::invalid(
            parameter,
            format!("index {} outside series of {} points", index, num_points),
        ))
    }
}

/// Two stars eclipsing each other: deep, V-shaped dip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipsingBinaryParams {
    pub num_points: usize,
    pub center_index: usize,
    /// Samples from the center to the dip edge
    pub half_width: usize,
    pub depth: f64,
    pub noise_level: f64,
    pub cadence_days: f64,
}

impl Default for EclipsingBinaryParams {
    fn default() -> Self {
        Self {
            num_points: 80,
            center_index: 40,
            half_width: 5,
            depth: 0.18,
            noise_level: 0.0005,
            cadence_days: 1.0,
        }
    }
}

pub fn eclipsing_binary<R: Rng + ?Sized>(
    params: &EclipsingBinaryParams,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    validate_common(params.num_points, params.cadence_days, params.noise_level)?;
    require_index("center_index", params.center_index, params.num_points)?;
    if params.half_width == 0 {
        return Err(SynthesisError::invalid("half_width", "must be > 0"));
    }
    if params.depth <= 0.0 || params.depth >= 1.0 {
        return Err(SynthesisError::invalid("depth", "must be in (0, 1)"));
    }

    let center = params.center_index as f64;
    let half = params.half_width as f64;
    Ok(build_series(
        params.num_points,
        params.cadence_days,
        params.noise_level,
        rng,
        |i| {
            let distance = (i as f64 - center).abs();
            if distance <= half {
                BASELINE_FLUX - params.depth * (1.0 - distance / half)
            } else {
                BASELINE_FLUX
            }
        },
    ))
}

/// Magnetic flare: a short Gaussian brightening above the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlareParams {
    pub num_points: usize,
    pub peak_index: usize,
    pub half_width: usize,
    pub amplitude: f64,
    pub noise_level: f64,
    pub cadence_days: f64,
}

impl Default for FlareParams {
    fn default() -> Self {
        Self {
            num_points: 80,
            peak_index: 40,
            half_width: 2,
            amplitude: 0.09,
            noise_level: 0.0004,
            cadence_days: 1.0,
        }
    }
}

pub fn stellar_flare<R: Rng + ?Sized>(
    params: &FlareParams,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    validate_common(params.num_points, params.cadence_days, params.noise_level)?;
    require_index("peak_index", params.peak_index, params.num_points)?;
    require_positive("amplitude", params.amplitude)?;

    let peak = params.peak_index as f64;
    let half = params.half_width as f64;
    Ok(build_series(
        params.num_points,
        params.cadence_days,
        params.noise_level,
        rng,
        |i| {
            let distance = (i as f64 - peak).abs();
            if distance <= half {
                BASELINE_FLUX + params.amplitude * (-2.0 * distance * distance).exp()
            } else {
                BASELINE_FLUX
            }
        },
    ))
}

/// A flat-bottomed dip over an inclusive index window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DipWindow {
    pub start: usize,
    pub end: usize,
    pub depth: f64,
}

impl DipWindow {
    pub fn new(start: usize, end: usize, depth: f64) -> Self {
        Self { start, end, depth }
    }

    fn contains(&self, i: usize) -> bool {
        i >= self.start && i <= self.end
    }
}

fn validate_windows(windows: &[DipWindow], num_points: usize) -> SynthesisResult<()> {
    for window in windows {
        if window.start > window.end {
            return Err(SynthesisError::invalid("dips", "window start after end"));
        }
        require_index("dips", window.end, num_points)?;
        require_non_negative("dips", window.depth)?;
    }
    Ok(())
}

/// Rotating dark spots: slow sinusoidal drift plus small uneven dips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarspotParams {
    pub num_points: usize,
    pub drift_amplitude: f64,
    /// Radians per sample
    pub drift_frequency: f64,
    pub dips: Vec<DipWindow>,
    pub noise_level: f64,
    pub cadence_days: f64,
}

impl Default for StarspotParams {
    fn default() -> Self {
        Self {
            num_points: 80,
            drift_amplitude: 0.008,
            drift_frequency: 0.3,
            dips: vec![DipWindow::new(20, 24, 0.003), DipWindow::new(50, 54, 0.004)],
            noise_level: 0.0003,
            cadence_days: 1.0,
        }
    }
}

pub fn starspot_modulation<R: Rng + ?Sized>(
    params: &StarspotParams,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    validate_common(params.num_points, params.cadence_days, params.noise_level)?;
    require_non_negative("drift_amplitude", params.drift_amplitude)?;
    validate_windows(&params.dips, params.num_points)?;

    Ok(build_series(
        params.num_points,
        params.cadence_days,
        params.noise_level,
        rng,
        |i| {
            let drift = params.drift_amplitude * (1.0 + (i as f64 * params.drift_frequency).sin());
            let dips: f64 = params
                .dips
                .iter()
                .filter(|w| w.contains(i))
                .map(|w| w.depth)
                .sum();
            BASELINE_FLUX - drift - dips
        },
    ))
}

/// Cosmic ray or glitch: one sample pulled down, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtifactParams {
    pub num_points: usize,
    pub index: usize,
    pub flux: f64,
    pub noise_level: f64,
    pub cadence_days: f64,
}

impl Default for ArtifactParams {
    fn default() -> Self {
        Self {
            num_points: 80,
            index: 40,
            flux: 0.96,
            noise_level: 0.00025,
            cadence_days: 1.0,
        }
    }
}

pub fn data_artifact<R: Rng + ?Sized>(
    params: &ArtifactParams,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    validate_common(params.num_points, params.cadence_days, params.noise_level)?;
    require_index("index", params.index, params.num_points)?;
    require_positive("flux", params.flux)?;

    Ok(build_series(
        params.num_points,
        params.cadence_days,
        params.noise_level,
        rng,
        |i| if i == params.index { params.flux } else { BASELINE_FLUX },
    ))
}

/// Baseline plus jitter, no structure.
pub fn pure_noise<R: Rng + ?Sized>(
    num_points: usize,
    noise_level: f64,
    cadence_days: f64,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    validate_common(num_points, cadence_days, noise_level)?;
    Ok(build_series(num_points, cadence_days, noise_level, rng, |_| {
        BASELINE_FLUX
    }))
}

/// Flat-bottomed dips at the given windows, baseline elsewhere.
pub fn box_dips<R: Rng + ?Sized>(
    num_points: usize,
    dips: &[DipWindow],
    noise_level: f64,
    cadence_days: f64,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    validate_common(num_points, cadence_days, noise_level)?;
    validate_windows(dips, num_points)?;
    Ok(build_series(num_points, cadence_days, noise_level, rng, |i| {
        dips.iter()
            .find(|w| w.contains(i))
            .map_or(BASELINE_FLUX, |w| BASELINE_FLUX - w.depth)
    }))
}

/// Slow linear drift, typical of instrumental systematics.
pub fn linear_trend<R: Rng + ?Sized>(
    num_points: usize,
    slope_per_sample: f64,
    noise_level: f64,
    cadence_days: f64,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    validate_common(num_points, cadence_days, noise_level)?;
    if !slope_per_sample.is_finite() {
        return Err(SynthesisError::invalid("slope_per_sample", "must be finite"));
    }
    Ok(build_series(num_points, cadence_days, noise_level, rng, |i| {
        BASELINE_FLUX - i as f64 * slope_per_sample
    }))
}
