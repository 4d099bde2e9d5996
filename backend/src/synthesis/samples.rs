//! Reference curve library.
//!
//! Confirmed planets and known false positives, generated fresh on each call
//! so the noise differs between page views unless the caller seeds the RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::transit::DipProfile;
use super::variants::{
    box_dips, data_artifact, eclipsing_binary, linear_trend, pure_noise, starspot_modulation,
    stellar_flare, ArtifactParams, DipWindow, EclipsingBinaryParams, FlareParams, StarspotParams,
};
use super::{jitter, require_non_negative, require_points, require_positive, SynthesisResult};
use crate::models::{LightCurveSample, LightCurveSeries, BASELINE_FLUX};

const EXOPLANET_POINTS: usize = 60;
const EXOPLANET_CENTER: f64 = 30.0;
const COMPARISON_POINTS: usize = 60;

const ANALYSIS_POINTS: usize = 101;
const ANALYSIS_CENTER: f64 = 50.0;
const ANALYSIS_HALF_WINDOW: f64 = 5.0;
const ANALYSIS_SIGMA: f64 = 3.0;
const ANALYSIS_DEPTH: f64 = 0.0042;
const ANALYSIS_NOISE: f64 = 0.00025;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    Exoplanet,
    FalsePositive,
}

/// A labelled curve shown next to a candidate for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    pub id: String,
    pub name: String,
    pub kind: SampleKind,
    pub description: String,
    /// Hex color used when plotting
    pub color: String,
    pub data: LightCurveSeries,
}

impl ReferenceCurve {
    fn new(
        id: &str,
        name: &str,
        kind: SampleKind,
        description: &str,
        color: &str,
        data: LightCurveSeries,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            description: description.to_string(),
            color: color.to_string(),
            data,
        }
    }
}

/// All comparison sets in one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleLibrary {
    pub exoplanets: Vec<ReferenceCurve>,
    pub false_positives: Vec<ReferenceCurve>,
    /// Simplified shapes for the analysis dashboard
    pub comparisons: Vec<ReferenceCurve>,
    pub analysis: AnalysisCurve,
}

/// Measured properties shown beside the analysis curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReadouts {
    pub period: String,
    pub transit_duration: String,
    pub transit_depth: String,
    pub signal_to_noise: String,
}

/// The primary curve of the analysis dashboard: one Gaussian transit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisCurve {
    pub light_curve: LightCurveSeries,
    pub readouts: AnalysisReadouts,
}

impl AnalysisCurve {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let samples = (0..ANALYSIS_POINTS)
            .map(|i| {
                let time = i as f64;
                let offset = time - ANALYSIS_CENTER;
                let mut flux = BASELINE_FLUX;
                if offset.abs() <= ANALYSIS_HALF_WINDOW {
                    flux -= ANALYSIS_DEPTH
                        * (-offset.powi(2) / (2.0 * ANALYSIS_SIGMA * ANALYSIS_SIGMA)).exp();
                }
                LightCurveSample::new(time, flux + jitter(rng, ANALYSIS_NOISE))
            })
            .collect();
        Self {
            light_curve: LightCurveSeries::from_ordered(samples),
            readouts: AnalysisReadouts {
                period: "3.886 days".to_string(),
                transit_duration: "1.2 hours".to_string(),
                transit_depth: format!("{} ({:.2}%)", ANALYSIS_DEPTH, ANALYSIS_DEPTH * 100.0),
                signal_to_noise: "12.7".to_string(),
            },
        }
    }
}

impl SampleLibrary {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> SynthesisResult<Self> {
        Ok(Self {
            exoplanets: exoplanet_samples(rng)?,
            false_positives: false_positive_samples(rng)?,
            comparisons: comparison_samples(rng)?,
            analysis: AnalysisCurve::generate(rng),
        })
    }
}

/// Gaussian dip on an index grid, zero outside `|i - center| <= width`.
pub fn gaussian_dip<R: Rng + ?Sized>(
    num_points: usize,
    center: f64,
    depth: f64,
    width: f64,
    noise_level: f64,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    require_points(num_points)?;
    require_positive("width", width)?;
    require_non_negative("depth", depth)?;
    require_non_negative("noise_level", noise_level)?;

    let samples = (0..num_points)
        .map(|i| {
            let time = i as f64;
            let offset = time - center;
            let mut flux = BASELINE_FLUX;
            if offset.abs() <= width {
                flux -= depth * DipProfile::Gaussian.multiplier(offset / width);
            }
            LightCurveSample::new(time, flux + jitter(rng, noise_level))
        })
        .collect();
    Ok(LightCurveSeries::from_ordered(samples))
}

/// Confirmed planets: shallow, symmetric dips of varying width.
pub fn exoplanet_samples<R: Rng + ?Sized>(rng: &mut R) -> SynthesisResult<Vec<ReferenceCurve>> {
    // (id, name, description, color, depth, width, noise)
    let table = [
        (
            "kepler-186f",
            "Kepler-186f",
            "Earth-sized planet in habitable zone of M-dwarf",
            "#47EAE9",
            0.0042,
            2.5,
            0.00015,
        ),
        (
            "toi-715b",
            "TOI-715 b",
            "Earth-sized planet, 19.3-day orbit",
            "#60a5fa",
            0.008,
            3.0,
            0.0002,
        ),
        (
            "trappist-1e",
            "TRAPPIST-1 e",
            "Rocky planet in habitable zone",
            "#38bdf8",
            0.0065,
            2.0,
            0.00025,
        ),
        (
            "lhs-1140b",
            "LHS 1140 b",
            "Super-Earth, potential ocean world",
            "#0ea5e9",
            0.012,
            4.0,
            0.00015,
        ),
    ];

    table
        .iter()
        .map(|&(id, name, description, color, depth, width, noise)| {
            let data = gaussian_dip(EXOPLANET_POINTS, EXOPLANET_CENTER, depth, width, noise, rng)?;
            Ok(ReferenceCurve::new(
                id,
                name,
                SampleKind::Exoplanet,
                description,
                color,
                data,
            ))
        })
        .collect()
}

/// The four classic impostors.
pub fn false_positive_samples<R: Rng + ?Sized>(
    rng: &mut R,
) -> SynthesisResult<Vec<ReferenceCurve>> {
    Ok(vec![
        ReferenceCurve::new(
            "eclipsing-binary",
            "Eclipsing Binary",
            SampleKind::FalsePositive,
            "Deep V-shaped eclipse from two stars orbiting each other. Much deeper and sharper than planetary transits.",
            "#f87171",
            eclipsing_binary(&EclipsingBinaryParams::default(), rng)?,
        ),
        ReferenceCurve::new(
            "stellar-flare",
            "Stellar Flare",
            SampleKind::FalsePositive,
            "Sudden brightening from magnetic activity on M-dwarf stars. The opposite of a transit!",
            "#fbbf24",
            stellar_flare(&FlareParams::default(), rng)?,
        ),
        ReferenceCurve::new(
            "starspot-modulation",
            "Starspot Modulation",
            SampleKind::FalsePositive,
            "Quasi-periodic dips from dark spots rotating in and out of view: irregular and repeating.",
            "#fb923c",
            starspot_modulation(&StarspotParams::default(), rng)?,
        ),
        ReferenceCurve::new(
            "cosmic-ray",
            "Data Artifact",
            SampleKind::FalsePositive,
            "Single sharp dip from cosmic ray hit or data glitch, not periodic.",
            "#ef4444",
            data_artifact(&ArtifactParams::default(), rng)?,
        ),
    ])
}

/// Simplified shapes for side-by-side comparison on the analysis view.
pub fn comparison_samples<R: Rng + ?Sized>(rng: &mut R) -> SynthesisResult<Vec<ReferenceCurve>> {
    Ok(vec![
        ReferenceCurve::new(
            "noise",
            "Noise",
            SampleKind::FalsePositive,
            "Random scatter with no coherent dip.",
            "#a3a3a3",
            pure_noise(COMPARISON_POINTS, 0.005, 1.0, rng)?,
        ),
        ReferenceCurve::new(
            "flat-eclipse",
            "Eclipsing Binary",
            SampleKind::FalsePositive,
            "Flat, very deep eclipse lasting many samples.",
            "#f87171",
            box_dips(COMPARISON_POINTS, &[DipWindow::new(26, 34, 0.05)], 0.0, 1.0, rng)?,
        ),
        ReferenceCurve::new(
            "two-dips",
            "Two Dips",
            SampleKind::FalsePositive,
            "Two shallow dips that do not repeat at a fixed period.",
            "#fb923c",
            box_dips(
                COMPARISON_POINTS,
                &[DipWindow::new(21, 24, 0.005), DipWindow::new(41, 44, 0.005)],
                0.0,
                1.0,
                rng,
            )?,
        ),
        ReferenceCurve::new(
            "trend",
            "Trend",
            SampleKind::FalsePositive,
            "Slow downward drift from instrument systematics.",
            "#ef4444",
            linear_trend(COMPARISON_POINTS, 0.0002, 0.00025, 1.0, rng)?,
        ),
    ])
}
