//! Synthetic light-curve generation.
//!
//! Every generator is a pure function of an explicit parameter struct plus an
//! injected random source. Pass a seeded [`rand::rngs::StdRng`] for
//! reproducible noise, or set the noise level to zero for bit-identical
//! output without caring about the generator at all.
//!
//! - [`transit`]: planetary transit with a smooth bell-shaped dip
//! - [`variants`]: false-positive shapes (eclipsing binary, flare, starspots,
//!   artifacts, noise, box dips, trends)
//! - [`periodogram`]: synthetic power-vs-period peak
//! - [`samples`]: reference curves used for comparison views
//! - [`tutorial`]: the animated one-period tutorial curve

pub mod periodogram;
pub mod samples;
pub mod transit;
pub mod tutorial;
pub mod variants;

#[cfg(test)]
#[path = "transit_tests.rs"]
mod transit_tests;

use rand::Rng;
use thiserror::Error;

pub use periodogram::{synthesize_periodogram, PeriodogramParams, PeriodogramPoint};
pub use samples::{AnalysisCurve, AnalysisReadouts, ReferenceCurve, SampleKind, SampleLibrary};
pub use transit::{synthesize_transit, DipProfile, TransitParameters};
pub use tutorial::{TutorialCurve, TutorialMarker};

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Errors raised before any sample is generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

impl SynthesisError {
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        SynthesisError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Uniform jitter centered at zero with amplitude `level`.
///
/// Draws nothing when `level` is zero so noiseless generation never touches
/// the random source.
pub(crate) fn jitter<R: Rng + ?Sized>(rng: &mut R, level: f64) -> f64 {
    if level == 0.0 {
        return 0.0;
    }
    (rng.gen::<f64>() - 0.5) * level * 2.0
}

pub(crate) fn require_finite(parameter: &'static str, value: f64) -> SynthesisResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SynthesisError::invalid(parameter, "must be finite"))
    }
}

pub(crate) fn require_positive(parameter: &'static str, value: f64) -> SynthesisResult<()> {
    require_finite(parameter, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SynthesisError::invalid(
            parameter,
            format!("must be > 0 (got {})", value),
        ))
    }
}

pub(crate) fn require_non_negative(parameter: &'static str, value: f64) -> SynthesisResult<()> {
    require_finite(parameter, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SynthesisError::invalid(
            parameter,
            format!("must be >= 0 (got {})", value),
        ))
    }
}

pub(crate) fn require_points(num_points: usize) -> SynthesisResult<()> {
    if num_points == 0 {
        Err(SynthesisError::invalid("num_points", "must be > 0"))
    } else {
        Ok(())
    }
}
