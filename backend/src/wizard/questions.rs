//! The guided questionnaire.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Answer, LightCurveSeries, QUESTION_COUNT};
use crate::synthesis::variants::{box_dips, DipWindow};
use crate::synthesis::SynthesisResult;

const ILLUSTRATION_POINTS: usize = 120;
const ILLUSTRATION_NOISE: f64 = 0.0003;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub prompt: &'static str,
    pub explanation: &'static str,
}

pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        prompt: "Do you see a repeating pattern in the light curve (a dip in brightness that repeats)?",
        explanation: "Periodic dips suggest a transiting exoplanet. Random or single events are likely noise or stellar activity.",
    },
    Question {
        prompt: "Does the dip appear smooth and U-shaped, or is it irregular/noisy?",
        explanation: "Planetary transits produce smooth, symmetric U-shaped dips. Eclipsing binaries often show V-shaped or jagged dips.",
    },
    Question {
        prompt: "Did you notice more than one dip with different depths?",
        explanation: "Multiple dips of varying depths may indicate a multi-planet system orbiting the same star.",
    },
    Question {
        prompt: "Did the brightness drop only once and never repeat?",
        explanation: "A single non-repeating dip could be caused by instrumental noise, stellar flares, or other non-planetary events.",
    },
];

/// Everything needed to render one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub explanation: String,
    pub answer: Option<Answer>,
    pub can_advance: bool,
    pub is_last: bool,
    pub light_curve: LightCurveSeries,
}

/// Illustrative curve shown beside question `index`.
///
/// The first three questions show two dips of different depth; the last
/// shows a single dip. Indices past the end fall back to the single dip.
pub fn question_light_curve<R: Rng + ?Sized>(
    index: usize,
    rng: &mut R,
) -> SynthesisResult<LightCurveSeries> {
    let dips: Vec<DipWindow> = if index < QUESTION_COUNT - 1 {
        vec![DipWindow::new(30, 35, 0.0042), DipWindow::new(70, 75, 0.0035)]
    } else {
        vec![DipWindow::new(50, 55, 0.004)]
    };
    box_dips(ILLUSTRATION_POINTS, &dips, ILLUSTRATION_NOISE, 1.0, rng)
}
