//! Questionnaire answers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of guided questions in the questionnaire.
pub const QUESTION_COUNT: usize = 4;

/// A user's answer to a guided question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Yes,
    No,
    NotSure,
}

impl Answer {
    pub const ALL: [Answer; 3] = [Answer::Yes, Answer::No, Answer::NotSure];

    /// Label shown on the answer buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::NotSure => "Not sure",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label used wherever an unanswered slot is displayed.
pub const NOT_ANSWERED: &str = "Not answered";

/// Fixed-length answer slots, `None` meaning unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    slots: Vec<Option<Answer>>,
}

impl Default for AnswerSet {
    fn default() -> Self {
        Self::new(QUESTION_COUNT)
    }
}

impl AnswerSet {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Answer at `index`; `None` when unanswered or out of range.
    pub fn get(&self, index: usize) -> Option<Answer> {
        self.slots.get(index).copied().flatten()
    }

    /// Fill or clear one slot. Returns `false` when `index` is out of range.
    pub fn set(&mut self, index: usize, answer: Option<Answer>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = answer;
                true
            }
            None => false,
        }
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Clear every slot, keeping the length.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn slots(&self) -> &[Option<Answer>] {
        &self.slots
    }

    /// Display label for a slot, falling back to [`NOT_ANSWERED`].
    pub fn label_at(&self, index: usize) -> &'static str {
        self.get(index).map_or(NOT_ANSWERED, |a| a.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_answer_set_is_unanswered() {
        let answers = AnswerSet::default();
        assert_eq!(answers.len(), QUESTION_COUNT);
        assert_eq!(answers.slots(), &[None, None, None, None]);
        assert!(!answers.is_complete());
    }

    #[test]
    fn test_get_out_of_range_is_unanswered() {
        let answers = AnswerSet::default();
        assert_eq!(answers.get(99), None);
        assert_eq!(answers.label_at(99), NOT_ANSWERED);
    }

    #[test]
    fn test_set_and_reset() {
        let mut answers = AnswerSet::default();
        assert!(answers.set(0, Some(Answer::Yes)));
        assert!(answers.set(3, Some(Answer::NotSure)));
        assert!(!answers.set(4, Some(Answer::No)));
        assert_eq!(answers.answered_count(), 2);
        assert_eq!(answers.label_at(3), "Not sure");

        answers.reset();
        assert_eq!(answers.answered_count(), 0);
        assert_eq!(answers.len(), QUESTION_COUNT);
    }

    #[test]
    fn test_answer_serde_names() {
        assert_eq!(serde_json::to_string(&Answer::NotSure).unwrap(), "\"not_sure\"");
        let parsed: Answer = serde_json::from_str("\"yes\"").unwrap();
        assert_eq!(parsed, Answer::Yes);
    }
}
