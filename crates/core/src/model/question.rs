use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── OPTION KEYS ───────────────────────────────────────────────────────────────
//

/// Label identifying one answer choice of a question.
///
/// Both the generator and the manual authoring form emit exactly four
/// choices keyed "A" through "D".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// All keys in display order.
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not a valid option key: {0:?}")]
pub struct ParseOptionKeyError(pub String);

impl FromStr for OptionKey {
    type Err = ParseOptionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(OptionKey::A),
            "B" => Ok(OptionKey::B),
            "C" => Ok(OptionKey::C),
            "D" => Ok(OptionKey::D),
            other => Err(ParseOptionKeyError(other.to_owned())),
        }
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("option {0} has empty text")]
    EmptyOptionText(OptionKey),

    #[error("correct key {0} is not among the offered options")]
    AnswerNotAmongOptions(OptionKey),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question as received from the generator or the authoring form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: BTreeMap<OptionKey, String>,
    pub correct_key: OptionKey,
    pub explanation: String,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, fewer than two
    /// options are offered, any option text is blank, or the correct key
    /// does not name an offered option.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions(self.options.len()));
        }
        for (key, text) in &self.options {
            if text.trim().is_empty() {
                return Err(QuestionError::EmptyOptionText(*key));
            }
        }
        if !self.options.contains_key(&self.correct_key) {
            return Err(QuestionError::AnswerNotAmongOptions(self.correct_key));
        }

        Ok(Question {
            prompt: self.prompt,
            options: self.options,
            correct_key: self.correct_key,
            explanation: self.explanation,
        })
    }
}

/// One validated multiple-choice question. Immutable once built.
///
/// Deserialization re-enters `QuestionDraft::validate`; stored documents
/// cannot bypass it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft")]
pub struct Question {
    prompt: String,
    options: BTreeMap<OptionKey, String>,
    correct_key: OptionKey,
    explanation: String,
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Offered options in key order.
    #[must_use]
    pub fn options(&self) -> &BTreeMap<OptionKey, String> {
        &self.options
    }

    /// Text of the option under `key`, if offered.
    #[must_use]
    pub fn option_text(&self, key: OptionKey) -> Option<&str> {
        self.options.get(&key).map(String::as_str)
    }

    #[must_use]
    pub fn has_option(&self, key: OptionKey) -> bool {
        self.options.contains_key(&key)
    }

    #[must_use]
    pub fn correct_key(&self) -> OptionKey {
        self.correct_key
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_text(&self) -> &str {
        // Validation guarantees the correct key is present.
        self.options
            .get(&self.correct_key)
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            prompt: "What is 2 + 2?".into(),
            options: BTreeMap::from([
                (OptionKey::A, "3".into()),
                (OptionKey::B, "4".into()),
                (OptionKey::C, "5".into()),
                (OptionKey::D, "22".into()),
            ]),
            correct_key: OptionKey::B,
            explanation: "Basic arithmetic.".into(),
        }
    }

    #[test]
    fn valid_draft_passes() {
        let q = draft().validate().unwrap();
        assert_eq!(q.correct_text(), "4");
        assert!(q.has_option(OptionKey::D));
    }

    #[test]
    fn blank_prompt_fails() {
        let mut d = draft();
        d.prompt = "   ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyPrompt);
    }

    #[test]
    fn missing_correct_key_fails() {
        let mut d = draft();
        d.options.remove(&OptionKey::B);
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::AnswerNotAmongOptions(OptionKey::B)
        );
    }

    #[test]
    fn blank_option_text_fails() {
        let mut d = draft();
        d.options.insert(OptionKey::C, " ".into());
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::EmptyOptionText(OptionKey::C)
        );
    }

    #[test]
    fn single_option_fails() {
        let mut d = draft();
        d.options = BTreeMap::from([(OptionKey::A, "only".into())]);
        d.correct_key = OptionKey::A;
        assert_eq!(d.validate().unwrap_err(), QuestionError::TooFewOptions(1));
    }

    #[test]
    fn deserialization_reenters_validation() {
        let payload = r#"{
            "prompt": "Pick one",
            "options": { "A": "yes", "B": "no" },
            "correct_key": "D",
            "explanation": "D is not offered"
        }"#;

        let err = serde_json::from_str::<Question>(payload).unwrap_err();
        assert!(err.to_string().contains("not among the offered options"));
    }

    #[test]
    fn option_key_parses_letters() {
        assert_eq!("C".parse::<OptionKey>().unwrap(), OptionKey::C);
        assert!("E".parse::<OptionKey>().is_err());
    }
}
