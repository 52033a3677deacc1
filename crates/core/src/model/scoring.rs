use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::question::{OptionKey, Question};

//
// ─── SELECTED ANSWER ───────────────────────────────────────────────────────────
//

/// What the user had stored for a question at submission time.
///
/// Unanswered questions carry an explicit sentinel instead of omitting the
/// field, so result displays stay uniform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectedAnswer {
    Chosen { key: OptionKey, text: String },
    Unanswered,
}

impl SelectedAnswer {
    #[must_use]
    pub fn is_unanswered(&self) -> bool {
        matches!(self, SelectedAnswer::Unanswered)
    }
}

impl fmt::Display for SelectedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectedAnswer::Chosen { text, .. } => f.write_str(text),
            SelectedAnswer::Unanswered => f.write_str("Not Answered"),
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// One question's scored detail, in quiz order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub prompt: String,
    pub selected: SelectedAnswer,
    pub correct_text: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// Immutable snapshot produced at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
    score: u32,
    total: u32,
    time_taken_seconds: u64,
    outcomes: Vec<QuestionOutcome>,
}

impl ExamResult {
    /// Number of correctly answered questions.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn time_taken_seconds(&self) -> u64 {
        self.time_taken_seconds
    }

    /// Per-question details, preserving quiz order.
    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    /// True when every question was answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

//
// ─── SCORER ────────────────────────────────────────────────────────────────────
//

/// Score a finished attempt.
///
/// Pure and deterministic: no I/O, no clock reads. `time_taken_seconds` is
/// computed by the caller from the session's start timestamp. Unanswered
/// questions always score incorrect and surface as
/// `SelectedAnswer::Unanswered`.
#[must_use]
pub fn score_exam(
    questions: &[Question],
    answers: &BTreeMap<usize, OptionKey>,
    time_taken_seconds: u64,
) -> ExamResult {
    let mut score = 0_u32;
    let mut outcomes = Vec::with_capacity(questions.len());

    for (index, question) in questions.iter().enumerate() {
        let selected = match answers.get(&index) {
            Some(&key) => SelectedAnswer::Chosen {
                key,
                text: question.option_text(key).unwrap_or_default().to_owned(),
            },
            None => SelectedAnswer::Unanswered,
        };
        let is_correct = matches!(
            &selected,
            SelectedAnswer::Chosen { key, .. } if *key == question.correct_key()
        );
        if is_correct {
            score += 1;
        }

        outcomes.push(QuestionOutcome {
            prompt: question.prompt().to_owned(),
            selected,
            correct_text: question.correct_text().to_owned(),
            is_correct,
            explanation: question.explanation().to_owned(),
        });
    }

    ExamResult {
        score,
        total: u32::try_from(questions.len()).unwrap_or(u32::MAX),
        time_taken_seconds,
        outcomes,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QuestionDraft;

    fn question(correct: OptionKey) -> Question {
        QuestionDraft {
            prompt: format!("prompt {correct}"),
            options: BTreeMap::from([
                (OptionKey::A, "alpha".into()),
                (OptionKey::B, "bravo".into()),
                (OptionKey::C, "charlie".into()),
                (OptionKey::D, "delta".into()),
            ]),
            correct_key: correct,
            explanation: format!("why {correct}"),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn scores_three_of_five_with_wrong_and_unanswered() {
        let questions: Vec<_> = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D, OptionKey::A]
            .into_iter()
            .map(question)
            .collect();
        // Index 2 answered wrong (D != C), index 3 left unanswered.
        let answers = BTreeMap::from([
            (0, OptionKey::A),
            (1, OptionKey::B),
            (2, OptionKey::D),
            (4, OptionKey::A),
        ]);

        let result = score_exam(&questions, &answers, 42);

        assert_eq!(result.score(), 3);
        assert_eq!(result.total(), 5);
        assert_eq!(result.time_taken_seconds(), 42);
        let correct_flags: Vec<_> = result.outcomes().iter().map(|o| o.is_correct).collect();
        assert_eq!(correct_flags, vec![true, true, false, false, true]);
        assert!(!result.is_perfect());
    }

    #[test]
    fn unanswered_question_reports_the_sentinel() {
        let questions = vec![question(OptionKey::B)];
        let result = score_exam(&questions, &BTreeMap::new(), 0);

        let outcome = &result.outcomes()[0];
        assert!(outcome.selected.is_unanswered());
        assert!(!outcome.is_correct);
        assert_eq!(outcome.selected.to_string(), "Not Answered");
        assert_eq!(outcome.correct_text, "bravo");
    }

    #[test]
    fn outcomes_preserve_quiz_order() {
        let questions: Vec<_> = [OptionKey::A, OptionKey::C].into_iter().map(question).collect();
        let result = score_exam(&questions, &BTreeMap::new(), 7);
        let prompts: Vec<_> = result.outcomes().iter().map(|o| o.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["prompt A", "prompt C"]);
    }

    #[test]
    fn scoring_is_repeatable() {
        let questions = vec![question(OptionKey::D)];
        let answers = BTreeMap::from([(0, OptionKey::D)]);
        let first = score_exam(&questions, &answers, 10);
        let second = score_exam(&questions, &answers, 10);
        assert_eq!(first, second);
        assert!(first.is_perfect());
    }
}
