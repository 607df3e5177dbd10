//! Session state for a sentence-evolution practice run.
//!
//! A [`SessionState`] is a plain value: one learner, one lesson, created at
//! start and dropped on close or completion. All mutation goes through
//! [`crate::core::SentenceEngine`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::formula::Formula;
use crate::core::token::BuiltSentence;

/// Where the session is in the step state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for the learner to build and check a sentence.
    Presenting { step: usize },
    /// A check is being evaluated.
    Validating { step: usize },
    /// The sentence was accepted; waiting for `advance`.
    Success { step: usize },
    /// Every formula has been accepted.
    Complete,
}

impl SessionPhase {
    /// Check if the session has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Complete)
    }

    /// Check if the learner can edit the sentence.
    pub fn accepts_edits(&self) -> bool {
        matches!(self, SessionPhase::Presenting { .. })
    }

    /// Step index the phase refers to, if any.
    pub fn step(&self) -> Option<usize> {
        match self {
            SessionPhase::Presenting { step }
            | SessionPhase::Validating { step }
            | SessionPhase::Success { step } => Some(*step),
            SessionPhase::Complete => None,
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Presenting { .. } => "presenting",
            SessionPhase::Validating { .. } => "validating",
            SessionPhase::Success { .. } => "success",
            SessionPhase::Complete => "complete",
        }
    }
}

/// Record of one accepted formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedStep {
    /// The formula that was accepted.
    pub formula_number: u32,
    /// The sentence as the learner built it.
    pub response: String,
    /// Checks made on this formula, including the successful one.
    pub attempts: u32,
    /// Time from the formula being presented to acceptance.
    pub elapsed_ms: u64,
    /// When the formula was accepted.
    pub accepted_at: DateTime<Utc>,
}

/// One learner's run through a lesson's formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Unique session identifier.
    pub id: String,
    /// Lesson the formulas came from.
    pub lesson_id: String,
    /// Learner driving the session.
    pub learner_id: String,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    pub(crate) formulas: Vec<Formula>,
    pub(crate) phase: SessionPhase,
    pub(crate) current_step_index: usize,
    pub(crate) previous_words: Vec<String>,
    pub(crate) built: BuiltSentence,
    pub(crate) attempts: u32,
    pub(crate) step_started_at: DateTime<Utc>,
    pub(crate) word_write_counts: HashMap<String, u32>,
    pub(crate) accepted: Vec<AcceptedStep>,
}

impl SessionState {
    /// Start a session over a checked, non-empty formula list.
    ///
    /// Formulas are expected to satisfy
    /// [`crate::core::check_formula_sequence`]; lesson sources run that check
    /// on load.
    pub fn new(
        lesson_id: impl Into<String>,
        learner_id: impl Into<String>,
        formulas: Vec<Formula>,
    ) -> Self {
        let now = Utc::now();
        let previous_words = formulas
            .first()
            .map(|f| f.previous_words.clone())
            .unwrap_or_default();
        let phase = if formulas.is_empty() {
            SessionPhase::Complete
        } else {
            SessionPhase::Presenting { step: 0 }
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            lesson_id: lesson_id.into(),
            learner_id: learner_id.into(),
            started_at: now,
            formulas,
            phase,
            current_step_index: 0,
            previous_words,
            built: BuiltSentence::new(),
            attempts: 0,
            step_started_at: now,
            word_write_counts: HashMap::new(),
            accepted: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Index of the formula being worked on.
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    /// The formula being worked on, or `None` once complete.
    pub fn current_formula(&self) -> Option<&Formula> {
        self.phase.step().and_then(|step| self.formulas.get(step))
    }

    /// All formulas in the session.
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// Words available for reuse at the current step.
    pub fn previous_words(&self) -> &[String] {
        &self.previous_words
    }

    /// The sentence under construction.
    pub fn built(&self) -> &BuiltSentence {
        &self.built
    }

    /// Failed checks on the current formula.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Cumulative appearances of each normalized word in accepted sentences.
    pub fn word_write_counts(&self) -> &HashMap<String, u32> {
        &self.word_write_counts
    }

    /// Count for one word (normalized by the caller).
    pub fn word_write_count(&self, word: &str) -> u32 {
        self.word_write_counts.get(word).copied().unwrap_or(0)
    }

    /// Accepted formulas in order.
    pub fn accepted(&self) -> &[AcceptedStep] {
        &self.accepted
    }

    /// Number of formulas accepted so far.
    pub fn formulas_completed(&self) -> usize {
        self.accepted.len()
    }

    /// Number of formulas in the session.
    pub fn formulas_total(&self) -> usize {
        self.formulas.len()
    }

    /// Whether the current step is the last one.
    pub fn is_last_step(&self) -> bool {
        self.current_step_index + 1 >= self.formulas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formula::NewElement;

    fn one_formula() -> Vec<Formula> {
        vec![Formula::new(
            1,
            ["Subject", "Verb"],
            Vec::<String>::new(),
            NewElement::new("Verb"),
            ["Library", "opens"],
        )]
    }

    #[test]
    fn test_new_session_presents_first_step() {
        let session = SessionState::new("library", "pupil-1", one_formula());

        assert_eq!(session.phase(), SessionPhase::Presenting { step: 0 });
        assert_eq!(session.current_step_index(), 0);
        assert!(session.previous_words().is_empty());
        assert!(session.built().is_empty());
        assert!(session.word_write_counts().is_empty());
        assert_eq!(session.formulas_total(), 1);
        assert_eq!(session.formulas_completed(), 0);
        assert!(session.is_last_step());
        assert!(!session.id.is_empty());
    }

    #[test]
    fn test_empty_formula_list_is_complete() {
        let session = SessionState::new("empty", "pupil-1", Vec::new());
        assert!(session.phase().is_terminal());
        assert!(session.current_formula().is_none());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = SessionState::new("library", "pupil-1", one_formula());
        let b = SessionState::new("library", "pupil-1", one_formula());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_phase_helpers() {
        assert!(SessionPhase::Presenting { step: 0 }.accepts_edits());
        assert!(!SessionPhase::Success { step: 0 }.accepts_edits());
        assert!(!SessionPhase::Validating { step: 0 }.accepts_edits());
        assert!(SessionPhase::Complete.is_terminal());
        assert_eq!(SessionPhase::Success { step: 3 }.step(), Some(3));
        assert_eq!(SessionPhase::Complete.step(), None);
        assert_eq!(SessionPhase::Validating { step: 1 }.name(), "validating");
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&SessionPhase::Success { step: 2 }).unwrap();
        assert_eq!(json, r#"{"phase":"success","step":2}"#);

        let complete: SessionPhase = serde_json::from_str(r#"{"phase":"complete"}"#).unwrap();
        assert_eq!(complete, SessionPhase::Complete);
    }
}
