//! Sentence evolution engine.
//!
//! The engine drives one [`SessionState`] through its formulas. It owns no
//! state of its own: every transition mutates the borrowed session, and
//! actions that are not valid in the current phase are ignored rather than
//! reported as errors.

use chrono::Utc;

use crate::config::Config;
use crate::core::formula::Formula;
use crate::core::state::{AcceptedStep, SessionPhase, SessionState};
use crate::core::token::BuiltSentence;
use crate::core::validate::{normalize_word, validate};
use crate::stats::SessionSummary;

/// Result of checking the built sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Not in a phase that accepts checks, or nothing has been built.
    Ignored,
    /// The sentence matched; the session is in `Success` until `advance`.
    Correct {
        /// The formula that was accepted.
        formula_number: u32,
        /// Record of the accepted step.
        accepted: AcceptedStep,
    },
    /// The sentence did not match; it is kept for correction.
    Incorrect {
        /// Failed checks on this formula so far.
        attempts: u32,
        /// Whether a hint is now on offer.
        hint_available: bool,
    },
}

impl CheckOutcome {
    /// Whether the check accepted the sentence.
    pub fn is_correct(&self) -> bool {
        matches!(self, CheckOutcome::Correct { .. })
    }
}

/// Result of advancing past an accepted formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Not in `Success`; nothing happened.
    Ignored,
    /// The next formula is being presented.
    NextStep {
        /// Index of the formula now presented.
        step_index: usize,
    },
    /// Every formula has been accepted.
    Complete,
}

/// Sentence evolution state machine.
///
/// All session mutations go through this struct.
#[derive(Debug)]
pub struct SentenceEngine<'a> {
    state: &'a mut SessionState,
    config: &'a Config,
}

impl<'a> SentenceEngine<'a> {
    /// Create an engine over a session.
    pub fn new(state: &'a mut SessionState, config: &'a Config) -> Self {
        Self { state, config }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Check if the session is complete.
    pub fn is_complete(&self) -> bool {
        self.state.phase.is_terminal()
    }

    /// The formula being worked on.
    pub fn current_formula(&self) -> Option<&Formula> {
        self.state.current_formula()
    }

    /// Words available for reuse at this step.
    pub fn previous_words(&self) -> &[String] {
        &self.state.previous_words
    }

    /// The sentence under construction.
    pub fn built(&self) -> &BuiltSentence {
        &self.state.built
    }

    /// Read access to the underlying session.
    pub fn session(&self) -> &SessionState {
        self.state
    }

    // =========================================================================
    // Token assembly
    // =========================================================================

    /// Click the previous word at `source_index`.
    pub fn click(&mut self, source_index: usize) -> bool {
        let Some(word) = self.state.previous_words.get(source_index).cloned() else {
            return false;
        };
        self.add_reused(&word, source_index)
    }

    /// Append a reused word from the previous sentence.
    pub fn add_reused(&mut self, word: &str, source_index: usize) -> bool {
        if !self.state.phase.accepts_edits() {
            return false;
        }
        let state = &mut *self.state;
        state
            .built
            .add_reused(&state.previous_words, word, source_index)
    }

    /// Append typed words. Returns how many tokens were added.
    pub fn type_text(&mut self, raw_text: &str) -> usize {
        if !self.state.phase.accepts_edits() {
            return 0;
        }
        self.state.built.add_typed(raw_text)
    }

    /// Remove the token at `position`, subject to the removal policy.
    pub fn remove(&mut self, position: usize) -> bool {
        if !self.state.phase.accepts_edits() {
            return false;
        }
        self.state
            .built
            .remove(position, self.config.session.removal)
    }

    /// Empty the sentence.
    pub fn clear(&mut self) -> bool {
        if !self.state.phase.accepts_edits() {
            return false;
        }
        self.state.built.clear();
        true
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Transition: Presenting → Validating → Success | Presenting
    ///
    /// On success the target's words are counted once; on failure the
    /// sentence is kept and the attempt counter goes up.
    pub fn check(&mut self) -> CheckOutcome {
        let SessionPhase::Presenting { step } = self.state.phase else {
            return CheckOutcome::Ignored;
        };
        if self.state.built.is_empty() {
            return CheckOutcome::Ignored;
        }
        let Some(formula) = self.state.formulas.get(step) else {
            return CheckOutcome::Ignored;
        };
        let formula_number = formula.formula_number;
        let target = formula.target_sentence.clone();

        self.state.phase = SessionPhase::Validating { step };
        let validation = validate(&self.state.built.words(), &target);

        if !validation.correct {
            self.state.attempts += 1;
            self.state.phase = SessionPhase::Presenting { step };
            tracing::debug!(
                step,
                attempts = self.state.attempts,
                "sentence did not match target"
            );
            return CheckOutcome::Incorrect {
                attempts: self.state.attempts,
                hint_available: self.hint_available(),
            };
        }

        for word in &target {
            let normalized = normalize_word(word);
            if normalized.is_empty() {
                continue;
            }
            *self.state.word_write_counts.entry(normalized).or_insert(0) += 1;
        }

        let now = Utc::now();
        let elapsed_ms = (now - self.state.step_started_at)
            .num_milliseconds()
            .max(0) as u64;
        let accepted = AcceptedStep {
            formula_number,
            response: self.state.built.text(),
            attempts: self.state.attempts + 1,
            elapsed_ms,
            accepted_at: now,
        };
        self.state.accepted.push(accepted.clone());
        self.state.phase = SessionPhase::Success { step };

        tracing::debug!(step, formula_number, "formula accepted");

        CheckOutcome::Correct {
            formula_number,
            accepted,
        }
    }

    /// Transition: Success → Presenting(next) | Complete
    ///
    /// The accepted target becomes the next step's reusable words.
    pub fn advance(&mut self) -> AdvanceOutcome {
        let SessionPhase::Success { step } = self.state.phase else {
            return AdvanceOutcome::Ignored;
        };

        self.state.built.clear();
        self.state.attempts = 0;

        if self.state.is_last_step() {
            self.state.phase = SessionPhase::Complete;
            tracing::debug!(
                formulas = self.state.formulas.len(),
                "session complete"
            );
            return AdvanceOutcome::Complete;
        }

        let next = step + 1;
        self.state.previous_words = self.state.formulas[step].target_sentence.clone();
        self.state.current_step_index = next;
        self.state.step_started_at = Utc::now();
        self.state.phase = SessionPhase::Presenting { step: next };

        tracing::debug!(step = next, "presenting next formula");

        AdvanceOutcome::NextStep { step_index: next }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether a hint should be offered for the current formula.
    pub fn hint_available(&self) -> bool {
        self.config.hints.enabled
            && self.state.phase.accepts_edits()
            && self.state.attempts >= self.config.hints.min_failed_attempts
    }

    /// End-of-session summary, available once complete.
    pub fn summary(&self) -> Option<SessionSummary> {
        if !self.is_complete() {
            return None;
        }
        Some(SessionSummary::from_state(self.state, &self.config.session))
    }
}
