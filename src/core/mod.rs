//! Core types and logic for WriFe.
//!
//! This module contains the sentence evolution state machine, its token and
//! formula types, sentence validation, and practice activity grading.

pub mod activity;
pub mod engine;
pub mod formula;
pub mod state;
pub mod token;
pub mod validate;

pub use activity::{
    grade_all, validate_answer, Activity, ActivityResult, ActivityType, Answer, GradeReport,
};
pub use engine::{AdvanceOutcome, CheckOutcome, SentenceEngine};
pub use formula::{check_formula_sequence, is_ordered_extension, Formula, NewElement};
pub use state::{AcceptedStep, SessionPhase, SessionState};
pub use token::{BuiltSentence, RemovalPolicy, Token, TokenOrigin, VALID_REMOVAL_POLICIES};
pub use validate::{normalize_sentence, normalize_word, validate, Validation};
