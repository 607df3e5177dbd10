//! WriFe - Progressive Writing Practice
//!
//! WriFe grows one sentence across a sequence of formulas: each formula
//! adds a grammatical element, and the learner rebuilds the sentence by
//! reusing words from the previous one and typing the new ones. Lessons may
//! also carry short practice activities that are graded on their own.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod hints;
pub mod lessons;
pub mod progress;
pub mod runner;
pub mod stats;
pub mod util;

pub use config::Config;
pub use core::{
    grade_all, validate, validate_answer, Activity, ActivityType, AdvanceOutcome, Answer,
    BuiltSentence, CheckOutcome, Formula, GradeReport, NewElement, RemovalPolicy,
    SentenceEngine, SessionPhase, SessionState, Token, TokenOrigin, Validation,
};
pub use error::{Result, WrifeError};
pub use hints::{HintContext, HintProvider, StaticHints};
pub use lessons::{
    catalog_from_config, library_lesson, BuiltinLessons, FileLessons, Lesson, LessonCatalog,
    LessonSource,
};
pub use progress::{JsonlProgressLog, MemoryProgressSink, ProgressRecord, ProgressSink};
pub use runner::PracticeRunner;
pub use stats::{ProgressReport, SessionSummary};

// CLI commands
pub use cli::{GradeCommand, LessonsCommand, PracticeCommand, ProgressCommand};
