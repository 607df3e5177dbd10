//! Session and progress statistics.
//!
//! [`SessionSummary`] is the end-of-session view derived from a completed
//! session's counters. [`ProgressReport`] aggregates the records in the
//! progress log for the `progress` command.

pub mod report;
pub mod summary;

pub use report::{LessonProgress, ProgressReport};
pub use summary::{top_words, SessionSummary, WordCount};
