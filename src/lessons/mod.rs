//! Lesson data sources.
//!
//! A lesson bundles the ordered formulas for a sentence-evolution session
//! with any practice activities. Lessons are loaded once per session and
//! never change afterwards.

pub mod builtin;
pub mod file;
pub mod traits;

pub use builtin::{library_formulas, library_lesson, BuiltinLessons, LIBRARY_LESSON_ID};
pub use file::FileLessons;
pub use traits::{Lesson, LessonCatalog, LessonInfo, LessonSource};

use std::path::Path;

use crate::config::Config;

/// Build the lesson catalog for a working directory.
///
/// File lessons from the configured directory come first, so a file can
/// replace a built-in lesson with the same id.
pub fn catalog_from_config(config: &Config, cwd: &Path) -> LessonCatalog {
    LessonCatalog::new(vec![
        Box::new(FileLessons::new(config.lessons_dir(cwd))),
        Box::new(BuiltinLessons),
    ])
}
