//! Lessons stored as TOML files.
//!
//! Each lesson lives in `<dir>/<lesson_id>.toml`:
//!
//! ```toml
//! title = "The Dog Runs"
//!
//! [[formula]]
//! formula_number = 1
//! structure_parts = ["Subject", "Verb"]
//! target_sentence = ["A", "dog", "runs"]
//! [formula.new_element]
//! label = "Verb"
//!
//! [[activity]]
//! id = "q1"
//! type = "multiple_choice"
//! prompt = "Which word is the verb?"
//! answer = "runs"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::core::{Activity, Formula};
use crate::error::{Result, WrifeError};
use crate::lessons::traits::{Lesson, LessonInfo, LessonSource};
use crate::util::{read_to_string_with_limit, MAX_LESSON_FILE_SIZE};

/// On-disk lesson layout; the id comes from the file name.
#[derive(Debug, Deserialize)]
struct LessonFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    formula: Vec<Formula>,
    #[serde(default)]
    activity: Vec<Activity>,
}

/// Lesson source backed by a directory of TOML files.
#[derive(Debug, Clone)]
pub struct FileLessons {
    dir: PathBuf,
}

impl FileLessons {
    /// Create a source reading from `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn lesson_path(&self, lesson_id: &str) -> Result<PathBuf> {
        let valid = !lesson_id.is_empty()
            && lesson_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(WrifeError::invalid_input(format!(
                "invalid lesson id '{}': use letters, digits, '-' or '_'",
                lesson_id
            )));
        }
        Ok(self.dir.join(format!("{}.toml", lesson_id)))
    }

    fn parse(lesson_id: &str, path: &Path) -> Result<Lesson> {
        let content = read_to_string_with_limit(path, MAX_LESSON_FILE_SIZE)?;
        let file: LessonFile = toml::from_str(&content).map_err(|e| {
            WrifeError::lesson(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let lesson = Lesson {
            id: lesson_id.to_string(),
            title: file.title.unwrap_or_else(|| lesson_id.to_string()),
            description: file.description,
            formulas: file.formula,
            activities: file.activity,
        };
        lesson.check()?;
        Ok(lesson)
    }
}

impl LessonSource for FileLessons {
    fn load(&self, lesson_id: &str) -> Result<Lesson> {
        let path = self.lesson_path(lesson_id)?;
        if !path.is_file() {
            return Err(WrifeError::lesson_not_found(lesson_id));
        }
        Self::parse(lesson_id, &path)
    }

    /// Lessons in the directory, sorted by id. Files that fail to load are
    /// skipped with a warning.
    fn list(&self) -> Result<Vec<LessonInfo>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| WrifeError::storage(&self.dir, e))?;

        let mut lessons = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(lesson_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load(lesson_id) {
                Ok(lesson) => lessons.push(lesson.info(self.name())),
                Err(e) => warn!("Skipping lesson file {}: {}", path.display(), e),
            }
        }

        lessons.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(lessons)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
