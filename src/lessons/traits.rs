//! Lesson types and the lesson source trait.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{check_formula_sequence, Activity, Formula};
use crate::error::{Result, WrifeError};

/// An identified bundle of formulas and activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, rename = "formula")]
    pub formulas: Vec<Formula>,
    #[serde(default, rename = "activity")]
    pub activities: Vec<Activity>,
}

impl Lesson {
    /// Check the lesson's data invariants.
    ///
    /// A lesson needs at least one formula or activity. Formulas, when
    /// present, must form a valid sequence; activity ids must be unique and
    /// non-empty.
    pub fn check(&self) -> Result<()> {
        if self.formulas.is_empty() && self.activities.is_empty() {
            return Err(WrifeError::lesson(format!(
                "lesson '{}' has no formulas or activities",
                self.id
            )));
        }

        if !self.formulas.is_empty() {
            check_formula_sequence(&self.formulas).map_err(|e| match e {
                WrifeError::Lesson { message } => {
                    WrifeError::lesson(format!("lesson '{}': {}", self.id, message))
                }
                other => other,
            })?;
        }

        let mut seen = HashSet::new();
        for activity in &self.activities {
            if activity.id.trim().is_empty() {
                return Err(WrifeError::lesson(format!(
                    "lesson '{}' has an activity without an id",
                    self.id
                )));
            }
            if !seen.insert(activity.id.as_str()) {
                return Err(WrifeError::lesson(format!(
                    "lesson '{}' has duplicate activity id '{}'",
                    self.id, activity.id
                )));
            }
        }

        Ok(())
    }

    /// Summary for listings.
    pub fn info(&self, source: &str) -> LessonInfo {
        LessonInfo {
            id: self.id.clone(),
            title: self.title.clone(),
            formulas: self.formulas.len(),
            activities: self.activities.len(),
            source: source.to_string(),
        }
    }
}

/// Lesson summary for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonInfo {
    pub id: String,
    pub title: String,
    pub formulas: usize,
    pub activities: usize,
    /// Which source provides the lesson.
    pub source: String,
}

/// Supplies lessons by id.
pub trait LessonSource: Send + Sync {
    /// Load and check one lesson.
    ///
    /// Returns `LessonNotFound` when this source has no such lesson.
    fn load(&self, lesson_id: &str) -> Result<Lesson>;

    /// List the lessons this source provides.
    fn list(&self) -> Result<Vec<LessonInfo>>;

    /// Source name for logging and listings.
    fn name(&self) -> &'static str;
}

/// Blanket implementation for boxed trait objects.
impl LessonSource for Box<dyn LessonSource> {
    fn load(&self, lesson_id: &str) -> Result<Lesson> {
        (**self).load(lesson_id)
    }

    fn list(&self) -> Result<Vec<LessonInfo>> {
        (**self).list()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Several sources searched in order.
pub struct LessonCatalog {
    sources: Vec<Box<dyn LessonSource>>,
}

impl LessonCatalog {
    /// Create a catalog; earlier sources take precedence.
    pub fn new(sources: Vec<Box<dyn LessonSource>>) -> Self {
        Self { sources }
    }
}

impl LessonSource for LessonCatalog {
    fn load(&self, lesson_id: &str) -> Result<Lesson> {
        for source in &self.sources {
            match source.load(lesson_id) {
                Err(WrifeError::LessonNotFound { .. }) => continue,
                other => return other,
            }
        }
        Err(WrifeError::lesson_not_found(lesson_id))
    }

    /// Merged listing; an id listed by an earlier source hides later ones.
    /// A source that cannot be listed is skipped with a warning.
    fn list(&self) -> Result<Vec<LessonInfo>> {
        let mut seen = HashSet::new();
        let mut lessons = Vec::new();
        for source in &self.sources {
            let infos = match source.list() {
                Ok(infos) => infos,
                Err(e) => {
                    warn!("Failed to list lessons from '{}': {}", source.name(), e);
                    continue;
                }
            };
            for info in infos {
                if seen.insert(info.id.clone()) {
                    lessons.push(info);
                }
            }
        }
        Ok(lessons)
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}
