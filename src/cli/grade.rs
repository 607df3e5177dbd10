//! Grade command for WriFe.
//!
//! Grades a lesson's practice activities against a JSON file of answers
//! keyed by activity id, e.g. `{"verb-blank": "opens"}`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{grade_all, Answer, GradeReport};
use crate::error::{Result, WrifeError};
use crate::lessons::LessonSource;
use crate::util::{read_to_string_with_limit, MAX_LESSON_FILE_SIZE};

/// Options for the grade command.
#[derive(Debug, Clone, Default)]
pub struct GradeOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the grade command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeOutput {
    /// Whether grading ran.
    pub success: bool,
    pub lesson_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<GradeReport>,
    /// Answers naming activities the lesson doesn't have.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Error message if grading failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GradeOutput {
    /// Create a successful output.
    pub fn success(lesson_id: impl Into<String>, report: GradeReport, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            lesson_id: lesson_id.into(),
            report: Some(report),
            warnings,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(lesson_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            lesson_id: lesson_id.into(),
            report: None,
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Parse an answers file.
pub fn load_answers(path: &Path) -> Result<HashMap<String, Answer>> {
    let content = read_to_string_with_limit(path, MAX_LESSON_FILE_SIZE)?;
    serde_json::from_str(&content).map_err(|e| {
        WrifeError::invalid_input(format!("answers file {}: {}", path.display(), e))
    })
}

/// The grade command implementation.
pub struct GradeCommand<S: LessonSource> {
    source: S,
}

impl<S: LessonSource> GradeCommand<S> {
    /// Create a new grade command.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Grade answers read from a JSON file.
    pub fn run(&self, lesson_id: &str, answers_path: &Path) -> GradeOutput {
        match load_answers(answers_path) {
            Ok(answers) => self.run_answers(lesson_id, &answers),
            Err(e) => GradeOutput::failure(lesson_id, e.to_string()),
        }
    }

    /// Grade answers already in memory.
    pub fn run_answers(&self, lesson_id: &str, answers: &HashMap<String, Answer>) -> GradeOutput {
        let lesson = match self.source.load(lesson_id) {
            Ok(lesson) => lesson,
            Err(e) => return GradeOutput::failure(lesson_id, e.to_string()),
        };

        if lesson.activities.is_empty() {
            return GradeOutput::failure(
                lesson_id,
                format!("lesson '{}' has no practice activities", lesson_id),
            );
        }

        let mut warnings: Vec<String> = answers
            .keys()
            .filter(|id| !lesson.activities.iter().any(|a| &a.id == *id))
            .map(|id| format!("no activity named '{}'", id))
            .collect();
        warnings.sort();

        let report = grade_all(&lesson.activities, answers);
        GradeOutput::success(lesson_id, report, warnings)
    }

    /// Format the output based on options.
    pub fn format_output(&self, output: &GradeOutput, options: &GradeOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        let report = match (&output.report, output.success) {
            (Some(report), true) => report,
            _ => {
                return format!(
                    "Grading failed: {}",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        };

        let mut lines = vec![format!("=== {} ===", output.lesson_id)];
        for result in &report.results {
            let mark = if result.correct {
                "correct"
            } else if result.answered {
                "incorrect"
            } else {
                "not answered"
            };
            lines.push(format!(
                "  {:<16} {:<16} {}",
                result.id,
                result.activity_type.as_str(),
                mark
            ));
        }
        lines.push(format!(
            "Score: {}/{} ({:.0}%)",
            report.correct, report.total, report.score
        ));
        for warning in &output.warnings {
            lines.push(format!("Warning: {}", warning));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lessons::BuiltinLessons;
    use std::fs;
    use tempfile::TempDir;

    fn perfect_answers() -> HashMap<String, Answer> {
        let mut answers = HashMap::new();
        answers.insert("adverb-choice".to_string(), Answer::text("Quietly "));
        answers.insert("verb-blank".to_string(), Answer::list(["opens"]));
        answers.insert(
            "word-order".to_string(),
            Answer::list(["library", "quietly", "opens"]),
        );
        answers.insert(
            "word-classes".to_string(),
            Answer::map([("opens", "verb"), ("Library", "noun"), ("quietly", "adverb")]),
        );
        answers.insert(
            "phrase-zones".to_string(),
            Answer::map([
                ("its doors", "what"),
                ("in the morning", "when"),
                ("Every weekday,", "how often"),
            ]),
        );
        answers
    }

    #[test]
    fn test_all_correct() {
        let cmd = GradeCommand::new(BuiltinLessons);
        let output = cmd.run_answers("library", &perfect_answers());

        assert!(output.success);
        let report = output.report.unwrap();
        assert_eq!(report.correct, 5);
        assert_eq!(report.total, 5);
        assert!((report.score - 100.0).abs() < f64::EPSILON);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_missing_and_unknown_answers() {
        let mut answers = HashMap::new();
        answers.insert("adverb-choice".to_string(), Answer::text("opens"));
        answers.insert("bonus".to_string(), Answer::text("x"));

        let cmd = GradeCommand::new(BuiltinLessons);
        let output = cmd.run_answers("library", &answers);

        let report = output.report.as_ref().unwrap();
        assert_eq!(report.correct, 0);
        assert!(report.results[0].answered);
        assert!(!report.results[1].answered);
        assert_eq!(output.warnings, vec!["no activity named 'bonus'".to_string()]);

        let text = cmd.format_output(&output, &GradeOptions::default());
        assert!(text.contains("not answered"));
        assert!(text.contains("Score: 0/5 (0%)"));
        assert!(text.contains("Warning: no activity named 'bonus'"));
    }

    #[test]
    fn test_unknown_lesson_fails() {
        let cmd = GradeCommand::new(BuiltinLessons);
        let output = cmd.run_answers("castles", &HashMap::new());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("castles"));
    }

    #[test]
    fn test_reads_answers_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(
            &path,
            r#"{
                "adverb-choice": "quietly",
                "word-order": ["Library", "quietly", "opens"],
                "word-classes": {"Library": "noun", "quietly": "adverb", "opens": "verb"}
            }"#,
        )
        .unwrap();

        let cmd = GradeCommand::new(BuiltinLessons);
        let output = cmd.run("library", &path);

        let report = output.report.unwrap();
        assert_eq!(report.correct, 3);
        assert!((report.score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_answers_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "not json").unwrap();

        let cmd = GradeCommand::new(BuiltinLessons);
        let output = cmd.run("library", &path);
        assert!(!output.success);
        assert!(output.error.unwrap().contains("answers file"));

        let missing = cmd.run("library", &dir.path().join("nope.json"));
        assert!(!missing.success);
    }
}
