//! Lessons command for WriFe.
//!
//! Lists the lessons available from every configured source.

use serde::{Deserialize, Serialize};

use crate::lessons::{LessonInfo, LessonSource};

/// Options for the lessons command.
#[derive(Debug, Clone, Default)]
pub struct LessonsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the lessons command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonsOutput {
    /// Whether the listing was successful.
    pub success: bool,
    /// Number of lessons.
    pub count: usize,
    /// The lessons.
    pub lessons: Vec<LessonInfo>,
    /// Error message if listing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LessonsOutput {
    /// Create a successful output.
    pub fn success(lessons: Vec<LessonInfo>) -> Self {
        Self {
            success: true,
            count: lessons.len(),
            lessons,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            lessons: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The lessons command implementation.
pub struct LessonsCommand<S: LessonSource> {
    source: S,
}

impl<S: LessonSource> LessonsCommand<S> {
    /// Create a new lessons command.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Run the lessons command.
    pub fn run(&self) -> LessonsOutput {
        match self.source.list() {
            Ok(lessons) => LessonsOutput::success(lessons),
            Err(e) => LessonsOutput::failure(e.to_string()),
        }
    }

    /// Format the output based on options.
    pub fn format_output(&self, output: &LessonsOutput, options: &LessonsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Failed to list lessons: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.lessons.is_empty() {
            return "No lessons found.".to_string();
        }

        let mut lines = vec![format!("{} lesson(s):", output.count)];
        for lesson in &output.lessons {
            lines.push(format!(
                "  {:<16} {} ({} formulas, {} activities) [{}]",
                lesson.id, lesson.title, lesson.formulas, lesson.activities, lesson.source
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, WrifeError};
    use crate::lessons::{BuiltinLessons, Lesson};

    struct Unlistable;

    impl LessonSource for Unlistable {
        fn load(&self, lesson_id: &str) -> Result<Lesson> {
            Err(WrifeError::lesson_not_found(lesson_id))
        }

        fn list(&self) -> Result<Vec<LessonInfo>> {
            Err(WrifeError::lesson("directory unreadable"))
        }

        fn name(&self) -> &'static str {
            "unlistable"
        }
    }

    #[test]
    fn test_lists_builtin_library() {
        let cmd = LessonsCommand::new(BuiltinLessons);
        let output = cmd.run();

        assert!(output.success);
        assert_eq!(output.count, 1);
        assert_eq!(output.lessons[0].id, "library");
        assert_eq!(output.lessons[0].formulas, 6);

        let text = cmd.format_output(&output, &LessonsOptions::default());
        assert!(text.contains("The Library Opens"));
        assert!(text.contains("[builtin]"));
    }

    #[test]
    fn test_failure_reported() {
        let cmd = LessonsCommand::new(Unlistable);
        let output = cmd.run();

        assert!(!output.success);
        let text = cmd.format_output(&output, &LessonsOptions::default());
        assert!(text.starts_with("Failed to list lessons"));
    }

    #[test]
    fn test_json_and_quiet() {
        let cmd = LessonsCommand::new(BuiltinLessons);
        let output = cmd.run();

        let json = cmd.format_output(
            &output,
            &LessonsOptions {
                json: true,
                quiet: false,
            },
        );
        let parsed: LessonsOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.count, 1);

        let quiet = cmd.format_output(
            &output,
            &LessonsOptions {
                json: false,
                quiet: true,
            },
        );
        assert!(quiet.is_empty());
    }
}
