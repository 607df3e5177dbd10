//! Progress command for WriFe.
//!
//! Summarizes the progress log, for every learner or just one.

use serde::{Deserialize, Serialize};

use crate::progress::JsonlProgressLog;
use crate::stats::ProgressReport;

/// Options for the progress command.
#[derive(Debug, Clone, Default)]
pub struct ProgressOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Restrict the report to one learner.
    pub learner_id: Option<String>,
}

/// Output format for the progress command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressOutput {
    /// Whether the report was built.
    pub success: bool,
    /// Log the report was read from.
    pub log_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ProgressReport>,
    /// Error message if reading failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressOutput {
    /// Create a successful output.
    pub fn success(log_path: impl Into<String>, report: ProgressReport) -> Self {
        Self {
            success: true,
            log_path: log_path.into(),
            report: Some(report),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(log_path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            log_path: log_path.into(),
            report: None,
            error: Some(error.into()),
        }
    }
}

/// The progress command implementation.
pub struct ProgressCommand {
    log: JsonlProgressLog,
}

impl ProgressCommand {
    /// Create a new progress command.
    pub fn new(log: JsonlProgressLog) -> Self {
        Self { log }
    }

    /// Run the progress command.
    pub fn run(&self, options: &ProgressOptions) -> ProgressOutput {
        let log_path = self.log.path().display().to_string();
        let records = match &options.learner_id {
            Some(learner_id) => self.log.read_learner(learner_id),
            None => self.log.read_all(),
        };
        match records {
            Ok(records) => ProgressOutput::success(
                log_path,
                ProgressReport::from_records(&records, options.learner_id.as_deref()),
            ),
            Err(e) => ProgressOutput::failure(log_path, e.to_string()),
        }
    }

    /// Format the output based on options.
    pub fn format_output(&self, output: &ProgressOutput, options: &ProgressOptions) -> String {
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
                    "Failed to read progress: {}",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        };

        if report.records == 0 {
            return match &report.learner_id {
                Some(learner) => format!("No progress recorded for {} yet.", learner),
                None => "No progress recorded yet.".to_string(),
            };
        }

        let mut lines = Vec::new();
        match &report.learner_id {
            Some(learner) => lines.push(format!("=== Progress for {} ===", learner)),
            None => lines.push("=== Progress ===".to_string()),
        }
        lines.push(format!(
            "Formulas accepted: {} across {} session(s)",
            report.records, report.sessions
        ));
        lines.push(format!("Average checks per formula: {:.1}", report.average_attempts));
        lines.push(format!("Right first time: {:.0}%", report.first_try_rate));
        lines.push(format!(
            "Average time per formula: {:.1}s",
            report.average_elapsed_ms as f64 / 1000.0
        ));
        if let Some(last) = report.last_activity {
            lines.push(format!("Last practised: {}", last.format("%Y-%m-%d %H:%M")));
        }

        lines.push(String::new());
        lines.push("Lessons:".to_string());
        for (lesson_id, lesson) in &report.lessons {
            lines.push(format!(
                "  {:<16} furthest formula {}, {} session(s), {:.1} checks per formula",
                lesson_id, lesson.furthest_formula, lesson.sessions, lesson.average_attempts
            ));
        }

        lines.join("\n")
    }
}
