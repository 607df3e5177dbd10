//! Progress report built from the progress log.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::ProgressRecord;

/// Per-lesson totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub sessions: usize,
    pub formulas_accepted: usize,
    /// Highest formula number accepted in any session.
    pub furthest_formula: u32,
    pub average_attempts: f64,
}

/// Aggregate view of progress records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Learner the report is restricted to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learner_id: Option<String>,
    pub records: usize,
    pub sessions: usize,
    pub average_elapsed_ms: u64,
    pub average_attempts: f64,
    /// First-try acceptances as a percentage of accepted formulas.
    pub first_try_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    pub lessons: BTreeMap<String, LessonProgress>,
}

impl ProgressReport {
    /// Aggregate records, optionally for one learner.
    pub fn from_records(records: &[ProgressRecord], learner_id: Option<&str>) -> Self {
        let selected: Vec<&ProgressRecord> = records
            .iter()
            .filter(|r| r.correct)
            .filter(|r| learner_id.map_or(true, |id| r.learner_id == id))
            .collect();

        let mut report = Self {
            learner_id: learner_id.map(str::to_string),
            ..Self::default()
        };
        if selected.is_empty() {
            return report;
        }

        let count = selected.len();
        report.records = count;
        report.sessions = selected
            .iter()
            .map(|r| r.session_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        report.average_elapsed_ms =
            selected.iter().map(|r| r.elapsed_ms).sum::<u64>() / count as u64;
        report.average_attempts =
            selected.iter().map(|r| r.attempts as f64).sum::<f64>() / count as f64;
        report.first_try_rate =
            selected.iter().filter(|r| r.attempts <= 1).count() as f64 * 100.0 / count as f64;
        report.last_activity = selected.iter().map(|r| r.ts).max();

        let mut lesson_sessions: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
        let mut lesson_attempts: BTreeMap<&str, u32> = BTreeMap::new();
        for record in &selected {
            let lesson = report.lessons.entry(record.lesson_id.clone()).or_default();
            lesson.formulas_accepted += 1;
            lesson.furthest_formula = lesson.furthest_formula.max(record.formula_number);
            lesson_sessions
                .entry(record.lesson_id.as_str())
                .or_default()
                .insert(record.session_id.as_str());
            *lesson_attempts.entry(record.lesson_id.as_str()).or_insert(0) += record.attempts;
        }
        for (lesson_id, lesson) in report.lessons.iter_mut() {
            lesson.sessions = lesson_sessions
                .get(lesson_id.as_str())
                .map_or(0, HashSet::len);
            let attempts = lesson_attempts.get(lesson_id.as_str()).copied().unwrap_or(0);
            lesson.average_attempts = attempts as f64 / lesson.formulas_accepted as f64;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::PROGRESS_SCHEMA_VERSION;
    use chrono::TimeZone;

    fn record(
        learner: &str,
        lesson: &str,
        session: &str,
        formula_number: u32,
        attempts: u32,
        elapsed_ms: u64,
    ) -> ProgressRecord {
        ProgressRecord {
            v: PROGRESS_SCHEMA_VERSION,
            ts: Utc.with_ymd_and_hms(2026, 3, 2, 9, formula_number, 0).unwrap(),
            learner_id: learner.to_string(),
            lesson_id: lesson.to_string(),
            session_id: session.to_string(),
            formula_number,
            correct: true,
            response: String::new(),
            elapsed_ms,
            attempts,
        }
    }

    fn sample() -> Vec<ProgressRecord> {
        vec![
            record("pupil-1", "library", "s1", 1, 1, 1000),
            record("pupil-1", "library", "s1", 2, 3, 3000),
            record("pupil-1", "dog", "s2", 1, 1, 2000),
            record("pupil-2", "library", "s3", 1, 2, 4000),
        ]
    }

    #[test]
    fn test_report_all_learners() {
        let report = ProgressReport::from_records(&sample(), None);

        assert_eq!(report.records, 4);
        assert_eq!(report.sessions, 3);
        assert_eq!(report.average_elapsed_ms, 2500);
        assert!((report.average_attempts - 1.75).abs() < 1e-9);
        assert!((report.first_try_rate - 50.0).abs() < 1e-9);

        let library = &report.lessons["library"];
        assert_eq!(library.sessions, 2);
        assert_eq!(library.formulas_accepted, 3);
        assert_eq!(library.furthest_formula, 2);
        assert!((library.average_attempts - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_one_learner() {
        let report = ProgressReport::from_records(&sample(), Some("pupil-1"));

        assert_eq!(report.learner_id.as_deref(), Some("pupil-1"));
        assert_eq!(report.records, 3);
        assert_eq!(report.sessions, 2);
        assert_eq!(report.lessons.len(), 2);
        assert_eq!(
            report.last_activity,
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 9, 2, 0).unwrap())
        );
    }

    #[test]
    fn test_report_empty() {
        let report = ProgressReport::from_records(&[], Some("nobody"));
        assert_eq!(report.records, 0);
        assert!(report.lessons.is_empty());
        assert!(report.last_activity.is_none());
    }
}
