//! Progress sink trait and record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AcceptedStep, SessionState};
use crate::error::Result;

/// Schema version for progress records.
///
/// Increment when the record layout changes in a breaking way.
pub const PROGRESS_SCHEMA_VERSION: u8 = 1;

/// One accepted formula attempt, as handed to a progress sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Schema version for forward compatibility.
    pub v: u8,
    /// When the record was produced.
    pub ts: DateTime<Utc>,
    pub learner_id: String,
    pub lesson_id: String,
    pub session_id: String,
    pub formula_number: u32,
    pub correct: bool,
    /// The sentence as the learner built it.
    pub response: String,
    pub elapsed_ms: u64,
    pub attempts: u32,
}

impl ProgressRecord {
    /// Build a record for a step accepted in `session`.
    pub fn accepted(session: &SessionState, step: &AcceptedStep) -> Self {
        Self {
            v: PROGRESS_SCHEMA_VERSION,
            ts: step.accepted_at,
            learner_id: session.learner_id.clone(),
            lesson_id: session.lesson_id.clone(),
            session_id: session.id.clone(),
            formula_number: step.formula_number,
            correct: true,
            response: step.response.clone(),
            elapsed_ms: step.elapsed_ms,
            attempts: step.attempts,
        }
    }
}

/// Destination for progress records.
///
/// Sinks must be thread-safe; the runner calls them synchronously and
/// treats any error as non-fatal.
pub trait ProgressSink: Send + Sync {
    /// Store one record.
    fn record(&self, record: &ProgressRecord) -> Result<()>;

    /// Sink name for logging.
    fn name(&self) -> &'static str;
}

/// Blanket implementation for boxed trait objects.
impl ProgressSink for Box<dyn ProgressSink> {
    fn record(&self, record: &ProgressRecord) -> Result<()> {
        (**self).record(record)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{CheckOutcome, SentenceEngine};
    use crate::lessons::library_formulas;

    #[test]
    fn test_record_from_accepted_step() {
        let config = Config::default();
        let mut session = SessionState::new("library", "pupil-9", library_formulas());
        let mut engine = SentenceEngine::new(&mut session, &config);
        engine.type_text("Library opens");

        let CheckOutcome::Correct { accepted, .. } = engine.check() else {
            panic!("expected the first formula to be accepted");
        };
        let record = ProgressRecord::accepted(&session, &accepted);

        assert_eq!(record.v, PROGRESS_SCHEMA_VERSION);
        assert_eq!(record.learner_id, "pupil-9");
        assert_eq!(record.lesson_id, "library");
        assert_eq!(record.session_id, session.id);
        assert_eq!(record.formula_number, 1);
        assert!(record.correct);
        assert_eq!(record.response, "Library opens");
        assert_eq!(record.attempts, 1);
    }

    #[test]
    fn test_record_json_field_names() {
        let config = Config::default();
        let mut session = SessionState::new("library", "pupil-9", library_formulas());
        let mut engine = SentenceEngine::new(&mut session, &config);
        engine.type_text("Library opens");
        let CheckOutcome::Correct { accepted, .. } = engine.check() else {
            panic!("expected the first formula to be accepted");
        };

        let json = serde_json::to_value(ProgressRecord::accepted(&session, &accepted)).unwrap();
        for field in [
            "v",
            "ts",
            "learner_id",
            "lesson_id",
            "session_id",
            "formula_number",
            "correct",
            "response",
            "elapsed_ms",
            "attempts",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
    }
}
