//! Practice runner.
//!
//! Owns one session together with its collaborators and wires them to the
//! engine's transitions: accepted formulas are reported to the progress
//! sink, and hints come from the configured provider. Collaborator failures
//! are logged and masked; they never change the session.

use crate::config::Config;
use crate::core::{AdvanceOutcome, CheckOutcome, SentenceEngine, SessionState};
use crate::error::{FailOpen, Result, WrifeError};
use crate::hints::{provider_from_config, HintContext, HintProvider, StaticHints};
use crate::lessons::Lesson;
use crate::progress::{JsonlProgressLog, ProgressRecord, ProgressSink};
use crate::stats::SessionSummary;

/// One learner working through one lesson's formulas.
pub struct PracticeRunner {
    session: SessionState,
    config: Config,
    progress: Option<Box<dyn ProgressSink>>,
    hints: Box<dyn HintProvider>,
}

impl PracticeRunner {
    /// Start a session on `lesson` with no progress sink and static hints.
    ///
    /// Fails if the lesson has no formulas.
    pub fn new(lesson: &Lesson, learner_id: impl Into<String>, config: Config) -> Result<Self> {
        if lesson.formulas.is_empty() {
            return Err(WrifeError::lesson(format!(
                "lesson '{}' has no formulas to practise",
                lesson.id
            )));
        }

        let session = SessionState::new(&lesson.id, learner_id, lesson.formulas.clone());
        tracing::debug!(
            session_id = %session.id,
            lesson_id = %lesson.id,
            formulas = lesson.formulas.len(),
            "practice session started"
        );

        Ok(Self {
            session,
            config,
            progress: None,
            hints: Box::new(StaticHints),
        })
    }

    /// Start a session with the collaborators the config describes.
    pub fn from_config(
        lesson: &Lesson,
        learner_id: impl Into<String>,
        config: Config,
    ) -> Result<Self> {
        let hints = provider_from_config(&config.hints);
        let progress: Option<Box<dyn ProgressSink>> = if config.progress.enabled {
            config
                .progress_log_path()
                .map(|path| Box::new(JsonlProgressLog::new(path)) as Box<dyn ProgressSink>)
        } else {
            None
        };

        let mut runner = Self::new(lesson, learner_id, config)?.with_hints(hints);
        runner.progress = progress;
        Ok(runner)
    }

    /// Report accepted formulas to `sink`.
    pub fn with_progress(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Use `provider` for hints.
    pub fn with_hints(mut self, provider: Box<dyn HintProvider>) -> Self {
        self.hints = provider;
        self
    }

    /// The session being run.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Engine over the session, for token edits and queries.
    pub fn engine(&mut self) -> SentenceEngine<'_> {
        SentenceEngine::new(&mut self.session, &self.config)
    }

    /// Check the built sentence, reporting an accepted formula to the
    /// progress sink.
    pub fn check(&mut self) -> CheckOutcome {
        let outcome = self.engine().check();

        if let CheckOutcome::Correct { accepted, .. } = &outcome {
            if let Some(sink) = &self.progress {
                let record = ProgressRecord::accepted(&self.session, accepted);
                sink.record(&record)
                    .fail_open_default(&format!("Failed to record progress to '{}'", sink.name()));
            }
        }

        outcome
    }

    /// Move past an accepted formula.
    pub fn advance(&mut self) -> AdvanceOutcome {
        self.engine().advance()
    }

    /// A hint for the current formula, if one is on offer.
    ///
    /// Provider failures fall back to the formula's static hint.
    pub fn hint(&mut self) -> Option<String> {
        if !self.engine().hint_available() {
            return None;
        }
        let context = HintContext::for_session(&self.session)?;
        let fallback = StaticHints::text(&context);
        Some(
            self.hints
                .hint(&context)
                .fail_open_with(&format!("Hint provider '{}' failed", self.hints.name()), fallback),
        )
    }

    /// End-of-session summary, once complete.
    pub fn summary(&mut self) -> Option<SessionSummary> {
        self.engine().summary()
    }

    /// Whether every formula has been accepted.
    pub fn is_complete(&self) -> bool {
        self.session.phase().is_terminal()
    }
}
