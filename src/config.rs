//! Configuration loading for WriFe.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.wrife/config.toml`)
//! 3. User config (`~/.wrife/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{RemovalPolicy, VALID_REMOVAL_POLICIES};
use crate::error::{Result, WrifeError};

/// Main configuration struct for WriFe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Sentence session behaviour.
    pub session: SessionConfig,
    /// Hint collaborator configuration.
    pub hints: HintsConfig,
    /// Progress collaborator configuration.
    pub progress: ProgressConfig,
    /// Lesson data source configuration.
    pub lessons: LessonsConfig,
}

/// Sentence session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Which tokens may be removed individually.
    pub removal: RemovalPolicy,
    /// How many repeated words the end-of-session summary lists.
    pub top_words: u32,
    /// Words left out of the repeated-word summary.
    pub stopwords: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            removal: RemovalPolicy::TypedOnly,
            top_words: 5,
            stopwords: default_stopwords(),
        }
    }
}

fn default_stopwords() -> Vec<String> {
    ["the", "a", "an", "in"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

/// Hint collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HintsConfig {
    /// Whether hints are offered at all.
    pub enabled: bool,
    /// Failed checks on a formula before a hint is offered.
    pub min_failed_attempts: u32,
    /// External command that generates hints (context JSON on stdin).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// How long the hint command may run before it is killed.
    pub timeout_ms: u64,
}

/// Default time a hint command may run.
pub const DEFAULT_HINT_TIMEOUT_MS: u64 = 2000;

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_failed_attempts: 1,
            command: None,
            timeout_ms: DEFAULT_HINT_TIMEOUT_MS,
        }
    }
}

/// Progress collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressConfig {
    /// Whether accepted formulas are recorded.
    pub enabled: bool,
    /// Learner identifier used when none is given.
    pub learner_id: String,
    /// Override for the progress log location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

/// Learner identifier used when nothing else is configured.
pub const DEFAULT_LEARNER_ID: &str = "anonymous";

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            learner_id: DEFAULT_LEARNER_ID.to_string(),
            log_path: None,
        }
    }
}

/// Lesson data source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LessonsConfig {
    /// Directory of `<lesson_id>.toml` files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// One config file as written.
///
/// Every field is optional so a layer only replaces the values it names,
/// including values set back to their default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
struct ConfigLayer {
    session: SessionLayer,
    hints: HintsLayer,
    progress: ProgressLayer,
    lessons: LessonsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
struct SessionLayer {
    removal: Option<RemovalPolicy>,
    top_words: Option<u32>,
    stopwords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
struct HintsLayer {
    enabled: Option<bool>,
    min_failed_attempts: Option<u32>,
    command: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
struct ProgressLayer {
    enabled: Option<bool>,
    learner_id: Option<String>,
    log_path: Option<PathBuf>,
}

/// Parse a boolean environment value (`true`/`1`/`false`/`0`).
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `<wrife_home>/config.toml`.
    fn load_user_config() -> Option<ConfigLayer> {
        let home = wrife_home()?;
        Self::load_optional(&home.join("config.toml"))
    }

    /// Load project config from `.wrife/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<ConfigLayer> {
        Self::load_optional(&project_wrife_dir(cwd).join("config.toml"))
    }

    /// Load a config file that may not exist.
    ///
    /// A missing file is silent; a broken one is reported and skipped.
    fn load_optional(path: &Path) -> Option<ConfigLayer> {
        if !path.exists() {
            return None;
        }
        match Self::read_layer(path) {
            Ok(layer) => Some(layer),
            Err(err) => {
                tracing::warn!("ignoring config {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Load config from a specific file path, on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Ok(Config::default().merge(Self::read_layer(path)?))
    }

    fn read_layer(path: &Path) -> Result<ConfigLayer> {
        let content = fs::read_to_string(path).map_err(|e| WrifeError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| WrifeError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // WRIFE_REMOVAL
        if let Ok(val) = env::var("WRIFE_REMOVAL") {
            match RemovalPolicy::parse(&val) {
                Some(policy) => self.session.removal = policy,
                None => eprintln!(
                    "Warning: Invalid WRIFE_REMOVAL value '{}'. \
                    Valid values: {:?}. Using '{}'.",
                    val,
                    VALID_REMOVAL_POLICIES,
                    self.session.removal.as_str()
                ),
            }
        }

        // WRIFE_TOP_WORDS
        if let Ok(val) = env::var("WRIFE_TOP_WORDS") {
            match val.parse::<u32>() {
                Ok(n) => self.session.top_words = n,
                Err(_) => eprintln!(
                    "Warning: Invalid WRIFE_TOP_WORDS value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val, self.session.top_words
                ),
            }
        }

        // WRIFE_HINTS_ENABLED
        if let Ok(val) = env::var("WRIFE_HINTS_ENABLED") {
            match parse_bool(&val) {
                Some(enabled) => self.hints.enabled = enabled,
                None => eprintln!(
                    "Warning: Invalid WRIFE_HINTS_ENABLED value '{}'. \
                    Expected true, false, 1 or 0. Using '{}'.",
                    val, self.hints.enabled
                ),
            }
        }

        // WRIFE_MIN_FAILED_ATTEMPTS
        if let Ok(val) = env::var("WRIFE_MIN_FAILED_ATTEMPTS") {
            match val.parse::<u32>() {
                Ok(n) => self.hints.min_failed_attempts = n,
                Err(_) => eprintln!(
                    "Warning: Invalid WRIFE_MIN_FAILED_ATTEMPTS value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val, self.hints.min_failed_attempts
                ),
            }
        }

        // WRIFE_HINT_COMMAND
        if let Ok(val) = env::var("WRIFE_HINT_COMMAND") {
            let trimmed = val.trim();
            self.hints.command = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }

        // WRIFE_HINT_TIMEOUT_MS
        if let Ok(val) = env::var("WRIFE_HINT_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => self.hints.timeout_ms = ms,
                Err(_) => eprintln!(
                    "Warning: Invalid WRIFE_HINT_TIMEOUT_MS value '{}'. \
                    Expected milliseconds as a non-negative integer. Using '{}'.",
                    val, self.hints.timeout_ms
                ),
            }
        }

        // WRIFE_PROGRESS_ENABLED
        if let Ok(val) = env::var("WRIFE_PROGRESS_ENABLED") {
            match parse_bool(&val) {
                Some(enabled) => self.progress.enabled = enabled,
                None => eprintln!(
                    "Warning: Invalid WRIFE_PROGRESS_ENABLED value '{}'. \
                    Expected true, false, 1 or 0. Using '{}'.",
                    val, self.progress.enabled
                ),
            }
        }

        // WRIFE_LEARNER_ID
        if let Ok(val) = env::var("WRIFE_LEARNER_ID") {
            if val.trim().is_empty() {
                eprintln!(
                    "Warning: Empty WRIFE_LEARNER_ID. Using '{}'.",
                    self.progress.learner_id
                );
            } else {
                self.progress.learner_id = val.trim().to_string();
            }
        }

        // WRIFE_LESSONS_DIR
        if let Ok(val) = env::var("WRIFE_LESSONS_DIR") {
            if !val.is_empty() {
                self.lessons.dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Merge a config file layer into this one.
    ///
    /// Every value the layer sets replaces the value in `self`; values it
    /// leaves out are kept.
    fn merge(mut self, layer: ConfigLayer) -> Self {
        if let Some(removal) = layer.session.removal {
            self.session.removal = removal;
        }
        if let Some(top_words) = layer.session.top_words {
            self.session.top_words = top_words;
        }
        if let Some(stopwords) = layer.session.stopwords {
            self.session.stopwords = stopwords;
        }

        if let Some(enabled) = layer.hints.enabled {
            self.hints.enabled = enabled;
        }
        if let Some(min) = layer.hints.min_failed_attempts {
            self.hints.min_failed_attempts = min;
        }
        if layer.hints.command.is_some() {
            self.hints.command = layer.hints.command;
        }
        if let Some(timeout_ms) = layer.hints.timeout_ms {
            self.hints.timeout_ms = timeout_ms;
        }

        if let Some(enabled) = layer.progress.enabled {
            self.progress.enabled = enabled;
        }
        if let Some(learner_id) = layer.progress.learner_id {
            self.progress.learner_id = learner_id;
        }
        if layer.progress.log_path.is_some() {
            self.progress.log_path = layer.progress.log_path;
        }

        if layer.lessons.dir.is_some() {
            self.lessons.dir = layer.lessons.dir;
        }

        self
    }

    /// Where accepted formulas are logged.
    pub fn progress_log_path(&self) -> Option<PathBuf> {
        self.progress
            .log_path
            .clone()
            .or_else(default_progress_log_path)
    }

    /// Where lesson files are read from for the given working directory.
    pub fn lessons_dir(&self, cwd: &Path) -> PathBuf {
        self.lessons
            .dir
            .clone()
            .unwrap_or_else(|| project_wrife_dir(cwd).join("lessons"))
    }
}

/// Get the WriFe home directory.
///
/// Checks `WRIFE_HOME` first, then falls back to `~/.wrife`.
pub fn wrife_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("WRIFE_HOME") {
        if home.is_empty() {
            tracing::warn!("WRIFE_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("WRIFE_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".wrife"));
    }

    let fallback_path = env::temp_dir().join("wrife");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Get the project `.wrife` directory.
///
/// Walks up from `cwd` looking for an existing `.wrife/`; falls back to
/// `<cwd>/.wrife`.
pub fn project_wrife_dir(cwd: &Path) -> PathBuf {
    for ancestor in cwd.ancestors() {
        let candidate = ancestor.join(".wrife");
        if candidate.is_dir() {
            return candidate;
        }
    }
    cwd.join(".wrife")
}

/// Default progress log path: `<wrife_home>/progress.log`.
pub fn default_progress_log_path() -> Option<PathBuf> {
    wrife_home().map(|h| h.join("progress.log"))
}

/// Crash log path: `<wrife_home>/crash.log`.
pub fn crash_log_path() -> Option<PathBuf> {
    wrife_home().map(|h| h.join("crash.log"))
}
