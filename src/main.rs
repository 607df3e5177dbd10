//! WriFe - Progressive Writing Practice
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wrife::config::{crash_log_path, Config};
use wrife::error::exit_codes;
use wrife::lessons::{catalog_from_config, LessonSource, LIBRARY_LESSON_ID};

// =============================================================================
// CLI Definition
// =============================================================================

/// WriFe - Progressive Writing Practice
#[derive(Parser)]
#[command(name = "wrife")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// [Learner] Grow a sentence formula by formula (commands on stdin)
    Practice {
        /// Lesson to practise
        #[arg(long, short, default_value = LIBRARY_LESSON_ID)]
        lesson: String,
        /// Learner ID recorded in the progress log
        #[arg(long)]
        learner: Option<String>,
        /// Output one JSON view per line
        #[arg(long, short)]
        json: bool,
        /// Only print the final summary
        #[arg(long, short)]
        quiet: bool,
    },

    /// [Classroom] List available lessons
    Lessons {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// [Classroom] Grade a lesson's activities against a JSON answers file
    Grade {
        /// Lesson whose activities are graded
        lesson: String,
        /// JSON object mapping activity id to answer
        answers: PathBuf,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// [Classroom] Summarise the progress log
    Progress {
        /// Restrict the report to one learner
        #[arg(long)]
        learner: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("wrife error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Install the stderr log subscriber, filtered by `WRIFE_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("WRIFE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Set up the global panic handler.
///
/// On panic, logs to `<wrife_home>/crash.log` and exits with the error code.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("wrife panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
            if let Some(parent) = crash_log.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::ERROR);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Practice {
            lesson,
            learner,
            json,
            quiet,
        } => run_practice(&lesson, learner, json, quiet, &cwd),
        Commands::Lessons { json, quiet } => run_lessons(json, quiet, &cwd),
        Commands::Grade {
            lesson,
            answers,
            json,
            quiet,
        } => run_grade(&lesson, &answers, json, quiet, &cwd),
        Commands::Progress {
            learner,
            json,
            quiet,
        } => run_progress(learner, json, quiet, &cwd),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn run_practice(
    lesson_id: &str,
    learner: Option<String>,
    json: bool,
    quiet: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wrife::cli::practice::{PracticeCommand, PracticeOptions, PracticeOutput};
    use wrife::runner::PracticeRunner;

    let config = Config::load_from_cwd(cwd);
    let options = PracticeOptions { json, quiet };

    let lesson = match catalog_from_config(&config, cwd).load(lesson_id) {
        Ok(lesson) => lesson,
        Err(e) => {
            let output = PracticeOutput::failure(e.to_string());
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                eprintln!("Practice failed: {}", e);
            }
            return Ok(success_to_exit_code(false));
        }
    };

    let learner_id = learner.unwrap_or_else(|| config.progress.learner_id.clone());
    let runner = PracticeRunner::from_config(&lesson, learner_id, config)?;
    let mut cmd = PracticeCommand::new(runner);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let output = cmd.run(stdin.lock(), &mut out, &options)?;

    // With --json the views were already streamed unless --quiet held them back.
    if !json || quiet {
        let formatted = cmd.format_output(&output, &options);
        if !formatted.is_empty() {
            writeln!(out, "{}", formatted)?;
        }
    }

    Ok(success_to_exit_code(output.success))
}

fn run_lessons(json: bool, quiet: bool, cwd: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wrife::cli::lessons_cmd::{LessonsCommand, LessonsOptions};

    let config = Config::load_from_cwd(cwd);

    let cmd = LessonsCommand::new(catalog_from_config(&config, cwd));
    let options = LessonsOptions { json, quiet };

    let output = cmd.run();
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_grade(
    lesson_id: &str,
    answers: &Path,
    json: bool,
    quiet: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wrife::cli::grade::{GradeCommand, GradeOptions};

    let config = Config::load_from_cwd(cwd);

    let cmd = GradeCommand::new(catalog_from_config(&config, cwd));
    let options = GradeOptions { json, quiet };

    let output = cmd.run(lesson_id, answers);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_progress(
    learner: Option<String>,
    json: bool,
    quiet: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wrife::cli::progress_cmd::{ProgressCommand, ProgressOptions};
    use wrife::progress::JsonlProgressLog;

    let config = Config::load_from_cwd(cwd);
    let log_path = config
        .progress_log_path()
        .ok_or("no progress log path: set progress.log_path or WRIFE_HOME")?;

    let cmd = ProgressCommand::new(JsonlProgressLog::new(log_path));
    let options = ProgressOptions {
        json,
        quiet,
        learner_id: learner,
    };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================
