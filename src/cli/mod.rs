//! CLI commands for WriFe.
//!
//! - **Learner commands**: practice (interactive sentence evolution)
//! - **Classroom commands**: lessons, grade, progress

// Learner commands
pub mod practice;

// Classroom commands
pub mod grade;
pub mod lessons_cmd;
pub mod progress_cmd;

pub use grade::GradeCommand;
pub use lessons_cmd::LessonsCommand;
pub use practice::{PracticeCommand, PracticeInput};
pub use progress_cmd::ProgressCommand;
