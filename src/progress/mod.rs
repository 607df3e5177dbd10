//! Progress persistence for accepted formulas.
//!
//! A session reports each accepted step to a [`ProgressSink`]. Sinks are
//! collaborators: the runner masks their failures so a broken log never
//! stops a learner.

pub mod log;
pub mod memory;
pub mod traits;

pub use log::JsonlProgressLog;
pub use memory::MemoryProgressSink;
pub use traits::{ProgressRecord, ProgressSink, PROGRESS_SCHEMA_VERSION};
