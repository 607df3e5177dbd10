//! In-memory progress sink.
//!
//! Keeps records in a `RwLock<Vec>`; used by tests and by embedders that
//! forward records elsewhere themselves.

use std::sync::RwLock;

use crate::error::{Result, WrifeError};
use crate::progress::traits::{ProgressRecord, ProgressSink};

/// In-memory progress sink.
#[derive(Debug, Default)]
pub struct MemoryProgressSink {
    records: RwLock<Vec<ProgressRecord>>,
}

impl MemoryProgressSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far.
    pub fn records(&self) -> Vec<ProgressRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of records received.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .map(|records| records.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    /// Check if no records have been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressSink for MemoryProgressSink {
    fn record(&self, record: &ProgressRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| WrifeError::progress("progress sink lock poisoned"))?;
        records.push(record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::PROGRESS_SCHEMA_VERSION;
    use chrono::Utc;

    #[test]
    fn test_records_in_order() {
        let sink = MemoryProgressSink::new();
        assert!(sink.is_empty());

        for n in 1..=3 {
            sink.record(&ProgressRecord {
                v: PROGRESS_SCHEMA_VERSION,
                ts: Utc::now(),
                learner_id: "pupil-1".to_string(),
                lesson_id: "library".to_string(),
                session_id: "s-1".to_string(),
                formula_number: n,
                correct: true,
                response: String::new(),
                elapsed_ms: 0,
                attempts: 1,
            })
            .unwrap();
        }

        let numbers: Vec<u32> = sink.records().iter().map(|r| r.formula_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.name(), "memory");
    }

    #[test]
    fn test_boxed_sink_delegates() {
        let sink: Box<dyn ProgressSink> = Box::new(MemoryProgressSink::new());
        assert_eq!(sink.name(), "memory");
    }
}
