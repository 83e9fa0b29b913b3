//! # Batch Aggregation
//!
//! Each schema/data pair in a batch is loaded and checked independently;
//! [`BatchSummary`] only collects the outcomes afterwards. Nothing about one
//! entry influences another, and entries keep the order they were recorded
//! in.

use mdx_core::LoadError;
use serde::Serialize;

use crate::extract::MetadataReport;

/// Outcome for one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchOutcome {
    /// Both documents loaded; the report carries the validation verdict.
    Report(MetadataReport),
    /// A document failed to load; no report exists.
    LoadError(String),
}

/// One recorded pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// Caller-chosen name for the pair, e.g. the shared file stem.
    pub label: String,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchEntry {
    /// Whether the pair loaded and validated.
    pub fn passed(&self) -> bool {
        matches!(&self.outcome, BatchOutcome::Report(r) if r.validation.valid)
    }
}

/// Aggregated outcomes of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    total: usize,
    passed: usize,
    failed: usize,
    entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pair that produced a report.
    pub fn record_report(&mut self, label: impl Into<String>, report: MetadataReport) {
        self.push(BatchEntry {
            label: label.into(),
            outcome: BatchOutcome::Report(report),
        });
    }

    /// Record a pair whose schema or data failed to load.
    pub fn record_load_error(&mut self, label: impl Into<String>, error: &LoadError) {
        self.push(BatchEntry {
            label: label.into(),
            outcome: BatchOutcome::LoadError(error.to_string()),
        });
    }

    fn push(&mut self, entry: BatchEntry) {
        self.total += 1;
        if entry.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.entries.push(entry);
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// True when every recorded pair passed. An empty batch passes.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }
}
