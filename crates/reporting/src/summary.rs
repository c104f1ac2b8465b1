//! Tabular Summaries

use feature_engine::{FailureModes, MachineRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A two-column table: one label column and one value column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularSummary {
    pub label_column: String,
    pub value_column: String,
    pub rows: Vec<(String, f64)>,
}

impl TabularSummary {
    pub fn new(
        label_column: impl Into<String>,
        value_column: impl Into<String>,
        rows: Vec<(String, f64)>,
    ) -> Self {
        Self {
            label_column: label_column.into(),
            value_column: value_column.into(),
            rows,
        }
    }

    /// Number of records per machine type
    pub fn count_by_type(records: &[MachineRecord]) -> Self {
        let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            *counts.entry(record.machine_type.as_str()).or_default() += 1.0;
        }
        Self::from_map("Type", "count", counts)
    }

    /// Number of labelled failures per machine type
    pub fn failures_by_type(records: &[MachineRecord]) -> Self {
        let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            let entry = counts.entry(record.machine_type.as_str()).or_default();
            if record.is_failure() == Some(true) {
                *entry += 1.0;
            }
        }
        Self::from_map("Type", "failures", counts)
    }

    /// Number of records raising each failure mode
    pub fn failure_mode_counts(records: &[MachineRecord]) -> Self {
        let mut totals = [0.0f64; 5];
        for record in records {
            for (total, flag) in totals.iter_mut().zip(record.failure_modes().as_array()) {
                *total += f64::from(flag);
            }
        }
        let rows = FailureModes::NAMES
            .iter()
            .zip(totals)
            .map(|(name, total)| (name.to_string(), total))
            .collect();
        Self::new("failure mode", "count", rows)
    }

    fn from_map(label_column: &str, value_column: &str, counts: BTreeMap<&str, f64>) -> Self {
        let rows = counts
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect();
        Self::new(label_column, value_column, rows)
    }

    /// Sum of the value column
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|(_, v)| v).sum()
    }

    /// Copy with rows sorted ascending by value (stable for ties)
    pub fn sorted_ascending(&self) -> Self {
        let mut sorted = self.clone();
        sorted.rows.sort_by(|a, b| a.1.total_cmp(&b.1));
        sorted
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|(_, value)| *value).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
