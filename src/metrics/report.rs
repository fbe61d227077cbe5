//! Evaluation report assembly
//!
//! Joins computed ground truth with externally supplied retrieved sets and
//! scores every (scenario, method) pair present on both sides.

use super::scorer::{score, RetrievalScore};
use super::RetrievedSets;
use crate::pattern::{GroundTruthSet, PatternError};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

/// One row of the evaluation table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreRecord {
    pub scenario: String,
    pub method: String,
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "F1")]
    pub f1: f64,
    pub retrieved_count: usize,
    pub true_count: usize,
}

impl ScoreRecord {
    pub fn new(scenario: impl Into<String>, method: impl Into<String>, score: RetrievalScore) -> Self {
        Self {
            scenario: scenario.into(),
            method: method.into(),
            precision: score.precision,
            recall: score.recall,
            f1: score.f1,
            retrieved_count: score.retrieved_count,
            true_count: score.true_count,
        }
    }
}

/// Mean scores of one method across the scenarios it was evaluated on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub method: String,
    pub scenarios: usize,
    pub mean_precision: f64,
    pub mean_recall: f64,
    pub mean_f1: f64,
}

/// Scored rows plus the scenarios whose ground truth could not be computed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub rows: Vec<ScoreRecord>,
    /// Scenario -> error message
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub failures: IndexMap<String, String>,
}

impl EvaluationReport {
    pub const COLUMNS: [&'static str; 7] = [
        "Scenario",
        "Method",
        "Precision",
        "Recall",
        "F1",
        "RetrievedCount",
        "TrueCount",
    ];

    /// Score every (scenario, method) whose scenario has both a ground truth
    /// and retrieved sets. One-sided scenarios are skipped.
    ///
    /// Rows follow the order of `retrieved`: scenario first, then method.
    pub fn assemble(truths: &IndexMap<String, GroundTruthSet>, retrieved: &RetrievedSets) -> Self {
        let mut rows = Vec::new();

        for (scenario, methods) in retrieved {
            let Some(truth) = truths.get(scenario) else {
                debug!(scenario = %scenario, "no ground truth, skipping");
                continue;
            };
            for (method, codes) in methods {
                rows.push(ScoreRecord::new(scenario, method, score(codes, truth)));
            }
        }

        for scenario in truths.keys().filter(|s| !retrieved.contains_key(*s)) {
            debug!(scenario = %scenario, "no retrieved sets, skipping");
        }

        Self {
            rows,
            failures: IndexMap::new(),
        }
    }

    /// Attach the scenarios that failed during pattern evaluation
    pub fn with_failures(mut self, failures: &IndexMap<String, PatternError>) -> Self {
        self.failures = failures
            .iter()
            .map(|(scenario, error)| (scenario.clone(), error.to_string()))
            .collect();
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, scenario: &str, method: &str) -> Option<&ScoreRecord> {
        self.rows
            .iter()
            .find(|r| r.scenario == scenario && r.method == method)
    }

    /// Per-method means, methods in order of first appearance
    pub fn method_summary(&self) -> Vec<MethodSummary> {
        let mut grouped: IndexMap<&str, Vec<&ScoreRecord>> = IndexMap::new();
        for row in &self.rows {
            grouped.entry(row.method.as_str()).or_default().push(row);
        }

        grouped
            .into_iter()
            .map(|(method, rows)| {
                let n = rows.len() as f64;
                MethodSummary {
                    method: method.to_string(),
                    scenarios: rows.len(),
                    mean_precision: rows.iter().map(|r| r.precision).sum::<f64>() / n,
                    mean_recall: rows.iter().map(|r| r.recall).sum::<f64>() / n,
                    mean_f1: rows.iter().map(|r| r.f1).sum::<f64>() / n,
                }
            })
            .collect()
    }

    /// Render the rows as CSV with a header line
    pub fn to_csv(&self) -> String {
        let mut out = Self::COLUMNS.join(",");
        out.push('\n');
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{}",
                csv_field(&row.scenario),
                csv_field(&row.method),
                row.precision,
                row.recall,
                row.f1,
                row.retrieved_count,
                row.true_count
            );
        }
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
