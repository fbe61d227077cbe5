//! Set-based retrieval quality
//!
//! Scores compare an unranked retrieved set with a ground-truth set, so only
//! precision, recall and F1 apply.

use serde::Serialize;
use std::collections::BTreeSet;

/// Precision / recall / F1 of one retrieved set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrievalScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Retrieved ids that are in the ground truth
    pub hits: usize,
    pub retrieved_count: usize,
    pub true_count: usize,
}

/// Score `retrieved` against `truth`
///
/// - precision = |R ∩ T| / |R|, 0 when R is empty
/// - recall = |R ∩ T| / |T|, 0 when T is empty
/// - F1 = 2PR / (P + R), 0 when P + R = 0
pub fn score<T: Ord>(retrieved: &BTreeSet<T>, truth: &BTreeSet<T>) -> RetrievalScore {
    let hits = retrieved.intersection(truth).count();
    let precision = ratio(hits, retrieved.len());
    let recall = ratio(hits, truth.len());
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    RetrievalScore {
        precision,
        recall,
        f1,
        hits,
        retrieved_count: retrieved.len(),
        true_count: truth.len(),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
