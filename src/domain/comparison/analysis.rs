//! Normalized comparison results.
//!
//! These are the guaranteed-shape values produced by the normalizer and
//! returned to callers. Field names serialize in camelCase to match the JSON
//! contract requested from the model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ComparisonId, Timestamp};

use super::ComparisonInput;

/// Analysis of a single option.
///
/// `name` and every element of `pros`/`cons` are trimmed and non-empty.
/// `scores` maps a constraint name to a free-text rating and need not cover
/// every constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionAnalysis {
    pub name: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub scores: BTreeMap<String, String>,
}

/// Scenario-based statement of when an option is preferable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOff {
    pub scenario: String,
    pub recommendation: String,
}

/// Output of a successful normalization.
///
/// `options` always has at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub options: Vec<OptionAnalysis>,
    pub trade_offs: Vec<TradeOff>,
}

/// What a completed comparison returns to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub id: ComparisonId,
    pub options: Vec<OptionAnalysis>,
    pub trade_offs: Vec<TradeOff>,
    pub created_at: Timestamp,
}

impl ComparisonRecord {
    /// Assembles a record from a stored result.
    pub fn new(id: ComparisonId, result: NormalizedResult, created_at: Timestamp) -> Self {
        Self {
            id,
            options: result.options,
            trade_offs: result.trade_offs,
            created_at,
        }
    }
}

/// Processing state of a stored comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    /// Request stored, no result yet (in flight, or failed downstream).
    Pending,
    /// Result stored.
    Completed,
}

/// Read model of a stored comparison: the request plus its result, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub id: ComparisonId,
    pub input: ComparisonInput,
    pub requested_at: Timestamp,
    pub result: Option<StoredResult>,
}

/// A persisted normalized result.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub result: NormalizedResult,
    pub created_at: Timestamp,
}

impl ComparisonView {
    pub fn status(&self) -> ComparisonStatus {
        match self.result {
            Some(_) => ComparisonStatus::Completed,
            None => ComparisonStatus::Pending,
        }
    }
}
