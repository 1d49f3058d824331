use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of the portfolio's sector allocation against the target model.
///
/// Weights are fractions of total market value (current weights sum to 1.0
/// across sectors present, rounding aside).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAnalysis {
    pub current: BTreeMap<String, f64>,
    pub ideal: BTreeMap<String, f64>,
    pub issues: Vec<SectorIssue>,
}

/// A sector whose current weight deviates from the target by more than the
/// rebalance threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorIssue {
    pub sector: String,
    pub current: f64,
    pub recommended: f64,
    pub diff: f64,
    pub action: IssueDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueDirection {
    Reduce,
    Increase,
}
