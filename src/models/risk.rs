use serde::{Deserialize, Serialize};

/// Quantitative risk block for one portfolio.
///
/// `volatility` and `max_drawdown` are percentages (fractions × 100);
/// `max_drawdown` is negative or zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Composite risk score in [0, 10]
    pub risk_score: i32,
    pub risk_level: RiskLevel,
    pub beta: f64,
    pub sharpe_ratio: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
}

/// Qualitative tier derived from the numeric risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Undefined,
    Stable,
    Balanced,
    Aggressive,
    VeryHighRisk,
}

impl RiskLevel {
    /// Tier bands are inclusive on the high end: 0-3 stable, 4-5 balanced,
    /// 6-7 aggressive, 8+ very-high-risk.
    pub fn from_score(score: i32) -> Self {
        if score <= 3 {
            RiskLevel::Stable
        } else if score <= 5 {
            RiskLevel::Balanced
        } else if score <= 7 {
            RiskLevel::Aggressive
        } else {
            RiskLevel::VeryHighRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Undefined => "undefined",
            RiskLevel::Stable => "stable",
            RiskLevel::Balanced => "balanced",
            RiskLevel::Aggressive => "aggressive",
            RiskLevel::VeryHighRisk => "very-high-risk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_exact() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Stable);
        assert_eq!(RiskLevel::from_score(3), RiskLevel::Stable);
        assert_eq!(RiskLevel::from_score(4), RiskLevel::Balanced);
        assert_eq!(RiskLevel::from_score(5), RiskLevel::Balanced);
        assert_eq!(RiskLevel::from_score(6), RiskLevel::Aggressive);
        assert_eq!(RiskLevel::from_score(7), RiskLevel::Aggressive);
        assert_eq!(RiskLevel::from_score(8), RiskLevel::VeryHighRisk);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::VeryHighRisk);
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&RiskLevel::VeryHighRisk).unwrap();
        assert_eq!(json, "\"very-high-risk\"");
    }
}
