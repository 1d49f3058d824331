use crate::models::{Holding, IssueDirection, SectorAnalysis, SectorIssue};
use std::collections::{BTreeMap, HashMap};

pub const SECTOR_OTHER: &str = "other";

/// The sectors with a target weight that are checked for allocation issues.
/// "other" carries a target but is never flagged.
const MAJOR_SECTORS: [&str; 6] = [
    "it",
    "financials",
    "healthcare",
    "consumer-discretionary",
    "industrials",
    "energy",
];

/// Read-only classification and target tables, injected at construction so
/// a per-market or per-locale table can be swapped in without touching the
/// algorithm.
#[derive(Debug, Clone)]
pub struct SectorConfig {
    /// Known ticker → canonical sector
    pub ticker_sectors: HashMap<String, String>,
    /// Free-form sector label → canonical sector
    pub aliases: HashMap<String, String>,
    /// Canonical sector → target fraction; sums to 1.0
    pub ideal: BTreeMap<String, f64>,
    /// Allocation gap beyond which an issue is emitted
    pub threshold: f64,
}

impl Default for SectorConfig {
    fn default() -> Self {
        let ticker_sectors: HashMap<String, String> = [
            ("005930", "it"),
            ("005935", "it"),
            ("000660", "it"),
            ("AAPL", "it"),
            ("MSFT", "it"),
            ("035420", "communication"),
            ("GOOGL", "communication"),
            ("005380", "consumer-discretionary"),
            ("TSLA", "consumer-discretionary"),
            ("068270", "healthcare"),
            ("JNJ", "healthcare"),
            ("051910", "materials"),
            ("006400", "materials"),
            ("005490", "materials"),
            ("105560", "financials"),
            ("JPM", "financials"),
            ("XOM", "energy"),
        ]
        .into_iter()
        .map(|(t, s)| (t.to_string(), s.to_string()))
        .collect();

        let aliases: HashMap<String, String> = [
            ("IT", "it"),
            ("Technology", "it"),
            ("Finance", "financials"),
            ("Financials", "financials"),
            ("Healthcare", "healthcare"),
            ("Consumer", "consumer-discretionary"),
            ("Industrial", "industrials"),
            ("Industrials", "industrials"),
            ("Energy", "energy"),
            ("Communication", "communication"),
            ("Materials", "materials"),
        ]
        .into_iter()
        .map(|(a, s)| (a.to_string(), s.to_string()))
        .collect();

        let ideal: BTreeMap<String, f64> = [
            ("it", 0.25),
            ("financials", 0.20),
            ("healthcare", 0.15),
            ("consumer-discretionary", 0.15),
            ("industrials", 0.10),
            ("energy", 0.10),
            (SECTOR_OTHER, 0.05),
        ]
        .into_iter()
        .map(|(s, w)| (s.to_string(), w))
        .collect();

        Self {
            ticker_sectors,
            aliases,
            ideal,
            threshold: 0.10,
        }
    }
}

/// Classifies holdings into sectors and flags allocation gaps against the
/// target model.
pub struct SectorAnalyzer {
    config: SectorConfig,
}

impl SectorAnalyzer {
    pub fn new(config: SectorConfig) -> Self {
        Self { config }
    }

    /// Canonical sector for one holding: the ticker table wins, then the
    /// holding's own sector label normalized through the alias table, then
    /// "other". Labels the alias table doesn't know also fold into "other".
    fn classify(&self, holding: &Holding) -> String {
        if let Some(sector) = self.config.ticker_sectors.get(&holding.ticker) {
            return sector.clone();
        }

        if let Some(raw) = &holding.sector {
            if let Some(sector) = self.config.aliases.get(raw) {
                return sector.clone();
            }
        }

        SECTOR_OTHER.to_string()
    }

    pub fn analyze(&self, holdings: &[Holding]) -> SectorAnalysis {
        let total_value: f64 = holdings.iter().map(|h| h.market_value).sum();

        if total_value <= 0.0 {
            return SectorAnalysis {
                current: BTreeMap::new(),
                ideal: self.config.ideal.clone(),
                issues: vec![],
            };
        }

        let mut current: BTreeMap<String, f64> = BTreeMap::new();
        for h in holdings {
            let weight = h.market_value / total_value;
            *current.entry(self.classify(h)).or_insert(0.0) += weight;
        }

        let mut issues = vec![];
        for sector in MAJOR_SECTORS {
            let ideal = self.config.ideal.get(sector).copied().unwrap_or(0.0);
            let curr = current.get(sector).copied().unwrap_or(0.0);
            let diff = curr - ideal;

            if diff.abs() > self.config.threshold {
                issues.push(SectorIssue {
                    sector: sector.to_string(),
                    current: curr,
                    recommended: ideal,
                    diff,
                    action: if diff > 0.0 {
                        IssueDirection::Reduce
                    } else {
                        IssueDirection::Increase
                    },
                });
            }
        }

        SectorAnalysis {
            current,
            ideal: self.config.ideal.clone(),
            issues,
        }
    }
}

impl Default for SectorAnalyzer {
    fn default() -> Self {
        Self::new(SectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateHolding, Market};
    use uuid::Uuid;

    fn holding(ticker: &str, sector: Option<&str>, market_value: f64) -> Holding {
        let mut h = Holding::new(
            Uuid::new_v4(),
            CreateHolding {
                ticker: ticker.to_string(),
                name: None,
                market: Market::Foreign,
                sector: sector.map(String::from),
                quantity: 1,
                avg_price: market_value,
            },
        );
        h.market_value = market_value;
        h
    }

    #[test]
    fn zero_value_portfolio_has_empty_current_and_no_issues() {
        let analyzer = SectorAnalyzer::default();
        let analysis = analyzer.analyze(&[holding("AAPL", None, 0.0)]);

        assert!(analysis.current.is_empty());
        assert!(analysis.issues.is_empty());
        assert!(!analysis.ideal.is_empty());
    }

    #[test]
    fn ticker_table_wins_over_recorded_sector() {
        let analyzer = SectorAnalyzer::default();
        // AAPL is in the ticker table as "it" even though the holding says Energy
        let analysis = analyzer.analyze(&[holding("AAPL", Some("Energy"), 100.0)]);

        assert_eq!(analysis.current.get("it"), Some(&1.0));
    }

    #[test]
    fn unknown_labels_fold_into_other() {
        let analyzer = SectorAnalyzer::default();
        let analysis = analyzer.analyze(&[
            holding("ZZZZ", Some("Frontier Robotics"), 50.0),
            holding("YYYY", None, 50.0),
        ]);

        assert_eq!(analysis.current.get(SECTOR_OTHER), Some(&1.0));
    }

    #[test]
    fn alias_table_normalizes_recorded_sectors() {
        let analyzer = SectorAnalyzer::default();
        let analysis = analyzer.analyze(&[holding("ZZZZ", Some("Finance"), 100.0)]);

        assert_eq!(analysis.current.get("financials"), Some(&1.0));
    }

    #[test]
    fn current_weights_sum_to_one() {
        let analyzer = SectorAnalyzer::default();
        let analysis = analyzer.analyze(&[
            holding("AAPL", None, 400.0),
            holding("JNJ", None, 300.0),
            holding("ZZZZ", None, 300.0),
        ]);

        let sum: f64 = analysis.current.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn gap_at_exactly_the_threshold_is_not_an_issue() {
        let analyzer = SectorAnalyzer::default();
        // it at 0.35 vs ideal 0.25: diff exactly 0.10, boundary not exceeded
        let analysis = analyzer.analyze(&[
            holding("AAPL", None, 35.0),
            holding("ZZZZ", None, 65.0),
        ]);

        assert!(analysis.issues.iter().all(|i| i.sector != "it"));
    }

    #[test]
    fn gap_above_the_threshold_is_flagged_with_direction() {
        let analyzer = SectorAnalyzer::default();
        // it at 0.36 vs ideal 0.25: diff 0.11 -> reduce
        let analysis = analyzer.analyze(&[
            holding("AAPL", None, 36.0),
            holding("ZZZZ", None, 64.0),
        ]);

        let issue = analysis
            .issues
            .iter()
            .find(|i| i.sector == "it")
            .expect("expected an issue for it");
        assert_eq!(issue.action, IssueDirection::Reduce);
        assert!((issue.diff - 0.11).abs() < 1e-9);
    }

    #[test]
    fn underallocated_majors_are_flagged_increase() {
        let analyzer = SectorAnalyzer::default();
        // Everything in "other": financials is 0.20 under target
        let analysis = analyzer.analyze(&[holding("ZZZZ", None, 100.0)]);

        let issue = analysis
            .issues
            .iter()
            .find(|i| i.sector == "financials")
            .expect("expected an issue for financials");
        assert_eq!(issue.action, IssueDirection::Increase);
    }

    #[test]
    fn other_never_produces_an_issue() {
        let analyzer = SectorAnalyzer::default();
        // 100% in other, 0.95 over its 0.05 target, still no issue
        let analysis = analyzer.analyze(&[holding("ZZZZ", None, 100.0)]);

        assert!(analysis.issues.iter().all(|i| i.sector != SECTOR_OTHER));
    }
}
