//! End-to-end tests for the analysis pipeline's computation stages:
//! price → valuation → aggregation → risk + sector → recommendation.
//!
//! These run the real pipeline code over in-memory records. Orchestrator
//! persistence (status transitions against Postgres) requires a running
//! database and is exercised against a live server instead.

use std::sync::Arc;

use portfolioai_backend::models::{
    Holding, IssueDirection, Market, Portfolio, RiskLevel,
};
use portfolioai_backend::services::recommendation_service::{
    RecommendationService, StubNarrativeProvider,
};
use portfolioai_backend::services::sector_service::SectorAnalyzer;
use portfolioai_backend::services::{risk_service, valuation};
use uuid::Uuid;

fn portfolio() -> Portfolio {
    Portfolio {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "growth".to_string(),
        description: None,
        total_value: 0.0,
        total_cost: 0.0,
        profit_loss: 0.0,
        profit_rate: 0.0,
        created_at: chrono::Utc::now(),
    }
}

fn holding(portfolio_id: Uuid, ticker: &str, quantity: i32, avg_price: f64) -> Holding {
    Holding {
        id: Uuid::new_v4(),
        portfolio_id,
        ticker: ticker.to_string(),
        name: None,
        market: Market::Foreign,
        sector: None,
        quantity,
        avg_price,
        current_price: 0.0,
        market_value: 0.0,
        profit_loss: 0.0,
        profit_rate: 0.0,
        weight: 0.0,
        created_at: chrono::Utc::now(),
    }
}

#[test]
fn single_holding_snapshot_matches_worked_example() {
    // 10 shares at avg 100, resolved price 150
    let mut p = portfolio();
    let mut holdings = vec![holding(p.id, "AAPL", 10, 100.0)];

    valuation::update_holding(&mut holdings[0], 150.0);
    valuation::recompute_portfolio(&mut p, &mut holdings);

    assert_eq!(holdings[0].market_value, 1500.0);
    assert_eq!(holdings[0].profit_loss, 500.0);
    assert_eq!(holdings[0].profit_rate, 50.0);
    assert_eq!(holdings[0].weight, 100.0);
    assert_eq!(p.total_value, 1500.0);
    assert_eq!(p.profit_rate, 50.0);
}

#[test]
fn weights_sum_to_one_hundred_or_all_zero() {
    let mut p = portfolio();
    let mut holdings = vec![
        holding(p.id, "AAPL", 10, 100.0),
        holding(p.id, "MSFT", 3, 250.0),
        holding(p.id, "JNJ", 7, 60.0),
    ];
    for (h, price) in holdings.iter_mut().zip([150.0, 300.0, 55.0]) {
        valuation::update_holding(h, price);
    }
    valuation::recompute_portfolio(&mut p, &mut holdings);
    let sum: f64 = holdings.iter().map(|h| h.weight).sum();
    assert!((sum - 100.0).abs() < 1e-9);

    // All prices unresolved: every weight stays zero
    let mut p = portfolio();
    let mut holdings = vec![
        holding(p.id, "AAPL", 10, 100.0),
        holding(p.id, "MSFT", 3, 250.0),
    ];
    for h in holdings.iter_mut() {
        valuation::update_holding(h, 0.0);
    }
    valuation::recompute_portfolio(&mut p, &mut holdings);
    assert!(holdings.iter().all(|h| h.weight == 0.0));
}

#[test]
fn risk_tier_is_a_pure_function_of_the_score() {
    assert_eq!(RiskLevel::from_score(3), RiskLevel::Stable);
    assert_eq!(RiskLevel::from_score(4), RiskLevel::Balanced);
    assert_eq!(RiskLevel::from_score(7), RiskLevel::Aggressive);
    assert_eq!(RiskLevel::from_score(8), RiskLevel::VeryHighRisk);
}

#[test]
fn empty_holding_set_degenerates_cleanly() {
    let metrics = risk_service::compute_risk_metrics(&[]);
    assert_eq!(metrics.risk_score, 0);
    assert_eq!(metrics.risk_level, RiskLevel::Undefined);

    let analyzer = SectorAnalyzer::default();
    let analysis = analyzer.analyze(&[]);
    assert!(analysis.current.is_empty());
    assert!(analysis.issues.is_empty());
}

#[test]
fn sector_issue_emission_is_threshold_exact() {
    let p = portfolio();
    let analyzer = SectorAnalyzer::default();

    // IT at exactly ideal + 0.10: no issue
    let mut at_boundary = vec![
        holding(p.id, "AAPL", 1, 0.0),
        holding(p.id, "ZZZZ", 1, 0.0),
    ];
    at_boundary[0].market_value = 35.0;
    at_boundary[1].market_value = 65.0;
    let analysis = analyzer.analyze(&at_boundary);
    assert!(analysis.issues.iter().all(|i| i.sector != "it"));

    // IT one point further over: flagged for reduction
    let mut over = vec![
        holding(p.id, "AAPL", 1, 0.0),
        holding(p.id, "ZZZZ", 1, 0.0),
    ];
    over[0].market_value = 36.0;
    over[1].market_value = 64.0;
    let analysis = analyzer.analyze(&over);
    let issue = analysis
        .issues
        .iter()
        .find(|i| i.sector == "it")
        .expect("expected an over-allocation issue");
    assert_eq!(issue.action, IssueDirection::Reduce);
}

#[tokio::test]
async fn pipeline_produces_a_complete_record_with_the_stub_narrative() {
    let mut p = portfolio();
    let mut holdings = vec![holding(p.id, "AAPL", 10, 100.0)];

    valuation::update_holding(&mut holdings[0], 150.0);
    valuation::recompute_portfolio(&mut p, &mut holdings);

    let risk = risk_service::compute_risk_metrics(&holdings);
    let sectors = SectorAnalyzer::default().analyze(&holdings);
    let payload = RecommendationService::new(Arc::new(StubNarrativeProvider))
        .synthesize(&p, &holdings, &risk, &sectors)
        .await;

    // The snapshot is embedded in the computed blocks
    assert!((0..=10).contains(&risk.risk_score));
    assert_eq!(sectors.current.get("it"), Some(&1.0));
    assert!(!payload.summary.is_empty());
    assert!(!payload.long_term_strategy.is_empty());

    // Everything the analysis row stores serializes cleanly
    assert!(serde_json::to_value(&payload).is_ok());
    assert!(serde_json::to_value(&sectors).is_ok());
}
