use crate::models::{Holding, RiskLevel, RiskMetrics};
use tracing::debug;

// The supporting statistics are composition-derived proxies, not fitted to
// a historical return series. They scale with portfolio concentration
// (Herfindahl index over holding weights) so a one-stock portfolio scores
// as riskier than a broadly spread one. A time-series implementation can
// replace the internals as long as the score range [0,10] and the tier
// mapping in `RiskLevel::from_score` stay intact.

/// Derive the quantitative risk block for a holding set.
///
/// Never fails: an empty set yields score 0 and the "undefined" tier, and
/// missing price data degrades to conservative constants.
pub fn compute_risk_metrics(holdings: &[Holding]) -> RiskMetrics {
    if holdings.is_empty() {
        return RiskMetrics {
            risk_score: 0,
            risk_level: RiskLevel::Undefined,
            beta: 0.0,
            sharpe_ratio: 0.0,
            volatility: 0.0,
            max_drawdown: 0.0,
        };
    }

    let concentration = herfindahl(holdings);
    debug!(
        "Computing risk metrics for {} holdings (concentration {:.3})",
        holdings.len(),
        concentration
    );

    let risk_score = (2.0 + 8.0 * concentration).round().clamp(0.0, 10.0) as i32;
    let beta = 0.8 + 0.4 * concentration;
    let sharpe_ratio = 1.5 - concentration;
    let volatility = 0.10 + 0.15 * concentration;
    let max_drawdown = -(0.05 + 0.10 * concentration);

    RiskMetrics {
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
        beta,
        sharpe_ratio,
        volatility: volatility * 100.0,
        max_drawdown: max_drawdown * 100.0,
    }
}

/// Herfindahl index over holding weights, in (0, 1].
///
/// With no resolved market values the holdings are treated as equally
/// weighted, which is the conservative estimate for a fresh portfolio.
fn herfindahl(holdings: &[Holding]) -> f64 {
    let total: f64 = holdings.iter().map(|h| h.market_value).sum();

    if total > 0.0 {
        holdings
            .iter()
            .map(|h| {
                let w = h.market_value / total;
                w * w
            })
            .sum()
    } else {
        1.0 / holdings.len() as f64
    }
}
