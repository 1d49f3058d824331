use crate::models::{Holding, Portfolio};

/// Recompute one holding's derived fields from a freshly resolved price.
///
/// A cost basis of zero is valid (gifted shares); the profit rate is 0 in
/// that case to avoid dividing by zero.
pub fn update_holding(holding: &mut Holding, price: f64) {
    holding.current_price = price;
    holding.market_value = price * holding.quantity as f64;
    holding.profit_loss = holding.market_value - holding.avg_price * holding.quantity as f64;
    holding.profit_rate = if holding.avg_price > 0.0 {
        holding.profit_loss / (holding.avg_price * holding.quantity as f64) * 100.0
    } else {
        0.0
    };
}

/// Recompute portfolio totals and per-holding weights from the holding set.
///
/// This full recomputation is the single source of truth for the aggregate
/// fields; nothing maintains them incrementally. With a zero total value
/// every weight stays 0 (no NaN propagation).
pub fn recompute_portfolio(portfolio: &mut Portfolio, holdings: &mut [Holding]) {
    let total_value: f64 = holdings.iter().map(|h| h.market_value).sum();
    let total_cost: f64 = holdings
        .iter()
        .map(|h| h.avg_price * h.quantity as f64)
        .sum();

    portfolio.total_value = total_value;
    portfolio.total_cost = total_cost;
    portfolio.profit_loss = total_value - total_cost;
    portfolio.profit_rate = if total_cost > 0.0 {
        portfolio.profit_loss / total_cost * 100.0
    } else {
        0.0
    };

    for h in holdings.iter_mut() {
        h.weight = if total_value > 0.0 {
            h.market_value / total_value * 100.0
        } else {
            0.0
        };
    }
}
