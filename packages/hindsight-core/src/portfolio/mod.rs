//! Portfolio module.
//!
//! Provides the caller-owned holding set, buy-and-hold valuation, performance
//! analytics, and risk metrics.

mod holdings;
mod performance;
mod risk;
mod valuation;

pub use holdings::Portfolio;
pub use performance::{
    annualize_return, holding_period_return, summarize, DAYS_PER_YEAR, TRADING_DAYS_PER_YEAR,
};
pub use risk::{daily_returns, max_drawdown, risk_ratio, volatility};
pub use valuation::{allocation, breakdown, totals, value};
