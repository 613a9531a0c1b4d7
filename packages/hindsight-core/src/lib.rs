//! Hindsight Core - Historical portfolio valuation and performance analytics.
//!
//! Given a set of holdings with invested amounts and their already-fetched
//! price histories, this crate replays a buy-and-hold allocation over a
//! historical window:
//!
//! - **Series alignment**: restricting and filling price series onto a shared date index
//! - **Valuation**: share counts and the aggregate value trajectory
//! - **Rebasing**: scaling trajectories so they start at 100
//! - **Performance**: total/annualized return, volatility, risk ratio, max drawdown
//! - **Benchmark comparison**: the same statistics for a market index
//!
//! The engine performs no I/O and keeps no state between calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use hindsight_core::{analyze, AnalysisConfig, AnalysisRequest, AnalysisWindow, Portfolio};
//!
//! let mut portfolio = Portfolio::new();
//! portfolio.add_holding("7203.T", "Toyota Motor");
//! portfolio.set_invested_amount("7203.T", Some(600_000.0)).unwrap();
//!
//! let window = AnalysisWindow::new(
//!     NaiveDate::from_ymd_opt(2023, 1, 4).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
//! )
//! .unwrap();
//!
//! let request = AnalysisRequest::new(portfolio, window);
//! // request.prices.insert("7203.T".into(), series);
//! let report = analyze(&request, &AnalysisConfig::default()).unwrap();
//! println!("Total return: {:.2}%", report.portfolio.total_return_pct);
//! ```

pub mod analysis;
pub mod benchmark;
pub mod config;
pub mod portfolio;
pub mod series;
pub mod types;
pub mod window;

// Re-export commonly used types
pub use types::{
    AllocationWeight, ApiResponse, Exclusion, ExclusionReason, Holding, HoldingBreakdown, Metric,
    PerformanceResult, PortfolioTotals, PricePoint, PriceSeries, Unavailable, ValueTrajectory,
};

// Re-export main functionality
pub use analysis::{analyze, AnalysisReport, AnalysisRequest};
pub use benchmark::{compare, Benchmark, BenchmarkComparison};
pub use config::AnalysisConfig;
pub use portfolio::{
    allocation, breakdown, daily_returns, max_drawdown, risk_ratio, summarize, totals, value,
    volatility, Portfolio, DAYS_PER_YEAR, TRADING_DAYS_PER_YEAR,
};
pub use series::{align, rebase, AlignedHolding, AlignedSeries, REBASE_REFERENCE};
pub use window::AnalysisWindow;

/// Error types for hindsight-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("No holding has a positive invested amount")]
    EmptyPortfolio,

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("No baseline: trajectory is empty or starts at a non-positive value")]
    NoBaseline,

    #[error("Length mismatch: {dates} dates vs {values} values")]
    LengthMismatch { dates: usize, values: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for hindsight-core operations.
pub type Result<T> = std::result::Result<T, Error>;
