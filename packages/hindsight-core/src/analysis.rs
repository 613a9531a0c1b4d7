//! End-to-end analysis pipeline.
//!
//! `analyze` runs alignment, valuation, rebasing and summary statistics once
//! for the portfolio and, when supplied, the benchmark.

use crate::benchmark::{compare, BenchmarkComparison};
use crate::config::AnalysisConfig;
use crate::portfolio::{allocation, breakdown, summarize, totals, value, Portfolio};
use crate::series::{align, rebase};
use crate::types::{
    AllocationWeight, Exclusion, Holding, HoldingBreakdown, PerformanceResult, PortfolioTotals,
    PriceSeries, ValueTrajectory,
};
use crate::window::AnalysisWindow;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Everything the engine needs for one run, already fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub portfolio: Portfolio,
    pub window: AnalysisWindow,
    /// Raw price history per holding identifier
    #[serde(default)]
    pub prices: BTreeMap<String, PriceSeries>,
    /// Raw benchmark price history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<PriceSeries>,
}

impl AnalysisRequest {
    pub fn new(portfolio: Portfolio, window: AnalysisWindow) -> Self {
        Self {
            portfolio,
            window,
            prices: BTreeMap::new(),
            benchmark: None,
        }
    }

    /// Attach the price history of one holding.
    pub fn with_prices(mut self, identifier: &str, series: PriceSeries) -> Self {
        self.prices
            .insert(Holding::normalize_identifier(identifier), series);
        self
    }

    /// Attach the benchmark price history.
    pub fn with_benchmark(mut self, series: PriceSeries) -> Self {
        self.benchmark = Some(series);
        self
    }

    /// Price history for a holding, matching identifiers case-insensitively.
    fn prices_for(&self, identifier: &str) -> Option<&PriceSeries> {
        self.prices.get(identifier).or_else(|| {
            self.prices
                .iter()
                .find(|(key, _)| Holding::normalize_identifier(key) == identifier)
                .map(|(_, series)| series)
        })
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub window: AnalysisWindow,
    /// Statistics of the aggregate portfolio trajectory
    pub portfolio: PerformanceResult,
    /// Benchmark statistics, omitted when the benchmark has no usable data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkComparison>,
    /// Outcome per included holding
    pub holdings: Vec<HoldingBreakdown>,
    pub totals: PortfolioTotals,
    /// Weights of the analyzable holdings by invested amount
    pub allocation: Vec<AllocationWeight>,
    /// Aggregate portfolio value per index date
    pub trajectory: ValueTrajectory,
    /// Trajectory rebased to the configured reference
    pub rebased: ValueTrajectory,
    /// Holdings left out of this run and why
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<Exclusion>,
}

/// Run the full analysis.
///
/// Only holdings with a positive invested amount are analyzed. Fails with
/// [`Error::EmptyPortfolio`] when there are none, and with
/// [`Error::InsufficientData`] when none of them has prices in the window.
pub fn analyze(request: &AnalysisRequest, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;

    let AnalysisWindow { start, end } = request.window;
    let subset = request.portfolio.analyzable();
    if subset.is_empty() {
        return Err(Error::EmptyPortfolio);
    }

    let mut excluded = request.portfolio.non_analyzable();
    for exclusion in &excluded {
        warn!(
            "Skipping {}: {}",
            exclusion.identifier,
            exclusion.reason.message()
        );
    }

    let prices: BTreeMap<String, PriceSeries> = subset
        .holdings()
        .map(|h| {
            let series = request.prices_for(&h.identifier).cloned().unwrap_or_default();
            (h.identifier.clone(), series)
        })
        .collect();

    let aligned = align(&prices, request.benchmark.as_ref(), start, end)?;
    excluded.extend(aligned.excluded.iter().cloned());

    if aligned.holdings.is_empty() {
        return Err(Error::InsufficientData(format!(
            "no holding has price data between {} and {}",
            start, end
        )));
    }

    let trajectory = value(&aligned, &subset.invested_amounts());
    let performance = summarize(&trajectory, start, end, config.risk_free_rate)?;

    let rebased = rebase(&trajectory, config.reference_value)?;

    let benchmark = compare(&aligned, start, end, config, &performance);
    let holdings = breakdown(&aligned, &subset);
    let totals = totals(&holdings);

    info!(
        "Analyzed {} holdings over {} dates: total return {:.2}%",
        holdings.len(),
        trajectory.len(),
        performance.total_return_pct
    );

    Ok(AnalysisReport {
        window: request.window,
        portfolio: performance,
        benchmark,
        holdings,
        totals,
        allocation: allocation(&subset),
        trajectory,
        rebased,
        excluded,
    })
}
