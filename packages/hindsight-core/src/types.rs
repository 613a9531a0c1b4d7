//! Core data types for the hindsight engine.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One instrument in the portfolio with the amount assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    /// Ticker or instrument code (trimmed, uppercase)
    pub identifier: String,
    /// Display name, informational only
    pub name: String,
    /// Amount invested at the start of the window, if one has been set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invested_amount: Option<f64>,
}

impl Holding {
    /// Create a holding with no invested amount yet.
    pub fn new(identifier: &str, name: &str) -> Self {
        let identifier = Self::normalize_identifier(identifier);
        let name = match name.trim() {
            "" => identifier.clone(),
            trimmed => trimmed.to_string(),
        };

        Self {
            identifier,
            name,
            invested_amount: None,
        }
    }

    /// Set the invested amount.
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.invested_amount = Some(amount);
        self
    }

    /// Canonical form of an identifier: trimmed and uppercased.
    pub fn normalize_identifier(identifier: &str) -> String {
        identifier.trim().to_uppercase()
    }

    /// Whether this holding takes part in an analysis.
    ///
    /// Only a finite, strictly positive invested amount qualifies.
    pub fn is_analyzable(&self) -> bool {
        self.invested_amount
            .map(|amount| amount.is_finite() && amount > 0.0)
            .unwrap_or(false)
    }
}

/// A raw observation as delivered by a market-data source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Missing when the source had no quote for the date
    #[serde(default)]
    pub price: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price: Some(price),
        }
    }
}

/// Date-ordered closing prices for one instrument.
///
/// Dates are unique and strictly increasing. Observations without a price
/// (or with a non-finite one) are dropped on the way in, never stored as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from raw observations, dropping the ones without a price.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut series = Self::new();
        for (date, price) in observations {
            if let Some(price) = price {
                series.insert(date, price);
            }
        }
        series
    }

    /// Build a series from fully populated observations.
    pub fn from_prices<I>(prices: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::from_observations(prices.into_iter().map(|(d, p)| (d, Some(p))))
    }

    /// Insert or replace the price for a date. Non-finite prices are ignored.
    pub fn insert(&mut self, date: NaiveDate, price: f64) {
        if price.is_finite() {
            self.points.insert(date, price);
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Price on an exact date.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).copied()
    }

    /// All observations in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().map(|(d, p)| (*d, *p))
    }

    /// Observations within the closed range `[start, end]`.
    pub fn range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        // BTreeMap::range panics on an inverted range
        let bounds = (start <= end).then_some(start..=end);
        bounds
            .into_iter()
            .flat_map(move |r| self.points.range(r))
            .map(|(d, p)| (*d, *p))
    }

    /// First observation.
    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.points.iter().next().map(|(d, p)| (*d, *p))
    }

    /// Last observation.
    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.iter().next_back().map(|(d, p)| (*d, *p))
    }
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::from_observations(points.into_iter().map(|p| (p.date, p.price)))
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series
            .points
            .into_iter()
            .map(|(date, price)| PricePoint::new(date, price))
            .collect()
    }
}

/// Date-indexed aggregate values (portfolio or benchmark).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValueTrajectory {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl ValueTrajectory {
    /// Pair dates with values. Both must have the same length.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(Error::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        Ok(Self { dates, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_value(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// `(date, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// The window spans zero (or negative) calendar time
    PeriodTooShort,
    /// Daily returns have zero standard deviation
    ZeroVariance,
    /// Fewer than two daily returns
    InsufficientReturns,
}

impl Unavailable {
    /// Human-readable explanation.
    pub fn message(&self) -> &'static str {
        match self {
            Unavailable::PeriodTooShort => "period too short to annualize",
            Unavailable::ZeroVariance => "returns have no variance",
            Unavailable::InsufficientReturns => "not enough daily returns",
        }
    }
}

/// A statistic that is either a finite number or explicitly not computable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Value(f64),
    NotComputable(Unavailable),
}

impl Metric {
    /// Wrap a computed number, falling back to `reason` if it is NaN or infinite.
    pub fn finite_or(value: f64, reason: Unavailable) -> Self {
        if value.is_finite() {
            Metric::Value(value)
        } else {
            Metric::NotComputable(reason)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotComputable(_) => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, Metric::Value(_))
    }

    /// The reason, if not computable.
    pub fn unavailable(&self) -> Option<Unavailable> {
        match self {
            Metric::Value(_) => None,
            Metric::NotComputable(reason) => Some(*reason),
        }
    }
}

/// Summary statistics derived from one value trajectory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceResult {
    /// Total return over the trajectory in percent
    pub total_return_pct: f64,
    /// Compound annual growth rate in percent (0 when the period is too short)
    pub annualized_return_pct: f64,
    /// Annualized standard deviation of daily returns in percent
    pub annualized_volatility_pct: Metric,
    /// Annualized mean return over annualized volatility
    pub risk_ratio: Metric,
    /// Largest peak-to-trough decline in percent
    pub max_drawdown_pct: f64,
    /// Calendar span of the window in 365.25-day years
    pub years_elapsed: f64,
    /// Number of points in the trajectory
    pub observations: usize,
    /// Conditions that affected the figures above
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Unavailable>,
}

/// Per-holding outcome of the simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldingBreakdown {
    pub identifier: String,
    pub name: String,
    /// Amount invested at the opening price
    pub initial_investment: f64,
    /// Date of the first available price in the window
    pub opening_date: NaiveDate,
    pub opening_price: f64,
    /// Price on the last index date (forward-filled if needed)
    pub final_price: f64,
    pub shares: f64,
    pub final_value: f64,
    pub profit_loss: f64,
    pub return_pct: f64,
}

/// Aggregate figures across every included holding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioTotals {
    pub initial_investment: f64,
    pub final_value: f64,
    pub profit_loss: f64,
    pub return_pct: f64,
}

/// Share of total invested capital assigned to one holding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationWeight {
    pub identifier: String,
    pub name: String,
    pub invested_amount: f64,
    pub weight_pct: f64,
}

/// Why a holding was left out of an analysis run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Invested amount missing, zero or negative
    NonPositiveAmount,
    /// No price observation inside the window
    NoDataInRange,
    /// First price in the window is zero or negative
    NonPositiveOpeningPrice,
}

impl ExclusionReason {
    pub fn message(&self) -> &'static str {
        match self {
            ExclusionReason::NonPositiveAmount => "no positive invested amount",
            ExclusionReason::NoDataInRange => "no data in range",
            ExclusionReason::NonPositiveOpeningPrice => "non-positive opening price",
        }
    }
}

/// A holding left out of the run, reported to the caller as a warning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exclusion {
    pub identifier: String,
    pub reason: ExclusionReason,
}

impl Exclusion {
    pub fn new(identifier: &str, reason: ExclusionReason) -> Self {
        Self {
            identifier: identifier.to_string(),
            reason,
        }
    }
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
