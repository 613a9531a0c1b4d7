//! Series alignment onto a shared date index.
//!
//! Fill policy:
//!
//! - The index is the union of in-range dates across the surviving holdings.
//! - Holdings and the benchmark are forward-filled across gaps, then
//!   back-filled before their first observation. A holding that lists after
//!   the index origin is therefore held at its opening price until it trades.
//! - A benchmark whose in-range data all falls after the last index date has
//!   nothing to back-fill from and is reported absent.

use crate::types::{Exclusion, ExclusionReason, PriceSeries};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// One holding's prices laid onto the shared index.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedHolding {
    /// Index position of the first observation in the window
    pub first_index: usize,
    /// Date of the first observation in the window
    pub opening_date: NaiveDate,
    /// Price used to derive the share count
    pub opening_price: f64,
    /// One entry per index date, equal to `opening_price` before `first_index`
    pub prices: Vec<f64>,
}

impl AlignedHolding {
    /// Price on the last index date.
    pub fn final_price(&self) -> f64 {
        self.prices.last().copied().unwrap_or(self.opening_price)
    }
}

/// Output of [`align`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    /// Shared date index, strictly increasing
    pub dates: Vec<NaiveDate>,
    /// Surviving holdings keyed by identifier
    pub holdings: BTreeMap<String, AlignedHolding>,
    /// Benchmark prices per index date, `None` when it has no usable data
    pub benchmark: Option<Vec<f64>>,
    /// Holdings dropped during alignment
    pub excluded: Vec<Exclusion>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Restrict every series to `[start, end]` and lay them onto a common index.
///
/// Holdings without data in the window, or whose first price in the window is
/// not positive, are excluded and reported in [`AlignedSeries::excluded`].
pub fn align(
    prices: &BTreeMap<String, PriceSeries>,
    benchmark: Option<&PriceSeries>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<AlignedSeries> {
    if start > end {
        return Err(Error::InvalidWindow(format!(
            "start {} is after end {}",
            start, end
        )));
    }

    let mut excluded = Vec::new();
    let mut in_range: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();

    for (identifier, series) in prices {
        let observations: Vec<(NaiveDate, f64)> = series.range(start, end).collect();

        match observations.first() {
            None => {
                warn!("No data in range for {}", identifier);
                excluded.push(Exclusion::new(identifier, ExclusionReason::NoDataInRange));
            }
            Some(&(date, price)) if price <= 0.0 => {
                warn!(
                    "Excluding {}: opening price {} on {} is not positive",
                    identifier, price, date
                );
                excluded.push(Exclusion::new(
                    identifier,
                    ExclusionReason::NonPositiveOpeningPrice,
                ));
            }
            Some(_) => {
                in_range.insert(identifier.as_str(), observations);
            }
        }
    }

    let dates: Vec<NaiveDate> = in_range
        .values()
        .flat_map(|obs| obs.iter().map(|(d, _)| *d))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let holdings = in_range
        .iter()
        .filter_map(|(identifier, observations)| {
            let (opening_date, opening_price) = *observations.first()?;
            let first_index = dates.iter().position(|d| *d == opening_date)?;
            let prices = fill_both(&dates, observations)?;
            Some((
                identifier.to_string(),
                AlignedHolding {
                    first_index,
                    opening_date,
                    opening_price,
                    prices,
                },
            ))
        })
        .collect();

    let benchmark = benchmark.and_then(|series| {
        let observations: Vec<(NaiveDate, f64)> = series.range(start, end).collect();
        let aligned = fill_both(&dates, &observations);
        if aligned.is_none() {
            match (observations.first(), dates.last()) {
                (Some((first, _)), Some(last)) => warn!(
                    "Benchmark omitted: its data starts {} after the last index date {}",
                    first, last
                ),
                _ => warn!("Benchmark has no data in range {} to {}", start, end),
            }
        }
        aligned
    });

    debug!(
        "Aligned {} holdings onto {} dates ({} excluded, benchmark {})",
        in_range.len(),
        dates.len(),
        excluded.len(),
        if benchmark.is_some() { "present" } else { "absent" }
    );

    Ok(AlignedSeries {
        dates,
        holdings,
        benchmark,
        excluded,
    })
}

/// Carry the latest observation at or before each index date.
fn fill_forward(dates: &[NaiveDate], observations: &[(NaiveDate, f64)]) -> Vec<Option<f64>> {
    let mut filled = Vec::with_capacity(dates.len());
    let mut pending = observations.iter().peekable();
    let mut last = None;

    for date in dates {
        while let Some(&&(obs_date, price)) = pending.peek() {
            if obs_date > *date {
                break;
            }
            last = Some(price);
            pending.next();
        }
        filled.push(last);
    }

    filled
}

/// Forward-fill, then back-fill the leading gap. `None` if nothing lands on the index.
fn fill_both(dates: &[NaiveDate], observations: &[(NaiveDate, f64)]) -> Option<Vec<f64>> {
    let forward = fill_forward(dates, observations);
    let first = forward.iter().copied().flatten().next()?;

    let mut carried = first;
    Some(
        forward
            .into_iter()
            .map(|price| {
                if let Some(p) = price {
                    carried = p;
                }
                carried
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(points: &[((i32, u32, u32), f64)]) -> PriceSeries {
        PriceSeries::from_prices(points.iter().map(|&((y, m, d), p)| (date(y, m, d), p)))
    }

    fn book(entries: Vec<(&str, PriceSeries)>) -> BTreeMap<String, PriceSeries> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_union_index_and_forward_fill() {
        let prices = book(vec![
            (
                "A",
                series(&[((2024, 1, 4), 100.0), ((2024, 1, 8), 104.0)]),
            ),
            (
                "B",
                series(&[
                    ((2024, 1, 4), 50.0),
                    ((2024, 1, 5), 51.0),
                    ((2024, 1, 8), 52.0),
                ]),
            ),
        ]);

        let aligned = align(&prices, None, date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(
            aligned.dates,
            vec![date(2024, 1, 4), date(2024, 1, 5), date(2024, 1, 8)]
        );
        let a = &aligned.holdings["A"];
        // Gap on the 5th carries the 4th forward
        assert_eq!(a.prices, vec![100.0, 100.0, 104.0]);
        assert_eq!(a.first_index, 0);
        assert_eq!(a.final_price(), 104.0);
        assert!(aligned.excluded.is_empty());
    }

    #[test]
    fn test_late_starter_held_at_opening_price() {
        let prices = book(vec![
            (
                "EARLY",
                series(&[
                    ((2024, 1, 4), 10.0),
                    ((2024, 1, 5), 11.0),
                    ((2024, 1, 8), 12.0),
                ]),
            ),
            ("LATE", series(&[((2024, 1, 5), 200.0), ((2024, 1, 8), 210.0)])),
        ]);

        let aligned = align(&prices, None, date(2024, 1, 4), date(2024, 1, 8)).unwrap();
        let late = &aligned.holdings["LATE"];

        assert_eq!(late.first_index, 1);
        assert_eq!(late.opening_date, date(2024, 1, 5));
        assert_eq!(late.opening_price, 200.0);
        assert_eq!(late.prices, vec![200.0, 200.0, 210.0]);
    }

    #[test]
    fn test_restricts_to_closed_range() {
        let prices = book(vec![(
            "A",
            series(&[
                ((2023, 12, 29), 90.0),
                ((2024, 1, 4), 100.0),
                ((2024, 1, 31), 110.0),
                ((2024, 2, 1), 120.0),
            ]),
        )]);

        let aligned = align(&prices, None, date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let a = &aligned.holdings["A"];

        assert_eq!(aligned.dates, vec![date(2024, 1, 4), date(2024, 1, 31)]);
        assert_eq!(a.opening_price, 100.0);
        assert_eq!(a.final_price(), 110.0);
    }

    #[test]
    fn test_excludes_holding_without_data() {
        let prices = book(vec![
            ("A", series(&[((2024, 1, 4), 100.0)])),
            ("GONE", series(&[((2023, 6, 1), 100.0)])),
            ("EMPTY", PriceSeries::new()),
        ]);

        let aligned = align(&prices, None, date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(aligned.holdings.len(), 1);
        assert_eq!(
            aligned.excluded,
            vec![
                Exclusion::new("EMPTY", ExclusionReason::NoDataInRange),
                Exclusion::new("GONE", ExclusionReason::NoDataInRange),
            ]
        );
    }

    #[test]
    fn test_excludes_non_positive_opening_price() {
        let prices = book(vec![
            ("A", series(&[((2024, 1, 4), 100.0)])),
            ("ZERO", series(&[((2024, 1, 4), 0.0), ((2024, 1, 5), 5.0)])),
        ]);

        let aligned = align(&prices, None, date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert!(!aligned.holdings.contains_key("ZERO"));
        assert_eq!(
            aligned.excluded,
            vec![Exclusion::new(
                "ZERO",
                ExclusionReason::NonPositiveOpeningPrice
            )]
        );
        // Excluded dates do not leak into the index
        assert_eq!(aligned.dates, vec![date(2024, 1, 4)]);
    }

    #[test]
    fn test_benchmark_forward_then_back_fill() {
        let prices = book(vec![(
            "A",
            series(&[
                ((2024, 1, 4), 100.0),
                ((2024, 1, 5), 101.0),
                ((2024, 1, 8), 102.0),
                ((2024, 1, 9), 103.0),
            ]),
        )]);
        // Starts a day late and misses the 8th
        let benchmark = series(&[((2024, 1, 5), 2500.0), ((2024, 1, 9), 2550.0)]);

        let aligned = align(
            &prices,
            Some(&benchmark),
            date(2024, 1, 1),
            date(2024, 1, 31),
        )
        .unwrap();

        assert_eq!(
            aligned.benchmark,
            Some(vec![2500.0, 2500.0, 2500.0, 2550.0])
        );
    }

    #[test]
    fn test_benchmark_absent_when_empty_in_range() {
        let prices = book(vec![("A", series(&[((2024, 1, 4), 100.0)]))]);
        let benchmark = series(&[((2022, 1, 4), 2000.0)]);

        let aligned = align(
            &prices,
            Some(&benchmark),
            date(2024, 1, 1),
            date(2024, 1, 31),
        )
        .unwrap();

        assert!(aligned.benchmark.is_none());
    }

    #[test]
    fn test_benchmark_absent_when_it_starts_after_the_index() {
        let prices = book(vec![(
            "A",
            series(&[((2024, 1, 4), 100.0), ((2024, 1, 8), 101.0)]),
        )]);
        // In the window, but later than every holding date
        let benchmark = series(&[((2024, 1, 9), 2500.0), ((2024, 2, 9), 2550.0)]);

        let aligned = align(
            &prices,
            Some(&benchmark),
            date(2024, 1, 1),
            date(2024, 2, 29),
        )
        .unwrap();

        assert_eq!(aligned.dates, vec![date(2024, 1, 4), date(2024, 1, 8)]);
        assert!(aligned.benchmark.is_none());
    }

    #[test]
    fn test_inverted_range() {
        let prices = BTreeMap::new();
        let result = align(&prices, None, date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(Error::InvalidWindow(_))));
    }
}
