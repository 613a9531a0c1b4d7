//! Buy-and-hold valuation of aligned holdings.

use super::Portfolio;
use crate::series::AlignedSeries;
use crate::types::{AllocationWeight, HoldingBreakdown, PortfolioTotals, ValueTrajectory};
use std::collections::BTreeMap;

/// Aggregate portfolio value on every index date.
///
/// Each holding buys `invested / opening_price` shares at its first available
/// price and holds them. Before that date its aligned price is the opening
/// price, so the amount sits at par and adds no return.
/// Identifiers missing from `invested`, or with a non-positive amount, are skipped.
pub fn value(aligned: &AlignedSeries, invested: &BTreeMap<String, f64>) -> ValueTrajectory {
    let mut values = vec![0.0; aligned.dates.len()];

    for (identifier, holding) in &aligned.holdings {
        let amount = match invested.get(identifier) {
            Some(&a) if a.is_finite() && a > 0.0 => a,
            _ => continue,
        };
        let shares = amount / holding.opening_price;

        for (total, price) in values.iter_mut().zip(&holding.prices) {
            *total += shares * price;
        }
    }

    ValueTrajectory {
        dates: aligned.dates.clone(),
        values,
    }
}

/// Per-holding result over the window, for holdings that survived alignment.
pub fn breakdown(aligned: &AlignedSeries, portfolio: &Portfolio) -> Vec<HoldingBreakdown> {
    aligned
        .holdings
        .iter()
        .filter_map(|(identifier, holding)| {
            let entry = portfolio.get(identifier).filter(|h| h.is_analyzable())?;
            let initial_investment = entry.invested_amount?;

            let shares = initial_investment / holding.opening_price;
            let final_price = holding.final_price();
            let final_value = shares * final_price;
            let profit_loss = final_value - initial_investment;

            Some(HoldingBreakdown {
                identifier: identifier.clone(),
                name: entry.name.clone(),
                initial_investment,
                opening_date: holding.opening_date,
                opening_price: holding.opening_price,
                final_price,
                shares,
                final_value,
                profit_loss,
                return_pct: (profit_loss / initial_investment) * 100.0,
            })
        })
        .collect()
}

/// Sum a breakdown into portfolio-wide figures.
pub fn totals(breakdown: &[HoldingBreakdown]) -> PortfolioTotals {
    let initial_investment: f64 = breakdown.iter().map(|b| b.initial_investment).sum();
    let final_value: f64 = breakdown.iter().map(|b| b.final_value).sum();
    let profit_loss = final_value - initial_investment;

    let return_pct = if initial_investment > 0.0 {
        (profit_loss / initial_investment) * 100.0
    } else {
        0.0
    };

    PortfolioTotals {
        initial_investment,
        final_value,
        profit_loss,
        return_pct,
    }
}

/// Weight of each analyzable holding in the total invested amount.
pub fn allocation(portfolio: &Portfolio) -> Vec<AllocationWeight> {
    let total = portfolio.total_invested();
    if total <= 0.0 {
        return Vec::new();
    }

    portfolio
        .holdings()
        .filter(|h| h.is_analyzable())
        .filter_map(|h| {
            h.invested_amount.map(|amount| AllocationWeight {
                identifier: h.identifier.clone(),
                name: h.name.clone(),
                invested_amount: amount,
                weight_pct: amount / total * 100.0,
            })
        })
        .collect()
}
