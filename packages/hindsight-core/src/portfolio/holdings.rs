//! Caller-owned portfolio of holdings.

use crate::types::{Exclusion, ExclusionReason, Holding};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Holdings keyed by identifier.
///
/// The host application builds and edits this value; the engine only reads
/// its analyzable subset. Lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Holding>", into = "Vec<Holding>")]
pub struct Portfolio {
    holdings: BTreeMap<String, Holding>,
}

impl Portfolio {
    /// Create an empty portfolio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any holding with the same identifier.
    pub fn with_holding(mut self, holding: Holding) -> Self {
        self.insert(holding);
        self
    }

    /// Insert a holding, returning the one it replaced.
    pub fn insert(&mut self, mut holding: Holding) -> Option<Holding> {
        holding.identifier = Holding::normalize_identifier(&holding.identifier);
        self.holdings.insert(holding.identifier.clone(), holding)
    }

    /// Add a holding without an amount.
    ///
    /// An existing holding is left untouched. Returns the holding and whether
    /// it was already present.
    pub fn add_holding(&mut self, identifier: &str, name: &str) -> (Holding, bool) {
        let key = Holding::normalize_identifier(identifier);

        if let Some(existing) = self.holdings.get(&key) {
            return (existing.clone(), true);
        }

        let holding = Holding::new(&key, name);
        self.holdings.insert(key, holding.clone());
        (holding, false)
    }

    /// Set or clear the invested amount of a holding.
    pub fn set_invested_amount(
        &mut self,
        identifier: &str,
        amount: Option<f64>,
    ) -> Result<&Holding> {
        let key = Holding::normalize_identifier(identifier);

        match self.holdings.get_mut(&key) {
            Some(holding) => {
                holding.invested_amount = amount;
                Ok(holding)
            }
            None => Err(Error::HoldingNotFound(key)),
        }
    }

    /// Remove a holding.
    ///
    /// Returns the removed holding if found.
    pub fn remove_holding(&mut self, identifier: &str) -> Result<Holding> {
        let key = Holding::normalize_identifier(identifier);
        self.holdings
            .remove(&key)
            .ok_or(Error::HoldingNotFound(key))
    }

    /// Find a holding by identifier.
    pub fn get(&self, identifier: &str) -> Option<&Holding> {
        self.holdings.get(&Holding::normalize_identifier(identifier))
    }

    /// All holdings ordered by identifier.
    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.values()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// The subset of holdings with a positive invested amount.
    ///
    /// This, never the full mapping, is what gets analyzed.
    pub fn analyzable(&self) -> Portfolio {
        Portfolio {
            holdings: self
                .holdings
                .iter()
                .filter(|(_, h)| h.is_analyzable())
                .map(|(k, h)| (k.clone(), h.clone()))
                .collect(),
        }
    }

    /// Holdings left out of the analyzable subset.
    pub fn non_analyzable(&self) -> Vec<Exclusion> {
        self.holdings
            .values()
            .filter(|h| !h.is_analyzable())
            .map(|h| Exclusion::new(&h.identifier, ExclusionReason::NonPositiveAmount))
            .collect()
    }

    /// Invested amount per analyzable holding.
    pub fn invested_amounts(&self) -> BTreeMap<String, f64> {
        self.holdings
            .values()
            .filter(|h| h.is_analyzable())
            .filter_map(|h| h.invested_amount.map(|a| (h.identifier.clone(), a)))
            .collect()
    }

    /// Sum of the analyzable invested amounts.
    pub fn total_invested(&self) -> f64 {
        self.invested_amounts().values().sum()
    }
}

impl From<Vec<Holding>> for Portfolio {
    fn from(holdings: Vec<Holding>) -> Self {
        let mut portfolio = Portfolio::new();
        for holding in holdings {
            portfolio.insert(holding);
        }
        portfolio
    }
}

impl From<Portfolio> for Vec<Holding> {
    fn from(portfolio: Portfolio) -> Self {
        portfolio.holdings.into_values().collect()
    }
}
