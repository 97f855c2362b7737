//! Tier discount lookup.

use crate::cart::PricingTier;
use crate::ids::PackageId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed per-package reductions applied under an alternate pricing tier.
///
/// Amounts are hand-tuned per package rather than derived from a
/// percentage, so the table is the only source of truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierDiscountTable {
    entries: HashMap<PackageId, HashMap<PricingTier, Money>>,
}

impl TierDiscountTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reduction for `package` under `tier`.
    pub fn insert(&mut self, package: PackageId, tier: PricingTier, amount: Money) {
        self.entries.entry(package).or_default().insert(tier, amount);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, package: impl Into<PackageId>, tier: PricingTier, amount: Money) -> Self {
        self.insert(package.into(), tier, amount);
        self
    }

    /// Reduction for `package` under `tier`; zero when the table has no entry.
    pub fn discount_for(&self, package: &PackageId, tier: PricingTier, currency: Currency) -> Money {
        self.entries
            .get(package)
            .and_then(|tiers| tiers.get(&tier))
            .copied()
            .unwrap_or_else(|| Money::zero(currency))
    }

    /// Number of packages with at least one tier entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
