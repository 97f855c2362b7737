//! Service package definitions.

use crate::cart::{AddOn, ServiceCategory};
use crate::error::CommerceError;
use crate::ids::PackageId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A fixed-price bundle with a curated list of optional add-ons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicePackage {
    /// Unique package identifier.
    pub id: PackageId,
    /// Display name (e.g., "Premium").
    pub name: String,
    /// Category the package is sold under.
    pub category: ServiceCategory,
    /// Vehicle or item class the package targets.
    pub service_type: String,
    /// List price for a one-time booking.
    pub base_price: Money,
    /// Feature bullet points.
    pub features: Vec<String>,
    /// Add-ons offered with this package.
    pub add_ons: Vec<AddOn>,
    /// Fixed reduction for the monthly tier, if the package offers one.
    pub monthly_discount: Option<Money>,
}

impl ServicePackage {
    /// Create a package with no features or add-ons.
    pub fn new(
        id: impl Into<PackageId>,
        name: impl Into<String>,
        category: ServiceCategory,
        service_type: impl Into<String>,
        base_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            service_type: service_type.into(),
            base_price,
            features: Vec::new(),
            add_ons: Vec::new(),
            monthly_discount: None,
        }
    }

    pub fn with_features(mut self, features: &[&str]) -> Self {
        self.features = features.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_add_on(mut self, name: &str, price: Money) -> Self {
        self.add_ons.push(AddOn::new(name, price));
        self
    }

    pub fn with_monthly_discount(mut self, amount: Money) -> Self {
        self.monthly_discount = Some(amount);
        self
    }

    /// Look up an offered add-on by name (case-insensitive), at `quantity`.
    pub fn add_on(&self, name: &str, quantity: u32) -> Result<AddOn, CommerceError> {
        self.add_ons
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| {
                let add_on = a.clone();
                if quantity > 1 {
                    add_on.with_quantity(quantity)
                } else {
                    add_on
                }
            })
            .ok_or_else(|| CommerceError::AddOnNotOffered {
                package: self.id.to_string(),
                add_on: name.to_string(),
            })
    }
}
