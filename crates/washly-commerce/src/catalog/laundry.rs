//! Laundry price list.

use crate::cart::{LaundryItem, LaundryService, UiAddOn};
use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Per-piece price of one garment type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaundryPrice {
    pub item: String,
    pub unit_price: Money,
}

/// A laundry extra and the services it is relevant to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaundryAddOn {
    pub name: String,
    pub price: Money,
    /// Empty means every service.
    pub services: Vec<LaundryService>,
}

impl LaundryAddOn {
    pub fn applies_to(&self, service: LaundryService) -> bool {
        self.services.is_empty() || self.services.contains(&service)
    }
}

/// Laundry items, extras and detergent choices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LaundryPriceList {
    pub items: Vec<LaundryPrice>,
    pub add_ons: Vec<LaundryAddOn>,
    /// Detergent choices; the free one is the default.
    pub detergents: Vec<UiAddOn>,
}

impl LaundryPriceList {
    /// Price `quantity` pieces of `item` (case-insensitive).
    pub fn item(&self, item: &str, quantity: u32) -> Result<LaundryItem, CommerceError> {
        self.items
            .iter()
            .find(|p| p.item.eq_ignore_ascii_case(item))
            .map(|p| LaundryItem::new(p.item.clone(), quantity, p.unit_price))
            .ok_or_else(|| CommerceError::LaundryItemNotFound(item.to_string()))
    }

    /// Extras offered for `service`, in list order.
    pub fn relevant_add_ons(&self, service: LaundryService) -> impl Iterator<Item = &LaundryAddOn> {
        self.add_ons.iter().filter(move |a| a.applies_to(service))
    }

    /// Resolve an extra by name, refusing ones not offered for `service`.
    pub fn add_on(&self, service: LaundryService, name: &str) -> Result<UiAddOn, CommerceError> {
        self.relevant_add_ons(service)
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| UiAddOn::new(a.name.clone(), a.price))
            .ok_or_else(|| CommerceError::AddOnNotOffered {
                package: service.as_str().to_string(),
                add_on: name.to_string(),
            })
    }

    /// Resolve a detergent by name; `None` picks the first (default) entry.
    pub fn detergent(&self, name: Option<&str>) -> Result<Option<UiAddOn>, CommerceError> {
        match name {
            None => Ok(self.detergents.first().cloned()),
            Some(name) => self
                .detergents
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(name))
                .cloned()
                .map(Some)
                .ok_or_else(|| CommerceError::AddOnNotOffered {
                    package: "detergent".to_string(),
                    add_on: name.to_string(),
                }),
        }
    }
}
