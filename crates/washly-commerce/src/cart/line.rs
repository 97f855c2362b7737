//! Cart line shapes shared by every booking surface.

use crate::error::CommerceError;
use crate::ids::{LineId, PackageId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: i64 = 99;

/// Service category a line belongs to.
///
/// Serialized as its display label (`"Car Wash"`), which is also the shape
/// the order-submission boundary expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ServiceCategory {
    CarWash,
    BikeWash,
    HelmetWash,
    Laundry,
    /// Any other surface, keyed by its label.
    Other(String),
}

impl ServiceCategory {
    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            ServiceCategory::CarWash => "Car Wash",
            ServiceCategory::BikeWash => "Bike Wash",
            ServiceCategory::HelmetWash => "Helmet Wash",
            ServiceCategory::Laundry => "Laundry",
            ServiceCategory::Other(label) => label,
        }
    }

    /// Parse a label, ignoring case and separators (`car-wash`, `Car Wash`).
    pub fn parse(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "carwash" => ServiceCategory::CarWash,
            "bikewash" => ServiceCategory::BikeWash,
            "helmetwash" => ServiceCategory::HelmetWash,
            "laundry" => ServiceCategory::Laundry,
            _ => ServiceCategory::Other(label.trim().to_string()),
        }
    }

    /// Exact inverse of [`label`](Self::label). Unknown labels are kept
    /// verbatim, so stored categories load back unchanged.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Car Wash" => ServiceCategory::CarWash,
            "Bike Wash" => ServiceCategory::BikeWash,
            "Helmet Wash" => ServiceCategory::HelmetWash,
            "Laundry" => ServiceCategory::Laundry,
            _ => ServiceCategory::Other(label.to_string()),
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for ServiceCategory {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<ServiceCategory> for String {
    fn from(c: ServiceCategory) -> Self {
        c.label().to_string()
    }
}

/// Pricing mode for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    /// Single booking at list price.
    #[default]
    OneTime,
    /// Subscription pricing with a fixed per-package reduction.
    Monthly,
}

impl PricingTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingTier::OneTime => "one_time",
            PricingTier::Monthly => "monthly",
        }
    }

    /// Parse `"monthly"`, `"one_time"` or `"one-time"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "one_time" | "onetime" => Some(PricingTier::OneTime),
            "monthly" => Some(PricingTier::Monthly),
            _ => None,
        }
    }
}

/// An optional extra selected alongside a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub name: String,
    pub price: Money,
    /// Absent means one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl AddOn {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// `price × (quantity or 1)`.
    pub fn total(&self) -> Option<Money> {
        self.price.try_multiply(i64::from(self.quantity.unwrap_or(1)))
    }
}

/// A flat `{name, price, quantity}` extra (detergent choice, ad-hoc extras).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAddOn {
    pub name: String,
    pub price: Money,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

impl UiAddOn {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: 1,
        }
    }

    pub fn total(&self) -> Option<Money> {
        self.price.try_multiply(i64::from(self.quantity))
    }
}

/// One garment type in a laundry basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryItem {
    pub item: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LaundryItem {
    pub fn new(item: impl Into<String>, quantity: u32, unit_price: Money) -> Self {
        Self {
            item: item.into(),
            quantity,
            unit_price,
        }
    }

    pub fn total(&self) -> Option<Money> {
        self.unit_price.try_multiply(i64::from(self.quantity))
    }
}

/// Laundry service a basket is booked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaundryService {
    WashAndFold,
    WashAndIron,
    DryClean,
    SteamIron,
}

impl LaundryService {
    pub const ALL: [LaundryService; 4] = [
        LaundryService::WashAndFold,
        LaundryService::WashAndIron,
        LaundryService::DryClean,
        LaundryService::SteamIron,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaundryService::WashAndFold => "wash_and_fold",
            LaundryService::WashAndIron => "wash_and_iron",
            LaundryService::DryClean => "dry_clean",
            LaundryService::SteamIron => "steam_iron",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LaundryService::WashAndFold => "Wash & Fold",
            LaundryService::WashAndIron => "Wash & Iron",
            LaundryService::DryClean => "Dry Clean",
            LaundryService::SteamIron => "Steam Iron",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

/// Snapshot of a package configuration at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDetails {
    pub package_id: PackageId,
    pub base_price: Money,
    #[serde(default)]
    pub tier: PricingTier,
    pub tier_discount: Money,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    pub add_ons_total: Money,
    /// Feature bullet points as shown when the package was chosen.
    #[serde(default)]
    pub features: Vec<String>,
}

impl PackageDetails {
    fn expected_unit_price(&self) -> Option<Money> {
        let sum = try_sum_totals(self.add_ons.iter().map(AddOn::total), self.base_price.currency)?;
        if sum != self.add_ons_total {
            return None;
        }
        self.base_price
            .try_subtract(&self.tier_discount)?
            .non_negative()
            .try_add(&self.add_ons_total)
    }
}

/// Snapshot of a laundry basket at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryDetails {
    pub service: LaundryService,
    pub items: Vec<LaundryItem>,
    #[serde(default)]
    pub add_ons: Vec<UiAddOn>,
    pub add_ons_total: Money,
}

impl LaundryDetails {
    /// Number of physical pieces in the basket.
    pub fn pieces(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    fn expected_unit_price(&self, currency: Currency) -> Option<Money> {
        let add_ons = try_sum_totals(self.add_ons.iter().map(UiAddOn::total), currency)?;
        if add_ons != self.add_ons_total {
            return None;
        }
        try_sum_totals(self.items.iter().map(LaundryItem::total), currency)?.try_add(&add_ons)
    }
}

/// The per-surface payload of a line. Exactly one shape per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDetails {
    #[serde(rename = "packageDetails")]
    Package(PackageDetails),
    #[serde(rename = "laundryDetails")]
    LaundryBasket(LaundryDetails),
    #[serde(rename = "uiAddOns")]
    Generic(Vec<UiAddOn>),
}

/// One priced, configured entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: LineId,
    pub name: String,
    /// Price snapshot at add time, add-ons included.
    pub unit_price: Money,
    pub quantity: u32,
    pub category: ServiceCategory,
    pub service_type: String,
    #[serde(flatten)]
    pub details: LineDetails,
}

impl CartLine {
    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(i64::from(self.quantity))
            .ok_or(CommerceError::Overflow)
    }

    /// Check the line before it enters a cart priced in `currency`.
    pub fn validate(&self, currency: Currency) -> Result<(), CommerceError> {
        if self.id.as_str().trim().is_empty() {
            return Err(CommerceError::InvalidLine("missing id".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CommerceError::InvalidLine(format!("{}: missing name", self.id)));
        }
        if self.quantity == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        if i64::from(self.quantity) > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(
                i64::from(self.quantity),
                MAX_QUANTITY_PER_LINE,
            ));
        }
        if self.unit_price.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: self.unit_price.currency.code().to_string(),
            });
        }
        if self.unit_price.is_negative() {
            return Err(CommerceError::InvalidLine(format!(
                "{}: negative unit price",
                self.id
            )));
        }
        self.line_total()?;

        match &self.details {
            LineDetails::Package(details) => {
                if self.category == ServiceCategory::Laundry {
                    return Err(CommerceError::InvalidLine(format!(
                        "{}: laundry lines carry a basket, not a package",
                        self.id
                    )));
                }
                if details.expected_unit_price() != Some(self.unit_price) {
                    return Err(CommerceError::InvalidLine(format!(
                        "{}: unit price does not match package and add-ons",
                        self.id
                    )));
                }
            }
            LineDetails::LaundryBasket(details) => {
                if self.category != ServiceCategory::Laundry {
                    return Err(CommerceError::InvalidLine(format!(
                        "{}: basket filed under {}",
                        self.id, self.category
                    )));
                }
                if details.items.is_empty() || details.items.iter().any(|i| i.quantity == 0) {
                    return Err(CommerceError::EmptyBasket);
                }
                if details.expected_unit_price(currency) != Some(self.unit_price) {
                    return Err(CommerceError::InvalidLine(format!(
                        "{}: unit price does not match basket",
                        self.id
                    )));
                }
            }
            LineDetails::Generic(add_ons) => {
                if add_ons.iter().any(|a| a.price.currency != currency) {
                    return Err(CommerceError::CurrencyMismatch {
                        expected: currency.code().to_string(),
                        got: "mixed".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Sum of optional totals; `None` if any term overflowed or mixed currencies.
pub(crate) fn try_sum_totals(
    mut totals: impl Iterator<Item = Option<Money>>,
    currency: Currency,
) -> Option<Money> {
    totals.try_fold(Money::zero(currency), |acc, m| acc.try_add(&m?))
}
