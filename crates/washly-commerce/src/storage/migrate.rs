//! Cart document schema versions and the upgrade path between them.
//!
//! * v1: a bare JSON array of loosely shaped line objects with prices in
//!   whole rupees (`price`, `packageDetails`, `laundryDetails`, `uiAddOns`).
//! * v2: `{ "schemaVersion": 2, "savedAt": ..., "lines": [CartLine] }`.

use crate::cart::{
    AddOn, CartLine, LaundryDetails, LaundryItem, LaundryService, LineDetails, PackageDetails,
    PricingTier, ServiceCategory, UiAddOn,
};
use crate::cart::try_sum_totals;
use crate::error::CommerceError;
use crate::ids::{LineId, PackageId};
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema version written by this build.
pub const CART_SCHEMA_VERSION: u64 = 2;

/// Persisted cart document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDocument {
    pub schema_version: u64,
    pub saved_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
}

impl CartDocument {
    pub fn current(lines: &[CartLine]) -> Self {
        Self {
            schema_version: CART_SCHEMA_VERSION,
            saved_at: Utc::now(),
            lines: lines.to_vec(),
        }
    }
}

/// Read any known document version into current lines.
pub fn upgrade(raw: Value) -> Result<Vec<CartLine>, CommerceError> {
    match raw {
        Value::Array(items) => Ok(upgrade_v1(items)),
        Value::Object(ref map) => match map.get("schemaVersion").and_then(Value::as_u64) {
            Some(CART_SCHEMA_VERSION) => {
                let doc: CartDocument = serde_json::from_value(raw)?;
                Ok(doc.lines)
            }
            Some(version) => Err(CommerceError::UnsupportedSchema(version)),
            None => Err(CommerceError::SerializationError(
                "cart document has no schemaVersion".to_string(),
            )),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(CommerceError::SerializationError(format!(
            "unexpected cart document: {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyLine {
    id: String,
    name: String,
    price: f64,
    #[serde(default)]
    quantity: Option<i64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    service_type: Option<String>,
    #[serde(default)]
    package_details: Option<LegacyPackage>,
    #[serde(default)]
    laundry_details: Option<LegacyLaundry>,
    #[serde(default)]
    ui_add_ons: Option<Vec<LegacyUiAddOn>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPackage {
    #[serde(default)]
    package_id: Option<String>,
    base_price: f64,
    #[serde(default, alias = "addOns")]
    addons: Vec<LegacyAddOn>,
    #[serde(default)]
    pricing_tier: Option<String>,
    #[serde(default)]
    features: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyAddOn {
    name: String,
    price: f64,
    #[serde(default)]
    quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyLaundry {
    #[serde(default)]
    service_type: Option<String>,
    #[serde(default)]
    items: Vec<LegacyLaundryItem>,
}

#[derive(Debug, Deserialize)]
struct LegacyLaundryItem {
    item: String,
    quantity: u32,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct LegacyUiAddOn {
    name: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    quantity: Option<u32>,
}

/// v1 carts predate multi-currency support and were always INR.
const V1_CURRENCY: Currency = Currency::INR;

fn upgrade_v1(items: Vec<Value>) -> Vec<CartLine> {
    let mut lines = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let converted = serde_json::from_value::<LegacyLine>(item)
            .map_err(CommerceError::from)
            .and_then(convert_v1);
        match converted {
            Ok(line) => lines.push(line),
            Err(e) => tracing::warn!(index, error = %e, "dropping unreadable v1 cart line"),
        }
    }
    tracing::debug!(lines = lines.len(), "upgraded v1 cart document");
    lines
}

fn rupees(amount: f64) -> Result<Money, CommerceError> {
    Money::from_decimal(amount, V1_CURRENCY)
        .ok_or_else(|| CommerceError::SerializationError(format!("bad amount {}", amount)))
}

fn convert_v1(legacy: LegacyLine) -> Result<CartLine, CommerceError> {
    let quantity = legacy.quantity.unwrap_or(1);
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or(CommerceError::InvalidQuantity(quantity))?;
    let unit_price = rupees(legacy.price)?;
    let ui_add_ons = legacy
        .ui_add_ons
        .unwrap_or_default()
        .into_iter()
        .map(|a| {
            Ok(UiAddOn {
                name: a.name,
                price: rupees(a.price)?,
                quantity: a.quantity.unwrap_or(1),
            })
        })
        .collect::<Result<Vec<_>, CommerceError>>()?;

    let mut category = legacy
        .category
        .as_deref()
        .map(ServiceCategory::parse)
        .unwrap_or_else(|| ServiceCategory::Other("Other".to_string()));

    let details = if let Some(pkg) = legacy.package_details {
        let add_ons = pkg
            .addons
            .into_iter()
            .map(|a| {
                Ok(AddOn {
                    name: a.name,
                    price: rupees(a.price)?,
                    quantity: a.quantity,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;
        let add_ons_total = try_sum_totals(add_ons.iter().map(AddOn::total), V1_CURRENCY)
            .ok_or(CommerceError::Overflow)?;
        let base_price = rupees(pkg.base_price)?;
        // v1 stored only the final price; the tier reduction is what is left over.
        let tier_discount = base_price
            .try_add(&add_ons_total)
            .and_then(|gross| gross.try_subtract(&unit_price))
            .ok_or(CommerceError::Overflow)?
            .non_negative();
        LineDetails::Package(PackageDetails {
            package_id: PackageId::new(pkg.package_id.unwrap_or_else(|| legacy.id.clone())),
            base_price,
            tier: pkg
                .pricing_tier
                .as_deref()
                .and_then(PricingTier::from_name)
                .unwrap_or_default(),
            tier_discount,
            add_ons,
            add_ons_total,
            features: pkg.features,
        })
    } else if let Some(basket) = legacy.laundry_details {
        let items = basket
            .items
            .into_iter()
            .map(|i| Ok(LaundryItem::new(i.item, i.quantity, rupees(i.price)?)))
            .collect::<Result<Vec<_>, CommerceError>>()?;
        let add_ons_total = try_sum_totals(ui_add_ons.iter().map(UiAddOn::total), V1_CURRENCY)
            .ok_or(CommerceError::Overflow)?;
        category = ServiceCategory::Laundry;
        LineDetails::LaundryBasket(LaundryDetails {
            service: basket
                .service_type
                .as_deref()
                .and_then(LaundryService::from_name)
                .unwrap_or(LaundryService::WashAndFold),
            items,
            add_ons: ui_add_ons,
            add_ons_total,
        })
    } else {
        LineDetails::Generic(ui_add_ons)
    };

    Ok(CartLine {
        id: LineId::new(legacy.id),
        name: legacy.name,
        unit_price,
        quantity,
        category,
        service_type: legacy.service_type.unwrap_or_default(),
        details,
    })
}
