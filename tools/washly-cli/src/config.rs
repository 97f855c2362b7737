//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use washly_commerce::cart::SurchargeBand;
use washly_commerce::money::Currency;
use washly_commerce::storage::DEFAULT_DRAFT_TTL_MINUTES;

/// CLI configuration file (`washly.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Local storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pricing configuration.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Booking draft configuration.
    #[serde(default)]
    pub booking: BookingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// The configured currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.pricing.currency)
            .with_context(|| format!("Unknown currency code: {}", self.pricing.currency))
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        self.currency()?;
        if self.booking.draft_ttl_minutes <= 0 {
            bail!(
                "booking.draft_ttl_minutes must be positive, got {}",
                self.booking.draft_ttl_minutes
            );
        }
        if let Some(bands) = &self.pricing.surcharge_bands {
            let mut previous_end = 0.0;
            for band in bands {
                if band.from_km < previous_end || band.to_km <= band.from_km {
                    bail!(
                        "pricing.surcharge_bands must be ascending, non-overlapping [from_km, to_km) ranges"
                    );
                }
                if band.surcharge < 0 {
                    bail!("pricing.surcharge_bands surcharges must not be negative");
                }
                previous_end = band.to_km;
            }
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => bail!("logging.format must be \"pretty\" or \"json\", got {:?}", other),
        }
    }
}

/// Where cart, session and draft files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory, relative to the working directory unless absolute.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".washly")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Currency code the cart is priced in.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Pickup distance bands, replacing the built-in ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharge_bands: Option<Vec<SurchargeBand>>,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            surcharge_bands: None,
        }
    }
}

/// Pending booking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Minutes a pending booking draft stays readable.
    #[serde(default = "default_draft_ttl")]
    pub draft_ttl_minutes: i64,
}

fn default_draft_ttl() -> i64 {
    DEFAULT_DRAFT_TTL_MINUTES
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            draft_ttl_minutes: default_draft_ttl(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// `pretty` or `json`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Generate a default washly.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Washly storefront configuration

[storage]
data_dir = ".washly"

[pricing]
currency = "INR"
# [[pricing.surcharge_bands]]
# from_km = 0.0
# to_km = 5.0
# surcharge = 0

[booking]
draft_ttl_minutes = {ttl}

[logging]
level = "warn"
format = "pretty"
"#,
        ttl = DEFAULT_DRAFT_TTL_MINUTES
    )
}
