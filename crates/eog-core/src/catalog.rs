//! # Pricing Catalog
//!
//! Service tiers and additional services offered to clients.
//! The catalog is loaded from `config/catalog.toml` at startup, or built in
//! code with [`PricingCatalog::inspection_defaults`], and handed to
//! [`crate::PricingEngine::new`] which validates it.

use crate::error::{PricingError, PricingOutcome};
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Inspection package level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierLevel {
    Basic,
    Standard,
    Premium,
}

impl TierLevel {
    pub const ALL: [TierLevel; 3] = [TierLevel::Basic, TierLevel::Standard, TierLevel::Premium];

    /// Identifier used by clients and in the catalog file
    pub fn as_str(&self) -> &'static str {
        match self {
            TierLevel::Basic => "basic",
            TierLevel::Standard => "standard",
            TierLevel::Premium => "premium",
        }
    }
}

impl FromStr for TierLevel {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(TierLevel::Basic),
            "standard" => Ok(TierLevel::Standard),
            "premium" => Ok(TierLevel::Premium),
            _ => Err(PricingError::TierNotFound {
                tier_id: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TierLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flat-priced inspection package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTier {
    /// Tier level, doubles as the identifier
    pub id: TierLevel,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Flat price
    pub price: Price,

    /// What the package includes, in display order
    #[serde(default)]
    pub features: Vec<String>,

    /// Delivery-time label (e.g., "2-3 business days")
    #[serde(default)]
    pub delivery_time: String,

    /// Highlighted as the most popular choice
    #[serde(default)]
    pub popular: bool,
}

impl ServiceTier {
    pub fn new(id: TierLevel, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            features: Vec::new(),
            delivery_time: String::new(),
            popular: false,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: append a feature
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Builder: set delivery-time label
    pub fn with_delivery_time(mut self, label: impl Into<String>) -> Self {
        self.delivery_time = label.into();
        self
    }

    /// Builder: mark as popular
    pub fn popular(mut self) -> Self {
        self.popular = true;
        self
    }
}

/// An optional supplementary service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalService {
    /// Unique identifier within the catalog (e.g., "travel")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Flat price, or price per unit when `unit_based`
    pub price: Price,

    /// Priced per unit rather than flat
    #[serde(default)]
    pub unit_based: bool,

    /// What one unit means (e.g., "per 10 miles")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_label: Option<String>,
}

impl AdditionalService {
    /// Create a flat-priced add-on
    pub fn flat(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            unit_based: false,
            unit_label: None,
        }
    }

    /// Create a per-unit add-on
    pub fn per_unit(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Price,
        unit_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: unit_price,
            unit_based: true,
            unit_label: Some(unit_label.into()),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// Tiers and add-ons as loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingCatalog {
    /// Currency every entry is priced in
    #[serde(default)]
    pub currency: Currency,

    /// Service tiers in display order
    #[serde(default)]
    pub tiers: Vec<ServiceTier>,

    /// Additional services in display order
    #[serde(default)]
    pub add_ons: Vec<AdditionalService>,
}

impl PricingCatalog {
    /// Create an empty catalog
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            tiers: Vec::new(),
            add_ons: Vec::new(),
        }
    }

    /// Builder: add a tier
    pub fn with_tier(mut self, tier: ServiceTier) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Builder: add an additional service
    pub fn with_add_on(mut self, add_on: AdditionalService) -> Self {
        self.add_ons.push(add_on);
        self
    }

    /// Load catalog from TOML string.
    ///
    /// A `price` table without its own `currency` is priced in the catalog's
    /// currency.
    pub fn from_toml(toml_str: &str) -> PricingOutcome<Self> {
        let mut table: toml::Table = toml::from_str(toml_str)?;

        let currency = table
            .get("currency")
            .cloned()
            .unwrap_or_else(|| toml::Value::String(Currency::default().as_str().to_string()));

        for section in ["tiers", "add_ons"] {
            let Some(toml::Value::Array(entries)) = table.get_mut(section) else {
                continue;
            };
            for entry in entries.iter_mut() {
                if let Some(toml::Value::Table(price)) = entry.get_mut("price") {
                    if !price.contains_key("currency") {
                        price.insert("currency".to_string(), currency.clone());
                    }
                }
            }
        }

        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Load catalog from a TOML file
    pub fn load(path: impl AsRef<Path>) -> PricingOutcome<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PricingError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// The marketplace's standard inspection catalog
    pub fn inspection_defaults() -> Self {
        let usd = |dollars: f64| Price::new(dollars, Currency::USD);

        PricingCatalog::new(Currency::USD)
            .with_tier(
                ServiceTier::new(TierLevel::Basic, "Basic Inspection", usd(50.0))
                    .with_description("Quick visual check of the property or item")
                    .with_feature("Up to 15 photos")
                    .with_feature("Basic condition checklist")
                    .with_feature("Written summary")
                    .with_delivery_time("3-5 business days"),
            )
            .with_tier(
                ServiceTier::new(TierLevel::Standard, "Standard Inspection", usd(150.0))
                    .with_description("Detailed walkthrough with documented findings")
                    .with_feature("Up to 50 photos")
                    .with_feature("Detailed condition report")
                    .with_feature("Short video walkthrough")
                    .with_feature("Agent Q&A by message")
                    .with_delivery_time("2-3 business days")
                    .popular(),
            )
            .with_tier(
                ServiceTier::new(TierLevel::Premium, "Premium Inspection", usd(250.0))
                    .with_description("Comprehensive inspection with live participation")
                    .with_feature("Unlimited photos")
                    .with_feature("Full video documentation")
                    .with_feature("Live video call during inspection")
                    .with_feature("Priority agent matching")
                    .with_delivery_time("1-2 business days"),
            )
            .with_add_on(
                AdditionalService::per_unit("travel", "Travel Surcharge", usd(25.0), "per 10 miles")
                    .with_description("Covers agent travel beyond the local service area"),
            )
            .with_add_on(
                AdditionalService::flat("rush", "Rush Delivery", usd(40.0))
                    .with_description("Report delivered within 24 hours"),
            )
            .with_add_on(
                AdditionalService::flat("drone", "Drone Footage", usd(75.0))
                    .with_description("Aerial photos and video of the exterior"),
            )
            .with_add_on(
                AdditionalService::flat("translation", "Report Translation", usd(30.0))
                    .with_description("Report translated into a language of your choice"),
            )
    }
}
