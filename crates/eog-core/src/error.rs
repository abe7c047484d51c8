//! # Pricing Error Types
//!
//! Errors raised while loading and validating a pricing catalog.
//! Pricing itself never fails once a `PricingEngine` exists; these errors
//! surface before the engine is built.

use thiserror::Error;

/// Core error type for catalog loading and lookups
#[derive(Debug, Error)]
pub enum PricingError {
    /// Configuration errors (unreadable file, bad environment)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Catalog TOML could not be parsed
    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    /// Catalog has no service tiers, so there is nothing to fall back to
    #[error("Catalog has no service tiers")]
    EmptyCatalog,

    /// The same tier level appears twice
    #[error("Duplicate service tier: {tier_id}")]
    DuplicateTier { tier_id: String },

    /// The same add-on identifier appears twice
    #[error("Duplicate additional service: {add_on_id}")]
    DuplicateAddOn { add_on_id: String },

    /// Negative price on a catalog entry
    #[error("Invalid price for {entry_id}: {message}")]
    InvalidPrice { entry_id: String, message: String },

    /// Catalog entry priced in a different currency than the catalog
    #[error("Currency mismatch for {entry_id}: expected {expected}, found {found}")]
    CurrencyMismatch {
        entry_id: String,
        expected: String,
        found: String,
    },

    /// Tier lookup by identifier failed (strict lookups only)
    #[error("Service tier not found: {tier_id}")]
    TierNotFound { tier_id: String },

    /// Add-on lookup by identifier failed (strict lookups only)
    #[error("Additional service not found: {add_on_id}")]
    AddOnNotFound { add_on_id: String },
}

impl PricingError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PricingError::Configuration(_) => 500,
            PricingError::CatalogParse(_) => 500,
            PricingError::EmptyCatalog => 500,
            PricingError::DuplicateTier { .. } => 500,
            PricingError::DuplicateAddOn { .. } => 500,
            PricingError::InvalidPrice { .. } => 500,
            PricingError::CurrencyMismatch { .. } => 500,
            PricingError::TierNotFound { .. } => 404,
            PricingError::AddOnNotFound { .. } => 404,
        }
    }
}

impl From<toml::de::Error> for PricingError {
    fn from(err: toml::de::Error) -> Self {
        PricingError::CatalogParse(err.to_string())
    }
}

/// Result type alias for catalog operations
pub type PricingOutcome<T> = Result<T, PricingError>;
