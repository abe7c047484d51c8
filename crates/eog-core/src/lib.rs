//! # eog-core
//!
//! Core types for pricing EyesOnGround inspection requests.
//!
//! This crate provides:
//! - `Price` and `Currency` for integer money arithmetic
//! - `ServiceTier`, `AdditionalService` and `PricingCatalog` for the catalog
//! - `PricingEngine` and `PricingResult` for computing request totals
//! - `RequestDraft` for holding a client's in-progress selection
//! - `PricingError` for typed catalog errors
//!
//! ## Example
//!
//! ```rust
//! use eog_core::{PricingCatalog, PricingEngine, SelectedAdditionalService};
//!
//! let engine = PricingEngine::new(PricingCatalog::inspection_defaults()).unwrap();
//!
//! let result = engine.calculate_total(
//!     "standard",
//!     &[
//!         SelectedAdditionalService::with_units("travel", 3),
//!         SelectedAdditionalService::new("rush"),
//!     ],
//! );
//!
//! assert_eq!(result.total_price.amount, 26500);
//! assert!(result.requires_payment());
//! ```

pub mod catalog;
pub mod draft;
pub mod error;
pub mod money;
pub mod pricing;

// Re-exports for convenience
pub use catalog::{AdditionalService, PricingCatalog, ServiceTier, TierLevel};
pub use draft::RequestDraft;
pub use error::{PricingError, PricingOutcome};
pub use money::{Currency, Price};
pub use pricing::{
    AddOnLine, PricingEngine, PricingResult, SelectedAdditionalService, SubmissionRoute,
};
