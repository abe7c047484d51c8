//! # Pricing Engine
//!
//! Computes the price of an inspection request from a service tier and a
//! set of selected add-ons.
//!
//! ```text
//! tier_id ──► price_for_tier ─────────────────────┐
//!                                                 ├──► PricingResult
//! selections ──► dedup ──► contribution_for_add_on ┘     base + additional = total
//! ```
//!
//! The engine never fails. An unknown tier falls back to the cheapest tier in
//! the catalog and an unknown add-on contributes nothing, so a review screen
//! can always render a total, even from a stale selection.

use crate::catalog::{AdditionalService, PricingCatalog, ServiceTier, TierLevel};
use crate::error::{PricingError, PricingOutcome};
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// An add-on chosen by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAdditionalService {
    /// Catalog identifier of the add-on
    pub id: String,

    /// Unit count for per-unit add-ons; missing or non-positive means 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<i32>,
}

impl SelectedAdditionalService {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            units: None,
        }
    }

    pub fn with_units(id: impl Into<String>, units: i32) -> Self {
        Self {
            id: id.into(),
            units: Some(units),
        }
    }

    /// Unit count actually charged (at least 1)
    pub fn effective_units(&self) -> i64 {
        i64::from(self.units.unwrap_or(1).max(1))
    }
}

/// One priced add-on in a [`PricingResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnLine {
    pub id: String,
    pub name: String,
    pub unit_based: bool,
    /// Units charged; always 1 for flat add-ons
    pub units: i64,
    pub unit_price: Price,
    pub contribution: Price,
}

/// Where a request goes once the client submits it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum SubmissionRoute {
    /// Nothing to charge, post the request as is
    PostDirectly,
    /// Charge `amount` through checkout before posting
    Checkout { amount: Price },
}

/// Computed price of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Tier the base price was taken from
    pub tier_id: TierLevel,

    /// True when the requested tier was unknown and the default tier was used
    pub tier_fallback: bool,

    pub base_price: Price,

    pub additional_total: Price,

    pub total_price: Price,

    /// Priced add-ons in selection order, duplicates and unknown ids omitted
    pub add_ons: Vec<AddOnLine>,
}

impl PricingResult {
    /// True unless the total is exactly zero
    pub fn requires_payment(&self) -> bool {
        !self.total_price.is_zero()
    }

    pub fn submission_route(&self) -> SubmissionRoute {
        if self.requires_payment() {
            SubmissionRoute::Checkout {
                amount: self.total_price,
            }
        } else {
            SubmissionRoute::PostDirectly
        }
    }
}

/// Read-only pricing over a validated catalog
#[derive(Debug, Clone)]
pub struct PricingEngine {
    currency: Currency,
    tiers: Vec<ServiceTier>,
    tier_index: HashMap<TierLevel, usize>,
    add_ons: Vec<AdditionalService>,
    add_on_index: HashMap<String, usize>,
    /// Index of the cheapest tier, first in catalog order on ties
    default_tier: usize,
}

impl PricingEngine {
    /// Validate a catalog and build lookup tables
    pub fn new(catalog: PricingCatalog) -> PricingOutcome<Self> {
        let PricingCatalog {
            currency,
            tiers,
            add_ons,
        } = catalog;

        if tiers.is_empty() {
            return Err(PricingError::EmptyCatalog);
        }

        let mut tier_index = HashMap::with_capacity(tiers.len());
        for (i, tier) in tiers.iter().enumerate() {
            check_price(tier.id.as_str(), &tier.price, currency)?;
            if tier_index.insert(tier.id, i).is_some() {
                return Err(PricingError::DuplicateTier {
                    tier_id: tier.id.to_string(),
                });
            }
        }

        let mut add_on_index = HashMap::with_capacity(add_ons.len());
        for (i, add_on) in add_ons.iter().enumerate() {
            check_price(&add_on.id, &add_on.price, currency)?;
            if add_on_index.insert(add_on.id.clone(), i).is_some() {
                return Err(PricingError::DuplicateAddOn {
                    add_on_id: add_on.id.clone(),
                });
            }
        }

        // min_by_key keeps the first minimum
        let default_tier = tiers
            .iter()
            .enumerate()
            .min_by_key(|(_, tier)| tier.price.amount)
            .map(|(i, _)| i)
            .unwrap_or(0);

        Ok(Self {
            currency,
            tiers,
            tier_index,
            add_ons,
            add_on_index,
            default_tier,
        })
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Tiers in catalog order
    pub fn tiers(&self) -> &[ServiceTier] {
        &self.tiers
    }

    /// Add-ons in catalog order
    pub fn add_ons(&self) -> &[AdditionalService] {
        &self.add_ons
    }

    /// Tier used when a requested tier is unknown
    pub fn default_tier(&self) -> &ServiceTier {
        &self.tiers[self.default_tier]
    }

    /// Strict tier lookup
    pub fn tier(&self, tier_id: &str) -> Option<&ServiceTier> {
        let level = tier_id.parse::<TierLevel>().ok()?;
        self.tier_index.get(&level).map(|&i| &self.tiers[i])
    }

    /// Strict add-on lookup
    pub fn add_on(&self, add_on_id: &str) -> Option<&AdditionalService> {
        self.add_on_index.get(add_on_id).map(|&i| &self.add_ons[i])
    }

    /// Resolve a tier identifier, falling back to the default tier.
    /// The flag is true when the fallback was taken.
    pub fn resolve_tier(&self, tier_id: &str) -> (&ServiceTier, bool) {
        match self.tier(tier_id) {
            Some(tier) => (tier, false),
            None => {
                let fallback = self.default_tier();
                debug!(
                    "Unknown tier {:?}, falling back to {}",
                    tier_id, fallback.id
                );
                (fallback, true)
            }
        }
    }

    /// Flat price of a tier; unknown tiers price as the cheapest tier
    pub fn price_for_tier(&self, tier_id: &str) -> Price {
        self.resolve_tier(tier_id).0.price
    }

    /// What one selected add-on adds to the total; unknown add-ons add zero
    pub fn contribution_for_add_on(&self, selection: &SelectedAdditionalService) -> Price {
        self.price_selection(selection)
            .map(|line| line.contribution)
            .unwrap_or_else(|| Price::zero(self.currency))
    }

    /// Price a request. Add-ons are deduplicated by id, first occurrence wins.
    pub fn calculate_total(
        &self,
        tier_id: &str,
        selections: &[SelectedAdditionalService],
    ) -> PricingResult {
        let (tier, tier_fallback) = self.resolve_tier(tier_id);

        let mut seen = HashSet::with_capacity(selections.len());
        let add_ons: Vec<AddOnLine> = selections
            .iter()
            .filter(|selection| seen.insert(selection.id.as_str()))
            .filter_map(|selection| self.price_selection(selection))
            .collect();

        let additional_total = add_ons
            .iter()
            .fold(Price::zero(self.currency), |sum, line| {
                sum.saturating_add(line.contribution)
            });
        let total_price = tier.price.saturating_add(additional_total);

        PricingResult {
            tier_id: tier.id,
            tier_fallback,
            base_price: tier.price,
            additional_total,
            total_price,
            add_ons,
        }
    }

    fn price_selection(&self, selection: &SelectedAdditionalService) -> Option<AddOnLine> {
        let Some(add_on) = self.add_on(&selection.id) else {
            debug!("Unknown add-on {:?} contributes nothing", selection.id);
            return None;
        };

        let units = if add_on.unit_based {
            selection.effective_units()
        } else {
            1
        };

        Some(AddOnLine {
            id: add_on.id.clone(),
            name: add_on.name.clone(),
            unit_based: add_on.unit_based,
            units,
            unit_price: add_on.price,
            contribution: add_on.price.saturating_mul(units),
        })
    }
}

fn check_price(entry_id: &str, price: &Price, currency: Currency) -> PricingOutcome<()> {
    if price.is_negative() {
        return Err(PricingError::InvalidPrice {
            entry_id: entry_id.to_string(),
            message: format!("must not be negative, got {}", price.amount),
        });
    }
    if price.currency != currency {
        return Err(PricingError::CurrencyMismatch {
            entry_id: entry_id.to_string(),
            expected: currency.to_string(),
            found: price.currency.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(dollars: f64) -> Price {
        Price::new(dollars, Currency::USD)
    }

    fn engine() -> PricingEngine {
        PricingEngine::new(PricingCatalog::inspection_defaults()).unwrap()
    }

    fn travel(units: i32) -> SelectedAdditionalService {
        SelectedAdditionalService::with_units("travel", units)
    }

    fn rush() -> SelectedAdditionalService {
        SelectedAdditionalService::new("rush")
    }

    #[test]
    fn test_standard_with_travel_and_rush() {
        let result = engine().calculate_total("standard", &[travel(3), rush()]);

        assert_eq!(result.tier_id, TierLevel::Standard);
        assert!(!result.tier_fallback);
        assert_eq!(result.base_price, usd(150.0));
        assert_eq!(result.additional_total, usd(115.0));
        assert_eq!(result.total_price, usd(265.0));

        assert_eq!(result.add_ons.len(), 2);
        assert_eq!(result.add_ons[0].id, "travel");
        assert_eq!(result.add_ons[0].units, 3);
        assert_eq!(result.add_ons[0].contribution, usd(75.0));
        assert_eq!(result.add_ons[1].id, "rush");
        assert_eq!(result.add_ons[1].contribution, usd(40.0));
    }

    #[test]
    fn test_empty_selection_is_tier_price() {
        let engine = engine();
        for level in TierLevel::ALL {
            let result = engine.calculate_total(level.as_str(), &[]);
            assert_eq!(result.total_price, engine.price_for_tier(level.as_str()));
            assert!(result.additional_total.is_zero());
            assert!(result.add_ons.is_empty());
        }
    }

    #[test]
    fn test_basic_routes_through_checkout() {
        let result = engine().calculate_total("basic", &[]);

        assert_eq!(result.total_price, usd(50.0));
        assert!(result.requires_payment());
        assert_eq!(
            result.submission_route(),
            SubmissionRoute::Checkout { amount: usd(50.0) }
        );
    }

    #[test]
    fn test_zero_total_posts_directly() {
        let catalog = PricingCatalog::new(Currency::USD)
            .with_tier(ServiceTier::new(TierLevel::Basic, "Free Check", usd(0.0)))
            .with_add_on(AdditionalService::flat("photos", "Extra Photos", usd(0.0)));
        let engine = PricingEngine::new(catalog).unwrap();

        let result = engine.calculate_total("basic", &[SelectedAdditionalService::new("photos")]);
        assert!(result.total_price.is_zero());
        assert!(!result.requires_payment());
        assert_eq!(result.submission_route(), SubmissionRoute::PostDirectly);
    }

    #[test]
    fn test_one_cent_requires_payment() {
        let catalog = PricingCatalog::new(Currency::USD).with_tier(ServiceTier::new(
            TierLevel::Basic,
            "Almost Free",
            Price::from_cents(1, Currency::USD),
        ));
        let engine = PricingEngine::new(catalog).unwrap();

        assert!(engine.calculate_total("basic", &[]).requires_payment());
    }

    #[test]
    fn test_unknown_tier_falls_back_to_cheapest() {
        let engine = engine();
        let result = engine.calculate_total("nonexistent-tier", &[]);

        assert!(result.tier_fallback);
        assert_eq!(result.tier_id, TierLevel::Basic);
        assert_eq!(result.total_price, usd(50.0));
        assert_eq!(engine.price_for_tier(""), usd(50.0));
    }

    #[test]
    fn test_fallback_uses_cheapest_not_first() {
        let catalog = PricingCatalog::new(Currency::USD)
            .with_tier(ServiceTier::new(TierLevel::Premium, "Premium", usd(250.0)))
            .with_tier(ServiceTier::new(TierLevel::Standard, "Standard", usd(120.0)));
        let engine = PricingEngine::new(catalog).unwrap();

        // "basic" is a valid level but missing from this catalog
        assert_eq!(engine.price_for_tier("basic"), usd(120.0));
        assert_eq!(engine.default_tier().id, TierLevel::Standard);
    }

    #[test]
    fn test_fallback_tie_keeps_catalog_order() {
        let catalog = PricingCatalog::new(Currency::USD)
            .with_tier(ServiceTier::new(TierLevel::Standard, "Standard", usd(100.0)))
            .with_tier(ServiceTier::new(TierLevel::Basic, "Basic", usd(100.0)));
        let engine = PricingEngine::new(catalog).unwrap();

        assert_eq!(engine.default_tier().id, TierLevel::Standard);
    }

    #[test]
    fn test_tier_id_must_match_exactly() {
        let engine = engine();
        for tier_id in ["PREMIUM", " premium ", "Premium"] {
            let result = engine.calculate_total(tier_id, &[]);
            assert!(result.tier_fallback);
            assert_eq!(result.tier_id, TierLevel::Basic);
            assert_eq!(result.total_price.amount, 5000);
        }
        assert!(engine.tier("PREMIUM").is_none());
    }

    #[test]
    fn test_duplicate_selection_counts_once() {
        let engine = engine();
        let once = engine.calculate_total("standard", &[rush()]);
        let twice = engine.calculate_total("standard", &[rush(), rush()]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_duplicate_keeps_first_occurrence() {
        let result = engine().calculate_total("basic", &[travel(2), travel(5)]);

        assert_eq!(result.add_ons.len(), 1);
        assert_eq!(result.add_ons[0].units, 2);
        assert_eq!(result.additional_total, usd(50.0));
    }

    #[test]
    fn test_unit_pricing() {
        let engine = engine();
        for (units, expected) in [(1, 25.0), (4, 100.0), (0, 25.0), (-3, 25.0)] {
            assert_eq!(engine.contribution_for_add_on(&travel(units)), usd(expected));
        }
        assert_eq!(
            engine.contribution_for_add_on(&SelectedAdditionalService::new("travel")),
            usd(25.0)
        );
    }

    #[test]
    fn test_flat_add_on_ignores_units() {
        let engine = engine();
        let selection = SelectedAdditionalService::with_units("rush", 7);

        assert_eq!(engine.contribution_for_add_on(&selection), usd(40.0));
        assert_eq!(engine.calculate_total("basic", &[selection]).add_ons[0].units, 1);
    }

    #[test]
    fn test_unknown_add_on_contributes_zero() {
        let engine = engine();
        let ghost = SelectedAdditionalService::new("helicopter");

        assert!(engine.contribution_for_add_on(&ghost).is_zero());

        let result = engine.calculate_total("standard", &[ghost, rush()]);
        assert_eq!(result.total_price, usd(190.0));
        assert_eq!(result.add_ons.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let engine = engine();
        let selections = [travel(2), rush(), SelectedAdditionalService::new("drone")];

        let first = engine.calculate_total("premium", &selections);
        let second = engine.calculate_total("premium", &selections);
        assert_eq!(first, second);
    }

    #[test]
    fn test_adding_add_on_never_decreases_total() {
        let engine = engine();
        let mut selections = vec![rush()];
        let mut previous = engine.calculate_total("standard", &selections).total_price;

        for next in [
            travel(2),
            rush(),
            SelectedAdditionalService::new("unknown"),
            SelectedAdditionalService::new("drone"),
            SelectedAdditionalService::new("translation"),
        ] {
            selections.push(next);
            let total = engine.calculate_total("standard", &selections).total_price;
            assert!(total.amount >= previous.amount);
            previous = total;
        }
    }

    #[test]
    fn test_removing_add_on_removes_full_contribution() {
        let engine = engine();
        let with = engine.calculate_total("basic", &[travel(4), rush()]);
        let without = engine.calculate_total("basic", &[rush()]);

        assert_eq!(with.total_price.amount - without.total_price.amount, 10000);
    }

    #[test]
    fn test_total_is_sum_and_non_negative() {
        let engine = engine();
        let result = engine.calculate_total("premium", &[travel(i32::MAX), rush()]);

        assert!(!result.total_price.is_negative());
        assert_eq!(
            result.total_price,
            result.base_price.saturating_add(result.additional_total)
        );
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let result = PricingEngine::new(PricingCatalog::new(Currency::USD));
        assert!(matches!(result, Err(PricingError::EmptyCatalog)));
    }

    #[test]
    fn test_rejects_duplicates() {
        let catalog = PricingCatalog::new(Currency::USD)
            .with_tier(ServiceTier::new(TierLevel::Basic, "Basic", usd(50.0)))
            .with_tier(ServiceTier::new(TierLevel::Basic, "Basic Again", usd(60.0)));
        assert!(matches!(
            PricingEngine::new(catalog),
            Err(PricingError::DuplicateTier { .. })
        ));

        let catalog = PricingCatalog::new(Currency::USD)
            .with_tier(ServiceTier::new(TierLevel::Basic, "Basic", usd(50.0)))
            .with_add_on(AdditionalService::flat("rush", "Rush", usd(40.0)))
            .with_add_on(AdditionalService::flat("rush", "Rush Again", usd(45.0)));
        assert!(matches!(
            PricingEngine::new(catalog),
            Err(PricingError::DuplicateAddOn { add_on_id }) if add_on_id == "rush"
        ));
    }

    #[test]
    fn test_rejects_negative_price() {
        let catalog = PricingCatalog::new(Currency::USD)
            .with_tier(ServiceTier::new(TierLevel::Basic, "Basic", usd(50.0)))
            .with_add_on(AdditionalService::flat("discount", "Discount", usd(-10.0)));
        assert!(matches!(
            PricingEngine::new(catalog),
            Err(PricingError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_rejects_currency_mismatch() {
        let catalog = PricingCatalog::new(Currency::USD).with_tier(ServiceTier::new(
            TierLevel::Basic,
            "Basic",
            Price::new(50.0, Currency::EUR),
        ));
        assert!(matches!(
            PricingEngine::new(catalog),
            Err(PricingError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_strict_lookups() {
        let engine = engine();
        assert_eq!(engine.tier("standard").unwrap().name, "Standard Inspection");
        assert!(engine.tier("gold").is_none());
        assert!(engine.add_on("drone").is_some());
        assert!(engine.add_on("Drone").is_none());
        assert_eq!(engine.tiers().len(), 3);
        assert_eq!(engine.add_ons().len(), 4);
    }

    #[test]
    fn test_submission_route_serialization() {
        let route = SubmissionRoute::Checkout { amount: usd(265.0) };
        let json = serde_json::to_value(route).unwrap();
        assert_eq!(json["route"], "checkout");
        assert_eq!(json["amount"]["amount"], 26500);

        let json = serde_json::to_value(SubmissionRoute::PostDirectly).unwrap();
        assert_eq!(json, serde_json::json!({ "route": "post_directly" }));
    }
}
