//! # Request Draft
//!
//! The in-progress composition of an inspection request: which tier the
//! client picked and which add-ons they toggled on. The draft owns the
//! selection state; pricing is recomputed from it on demand.

use crate::catalog::TierLevel;
use crate::pricing::{PricingEngine, PricingResult, SelectedAdditionalService};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request being composed by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDraft {
    /// Unique draft ID (generated)
    pub id: String,

    /// Selected tier identifier, as received from the client
    pub tier_id: String,

    /// Selected add-ons, unique by id, in the order they were added
    #[serde(default)]
    pub add_ons: Vec<SelectedAdditionalService>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl RequestDraft {
    /// Start a draft on the given tier
    pub fn new(tier_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tier_id: tier_id.into(),
            add_ons: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Start a draft on a known tier level
    pub fn for_tier(tier: TierLevel) -> Self {
        Self::new(tier.as_str())
    }

    pub fn select_tier(&mut self, tier_id: impl Into<String>) {
        self.tier_id = tier_id.into();
    }

    pub fn is_selected(&self, add_on_id: &str) -> bool {
        self.add_ons.iter().any(|s| s.id == add_on_id)
    }

    /// Add an add-on; a second add of the same id is a no-op
    pub fn add_add_on(&mut self, selection: SelectedAdditionalService) {
        if !self.is_selected(&selection.id) {
            self.add_ons.push(selection);
        }
    }

    /// Remove an add-on. Returns true if it was selected.
    pub fn remove_add_on(&mut self, add_on_id: &str) -> bool {
        let before = self.add_ons.len();
        self.add_ons.retain(|s| s.id != add_on_id);
        self.add_ons.len() != before
    }

    /// Flip an add-on on or off. Returns true if it is now selected.
    pub fn toggle_add_on(&mut self, add_on_id: &str) -> bool {
        if self.remove_add_on(add_on_id) {
            false
        } else {
            self.add_ons.push(SelectedAdditionalService::new(add_on_id));
            true
        }
    }

    /// Set the unit count of a selected add-on. Returns false if it is not selected.
    pub fn set_units(&mut self, add_on_id: &str, units: i32) -> bool {
        match self.add_ons.iter_mut().find(|s| s.id == add_on_id) {
            Some(selection) => {
                selection.units = Some(units);
                true
            }
            None => false,
        }
    }

    pub fn clear_add_ons(&mut self) {
        self.add_ons.clear();
    }

    /// Price the draft as it stands
    pub fn quote(&self, engine: &PricingEngine) -> PricingResult {
        engine.calculate_total(&self.tier_id, &self.add_ons)
    }
}
