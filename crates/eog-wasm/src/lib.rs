//! # eog-wasm
//!
//! WebAssembly bindings for EyesOnGround request pricing.
//!
//! The request form recomputes its total on every tier change and add-on
//! toggle; these bindings let it do so synchronously, with the same engine
//! the pricing API uses.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmPricingEngine } from 'eyesonground-pricing-wasm';
//!
//! await init();
//!
//! const engine = new WasmPricingEngine();
//! const quote = JSON.parse(engine.calculateTotal('standard', JSON.stringify([
//!   { id: 'travel', units: 3 },
//!   { id: 'rush' },
//! ])));
//!
//! console.log('Total:', engine.formatPrice(BigInt(quote.total_price.amount)));
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use eog_core::{Price, PricingCatalog, PricingEngine, SelectedAdditionalService};
use wasm_bindgen::prelude::*;

/// Pricing engine handle for JavaScript
#[wasm_bindgen]
pub struct WasmPricingEngine {
    engine: PricingEngine,
}

#[wasm_bindgen]
impl WasmPricingEngine {
    /// Engine over the built-in inspection catalog
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPricingEngine, JsValue> {
        build_engine(PricingCatalog::inspection_defaults()).map_err(to_js_error)
    }

    /// Engine over a catalog in TOML form
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(toml: &str) -> Result<WasmPricingEngine, JsValue> {
        PricingCatalog::from_toml(toml)
            .map_err(|e| e.to_string())
            .and_then(build_engine)
            .map_err(to_js_error)
    }

    /// Tier price in cents; unknown tiers price as the cheapest tier
    #[wasm_bindgen(js_name = priceForTier)]
    pub fn price_for_tier(&self, tier_id: &str) -> i64 {
        self.engine.price_for_tier(tier_id).amount
    }

    /// Add-on contribution in cents; unknown add-ons contribute 0
    #[wasm_bindgen(js_name = contributionForAddOn)]
    pub fn contribution_for_add_on(&self, add_on_id: &str, units: Option<i32>) -> i64 {
        let selection = SelectedAdditionalService {
            id: add_on_id.to_string(),
            units,
        };
        self.engine.contribution_for_add_on(&selection).amount
    }

    /// Price a selection. `selections_json` is an array of `{ id, units? }`;
    /// the result is the serialized pricing result.
    #[wasm_bindgen(js_name = calculateTotal)]
    pub fn calculate_total(&self, tier_id: &str, selections_json: &str) -> Result<String, JsValue> {
        quote_json(&self.engine, tier_id, selections_json).map_err(to_js_error)
    }

    /// False only when the selection totals exactly zero
    #[wasm_bindgen(js_name = requiresPayment)]
    pub fn requires_payment(&self, tier_id: &str, selections_json: &str) -> Result<bool, JsValue> {
        let selections = parse_selections(selections_json).map_err(to_js_error)?;
        Ok(self
            .engine
            .calculate_total(tier_id, &selections)
            .requires_payment())
    }

    /// Format an amount in smallest units in the catalog's currency
    #[wasm_bindgen(js_name = formatPrice)]
    pub fn format_price(&self, amount: i64) -> String {
        Price::from_cents(amount, self.engine.currency()).display()
    }

    /// Tiers and add-ons as JSON, for rendering the selection form
    #[wasm_bindgen(js_name = catalogJson)]
    pub fn catalog_json(&self) -> String {
        serde_json::json!({
            "currency": self.engine.currency(),
            "tiers": self.engine.tiers(),
            "add_ons": self.engine.add_ons(),
        })
        .to_string()
    }
}

fn build_engine(catalog: PricingCatalog) -> Result<WasmPricingEngine, String> {
    PricingEngine::new(catalog)
        .map(|engine| WasmPricingEngine { engine })
        .map_err(|e| e.to_string())
}

fn parse_selections(selections_json: &str) -> Result<Vec<SelectedAdditionalService>, String> {
    if selections_json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(selections_json).map_err(|e| format!("Invalid add-on selection: {}", e))
}

fn quote_json(engine: &PricingEngine, tier_id: &str, selections_json: &str) -> Result<String, String> {
    let selections = parse_selections(selections_json)?;
    let result = engine.calculate_total(tier_id, &selections);
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

fn to_js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
