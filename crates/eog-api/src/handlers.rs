//! # Request Handlers
//!
//! Axum request handlers for the pricing API.
//! Quotes are fail-soft like the engine: unknown tiers and add-ons still
//! produce a priced response, flagged in the payload.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use eog_core::{PricingError, PricingResult, SelectedAdditionalService, SubmissionRoute};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Quote request
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Selected tier identifier
    pub tier_id: String,
    /// Selected add-ons
    #[serde(default)]
    pub add_ons: Vec<SelectedAdditionalService>,
}

/// Quote response
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub pricing: PricingResult,
    /// Display string for the total (e.g., "$265.00")
    pub total_display: String,
    /// False only when the total is exactly zero
    pub payment_required: bool,
    pub submission: SubmissionRoute,
}

impl From<PricingResult> for QuoteResponse {
    fn from(pricing: PricingResult) -> Self {
        Self {
            total_display: pricing.total_price.display(),
            payment_required: pricing.requires_payment(),
            submission: pricing.submission_route(),
            pricing,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn pricing_error_to_response(err: PricingError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn not_found(err: PricingError, details: String) -> (StatusCode, Json<ErrorResponse>) {
    let (status, Json(response)) = pricing_error_to_response(err);
    (status, Json(response.with_details(details)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "eyesonground-pricing",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Full catalog
pub async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
    let engine = &state.engine;
    Json(serde_json::json!({
        "currency": engine.currency(),
        "tiers": engine.tiers(),
        "add_ons": engine.add_ons(),
        "default_tier": engine.default_tier().id,
    }))
}

/// Single tier
pub async fn get_tier(
    State(state): State<AppState>,
    Path(tier_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let engine = &state.engine;
    let tier = engine.tier(&tier_id).ok_or_else(|| {
        let available: Vec<&str> = engine.tiers().iter().map(|t| t.id.as_str()).collect();
        not_found(
            PricingError::TierNotFound { tier_id },
            format!("Available tiers: {}", available.join(", ")),
        )
    })?;

    Ok(Json(tier.clone()))
}

/// Single add-on
pub async fn get_add_on(
    State(state): State<AppState>,
    Path(add_on_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let engine = &state.engine;
    let add_on = engine.add_on(&add_on_id).ok_or_else(|| {
        let available: Vec<&str> = engine.add_ons().iter().map(|a| a.id.as_str()).collect();
        not_found(
            PricingError::AddOnNotFound { add_on_id },
            format!("Available add-ons: {}", available.join(", ")),
        )
    })?;

    Ok(Json(add_on.clone()))
}

/// Price a tier and add-on selection
#[instrument(skip(state, request), fields(tier_id = %request.tier_id, add_ons = request.add_ons.len()))]
pub async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Json<QuoteResponse> {
    let pricing = state
        .engine
        .calculate_total(&request.tier_id, &request.add_ons);

    info!(
        "Quoted tier={} add_ons={} total={} fallback={}",
        pricing.tier_id,
        pricing.add_ons.len(),
        pricing.total_price.display(),
        pricing.tier_fallback
    );

    Json(QuoteResponse::from(pricing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eog_core::{PricingCatalog, PricingEngine};

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 404).with_details("missing");
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 404);
        assert_eq!(err.details.as_deref(), Some("missing"));
    }

    #[test]
    fn test_pricing_error_conversion() {
        let err = PricingError::TierNotFound {
            tier_id: "gold".to_string(),
        };
        let (status, json) = pricing_error_to_response(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json.0.error, "Service tier not found: gold");
    }

    #[test]
    fn test_not_found_carries_details() {
        let (status, json) = not_found(
            PricingError::AddOnNotFound {
                add_on_id: "helicopter".to_string(),
            },
            "Available add-ons: rush".to_string(),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json.0.details.as_deref(), Some("Available add-ons: rush"));
    }

    #[test]
    fn test_quote_response_flattens_pricing() {
        let engine = PricingEngine::new(PricingCatalog::inspection_defaults()).unwrap();
        let response = QuoteResponse::from(engine.calculate_total("basic", &[]));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["tier_id"], "basic");
        assert_eq!(json["total_price"]["amount"], 5000);
        assert_eq!(json["total_display"], "$50.00");
        assert_eq!(json["payment_required"], true);
        assert_eq!(json["submission"]["route"], "checkout");
    }
}
