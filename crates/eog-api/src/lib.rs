//! # eog-api
//!
//! HTTP pricing API for EyesOnGround inspection requests.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the pricing catalog
//! - Quote computation for a tier and add-on selection
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/catalog` | Tiers and add-ons |
//! | GET | `/api/v1/catalog/tiers/:id` | Get tier |
//! | GET | `/api/v1/catalog/add-ons/:id` | Get add-on |
//! | POST | `/api/v1/pricing/quote` | Price a selection |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{load_pricing_catalog, AppConfig, AppState};
