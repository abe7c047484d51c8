//! # EyesOnGround Pricing
//!
//! Serves the inspection pricing catalog and quotes.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: point at a catalog outside the search paths
//! export CATALOG_PATH=/etc/eyesonground/catalog.toml
//!
//! # JSON logs for production
//! export LOG_FORMAT=json
//!
//! eyesonground-pricing
//! ```

use eog_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Catalog: {} tiers, {} add-ons, currency {}",
        state.engine.tiers().len(),
        state.engine.add_ons().len(),
        state.engine.currency()
    );
    info!("Default tier: {}", state.engine.default_tier().id);

    let app = routes::create_router(state);

    info!("EyesOnGround pricing starting on http://{}", addr);

    if !is_prod {
        info!("Catalog: GET http://{}/api/v1/catalog", addr);
        info!("Quote: POST http://{}/api/v1/pricing/quote", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}
