//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the pricing engine built from the catalog and the server config.

use anyhow::Context;
use eog_core::{PricingCatalog, PricingEngine};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Catalog locations tried when `CATALOG_PATH` is not set
const CATALOG_SEARCH_PATHS: [&str; 3] = [
    "config/catalog.toml",
    "../config/catalog.toml",
    "../../config/catalog.toml",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit catalog file; overrides the search paths
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            catalog_path: std::env::var("CATALOG_PATH").ok().map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            catalog_path: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Pricing engine over the loaded catalog
    pub engine: Arc<PricingEngine>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from environment configuration
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_pricing_catalog(config.catalog_path.as_deref())?;
        let engine = PricingEngine::new(catalog).context("Invalid pricing catalog")?;

        Ok(Self::with_engine(engine, config))
    }

    /// Create state around an existing engine
    pub fn with_engine(engine: PricingEngine, config: AppConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
        }
    }
}

/// Load the pricing catalog from config file.
///
/// An explicit path must exist. Without one, the search paths are tried in
/// order and the built-in catalog is used if none of them exists.
pub fn load_pricing_catalog(explicit: Option<&Path>) -> anyhow::Result<PricingCatalog> {
    if let Some(path) = explicit {
        let catalog = PricingCatalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
        tracing::info!(
            "Loaded {} tiers and {} add-ons from {}",
            catalog.tiers.len(),
            catalog.add_ons.len(),
            path.display()
        );
        return Ok(catalog);
    }

    for path in CATALOG_SEARCH_PATHS {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = PricingCatalog::from_toml(&content)
                .with_context(|| format!("Failed to parse {}", path))?;
            tracing::info!(
                "Loaded {} tiers and {} add-ons from {}",
                catalog.tiers.len(),
                catalog.add_ons.len(),
                path
            );
            return Ok(catalog);
        }
    }

    tracing::warn!("No pricing catalog found, using built-in inspection catalog");
    Ok(PricingCatalog::inspection_defaults())
}
