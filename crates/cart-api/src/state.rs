//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the cart registry, product catalog, auth client, and placement backend.

use cart_auth::AuthClient;
use cart_core::{BoxedOrderPlacement, CartRegistry, Currency, ProductCatalog, SimulatedPlacement};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Currency every cart is priced in
    pub currency: Currency,
    /// Simulated order placement latency
    pub placement_delay: Duration,
    /// Carts not looked up for this long are dropped
    pub cart_idle_timeout: Duration,
    /// How often idle carts are swept
    pub cart_sweep_interval: Duration,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let currency = match std::env::var("CURRENCY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}; falling back to USD", e);
                Currency::USD
            }),
            Err(_) => Currency::USD,
        };

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            currency,
            placement_delay: std::env::var("ORDER_PLACEMENT_DELAY_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_secs(2)),
            cart_idle_timeout: secs_from_env("CART_IDLE_TIMEOUT_SECS", 24 * 60 * 60),
            cart_sweep_interval: secs_from_env("CART_SWEEP_INTERVAL_SECS", 60),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// A positive number of seconds from the environment, or `default`
fn secs_from_env(key: &str, default: u64) -> Duration {
    let secs = std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&s| s > 0)
        .unwrap_or(default);
    Duration::from_secs(secs)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Live carts by id
    pub carts: CartRegistry,
    /// Product catalog
    pub catalog: Arc<ProductCatalog>,
    /// Auth backend client; `None` when `AUTH_API_BASE_URL` is unset
    pub auth: Option<AuthClient>,
    /// Order placement backend
    pub placement: BoxedOrderPlacement,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment and `config/products.toml`
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_product_catalog()?;

        let auth = match AuthClient::from_env() {
            Ok(client) => {
                info!("Auth backend: {}", client.config().base_url);
                Some(client)
            }
            Err(e) => {
                warn!("Auth endpoints disabled: {}", e);
                None
            }
        };

        let placement: BoxedOrderPlacement =
            Arc::new(SimulatedPlacement::new(config.placement_delay));

        Ok(Self::with_parts(config, catalog, auth, placement))
    }

    /// Assemble state from explicit parts
    pub fn with_parts(
        config: AppConfig,
        catalog: ProductCatalog,
        auth: Option<AuthClient>,
        placement: BoxedOrderPlacement,
    ) -> Self {
        Self {
            carts: CartRegistry::new(config.currency),
            catalog: Arc::new(catalog),
            auth,
            placement,
            config,
        }
    }
}

/// Load product catalog from config file
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            info!("Loaded {} products from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}
