//! # Luxe Storefront
//!
//! HTTP storefront around the cart state manager.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: enable login/registration
//! export AUTH_API_BASE_URL=https://auth.example.com
//!
//! # Run the server
//! luxe-storefront
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
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

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.len());
    info!("Currency: {}", state.config.currency);
    info!("Order placement: {}", state.placement.name());
    info!(
        "Idle carts expire after {}s",
        state.config.cart_idle_timeout.as_secs()
    );

    let _sweeper = state
        .carts
        .spawn_sweeper(state.config.cart_idle_timeout, state.config.cart_sweep_interval);

    let app = routes::create_router(state);

    info!("Luxe storefront starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Catalog: GET http://{}/api/v1/products", addr);
        info!("Carts: POST http://{}/api/v1/carts", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Luxe Storefront
  ━━━━━━━━━━━━━━━━━━━━━━━
  Cart state manager over HTTP
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
