//! # cart-api
//!
//! HTTP storefront for luxe-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Catalog browsing endpoints
//! - Independent carts driven by `CartAction` dispatches
//! - Checkout with simulated order placement
//! - Login/registration proxied to the auth backend
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | Browse products |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/api/v1/collections` | List categories |
//! | POST | `/api/v1/carts` | Create cart |
//! | GET | `/api/v1/carts/{cart_id}` | Cart snapshot |
//! | DELETE | `/api/v1/carts/{cart_id}` | Drop cart |
//! | POST | `/api/v1/carts/{cart_id}/actions` | Dispatch an action |
//! | POST | `/api/v1/carts/{cart_id}/items` | Add a catalog product |
//! | GET | `/api/v1/carts/{cart_id}/summary` | Order summary |
//! | POST | `/api/v1/carts/{cart_id}/checkout` | Place order |
//! | POST | `/api/v1/auth/login` | Log in |
//! | POST | `/api/v1/auth/register` | Register |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
