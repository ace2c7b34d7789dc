//! # cart-auth
//!
//! Client for the storefront's remote authentication backend.
//!
//! The backend is opaque: login and registration are JSON POSTs that answer
//! `{token, user}` on success and `{error}` otherwise. Nothing here touches
//! cart state.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_auth::{AuthClient, LoginRequest};
//!
//! let client = AuthClient::from_env()?;
//! let session = client
//!     .login(&LoginRequest::new("ada@example.com", "hunter2"))
//!     .await?;
//!
//! println!("token: {}", session.token);
//! ```

pub mod client;
pub mod config;
pub mod types;

// Re-exports
pub use client::AuthClient;
pub use config::AuthConfig;
pub use types::{AuthResponse, AuthSession, LoginRequest, RegisterRequest};
