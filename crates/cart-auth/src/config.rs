//! # Auth Configuration
//!
//! Where the auth backend lives and how long to wait for it.
//! Loaded from environment variables.

use cart_core::CartError;
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Auth backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Backend base URL, without trailing slash (e.g. "https://auth.example.com")
    pub base_url: String,

    /// Path of the login endpoint
    pub login_path: String,

    /// Path of the registration endpoint
    pub register_path: String,

    /// Request timeout
    pub timeout: Duration,
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `AUTH_API_BASE_URL`
    ///
    /// Optional:
    /// - `AUTH_TIMEOUT_SECS` (default 15)
    pub fn from_env() -> Result<Self, CartError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let base_url = env::var("AUTH_API_BASE_URL").map_err(|_| {
            CartError::Configuration("AUTH_API_BASE_URL not set".to_string())
        })?;

        let timeout = match env::var("AUTH_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                CartError::Configuration(format!("AUTH_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(base_url).map(|c| c.with_timeout(Duration::from_secs(timeout)))
    }

    /// Create config for an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, CartError> {
        let base_url: String = base_url.into();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CartError::Configuration(
                "AUTH_API_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            login_path: "/api/auth/login".to_string(),
            register_path: "/api/auth/register".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, self.login_path)
    }

    pub fn register_url(&self) -> String {
        format!("{}{}", self.base_url, self.register_path)
    }
}
