//! # Cart Error Types
//!
//! Typed error handling for the storefront services around the cart.
//! The reducer itself never fails; everything that can fail (catalog lookups,
//! checkout, auth) returns `Result<T, CartError>`.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for storefront operations
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration errors (missing env vars, bad catalog file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Cart id not known to the registry
    #[error("Cart not found: {cart_id}")]
    CartNotFound { cart_id: String },

    /// Checkout attempted on an empty cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Another checkout of the same cart has not finished
    #[error("Checkout already in progress")]
    CheckoutInProgress,

    /// One or more form fields failed validation
    #[error("Validation failed: {}", format_fields(.fields))]
    Validation { fields: BTreeMap<String, String> },

    /// Promo code not recognised
    #[error("Invalid promo code: {code}")]
    InvalidPromoCode { code: String },

    /// Auth backend rejected the request
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network/HTTP error talking to a remote service
    #[error("Network error: {0}")]
    Network(String),

    /// Order placement failed
    #[error("Order placement failed: {0}")]
    PlacementFailed(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_fields(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CartError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, CartError::Network(_) | CartError::PlacementFailed(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::Configuration(_) => 500,
            CartError::InvalidRequest(_) => 400,
            CartError::ProductNotFound { .. } => 404,
            CartError::CartNotFound { .. } => 404,
            CartError::EmptyCart => 409,
            CartError::CheckoutInProgress => 409,
            CartError::Validation { .. } => 422,
            CartError::InvalidPromoCode { .. } => 400,
            CartError::Auth(_) => 401,
            CartError::Network(_) => 503,
            CartError::PlacementFailed(_) => 502,
            CartError::Serialization(_) => 500,
            CartError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type CartResult<T> = Result<T, CartError>;
