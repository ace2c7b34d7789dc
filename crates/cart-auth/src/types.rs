//! # Auth Wire Types
//!
//! Request and response bodies exchanged with the auth backend.

use cart_core::{CartError, CartResult, FieldErrors};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> CartResult<()> {
        let mut fields = FieldErrors::new();
        if self.email.trim().is_empty() {
            fields.insert("email".into(), "Email is required".into());
        }
        if self.password.is_empty() {
            fields.insert("password".into(), "Password is required".into());
        }
        into_result(fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> CartResult<()> {
        let mut fields = FieldErrors::new();
        if self.name.trim().is_empty() {
            fields.insert("name".into(), "Name is required".into());
        }
        if self.email.trim().is_empty() {
            fields.insert("email".into(), "Email is required".into());
        }
        if self.password.is_empty() {
            fields.insert("password".into(), "Password is required".into());
        }
        if self.password != self.confirm_password {
            fields.insert("confirmPassword".into(), "Passwords do not match".into());
        }
        into_result(fields)
    }
}

fn into_result(fields: FieldErrors) -> CartResult<()> {
    if fields.is_empty() {
        Ok(())
    } else {
        Err(CartError::Validation { fields })
    }
}

/// Raw success body. Registration may answer without a token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: serde_json::Value,
}

/// A logged-in user: the bearer token plus the backend's user object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    /// Opaque user record as returned by the backend
    pub user: serde_json::Value,
}

impl TryFrom<AuthResponse> for AuthSession {
    type Error = CartError;

    fn try_from(response: AuthResponse) -> Result<Self, Self::Error> {
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CartError::Auth("Response did not include a token".to_string()))?;
        Ok(Self {
            token,
            user: response.user,
        })
    }
}

/// Failure body: `{ "error": "..." }`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
