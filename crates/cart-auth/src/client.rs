//! # Auth Client
//!
//! Thin JSON client over the login and registration endpoints.

use crate::config::AuthConfig;
use crate::types::{AuthResponse, AuthSession, ErrorBody, LoginRequest, RegisterRequest};
use cart_core::{CartError, CartResult};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Client for the remote auth backend
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: AuthConfig,
    client: Client,
}

impl AuthClient {
    /// Create a new auth client
    pub fn new(config: AuthConfig) -> CartResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CartError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CartResult<Self> {
        Self::new(AuthConfig::from_env()?)
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Log in with email and password. Success must carry a token.
    #[instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> CartResult<AuthSession> {
        request.validate()?;

        let response = self
            .post(&self.config.login_url(), request, "Login failed")
            .await?;
        let session = AuthSession::try_from(response)?;

        info!("Login succeeded");
        Ok(session)
    }

    /// Register a new account. Mismatched passwords never reach the backend.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> CartResult<AuthResponse> {
        request.validate()?;

        let response = self
            .post(&self.config.register_url(), request, "Registration failed")
            .await?;

        info!("Registration succeeded");
        Ok(response)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        fallback: &str,
    ) -> CartResult<AuthResponse> {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Auth backend rejected request: status={}", status);

            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| fallback.to_string());

            // 5xx is a backend outage, not a credential failure
            if status.is_server_error() {
                return Err(CartError::Network(format!("HTTP {status}: {message}")));
            }
            return Err(CartError::Auth(message));
        }

        serde_json::from_str(&text).map_err(|e| {
            CartError::Serialization(format!("Failed to parse auth response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> AuthClient {
        AuthClient::new(AuthConfig::new(server.uri()).unwrap()).unwrap()
    }

    fn register_request(confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "engine".into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "ada@example.com", "password": "engine" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-123",
                "user": { "id": 1, "name": "Ada Lovelace" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let session = client
            .login(&LoginRequest::new("ada@example.com", "engine"))
            .await
            .unwrap();

        assert_eq!(session.token, "jwt-123");
        assert_eq!(session.user["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_login_rejected_uses_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .login(&LoginRequest::new("ada@example.com", "wrong"))
            .await
            .unwrap_err();

        match err {
            CartError::Auth(message) => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_rejected_without_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .login(&LoginRequest::new("ada@example.com", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Auth(ref m) if m == "Login failed"));
    }

    #[tokio::test]
    async fn test_login_without_token_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": {} })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .login(&LoginRequest::new("ada@example.com", "engine"))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Auth(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .login(&LoginRequest::new("ada@example.com", "engine"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_register_sends_confirm_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_json(json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "password": "engine",
                "confirmPassword": "engine"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "token": "jwt-456",
                "user": { "email": "ada@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client.register(&register_request("engine")).await.unwrap();

        assert_eq!(response.token.as_deref(), Some("jwt-456"));
    }

    #[tokio::test]
    async fn test_register_mismatch_never_hits_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.register(&register_request("engin")).await.unwrap_err();

        assert!(matches!(err, CartError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) is closed on test hosts
        let client = AuthClient::new(AuthConfig::new("http://127.0.0.1:9").unwrap()).unwrap();
        let err = client
            .login(&LoginRequest::new("ada@example.com", "engine"))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Network(_)));
    }
}
