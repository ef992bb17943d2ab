//! Credential service contract and its HTTP implementation.
//!
//! The remote service exposes two operations: credential exchange
//! (`sign_in`) and token validation (`verify_token`). Each call is a
//! single attempt - retry policy, if any, belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::AuthError;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote system performing credential exchange and token validation.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Exchanges an id/password pair for a token.
    async fn sign_in(&self, id: &str, password: &str) -> Result<String, AuthError>;

    /// Checks that a previously issued token is still valid.
    async fn verify_token(&self, token: &str) -> Result<(), AuthError>;
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    token: String,
}

/// Credential service backed by an HTTP API.
///
/// Endpoints, relative to the base URL:
/// - `POST /auth/sign-in` with JSON `{ "id": ..., "password": ... }`,
///   returning `{ "token": ... }`
/// - `GET /auth/verify` with the token as a bearer header
///
/// Clone is cheap - `reqwest::Client` uses Arc internally for connection
/// pooling.
#[derive(Clone)]
pub struct HttpCredentialService {
    client: Client,
    base_url: String,
}

impl HttpCredentialService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Check if a response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl CredentialService for HttpCredentialService {
    async fn sign_in(&self, id: &str, password: &str) -> Result<String, AuthError> {
        let url = format!("{}/auth/sign-in", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "id": id, "password": password }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let body: SignInResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::InvalidResponse(format!("sign-in response: {}", e)))?;

        if body.token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "empty token in sign-in response".to_string(),
            ));
        }

        debug!("Sign-in succeeded");
        Ok(body.token)
    }

    async fn verify_token(&self, token: &str) -> Result<(), AuthError> {
        let url = format!("{}/auth/verify", self.base_url);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        Self::check_response(response).await?;
        debug!("Token verified");
        Ok(())
    }
}
