//! API client for the remote authorization authority.
//!
//! This module provides the `ApiClient` struct for asking the server-side
//! authority whether the current session is authorized.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::credential::format_bearer;
use crate::guard::Authority;

use super::ApiError;

/// Path of the authorization check endpoint
const CHECK_AUTH_PATH: &str = "/check-auth";

/// Response shape of the authorization check. `success` describes the call
/// itself; only `data` carries the authorization verdict.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthCheckResponse {
    pub success: bool,
    pub data: bool,
}

/// API client for the authorization authority.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format_bearer(token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Ask the authority whether the current session is authorized.
    ///
    /// Issues exactly one GET with no body; there is no retry.
    pub async fn check_auth(&self) -> Result<AuthCheckResponse> {
        let url = format!("{}{}", self.base_url, CHECK_AUTH_PATH);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }
}

#[async_trait]
impl Authority for ApiClient {
    async fn check_auth(&self) -> Result<AuthCheckResponse> {
        ApiClient::check_auth(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_check_response_parses_wire_shape() {
        let allowed: AuthCheckResponse =
            serde_json::from_str(r#"{"success":true,"data":true}"#).unwrap();
        assert!(allowed.success);
        assert!(allowed.data);

        let denied: AuthCheckResponse =
            serde_json::from_str(r#"{"success":true,"data":false}"#).unwrap();
        assert!(!denied.data);
    }

    #[test]
    fn test_auth_headers_carry_bearer_token() {
        let config = AuthConfig::default();
        let client = ApiClient::new(&config).unwrap().with_token("tok".to_string());
        let headers = client.auth_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );
    }

    #[test]
    fn test_headers_empty_without_token() {
        let config = AuthConfig::default();
        let client = ApiClient::new(&config).unwrap();
        assert!(client.auth_headers().unwrap().is_empty());
    }
}
