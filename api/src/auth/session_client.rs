// Client for the hosted session provider's user endpoint

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::StoreError;

/// The identity every write is attributed to
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Raw user payload returned by the session provider
#[derive(Debug, Deserialize)]
struct SessionUser {
    id: Uuid,
    email: Option<String>,
}

/// HTTP client for session lookups against the hosted auth provider
#[derive(Clone)]
pub struct SessionClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl SessionClient {
    /// Create a new session client from API configuration
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            endpoint: config.auth_url.clone(),
            api_key: config.auth_api_key.clone(),
            client: Client::new(),
        }
    }

    /// Resolve the user behind a bearer token. An invalid or expired token is
    /// Unauthorized; a provider outage is a PersistenceFailure, since the
    /// caller's credentials were never judged.
    pub async fn get_user(&self, token: &str) -> Result<AuthUser, StoreError> {
        let url = format!("{}/auth/v1/user", self.endpoint);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Session provider unreachable: {}", e);
                StoreError::PersistenceFailure("Session provider unreachable".to_string())
            })?;

        match response.status() {
            StatusCode::OK => {
                let user: SessionUser = response.json().await.map_err(|e| {
                    tracing::warn!("Malformed session provider response: {}", e);
                    StoreError::PersistenceFailure("Malformed session response".to_string())
                })?;

                tracing::debug!(user = %user.id, email = ?user.email, "session resolved");
                Ok(AuthUser {
                    id: user.id,
                    email: user.email,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(StoreError::Unauthorized("Invalid session".to_string()))
            }
            status => {
                tracing::warn!("Unexpected session provider status: {}", status);
                Err(StoreError::PersistenceFailure(
                    "Session lookup failed".to_string(),
                ))
            }
        }
    }
}
