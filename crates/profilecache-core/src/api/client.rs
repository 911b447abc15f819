//! HTTP client for the random profile service.
//!
//! This module provides the `ApiClient` struct, which requests batches of
//! generated profiles and validates that the service returned exactly the
//! number asked for.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{Profile, ProfilesResponse};

use super::{ApiError, ProfileSource};

// ============================================================================
// Constants
// ============================================================================

/// Default endpoint for profile generation.
pub const DEFAULT_BASE_URL: &str = "https://randomuser.me/api/";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Largest batch the service will generate in one request.
const MAX_PROFILES_PER_REQUEST: usize = 5000;

/// API client for the profile service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Create a client against the default endpoint
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a client using the endpoint and timeout from the config
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_base_url(config.api_base_url(), config.request_timeout())
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch exactly `count` freshly generated profiles in one request.
    pub async fn fetch_profiles(&self, count: usize) -> Result<Vec<Profile>, ApiError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if count > MAX_PROFILES_PER_REQUEST {
            return Err(ApiError::InvalidRequest(format!(
                "count {} exceeds maximum of {}",
                count, MAX_PROFILES_PER_REQUEST
            )));
        }

        let response = self
            .client
            .get(&*self.base_url)
            .header(header::ACCEPT, "application/json")
            .query(&[("results", count.to_string())])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        let parsed: ProfilesResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Failed to parse profiles response");
            ApiError::InvalidResponse(format!("{}: {}", e, ApiError::truncate_body(&text)))
        })?;

        if parsed.results.len() != count {
            return Err(ApiError::CountMismatch {
                requested: count,
                received: parsed.results.len(),
            });
        }

        debug!(count, "Profiles fetched");
        Ok(parsed.results)
    }
}

impl ProfileSource for ApiClient {
    async fn fetch_profiles(&self, count: usize) -> Result<Vec<Profile>, ApiError> {
        ApiClient::fetch_profiles(self, count).await
    }
}
