use std::sync::Arc;

use thiserror::Error;

use crate::api::ApiError;
use crate::store::StoreError;

/// Errors surfaced by the cache, favorites and gallery components.
///
/// Cloneable so that every caller coalesced onto one in-flight fetch can be
/// handed the same outcome.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Failed to fetch profiles: {0}")]
    FetchFailed(Arc<ApiError>),

    #[error("Persisted data under '{key}' is malformed: {reason}")]
    PersistenceReadMalformed { key: String, reason: String },

    #[error("Failed to persist '{key}': {source}")]
    PersistenceWriteFailed {
        key: String,
        #[source]
        source: Arc<StoreError>,
    },
}

impl From<ApiError> for CoreError {
    fn from(e: ApiError) -> Self {
        CoreError::FetchFailed(Arc::new(e))
    }
}

impl CoreError {
    pub(crate) fn write_failed(key: &str, source: StoreError) -> Self {
        CoreError::PersistenceWriteFailed {
            key: key.to_string(),
            source: Arc::new(source),
        }
    }

    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, CoreError::FetchFailed(_))
    }

    /// Short message suitable for a status bar or error screen.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::FetchFailed(e) => match e.as_ref() {
                ApiError::NetworkError(inner) if inner.is_timeout() => {
                    "Connection timed out. Please try again.".to_string()
                }
                ApiError::NetworkError(inner) if inner.is_connect() => {
                    "Unable to connect to server. Check your internet connection.".to_string()
                }
                ApiError::RateLimited => "Too many requests - wait a moment and retry.".to_string(),
                _ => "Failed to fetch user data".to_string(),
            },
            CoreError::PersistenceReadMalformed { .. } => "Saved data was unreadable".to_string(),
            CoreError::PersistenceWriteFailed { key, .. } => format!("Could not save {}", key),
        }
    }
}
