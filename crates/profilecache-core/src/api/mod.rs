//! Remote profile source module.
//!
//! This module defines the `ProfileSource` contract consumed by the cache
//! and gallery components, and provides `ApiClient`, an HTTP implementation
//! speaking the randomuser.me wire format.

pub mod client;
pub mod error;

use std::future::Future;

pub use client::ApiClient;
pub use error::ApiError;

use crate::models::Profile;

/// Anything that can hand out freshly generated profiles.
///
/// One call returns exactly `count` profiles or an error; implementations do
/// no caching of their own.
pub trait ProfileSource: Send + Sync + 'static {
    fn fetch_profiles(
        &self,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Profile>, ApiError>> + Send;
}
