//! Current-profile caching.
//!
//! This module provides the `ProfileCache`, which owns the single "current
//! profile" slot. A stored entry is fresh for 5 minutes by default: fresh
//! entries are served immediately while a background refresh replaces them
//! (stale-while-revalidate); stale or missing entries are fetched in the
//! foreground, with concurrent callers sharing one request.

pub mod manager;

pub use manager::{CacheEntry, ProfileCache, DEFAULT_FRESHNESS_MINUTES};
