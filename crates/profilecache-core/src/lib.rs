//! Core library for profilecache.
//!
//! This crate holds everything below the rendering layer:
//!
//! - `api`: the `ProfileSource` contract and the HTTP `ApiClient`
//! - `models`: the `Profile` value and its nested wire types
//! - `store`: the `PersistentStore` contract with file and in-memory backends
//! - `cache`: the single current-profile slot with stale-while-revalidate
//! - `favorites`: the persisted, deduplicated favorites set
//! - `gallery`: transient 5 and 12 item profile collections
//! - `view`: the backdrop/modal view state machine
//! - `controller`: the top-level owner that ties the above together

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod gallery;
pub mod models;
pub mod store;
pub mod utils;
pub mod view;

pub use api::{ApiClient, ApiError, ProfileSource};
pub use cache::{CacheEntry, ProfileCache};
pub use config::Config;
pub use controller::{ProfileController, Snapshot};
pub use error::CoreError;
pub use favorites::FavoritesRegistry;
pub use gallery::{GalleryFetcher, GalleryKind, GallerySlot};
pub use models::{Coordinates, GeoPoint, Profile, ProfileTheme};
pub use store::{FileStore, MemoryStore, PersistentStore, StoreError};
pub use view::{Backdrop, Transition, ViewController};
