//! Application state for the terminal front-end.
//!
//! `App` wraps the core `ProfileController` and adds what only the terminal
//! needs: the overlay state (help, quit confirmation) and the list selection
//! for whichever backdrop is showing.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use profilecache_core::{
    ApiClient, Backdrop, Config, FileStore, GalleryKind, MemoryStore, PersistentStore, Profile,
    ProfileController, Snapshot, StoreError,
};

// ============================================================================
// Store selection
// ============================================================================

/// The store backing a run: on disk normally, in memory with `--ephemeral`.
pub enum AppStore {
    File(FileStore),
    Memory(MemoryStore),
}

impl AppStore {
    /// Open the on-disk store in the configured cache directory.
    pub fn open(config: &Config) -> Result<Self> {
        let dir = config.cache_dir()?;
        let store = FileStore::new(dir.clone())
            .with_context(|| format!("Failed to open store at {}", dir.display()))?;
        Ok(AppStore::File(store))
    }

    pub fn ephemeral() -> Self {
        AppStore::Memory(MemoryStore::new())
    }
}

impl PersistentStore for AppStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            AppStore::File(s) => s.get(key),
            AppStore::Memory(s) => s.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            AppStore::File(s) => s.set(key, value),
            AppStore::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            AppStore::File(s) => s.remove(key),
            AppStore::Memory(s) => s.remove(key),
        }
    }
}

pub type Controller = ProfileController<ApiClient, AppStore>;

// ============================================================================
// App
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

pub struct App {
    pub state: AppState,
    pub selection: usize,
    controller: Controller,
}

impl App {
    pub fn new(config: &Config, store: AppStore) -> Result<Self> {
        let client = ApiClient::from_config(config).context("Failed to create API client")?;
        info!(base_url = client.base_url(), "Using profile service");

        Ok(Self {
            state: AppState::Normal,
            selection: 0,
            controller: ProfileController::new(client, Arc::new(store), config.freshness()),
        })
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.controller.snapshot()
    }

    pub fn start(&mut self) {
        self.controller.start();
    }

    pub fn generate_profile(&mut self) {
        self.controller.clear_status();
        self.controller.generate_profile();
    }

    /// Apply finished background work and keep the selection in range.
    pub fn check_background_tasks(&mut self) {
        self.controller.check_background_tasks();
        self.clamp_selection();
    }

    // ========================================================================
    // Backdrops and the modal
    // ========================================================================

    pub fn toggle_backdrop(&mut self, backdrop: Backdrop) {
        self.controller.toggle_backdrop(backdrop);
        self.selection = 0;
    }

    pub fn close_backdrop(&mut self) {
        self.controller.close_backdrop();
        self.selection = 0;
    }

    /// Re-fetch the gallery being shown, if any.
    pub fn refresh_gallery(&mut self) {
        let kind = match self.controller.backdrop() {
            Backdrop::Gallery => GalleryKind::Rotating,
            Backdrop::BulkProfiles => GalleryKind::Bulk,
            _ => return,
        };
        self.controller.refresh_gallery(kind);
        self.selection = 0;
    }

    pub fn is_modal_open(&self) -> bool {
        self.snapshot().modal.is_some()
    }

    pub fn open_selected(&mut self) {
        if let Some(profile) = self.selected_profile() {
            self.controller.open_profile(profile);
        }
    }

    pub fn close_modal(&mut self) {
        self.controller.close_profile();
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub fn toggle_current_favorite(&mut self) {
        // Failures land in the status message
        if let Err(e) = self.controller.toggle_current_favorite() {
            debug!(error = %e, "Favorite toggle failed");
        }
    }

    pub fn toggle_selected_favorite(&mut self) {
        if let Some(profile) = self.selected_profile() {
            self.toggle_favorite(&profile);
        }
    }

    pub fn toggle_modal_favorite(&mut self) {
        if let Some(profile) = self.snapshot().modal.cloned() {
            self.toggle_favorite(&profile);
        }
    }

    fn toggle_favorite(&mut self, profile: &Profile) {
        if let Err(e) = self.controller.toggle_favorite(profile) {
            debug!(error = %e, "Favorite toggle failed");
        }
        self.clamp_selection();
    }

    // ========================================================================
    // Selection
    // ========================================================================

    fn list_len(&self) -> usize {
        self.snapshot().active_list().len()
    }

    pub fn selected_profile(&self) -> Option<Profile> {
        self.snapshot().active_list().get(self.selection).cloned()
    }

    pub fn select_next(&mut self) {
        let len = self.list_len();
        if len > 0 && self.selection + 1 < len {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selection >= len {
            self.selection = len.saturating_sub(1);
        }
    }
}
