//! Session-level state owner.
//!
//! `ProfileController` owns the cache, favorites, both gallery slots and the
//! view state for one session. It is mutated only from the UI loop: network
//! work runs in spawned tasks whose results come back over an mpsc channel
//! and are applied by `check_background_tasks` in completion order.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::ProfileSource;
use crate::cache::ProfileCache;
use crate::error::CoreError;
use crate::favorites::FavoritesRegistry;
use crate::gallery::{GalleryFetcher, GalleryKind, GallerySlot};
use crate::models::Profile;
use crate::store::PersistentStore;
use crate::view::{Backdrop, Transition, ViewController};

/// Channel buffer size for background task results
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Results sent back from spawned tasks.
enum RefreshResult {
    /// Outcome of `get_current_profile`
    Profile(Result<Profile, CoreError>),
    /// Outcome of one gallery request
    Gallery {
        kind: GalleryKind,
        request_id: u64,
        result: Result<Vec<Profile>, CoreError>,
    },
}

/// Borrowed view of the session for the rendering layer.
pub struct Snapshot<'a> {
    pub current: Option<&'a Profile>,
    pub current_is_favorite: bool,
    /// Age of the cached entry backing `current`, e.g. "3m ago"
    pub cached_age: Option<String>,
    pub favorites: &'a [Profile],
    pub rotating: &'a GallerySlot,
    pub bulk: &'a GallerySlot,
    pub backdrop: Backdrop,
    pub modal: Option<&'a Profile>,
    pub loading: bool,
    /// Set only when there is no profile to show
    pub error: Option<&'a CoreError>,
    pub status_message: Option<&'a str>,
}

impl<'a> Snapshot<'a> {
    pub fn is_favorite(&self, profile: &Profile) -> bool {
        self.favorites.iter().any(|f| f.username() == profile.username())
    }

    /// The selectable list shown by the active backdrop, if it has one.
    pub fn active_list(&self) -> &'a [Profile] {
        match self.backdrop {
            Backdrop::Favorites => self.favorites,
            Backdrop::Gallery => self.rotating.profiles(),
            Backdrop::BulkProfiles => self.bulk.profiles(),
            Backdrop::None | Backdrop::Details => &[],
        }
    }
}

pub struct ProfileController<S, P> {
    cache: ProfileCache<S, P>,
    favorites: FavoritesRegistry<P>,
    fetcher: GalleryFetcher<S>,
    rotating: GallerySlot,
    bulk: GallerySlot,
    rotating_task: Option<JoinHandle<()>>,
    bulk_task: Option<JoinHandle<()>>,
    view: ViewController,

    current: Option<Profile>,
    loading: bool,
    error: Option<CoreError>,
    status_message: Option<String>,

    current_rx: watch::Receiver<Option<Profile>>,
    refresh_tx: mpsc::Sender<RefreshResult>,
    refresh_rx: mpsc::Receiver<RefreshResult>,
}

impl<S, P> ProfileController<S, P>
where
    S: ProfileSource + Clone,
    P: PersistentStore,
{
    pub fn new(source: S, store: Arc<P>, freshness: chrono::Duration) -> Self {
        let cache = ProfileCache::with_freshness(source.clone(), Arc::clone(&store), freshness);
        let favorites = FavoritesRegistry::load(store);
        let current_rx = cache.subscribe();
        let (refresh_tx, refresh_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            cache,
            favorites,
            fetcher: GalleryFetcher::new(source),
            rotating: GallerySlot::new(GalleryKind::Rotating),
            bulk: GallerySlot::new(GalleryKind::Bulk),
            rotating_task: None,
            bulk_task: None,
            view: ViewController::new(),
            current: None,
            loading: false,
            error: None,
            status_message: None,
            current_rx,
            refresh_tx,
            refresh_rx,
        }
    }

    pub fn cache(&self) -> &ProfileCache<S, P> {
        &self.cache
    }

    pub fn favorites(&self) -> &FavoritesRegistry<P> {
        &self.favorites
    }

    pub fn current(&self) -> Option<&Profile> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn backdrop(&self) -> Backdrop {
        self.view.backdrop()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    // ========================================================================
    // Current profile
    // ========================================================================

    /// Load the current profile in the background.
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;

        let cache = self.cache.clone();
        let tx = self.refresh_tx.clone();
        tokio::spawn(async move {
            let result = cache.get_current_profile().await;
            Self::send_result(&tx, RefreshResult::Profile(result)).await;
        });
    }

    /// Ask for a new profile. A fresh cached profile is shown immediately and
    /// replaced once the background refresh lands.
    pub fn generate_profile(&mut self) {
        info!("Generating profile");
        self.start();
    }

    // ========================================================================
    // View transitions
    // ========================================================================

    pub fn open_backdrop(&mut self, backdrop: Backdrop) {
        let transition = self.view.open(backdrop);
        self.on_transition(transition);
    }

    pub fn toggle_backdrop(&mut self, backdrop: Backdrop) {
        let transition = self.view.toggle(backdrop);
        self.on_transition(transition);
    }

    pub fn close_backdrop(&mut self) {
        let transition = self.view.close_backdrop();
        self.on_transition(transition);
    }

    pub fn open_profile(&mut self, profile: Profile) {
        debug!(username = profile.username(), "Opening profile modal");
        self.view.open_modal(profile);
    }

    pub fn close_profile(&mut self) {
        self.view.close_modal();
    }

    fn on_transition(&mut self, transition: Transition) {
        if !transition.is_change() {
            return;
        }
        debug!(from = ?transition.from, to = ?transition.to, "Backdrop changed");

        if let Some(kind) = gallery_for(transition.from) {
            self.cancel_gallery(kind);
        }
        if let Some(kind) = gallery_for(transition.to) {
            self.refresh_gallery(kind);
        }
    }

    // ========================================================================
    // Galleries
    // ========================================================================

    /// Fetch a new batch for `kind`, superseding any outstanding request.
    pub fn refresh_gallery(&mut self, kind: GalleryKind) {
        if let Some(task) = self.gallery_task(kind).take() {
            task.abort();
        }
        let request_id = self.slot_mut(kind).begin_request();
        debug!(?kind, request_id, "Starting gallery fetch");

        let fetcher = self.fetcher.clone();
        let tx = self.refresh_tx.clone();
        let task = tokio::spawn(async move {
            let result = fetcher.fetch_kind(kind).await;
            Self::send_result(
                &tx,
                RefreshResult::Gallery {
                    kind,
                    request_id,
                    result,
                },
            )
            .await;
        });
        *self.gallery_task(kind) = Some(task);
    }

    fn cancel_gallery(&mut self, kind: GalleryKind) {
        if let Some(task) = self.gallery_task(kind).take() {
            task.abort();
        }
        if self.slot_mut(kind).cancel() {
            debug!(?kind, "Cancelled outstanding gallery fetch");
        }
    }

    pub fn gallery(&self, kind: GalleryKind) -> &GallerySlot {
        match kind {
            GalleryKind::Rotating => &self.rotating,
            GalleryKind::Bulk => &self.bulk,
        }
    }

    fn slot_mut(&mut self, kind: GalleryKind) -> &mut GallerySlot {
        match kind {
            GalleryKind::Rotating => &mut self.rotating,
            GalleryKind::Bulk => &mut self.bulk,
        }
    }

    fn gallery_task(&mut self, kind: GalleryKind) -> &mut Option<JoinHandle<()>> {
        match kind {
            GalleryKind::Rotating => &mut self.rotating_task,
            GalleryKind::Bulk => &mut self.bulk_task,
        }
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Toggle `profile` in the favorites set. Returns whether it is now a
    /// favorite. A failed write leaves the set unchanged.
    pub fn toggle_favorite(&mut self, profile: &Profile) -> Result<bool, CoreError> {
        match self.favorites.toggle_favorite(profile).map(|_| ()) {
            Ok(()) => {
                let now_favorite = self.favorites.is_favorite(profile);
                self.status_message = Some(if now_favorite {
                    format!("Added {} to favorites", profile.full_name())
                } else {
                    format!("Removed {} from favorites", profile.full_name())
                });
                Ok(now_favorite)
            }
            Err(e) => {
                self.status_message = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Toggle the current profile. `Ok(None)` when nothing is loaded.
    pub fn toggle_current_favorite(&mut self) -> Result<Option<bool>, CoreError> {
        match self.current.clone() {
            Some(profile) => self.toggle_favorite(&profile).map(Some),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Background results
    // ========================================================================

    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send background result - channel closed");
        }
    }

    /// Apply finished background work, then pick up any silent cache refresh.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.refresh_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_refresh_result(result);
        }

        if self.current_rx.has_changed().unwrap_or(false) {
            let latest = self.current_rx.borrow_and_update().clone();
            if let Some(profile) = latest {
                if self.current.as_ref().map(|p| p.username()) != Some(profile.username()) {
                    debug!(username = profile.username(), "Picked up refreshed profile");
                }
                self.show_profile(profile);
            }
        }
    }

    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Profile(Ok(profile)) => {
                self.loading = false;
                // A background refresh may have landed since this result was read
                let latest = self.cache.peek().unwrap_or(profile);
                self.show_profile(latest);
            }
            RefreshResult::Profile(Err(e)) => {
                self.loading = false;
                warn!(error = %e, "Failed to load current profile");
                if self.current.is_none() {
                    self.error = Some(e);
                } else {
                    self.status_message = Some(e.user_message());
                }
            }
            RefreshResult::Gallery {
                kind,
                request_id,
                result,
            } => match self.slot_mut(kind).apply(request_id, result) {
                None => {}
                Some(Ok(())) => {
                    *self.gallery_task(kind) = None;
                    debug!(?kind, "Gallery updated");
                }
                Some(Err(e)) => {
                    *self.gallery_task(kind) = None;
                    warn!(?kind, error = %e, "Gallery fetch failed");
                    self.status_message = Some(format!("{}: {}", kind.label(), e.user_message()));
                }
            },
        }
    }

    fn show_profile(&mut self, profile: Profile) {
        self.current = Some(profile);
        self.error = None;
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot<'_> {
        let current = self.current.as_ref();
        Snapshot {
            current,
            current_is_favorite: current.is_some_and(|p| self.favorites.is_favorite(p)),
            cached_age: self
                .cache
                .entry()
                .filter(|e| current.is_some_and(|p| p == &e.profile))
                .map(|e| e.age_display()),
            favorites: self.favorites.favorites(),
            rotating: &self.rotating,
            bulk: &self.bulk,
            backdrop: self.view.backdrop(),
            modal: self.view.modal(),
            loading: self.loading,
            error: self.error.as_ref(),
            status_message: self.status_message.as_deref(),
        }
    }
}

fn gallery_for(backdrop: Backdrop) -> Option<GalleryKind> {
    match backdrop {
        Backdrop::Gallery => Some(GalleryKind::Rotating),
        Backdrop::BulkProfiles => Some(GalleryKind::Bulk),
        _ => None,
    }
}
