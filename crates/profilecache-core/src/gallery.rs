//! Multi-profile galleries.
//!
//! Galleries are transient: every fetch asks the source for a fresh batch,
//! nothing is cached or persisted, and each call site owns its own
//! `GallerySlot` which is replaced wholesale on success.

use tracing::{debug, warn};

use crate::api::{ApiError, ProfileSource};
use crate::error::CoreError;
use crate::models::Profile;

/// The two gallery call sites and their fixed batch sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryKind {
    /// The rotating carousel
    Rotating,
    /// The bulk grid
    Bulk,
}

impl GalleryKind {
    pub const ALL: [GalleryKind; 2] = [GalleryKind::Rotating, GalleryKind::Bulk];

    pub const fn count(self) -> usize {
        match self {
            GalleryKind::Rotating => 5,
            GalleryKind::Bulk => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GalleryKind::Rotating => "Gallery",
            GalleryKind::Bulk => "Bulk Profiles",
        }
    }
}

#[derive(Clone)]
pub struct GalleryFetcher<S> {
    source: S,
}

impl<S: ProfileSource> GalleryFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch exactly `count` profiles in one request.
    pub async fn fetch_gallery(&self, count: usize) -> Result<Vec<Profile>, CoreError> {
        let profiles = self.source.fetch_profiles(count).await?;
        if profiles.len() != count {
            warn!(requested = count, received = profiles.len(), "Gallery size mismatch");
            return Err(ApiError::CountMismatch {
                requested: count,
                received: profiles.len(),
            }
            .into());
        }
        debug!(count, "Gallery fetched");
        Ok(profiles)
    }

    pub async fn fetch_kind(&self, kind: GalleryKind) -> Result<Vec<Profile>, CoreError> {
        self.fetch_gallery(kind.count()).await
    }
}

/// The collection owned by one gallery call site.
///
/// Each fetch is tagged with a request id; only the result for the pending
/// id is applied, so results from cancelled or superseded requests are
/// dropped.
#[derive(Debug)]
pub struct GallerySlot {
    kind: GalleryKind,
    profiles: Vec<Profile>,
    last_error: Option<CoreError>,
    pending: Option<u64>,
    next_request: u64,
}

impl GallerySlot {
    pub fn new(kind: GalleryKind) -> Self {
        Self {
            kind,
            profiles: Vec::new(),
            last_error: None,
            pending: None,
            next_request: 0,
        }
    }

    pub fn kind(&self) -> GalleryKind {
        self.kind
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn last_error(&self) -> Option<&CoreError> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a new request, superseding any pending one.
    pub fn begin_request(&mut self) -> u64 {
        self.next_request += 1;
        self.pending = Some(self.next_request);
        self.next_request
    }

    /// Forget the pending request. Returns whether one was outstanding.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Apply the result of request `request_id`.
    ///
    /// Returns `None` when the request is no longer pending (the result is
    /// ignored). On failure the previous collection is kept.
    pub fn apply(
        &mut self,
        request_id: u64,
        result: Result<Vec<Profile>, CoreError>,
    ) -> Option<Result<(), CoreError>> {
        if self.pending != Some(request_id) {
            debug!(kind = ?self.kind, request_id, "Ignoring stale gallery result");
            return None;
        }
        self.pending = None;

        Some(match result {
            Ok(profiles) => {
                self.profiles = profiles;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                Err(e)
            }
        })
    }
}
