use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ProfileSource};
use crate::error::CoreError;
use crate::models::Profile;
use crate::store::{load_json, save_json, PersistentStore, CURRENT_PROFILE_KEY};

/// A stored profile is served without a blocking fetch for 5 minutes.
pub const DEFAULT_FRESHNESS_MINUTES: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub profile: Profile,
    #[serde(rename = "fetchedAtEpochMillis", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            fetched_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    pub fn age_minutes(&self) -> i64 {
        self.age().num_minutes()
    }

    /// Entries dated in the future (clock skew) count as fresh.
    pub fn is_fresh(&self, window: Duration) -> bool {
        self.age() < window
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Profile, CoreError>>>;

/// The cache slot. `entry_seq` is the issue sequence of the fetch that
/// produced `entry` (0 for an entry loaded from the store).
struct Slot {
    entry: Option<CacheEntry>,
    entry_seq: u64,
    in_flight: Option<(u64, SharedFetch)>,
}

struct Inner<S, P> {
    source: S,
    store: Arc<P>,
    slot: Mutex<Slot>,
    next_seq: AtomicU64,
    freshness: Duration,
    current_tx: watch::Sender<Option<Profile>>,
}

/// Owner of the current-profile slot.
/// Clone is cheap - all clones share one slot.
pub struct ProfileCache<S, P> {
    inner: Arc<Inner<S, P>>,
}

impl<S, P> Clone for ProfileCache<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ProfileSource, P: PersistentStore> ProfileCache<S, P> {
    pub fn new(source: S, store: Arc<P>) -> Self {
        Self::with_freshness(source, store, Duration::minutes(DEFAULT_FRESHNESS_MINUTES))
    }

    /// Create a cache with a custom freshness window, loading any persisted entry.
    pub fn with_freshness(source: S, store: Arc<P>, freshness: Duration) -> Self {
        let entry = match load_json::<CacheEntry, _>(store.as_ref(), CURRENT_PROFILE_KEY) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cached profile");
                None
            }
        };
        debug!(
            cached = entry.is_some(),
            freshness_minutes = freshness.num_minutes(),
            "Profile cache loaded"
        );

        let (current_tx, _) = watch::channel(entry.as_ref().map(|e| e.profile.clone()));

        Self {
            inner: Arc::new(Inner {
                source,
                store,
                slot: Mutex::new(Slot {
                    entry,
                    entry_seq: 0,
                    in_flight: None,
                }),
                next_seq: AtomicU64::new(1),
                freshness,
                current_tx,
            }),
        }
    }

    pub fn freshness(&self) -> Duration {
        self.inner.freshness
    }

    /// The stored profile, fresh or not. Never triggers a fetch.
    pub fn peek(&self) -> Option<Profile> {
        self.inner.lock_slot().entry.as_ref().map(|e| e.profile.clone())
    }

    pub fn entry(&self) -> Option<CacheEntry> {
        self.inner.lock_slot().entry.clone()
    }

    /// Observe the current profile, including silent background replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.inner.current_tx.subscribe()
    }

    /// Return the freshest available profile.
    ///
    /// A fresh entry is returned at once and a background refresh is
    /// spawned. Otherwise the caller waits for a foreground fetch; callers
    /// arriving while one is in flight join it instead of issuing another.
    pub async fn get_current_profile(&self) -> Result<Profile, CoreError> {
        let fetch = {
            let mut slot = self.inner.lock_slot();

            let fresh = slot
                .entry
                .as_ref()
                .filter(|e| e.is_fresh(self.inner.freshness))
                .map(|e| e.profile.clone());

            if let Some(profile) = fresh {
                drop(slot);
                debug!(username = profile.username(), "Serving fresh cached profile");
                self.revalidate();
                return Ok(profile);
            }

            let joined = slot
                .in_flight
                .as_ref()
                .map(|(seq, fetch)| (*seq, fetch.clone()));

            match joined {
                Some((seq, fetch)) => {
                    debug!(seq, "Joining in-flight profile fetch");
                    fetch
                }
                None => {
                    let seq = self.inner.issue_seq();
                    debug!(seq, "Starting foreground profile fetch");
                    let fetch = Inner::foreground_fetch(Arc::clone(&self.inner), seq)
                        .boxed()
                        .shared();
                    slot.in_flight = Some((seq, fetch.clone()));
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Spawn a background refresh of the slot. Failures are logged and the
    /// stored entry is kept.
    pub fn revalidate(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let seq = inner.issue_seq();
        debug!(seq, "Starting background profile refresh");

        tokio::spawn(async move {
            match inner.fetch_one().await {
                Ok(profile) => {
                    // Write failures are logged by apply
                    let _ = inner.apply(seq, profile);
                }
                Err(e) => {
                    warn!(seq, error = %e, "Background profile refresh failed");
                }
            }
        })
    }
}

impl<S: ProfileSource, P: PersistentStore> Inner<S, P> {
    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        // Slot updates are single assignments; a poisoned lock still holds a consistent slot
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn issue_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst)
    }

    async fn fetch_one(&self) -> Result<Profile, CoreError> {
        let mut profiles = self.source.fetch_profiles(1).await?;
        let received = profiles.len();
        match profiles.pop() {
            Some(profile) if received == 1 => Ok(profile),
            _ => Err(ApiError::CountMismatch {
                requested: 1,
                received,
            }
            .into()),
        }
    }

    async fn foreground_fetch(inner: Arc<Self>, seq: u64) -> Result<Profile, CoreError> {
        let outcome = match inner.fetch_one().await {
            Ok(profile) => inner.apply(seq, profile),
            Err(e) => {
                warn!(seq, error = %e, "Profile fetch failed, keeping stored entry");
                Err(e)
            }
        };

        let mut slot = inner.lock_slot();
        if matches!(slot.in_flight, Some((in_flight_seq, _)) if in_flight_seq == seq) {
            slot.in_flight = None;
        }

        outcome
    }

    /// Store a completed fetch unless a newer one already landed, then
    /// notify observers. Returns the profile now held by the slot.
    ///
    /// The slot only changes after the entry is persisted; on a write
    /// failure observers are not notified and the error is returned.
    fn apply(&self, seq: u64, profile: Profile) -> Result<Profile, CoreError> {
        let mut slot = self.lock_slot();

        if seq < slot.entry_seq {
            debug!(
                seq,
                stored_seq = slot.entry_seq,
                "Discarding profile fetch older than stored entry"
            );
            return Ok(slot
                .entry
                .as_ref()
                .map(|e| e.profile.clone())
                .unwrap_or(profile));
        }

        let entry = CacheEntry::new(profile);
        if let Err(e) = save_json(self.store.as_ref(), CURRENT_PROFILE_KEY, &entry) {
            warn!(seq, error = %e, "Failed to persist current profile, keeping stored entry");
            return Err(e);
        }

        let profile = entry.profile.clone();
        info!(seq, username = profile.username(), "Current profile updated");
        slot.entry = Some(entry);
        slot.entry_seq = seq;
        // Notify under the lock so observers see updates in slot order
        self.current_tx.send_replace(Some(profile.clone()));

        Ok(profile)
    }
}

// ============================================================================
// Tests
// ============================================================================
