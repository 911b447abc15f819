//! Favorited profiles, persisted across sessions.
//!
//! The registry keeps favorites in insertion order, unique by username, and
//! writes the whole set on every change. A failed write rolls the in-memory
//! change back so memory and storage never disagree.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::models::Profile;
use crate::store::{load_json, save_json, PersistentStore, FAVORITES_KEY};

pub struct FavoritesRegistry<P> {
    store: Arc<P>,
    favorites: Vec<Profile>,
}

impl<P: PersistentStore> FavoritesRegistry<P> {
    /// Load the persisted set. Missing or malformed data yields an empty set;
    /// duplicate usernames in stored data keep their first occurrence.
    pub fn load(store: Arc<P>) -> Self {
        let stored: Vec<Profile> = match load_json(store.as_ref(), FAVORITES_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable favorites");
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let favorites: Vec<Profile> = stored
            .into_iter()
            .filter(|p| seen.insert(p.username().to_string()))
            .collect();

        debug!(count = favorites.len(), "Favorites loaded");
        Self { store, favorites }
    }

    pub fn favorites(&self) -> &[Profile] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.favorites.get(index)
    }

    pub fn is_favorite(&self, profile: &Profile) -> bool {
        self.position(profile).is_some()
    }

    /// Remove the profile if present (by username), append it otherwise, and
    /// persist the resulting set in one write.
    pub fn toggle_favorite(&mut self, profile: &Profile) -> Result<&[Profile], CoreError> {
        let undo = match self.position(profile) {
            Some(index) => Undo::Reinsert(index, self.favorites.remove(index)),
            None => {
                self.favorites.push(profile.clone());
                Undo::Pop
            }
        };

        if let Err(e) = save_json(self.store.as_ref(), FAVORITES_KEY, &self.favorites) {
            warn!(error = %e, username = profile.username(), "Failed to persist favorites, rolling back");
            match undo {
                Undo::Reinsert(index, removed) => self.favorites.insert(index, removed),
                Undo::Pop => {
                    self.favorites.pop();
                }
            }
            return Err(e);
        }

        info!(
            username = profile.username(),
            favorite = !matches!(undo, Undo::Reinsert(..)),
            count = self.favorites.len(),
            "Favorites updated"
        );
        Ok(&self.favorites)
    }

    fn position(&self, profile: &Profile) -> Option<usize> {
        self.favorites
            .iter()
            .position(|f| f.username() == profile.username())
    }
}

enum Undo {
    Reinsert(usize, Profile),
    Pop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::profile;
    use crate::store::MemoryStore;

    fn usernames(profiles: &[Profile]) -> Vec<&str> {
        profiles.iter().map(|p| p.username()).collect()
    }

    fn persisted(store: &MemoryStore) -> Vec<String> {
        load_json::<Vec<Profile>, _>(store, FAVORITES_KEY)
            .unwrap()
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.login.username)
            .collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = Arc::new(MemoryStore::new());
        let mut registry = FavoritesRegistry::load(Arc::clone(&store));
        let abc = profile("abc");

        assert!(registry.is_empty());
        assert_eq!(usernames(registry.toggle_favorite(&abc).unwrap()), vec!["abc"]);
        assert!(registry.is_favorite(&abc));
        assert_eq!(persisted(&store), vec!["abc"]);

        assert!(registry.toggle_favorite(&abc).unwrap().is_empty());
        assert!(!registry.is_favorite(&abc));
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_remove_matches_by_username_only() {
        let store = Arc::new(MemoryStore::new());
        let mut registry = FavoritesRegistry::load(store);
        registry.toggle_favorite(&profile("abc")).unwrap();

        let mut regenerated = profile("abc");
        regenerated.email = "changed@example.com".to_string();
        assert!(registry.is_favorite(&regenerated));
        registry.toggle_favorite(&regenerated).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insertion_order_and_uniqueness() {
        let store = Arc::new(MemoryStore::new());
        let mut registry = FavoritesRegistry::load(store);
        let sequence = ["a", "b", "c", "b", "d", "a", "b"];
        for name in sequence {
            registry.toggle_favorite(&profile(name)).unwrap();
            let mut seen = HashSet::new();
            assert!(registry.favorites().iter().all(|p| seen.insert(p.username())));
        }
        // a: in,out  b: in,out,in  c: in  d: in
        assert_eq!(usernames(registry.favorites()), vec!["c", "d", "b"]);
    }

    #[test]
    fn test_reload_preserves_order() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut registry = FavoritesRegistry::load(Arc::clone(&store));
            for name in ["z", "m", "a"] {
                registry.toggle_favorite(&profile(name)).unwrap();
            }
        }
        let reloaded = FavoritesRegistry::load(store);
        assert_eq!(usernames(reloaded.favorites()), vec!["z", "m", "a"]);
        assert_eq!(reloaded.get(1).map(|p| p.username()), Some("m"));
    }

    #[test]
    fn test_malformed_storage_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(FAVORITES_KEY, "not json at all").unwrap();
        let registry = FavoritesRegistry::load(store);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicates_in_storage_are_dropped() {
        let store = Arc::new(MemoryStore::new());
        save_json(
            store.as_ref(),
            FAVORITES_KEY,
            &vec![profile("a"), profile("b"), profile("a")],
        )
        .unwrap();
        let registry = FavoritesRegistry::load(store);
        assert_eq!(usernames(registry.favorites()), vec!["a", "b"]);
    }

    #[test]
    fn test_write_failure_rolls_back_add() {
        let store = Arc::new(MemoryStore::new());
        let mut registry = FavoritesRegistry::load(Arc::clone(&store));
        registry.toggle_favorite(&profile("keep")).unwrap();

        store.fail_writes(true);
        let result = registry.toggle_favorite(&profile("new"));
        assert!(matches!(result, Err(CoreError::PersistenceWriteFailed { .. })));
        assert_eq!(usernames(registry.favorites()), vec!["keep"]);
        assert_eq!(persisted(&store), vec!["keep"]);
    }

    #[test]
    fn test_write_failure_rolls_back_remove_in_place() {
        let store = Arc::new(MemoryStore::new());
        let mut registry = FavoritesRegistry::load(Arc::clone(&store));
        for name in ["a", "b", "c"] {
            registry.toggle_favorite(&profile(name)).unwrap();
        }

        store.fail_writes(true);
        assert!(registry.toggle_favorite(&profile("b")).is_err());
        assert_eq!(usernames(registry.favorites()), vec!["a", "b", "c"]);
        assert_eq!(persisted(&store), vec!["a", "b", "c"]);
    }
}
