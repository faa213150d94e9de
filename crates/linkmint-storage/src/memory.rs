use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use linkmint_core::store::Result;
use linkmint_core::{Link, LinkStore, NewLink, ShortCode, StorageError};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// In-memory implementation of [`LinkStore`] using DashMap.
///
/// Links are indexed twice: by short code (primary) and by original URL.
/// Both indexes are unique. `create` holds the URL slot and then the code slot
/// before writing, always in that order, so two concurrent creates can never
/// both claim the same code or the same URL.
#[derive(Debug)]
pub struct InMemoryLinkStore {
    by_code: DashMap<String, Link>,
    by_url: DashMap<String, String>,
    next_id: AtomicU64,
}

impl InMemoryLinkStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new store with room for `capacity` links.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_code: DashMap::with_capacity(capacity),
            by_url: DashMap::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl Default for InMemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>> {
        // Clone the code out so the URL shard lock is released before the code lookup.
        let Some(code) = self.by_url.get(url).map(|code| code.clone()) else {
            return Ok(None);
        };

        Ok(self.by_code.get(&code).map(|link| link.clone()))
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Link>> {
        Ok(self.by_code.get(code.as_str()).map(|link| link.clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.by_code.contains_key(code.as_str()))
    }

    async fn create(&self, link: NewLink) -> Result<Link> {
        let url_slot = match self.by_url.entry(link.original_url.clone()) {
            Entry::Occupied(_) => return Err(StorageError::UrlConflict(link.original_url)),
            Entry::Vacant(slot) => slot,
        };

        let code_slot = match self.by_code.entry(link.short_code.to_string()) {
            Entry::Occupied(_) => return Err(StorageError::CodeConflict(link.short_code.into())),
            Entry::Vacant(slot) => slot,
        };

        let created = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            original_url: link.original_url,
            short_code: link.short_code,
            created_at: Timestamp::now(),
        };

        code_slot.insert(created.clone());
        url_slot.insert(created.short_code.to_string());

        trace!(code = %created.short_code, id = created.id, "stored link in memory");
        Ok(created)
    }

    async fn list(&self, limit: usize) -> Result<Vec<Link>> {
        let mut links: Vec<Link> = self.by_code.iter().map(|entry| entry.clone()).collect();
        links.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        links.truncate(limit);
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_link(url: &str, code: &str) -> NewLink {
        NewLink {
            original_url: url.to_string(),
            short_code: ShortCode::new_unchecked(code),
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let store = InMemoryLinkStore::new();

        let created = store
            .create(new_link("https://example.com/", "abc123"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let by_code = store
            .find_by_code(&ShortCode::new_unchecked("abc123"))
            .await
            .unwrap()
            .unwrap();
        let by_url = store
            .find_by_url("https://example.com/")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(by_code, created);
        assert_eq!(by_url, created);
    }

    #[tokio::test]
    async fn find_missing() {
        let store = InMemoryLinkStore::new();

        assert!(store.find_by_url("https://nope.example/").await.unwrap().is_none());
        assert!(store
            .find_by_code(&ShortCode::new_unchecked("nope"))
            .await
            .unwrap()
            .is_none());
        assert!(!store.exists(&ShortCode::new_unchecked("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_code_conflicts() {
        let store = InMemoryLinkStore::new();
        store
            .create(new_link("https://one.example/", "abc123"))
            .await
            .unwrap();

        let err = store
            .create(new_link("https://two.example/", "abc123"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::CodeConflict(code) if code == "abc123"));
        // The losing URL must not have been indexed.
        assert!(store.find_by_url("https://two.example/").await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_url_conflicts() {
        let store = InMemoryLinkStore::new();
        store
            .create(new_link("https://one.example/", "abc123"))
            .await
            .unwrap();

        let err = store
            .create(new_link("https://one.example/", "xyz789"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UrlConflict(_)));
        assert!(!store.exists(&ShortCode::new_unchecked("xyz789")).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let store = InMemoryLinkStore::new();
        for i in 0..5 {
            store
                .create(new_link(&format!("https://example{i}.com/"), &format!("code{i}")))
                .await
                .unwrap();
        }

        let links = store.list(3).await.unwrap();
        let codes: Vec<&str> = links.iter().map(|l| l.short_code.as_str()).collect();
        assert_eq!(codes, vec!["code4", "code3", "code2"]);
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_code_have_one_winner() {
        let store = Arc::new(InMemoryLinkStore::new());
        let mut handles = vec![];

        for i in 0..16u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create(new_link(&format!("https://example{i}.com/"), "same01"))
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(matches!(e, StorageError::CodeConflict(_))),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = Arc::new(InMemoryLinkStore::new());
        let mut handles = vec![];

        for i in 0..32u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create(new_link(&format!("https://example{i}.com/"), &format!("c{i:03}")))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(ids.len(), 32);
    }
}
