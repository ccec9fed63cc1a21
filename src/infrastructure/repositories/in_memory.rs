use crate::domain::void::{
    AuthorSummary, CandidateFilter, ContentStoreGateway, IdentityResolver, Item, VoidError,
    Visibility,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Memo store held in process memory.
///
/// Behaves like the Postgres store (visibility filter, newest first,
/// exclusion push-down, limit, one suspension per fetch) and can be told
/// to fail.
pub struct InMemoryContentStore {
    memos: RwLock<Vec<(Item, Visibility)>>,
    failure: RwLock<Option<VoidError>>,
    honor_exclusions: bool,
    fetches: AtomicUsize,
    last_filter: RwLock<Option<CandidateFilter>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            memos: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
            honor_exclusions: true,
            fetches: AtomicUsize::new(0),
            last_filter: RwLock::new(None),
        }
    }

    /// A store that always answers with the newest memos, even when asked
    /// to exclude some of them
    pub fn ignoring_exclusions() -> Self {
        Self {
            honor_exclusions: false,
            ..Self::new()
        }
    }

    pub fn with_items(self, items: impl IntoIterator<Item = Item>) -> Self {
        for item in items {
            self.insert(item);
        }
        self
    }

    pub fn insert(&self, item: Item) {
        self.insert_with_visibility(item, Visibility::Public);
    }

    pub fn insert_with_visibility(&self, item: Item, visibility: Visibility) {
        self.memos.write().push((item, visibility));
    }

    /// Make every following call fail with `error`, or succeed again with `None`
    pub fn fail_with(&self, error: Option<VoidError>) {
        *self.failure.write() = error;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn last_filter(&self) -> Option<CandidateFilter> {
        self.last_filter.read().clone()
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStoreGateway for InMemoryContentStore {
    async fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Item>, VoidError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_filter.write() = Some(filter.clone());
        // suspend once like a network round trip would
        tokio::task::yield_now().await;

        if let Some(err) = self.failure.read().clone() {
            return Err(err);
        }
        if filter.max_count == 0 {
            return Err(VoidError::StoreQuery("max_count must be positive".to_string()));
        }

        let excluded: HashSet<&String> = if self.honor_exclusions {
            filter.exclude_ids.iter().collect()
        } else {
            HashSet::new()
        };

        let mut candidates: Vec<Item> = self
            .memos
            .read()
            .iter()
            .filter(|(item, visibility)| {
                *visibility == filter.visibility && !excluded.contains(&item.id)
            })
            .map(|(item, _)| item.clone())
            .collect();

        candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        candidates.truncate(filter.max_count);

        Ok(candidates)
    }

    async fn ping(&self) -> Result<(), VoidError> {
        match self.failure.read().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Author directory held in process memory
pub struct InMemoryProfileDirectory {
    profiles: RwLock<HashMap<String, AuthorSummary>>,
    failure: RwLock<Option<VoidError>>,
    lookups: RwLock<Vec<HashSet<String>>>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            lookups: RwLock::new(Vec::new()),
        }
    }

    pub fn with_profile(self, id: &str, summary: AuthorSummary) -> Self {
        self.insert(id, summary);
        self
    }

    pub fn insert(&self, id: &str, summary: AuthorSummary) {
        self.profiles.write().insert(id.to_string(), summary);
    }

    pub fn fail_with(&self, error: Option<VoidError>) {
        *self.failure.write() = error;
    }

    /// Id sets of every lookup that reached the directory
    pub fn lookups(&self) -> Vec<HashSet<String>> {
        self.lookups.read().clone()
    }
}

impl Default for InMemoryProfileDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityResolver for InMemoryProfileDirectory {
    async fn resolve_authors(
        &self,
        ids: &HashSet<String>,
    ) -> Result<HashMap<String, AuthorSummary>, VoidError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        self.lookups.write().push(ids.clone());

        if let Some(err) = self.failure.read().clone() {
            return Err(err);
        }

        let profiles = self.profiles.read();
        Ok(ids
            .iter()
            .filter_map(|id| profiles.get(id).map(|summary| (id.clone(), summary.clone())))
            .collect())
    }
}
