use super::model::{CandidateFilter, EnrichedItem, Item, SampleMode, SampledPage, SeenSet};
use super::shuffle::fisher_yates;
use super::{ContentStoreGateway, IdentityResolver, VoidError};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_OVERSAMPLE_FACTOR: usize = 2;

/// Draws random, session-unique pages of memos from the content store
pub struct SamplingEngine {
    gateway: Arc<dyn ContentStoreGateway>,
    resolver: Arc<dyn IdentityResolver>,
    oversample_factor: usize,
    rng: Mutex<StdRng>,
}

impl SamplingEngine {
    pub fn new(gateway: Arc<dyn ContentStoreGateway>, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            gateway,
            resolver,
            oversample_factor: DEFAULT_OVERSAMPLE_FACTOR,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Factors below 1 are raised to 1 so a small pool still makes progress
    pub fn with_oversample_factor(mut self, factor: usize) -> Self {
        self.oversample_factor = factor.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn oversample_factor(&self) -> usize {
        self.oversample_factor
    }

    pub async fn ping(&self) -> Result<(), VoidError> {
        self.gateway.ping().await
    }

    /// Run one sampling cycle.
    ///
    /// The returned `seen` set is the session's new seen set; callers must
    /// only store it when this returns `Ok`.
    pub async fn sample(
        &self,
        page_size: usize,
        seen: &SeenSet,
        mode: SampleMode,
    ) -> Result<SampledPage, VoidError> {
        if page_size == 0 {
            return Err(VoidError::StoreQuery("page size must be positive".to_string()));
        }

        let max_count = page_size.saturating_mul(self.oversample_factor);
        let (mut candidates, store_exhausted) = self.fetch(max_count, seen, mode).await?;

        if candidates.is_empty() {
            tracing::debug!(page_size, seen = seen.len(), "Void pool is empty");
            return Ok(SampledPage {
                items: Vec::new(),
                seen: seen.clone(),
                exhausted: false,
            });
        }

        fisher_yates(&mut candidates, &mut *self.rng.lock());

        let fresh: Vec<&Item> = match mode {
            SampleMode::Refresh => candidates.iter().collect(),
            SampleMode::Append => candidates
                .iter()
                .filter(|item| !seen.contains(&item.id))
                .collect(),
        };

        let exhausted = mode == SampleMode::Append && (store_exhausted || fresh.is_empty());
        let (pool, mut updated_seen): (Vec<&Item>, SeenSet) = if exhausted {
            tracing::info!(
                fetched = candidates.len(),
                seen = seen.len(),
                "Void session exhausted its pool, resetting seen set"
            );
            (candidates.iter().collect(), SeenSet::new())
        } else {
            (fresh, seen.clone())
        };

        let page: Vec<Item> = pool.into_iter().take(page_size).cloned().collect();
        let items = self.enrich(page).await?;

        updated_seen.extend(candidates.iter().map(|item| item.id.clone()));

        tracing::debug!(
            fetched = candidates.len(),
            selected = items.len(),
            seen = updated_seen.len(),
            exhausted,
            "Void page sampled"
        );

        Ok(SampledPage {
            items,
            seen: updated_seen,
            exhausted,
        })
    }

    /// Fetch the candidate window. In append mode the seen ids are pushed
    /// down to the store; when nothing unseen is left the window is fetched
    /// again without them and flagged as exhausted.
    async fn fetch(
        &self,
        max_count: usize,
        seen: &SeenSet,
        mode: SampleMode,
    ) -> Result<(Vec<Item>, bool), VoidError> {
        let filter = CandidateFilter::discoverable(max_count);

        if mode == SampleMode::Refresh || seen.is_empty() {
            return Ok((self.gateway.fetch_candidates(&filter).await?, false));
        }

        let unseen = self
            .gateway
            .fetch_candidates(&filter.clone().excluding(seen.to_vec()))
            .await?;
        if !unseen.is_empty() {
            return Ok((unseen, false));
        }

        let window = self.gateway.fetch_candidates(&filter).await?;
        let exhausted = !window.is_empty();
        Ok((window, exhausted))
    }

    async fn enrich(&self, page: Vec<Item>) -> Result<Vec<EnrichedItem>, VoidError> {
        let author_ids: HashSet<String> = page
            .iter()
            .filter_map(|item| item.author_id.clone())
            .collect();

        let authors = if author_ids.is_empty() {
            Default::default()
        } else {
            self.resolver.resolve_authors(&author_ids).await?
        };

        Ok(page
            .into_iter()
            .map(|item| {
                let author = item
                    .author_id
                    .as_ref()
                    .and_then(|id| authors.get(id))
                    .cloned();
                EnrichedItem { item, author }
            })
            .collect())
    }
}
