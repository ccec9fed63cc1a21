pub mod dto;
pub mod error;
pub mod excerpt;
pub mod model;
pub mod sampler;
pub mod service;
pub mod session;
pub mod shuffle;


use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

pub use dto::{CreateSessionRequest, PageResponse, SessionResponse, VoidItemResponse};
pub use error::{VoidError, VoidServiceError};
pub use model::{
    AuthorSummary, CandidateFilter, EnrichedItem, FeedState, FeedStatus, Item, SampleMode,
    SampledPage, SeenSet, Visibility,
};
pub use sampler::SamplingEngine;
pub use service::{VoidService, VoidServiceApi};
pub use session::{CycleOutcome, FeedSession};

/// Read access to the memo store backing the void feed.
///
/// Implementations must return candidates newest first; randomization
/// happens in the sampler. Returning fewer than `max_count` memos, or none,
/// is not an error.
#[async_trait]
pub trait ContentStoreGateway: Send + Sync {
    async fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Item>, VoidError>;

    /// Cheap reachability check used by readiness probes
    async fn ping(&self) -> Result<(), VoidError>;
}

/// Batch lookup of author summaries.
///
/// An empty id set must resolve to an empty map without any I/O. Unknown
/// ids are left out of the result.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_authors(
        &self,
        ids: &HashSet<String>,
    ) -> Result<HashMap<String, AuthorSummary>, VoidError>;
}
