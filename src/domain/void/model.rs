use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::VoidError;

/// A discoverable voice memo as returned by the content store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    /// Fallback text source for excerpts
    pub body: String,
    pub media_ref: Option<String>,
    pub duration_seconds: u32,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub like_count: u64,
    pub view_count: u64,
    /// None for anonymous or system memos
    pub author_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthorSummary {
    pub display_name: Option<String>,
    pub avatar_ref: Option<String>,
}

/// An item paired with its resolved author, if any
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedItem {
    pub item: Item,
    pub author: Option<AuthorSummary>,
}

/// Ids a single session has been exposed to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeenSet(HashSet<String>);

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> Extend<S> for SeenSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrder {
    RecencyDesc,
}

/// Query handed to the content store. Only the discoverable category is
/// ever requested; `exclude_ids` lets a store skip memos the session has
/// already seen, but stores are free to ignore it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFilter {
    pub visibility: Visibility,
    pub max_count: usize,
    pub order_by: CandidateOrder,
    pub exclude_ids: Vec<String>,
}

impl CandidateFilter {
    pub fn discoverable(max_count: usize) -> Self {
        Self {
            visibility: Visibility::Public,
            max_count,
            order_by: CandidateOrder::RecencyDesc,
            exclude_ids: Vec::new(),
        }
    }

    pub fn excluding(mut self, ids: Vec<String>) -> Self {
        self.exclude_ids = ids;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    /// Start over, ignoring the seen set
    Refresh,
    /// Continue the session, skipping seen memos
    Append,
}

/// Result of one successful sampling cycle
#[derive(Debug, Clone)]
pub struct SampledPage {
    pub items: Vec<EnrichedItem>,
    pub seen: SeenSet,
    pub exhausted: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedStatus::Idle => write!(f, "idle"),
            FeedStatus::Loading => write!(f, "loading"),
            FeedStatus::Ready => write!(f, "ready"),
            FeedStatus::Error => write!(f, "error"),
        }
    }
}

/// Presentation-facing state of a feed session
#[derive(Debug, Clone)]
pub struct FeedState {
    pub items: Vec<EnrichedItem>,
    pub status: FeedStatus,
    pub last_error: Option<VoidError>,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            status: FeedStatus::Idle,
            last_error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}
