use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::excerpt::excerpt;
use super::model::{EnrichedItem, FeedState, FeedStatus};

/// Request for POST /api/void/sessions
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoidItemResponse {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<String>,
    pub duration_seconds: u32,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub like_count: u64,
    pub view_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
}

impl From<EnrichedItem> for VoidItemResponse {
    fn from(enriched: EnrichedItem) -> Self {
        let excerpt = excerpt(&enriched.item);
        let item = enriched.item;
        let author = match (item.author_id.clone(), enriched.author) {
            (Some(id), Some(summary)) => Some(AuthorResponse {
                id,
                display_name: summary.display_name,
                avatar_ref: summary.avatar_ref,
            }),
            _ => None,
        };

        Self {
            id: item.id,
            title: item.title,
            excerpt,
            media_ref: item.media_ref,
            duration_seconds: item.duration_seconds,
            created_at: item.created_at,
            tags: item.tags,
            like_count: item.like_count,
            view_count: item.view_count,
            author,
        }
    }
}

/// Full view of a session, used by create, get and refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub status: FeedStatus,
    pub is_loading: bool,
    pub items: Vec<VoidItemResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub seen_count: usize,
    #[serde(default)]
    pub ignored: bool,
}

impl SessionResponse {
    pub fn from_state(session_id: Uuid, state: FeedState, seen_count: usize) -> Self {
        Self {
            session_id,
            status: state.status,
            is_loading: state.is_loading(),
            items: state.items.into_iter().map(VoidItemResponse::from).collect(),
            last_error: state.last_error.map(|e| e.to_string()),
            seen_count,
            ignored: false,
        }
    }
}

/// Response for POST /api/void/sessions/{sessionId}/more
#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse {
    pub session_id: Uuid,
    pub status: FeedStatus,
    /// Only the items added by this call
    pub items: Vec<VoidItemResponse>,
    pub total_items: usize,
    pub exhausted: bool,
    pub ignored: bool,
}
