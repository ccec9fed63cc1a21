use super::dto::{PageResponse, SessionResponse, VoidItemResponse};
use super::error::VoidServiceError;
use super::session::{CycleOutcome, FeedSession};
use super::SamplingEngine;
use async_trait::async_trait;
use moka::future::Cache;
use moka::notification::RemovalCause;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub idle_timeout: Duration,
    pub max_sessions: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 50,
            idle_timeout: Duration::from_secs(30 * 60),
            max_sessions: 10_000,
        }
    }
}

pub struct VoidService {
    engine: Arc<SamplingEngine>,
    sessions: Cache<Uuid, Arc<FeedSession>>,
    settings: SessionSettings,
}

impl VoidService {
    pub fn new(engine: Arc<SamplingEngine>, settings: SessionSettings) -> Self {
        // Sessions that go idle or get pushed out are closed so an in-flight
        // cycle cannot write into them afterwards
        let sessions = Cache::builder()
            .max_capacity(settings.max_sessions)
            .time_to_idle(settings.idle_timeout)
            .eviction_listener(|id: Arc<Uuid>, session: Arc<FeedSession>, cause: RemovalCause| {
                tracing::debug!(session_id = %id, ?cause, "Void session evicted");
                session.close();
            })
            .build();

        Self {
            engine,
            sessions,
            settings,
        }
    }

    pub async fn ping(&self) -> Result<(), VoidServiceError> {
        self.engine.ping().await.map_err(VoidServiceError::from)
    }

    pub async fn active_sessions(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }
}

#[async_trait]
pub trait VoidServiceApi: Send + Sync {
    /// Open a session and load its first page
    async fn start_session(
        &self,
        page_size: Option<usize>,
    ) -> Result<SessionResponse, VoidServiceError>;

    async fn get_session(&self, session_id: Uuid) -> Result<SessionResponse, VoidServiceError>;

    /// Append the next page. Returns an ignored response while another
    /// cycle of the same session is in flight.
    async fn load_more(&self, session_id: Uuid) -> Result<PageResponse, VoidServiceError>;

    async fn refresh(&self, session_id: Uuid) -> Result<SessionResponse, VoidServiceError>;

    async fn end_session(&self, session_id: Uuid) -> Result<(), VoidServiceError>;
}

#[async_trait]
impl VoidServiceApi for VoidService {
    async fn start_session(
        &self,
        page_size: Option<usize>,
    ) -> Result<SessionResponse, VoidServiceError> {
        let page_size = self.validate_page_size(page_size)?;
        let session = Arc::new(FeedSession::new(self.engine.clone(), page_size));

        if let Err(err) = session.initialize().await {
            session.close();
            return Err(err.into());
        }

        self.sessions.insert(session.id(), session.clone()).await;
        self.sessions.run_pending_tasks().await;
        if !self.sessions.contains_key(&session.id()) {
            session.close();
            tracing::warn!(session_id = %session.id(), "Void session registry is full");
            return Err(VoidServiceError::Unavailable(
                "too many active feed sessions".to_string(),
            ));
        }
        tracing::info!(session_id = %session.id(), page_size, "Void session started");

        Ok(self.describe(&session))
    }

    async fn get_session(&self, session_id: Uuid) -> Result<SessionResponse, VoidServiceError> {
        let session = self.find_session(session_id).await?;
        Ok(self.describe(&session))
    }

    async fn load_more(&self, session_id: Uuid) -> Result<PageResponse, VoidServiceError> {
        let session = self.find_session(session_id).await?;
        let outcome = session.load_more().await?;
        let state = session.snapshot();

        let (items, exhausted, ignored) = match outcome {
            CycleOutcome::Applied { page, exhausted } => (page, exhausted, false),
            CycleOutcome::Ignored => (Vec::new(), false, true),
        };

        Ok(PageResponse {
            session_id,
            status: state.status,
            items: items.into_iter().map(VoidItemResponse::from).collect(),
            total_items: state.items.len(),
            exhausted,
            ignored,
        })
    }

    async fn refresh(&self, session_id: Uuid) -> Result<SessionResponse, VoidServiceError> {
        let session = self.find_session(session_id).await?;
        let outcome = session.refresh().await?;

        let mut response = self.describe(&session);
        response.ignored = outcome == CycleOutcome::Ignored;
        Ok(response)
    }

    async fn end_session(&self, session_id: Uuid) -> Result<(), VoidServiceError> {
        let session = self
            .sessions
            .remove(&session_id)
            .await
            .ok_or(VoidServiceError::NotFound)?;
        session.close();
        tracing::info!(session_id = %session_id, "Void session ended");
        Ok(())
    }
}

impl VoidService {
    fn validate_page_size(&self, page_size: Option<usize>) -> Result<usize, VoidServiceError> {
        let page_size = page_size.unwrap_or(self.settings.default_page_size);
        if page_size == 0 || page_size > self.settings.max_page_size {
            return Err(VoidServiceError::Invalid(format!(
                "page_size must be between 1 and {}",
                self.settings.max_page_size
            )));
        }
        Ok(page_size)
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Arc<FeedSession>, VoidServiceError> {
        self.sessions
            .get(&session_id)
            .await
            .ok_or(VoidServiceError::NotFound)
    }

    fn describe(&self, session: &FeedSession) -> SessionResponse {
        SessionResponse::from_state(session.id(), session.snapshot(), session.seen_count())
    }
}
