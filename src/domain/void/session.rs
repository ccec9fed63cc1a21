use super::model::{EnrichedItem, FeedState, FeedStatus, SampleMode, SeenSet};
use super::{SamplingEngine, VoidError};
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// What a session operation did with the request
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A sampling cycle ran and its page was applied
    Applied {
        page: Vec<EnrichedItem>,
        exhausted: bool,
    },
    /// Another cycle was already in flight; nothing changed
    Ignored,
}

struct SessionInner {
    state: FeedState,
    seen: SeenSet,
    cycle: u64,
    closed: bool,
}

/// One client's browsing session over the void feed.
///
/// Owns the feed state and seen set exclusively. At most one sampling
/// cycle runs at a time; calls that arrive while one is in flight are
/// ignored. The inner lock is never held across an await point.
pub struct FeedSession {
    id: Uuid,
    page_size: usize,
    engine: Arc<SamplingEngine>,
    inner: Mutex<SessionInner>,
}

impl FeedSession {
    pub fn new(engine: Arc<SamplingEngine>, page_size: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_size,
            engine,
            inner: Mutex::new(SessionInner {
                state: FeedState::new(),
                seen: SeenSet::new(),
                cycle: 0,
                closed: false,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> FeedState {
        self.inner.lock().state.clone()
    }

    pub fn seen_count(&self) -> usize {
        self.inner.lock().seen.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// First load of the session
    pub async fn initialize(&self) -> Result<CycleOutcome, VoidError> {
        tracing::info!(session_id = %self.id, page_size = self.page_size, "Initializing void session");
        self.run_cycle(SampleMode::Refresh).await
    }

    pub async fn load_more(&self) -> Result<CycleOutcome, VoidError> {
        self.run_cycle(SampleMode::Append).await
    }

    /// Start over with a fresh seen set. The current items stay in place
    /// until the new page has been fetched.
    pub async fn refresh(&self) -> Result<CycleOutcome, VoidError> {
        tracing::info!(session_id = %self.id, "Refreshing void session");
        self.run_cycle(SampleMode::Refresh).await
    }

    /// End the session. A cycle still in flight will have its result dropped.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if !inner.closed {
            inner.closed = true;
            inner.seen.clear();
            tracing::debug!(session_id = %self.id, "Void session closed");
        }
    }

    async fn run_cycle(&self, mode: SampleMode) -> Result<CycleOutcome, VoidError> {
        let (seen, cycle, previous) = {
            let mut inner = self.inner.lock();
            if inner.closed {
                return Err(VoidError::SessionClosed);
            }
            if inner.state.is_loading() {
                tracing::debug!(session_id = %self.id, ?mode, "Void cycle already in flight, ignoring");
                return Ok(CycleOutcome::Ignored);
            }

            let previous = Previous {
                status: inner.state.status,
                last_error: inner.state.last_error.take(),
            };
            inner.state.status = FeedStatus::Loading;
            inner.cycle += 1;

            let seen = match mode {
                SampleMode::Refresh => SeenSet::new(),
                SampleMode::Append => inner.seen.clone(),
            };
            (seen, inner.cycle, previous)
        };

        let mut guard = InFlight {
            session: self,
            cycle,
            previous,
            armed: true,
        };
        let result = self.engine.sample(self.page_size, &seen, mode).await;
        guard.armed = false;

        let mut inner = self.inner.lock();
        if inner.closed || inner.cycle != cycle {
            tracing::debug!(session_id = %self.id, "Discarding void cycle result for closed session");
            return Err(VoidError::SessionClosed);
        }

        match result {
            Ok(sampled) => {
                match mode {
                    SampleMode::Refresh => inner.state.items = sampled.items.clone(),
                    SampleMode::Append => inner.state.items.extend(sampled.items.iter().cloned()),
                }
                inner.seen = sampled.seen;
                inner.state.status = FeedStatus::Ready;

                tracing::info!(
                    session_id = %self.id,
                    ?mode,
                    page = sampled.items.len(),
                    total = inner.state.items.len(),
                    seen = inner.seen.len(),
                    exhausted = sampled.exhausted,
                    "Void cycle applied"
                );

                Ok(CycleOutcome::Applied {
                    page: sampled.items,
                    exhausted: sampled.exhausted,
                })
            }
            Err(err) => {
                tracing::warn!(session_id = %self.id, ?mode, error = %err, "Void cycle failed");
                inner.state.status = FeedStatus::Error;
                inner.state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

/// Puts the session back to its previous status and error when a cycle
/// future is dropped before it finishes.
struct InFlight<'a> {
    session: &'a FeedSession,
    cycle: u64,
    previous: Previous,
    armed: bool,
}

struct Previous {
    status: FeedStatus,
    last_error: Option<VoidError>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.session.inner.lock();
        if inner.cycle == self.cycle && inner.state.is_loading() {
            tracing::debug!(session_id = %self.session.id, "Void cycle cancelled");
            inner.state.status = self.previous.status;
            inner.state.last_error = self.previous.last_error.take();
        }
    }
}
