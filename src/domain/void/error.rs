use crate::error::AppError;

/// Failures raised while sampling the void feed
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum VoidError {
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("content store query error: {0}")]
    StoreQuery(String),
    #[error("author resolver unavailable: {0}")]
    ResolverUnavailable(String),
    #[error("feed session closed")]
    SessionClosed,
}

impl VoidError {
    /// Whether retrying the same call can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VoidError::StoreUnavailable(_) | VoidError::ResolverUnavailable(_)
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VoidServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("feed session not found")]
    NotFound,
}

impl From<VoidError> for VoidServiceError {
    fn from(err: VoidError) -> Self {
        match err {
            VoidError::StoreUnavailable(_) | VoidError::ResolverUnavailable(_) => {
                VoidServiceError::Unavailable(err.to_string())
            }
            VoidError::StoreQuery(_) => VoidServiceError::Dependency(err.to_string()),
            VoidError::SessionClosed => VoidServiceError::NotFound,
        }
    }
}

impl From<VoidServiceError> for AppError {
    fn from(err: VoidServiceError) -> Self {
        match err {
            VoidServiceError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            VoidServiceError::Invalid(msg) => AppError::BadRequest(msg),
            VoidServiceError::NotFound => AppError::NotFound("Feed session not found".to_string()),
            VoidServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
