use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::void::{
        CreateSessionRequest, PageResponse, SessionResponse, VoidService, VoidServiceApi,
    },
    error::{AppError, AppResult},
};

pub struct VoidController {
    void_service: Arc<VoidService>,
}

impl VoidController {
    pub fn new(void_service: Arc<VoidService>) -> Self {
        Self { void_service }
    }

    /// POST /api/void/sessions - Open a session and load the first page
    pub async fn create_session(
        State(controller): State<Arc<VoidController>>,
        request: Result<Json<CreateSessionRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, Json<SessionResponse>)> {
        // a bare POST without a JSON body opens a session with defaults
        let request = match request {
            Ok(Json(request)) => request,
            Err(JsonRejection::MissingJsonContentType(_)) => CreateSessionRequest::default(),
            Err(rejection) => return Err(AppError::BadRequest(rejection.body_text())),
        };
        let session = controller
            .void_service
            .start_session(request.page_size)
            .await?;
        Ok((StatusCode::CREATED, Json(session)))
    }

    /// GET /api/void/sessions/{sessionId} - Current items and status
    pub async fn get_session(
        State(controller): State<Arc<VoidController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        let session = controller.void_service.get_session(session_id).await?;
        Ok(Json(session))
    }

    /// POST /api/void/sessions/{sessionId}/more - Append the next page
    pub async fn load_more(
        State(controller): State<Arc<VoidController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, Json<PageResponse>)> {
        let page = controller.void_service.load_more(session_id).await?;
        let status = if page.ignored {
            StatusCode::ACCEPTED
        } else {
            StatusCode::OK
        };
        Ok((status, Json(page)))
    }

    /// POST /api/void/sessions/{sessionId}/refresh - Start the feed over
    pub async fn refresh(
        State(controller): State<Arc<VoidController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, Json<SessionResponse>)> {
        let session = controller.void_service.refresh(session_id).await?;
        let status = if session.ignored {
            StatusCode::ACCEPTED
        } else {
            StatusCode::OK
        };
        Ok((status, Json(session)))
    }

    /// DELETE /api/void/sessions/{sessionId} - End the session
    pub async fn end_session(
        State(controller): State<Arc<VoidController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller.void_service.end_session(session_id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
