use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use careerpath_core::deliveries::{MarkReadOutcome, NotificationItem};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountResponse {
    unread_count: i64,
}

#[derive(Serialize)]
struct MarkReadResponse {
    status: MarkReadOutcome,
}

async fn list_notifications(
    Path(student_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<NotificationItem>>> {
    let items = state
        .notification_service
        .list_for_subscriber(&student_id)
        .await?;
    Ok(Json(items))
}

async fn unread_count(
    Path(student_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread_count = state.notification_service.unread_count(&student_id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

async fn mark_read(
    Path((student_id, posting_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MarkReadResponse>> {
    match state
        .notification_service
        .mark_read(&student_id, &posting_id)
        .await?
    {
        MarkReadOutcome::NotFound => Err(ApiError::NotFound(format!(
            "no notification of posting {} for {}",
            posting_id, student_id
        ))),
        status => Ok(Json(MarkReadResponse { status })),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/students/{student_id}/notifications", get(list_notifications))
        .route(
            "/students/{student_id}/notifications/unread-count",
            get(unread_count),
        )
        .route(
            "/students/{student_id}/notifications/{posting_id}/read",
            post(mark_read),
        )
}
