use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use careerpath_core::postings::{NewPosting, Posting, PostingUpdate};

async fn publish_posting(
    Path(company_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(new_posting): Json<NewPosting>,
) -> ApiResult<(StatusCode, Json<Posting>)> {
    let posting = state
        .posting_service
        .publish(&company_id, new_posting)
        .await?;
    Ok((StatusCode::CREATED, Json(posting)))
}

async fn list_company_postings(
    Path(company_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Posting>>> {
    let postings = state.posting_service.list_publisher_postings(&company_id)?;
    Ok(Json(postings))
}

async fn get_posting(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Posting>> {
    state
        .posting_service
        .get_posting(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("posting {}", id)))
}

async fn update_posting(
    Path((company_id, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<PostingUpdate>,
) -> ApiResult<Json<Posting>> {
    let posting = state
        .posting_service
        .update_posting(&company_id, &id, update)
        .await?;
    Ok(Json(posting))
}

async fn deactivate_posting(
    Path((company_id, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Posting>> {
    let posting = state
        .posting_service
        .deactivate_posting(&company_id, &id)
        .await?;
    Ok(Json(posting))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/companies/{company_id}/postings",
            get(list_company_postings).post(publish_posting),
        )
        .route("/companies/{company_id}/postings/{id}", put(update_posting))
        .route(
            "/companies/{company_id}/postings/{id}/deactivate",
            post(deactivate_posting),
        )
        .route("/postings/{id}", get(get_posting))
}
