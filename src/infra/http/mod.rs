//! HTTP surface for the deferred-publish flow.
//!
//! Two endpoints consumed by the host admin UI: `GET /check-changes`
//! reports whether the publish queue holds pending records, and
//! `POST /publish-changes` flushes it. Mounted by the host under its own
//! API prefix.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rinfresco_api_types::{ApiErrorBody, CheckChangesResponse, PublishChangesResponse};
use tracing::error;

use crate::application::error::InvalidationError;
use crate::application::publish::PublishService;
use crate::application::repos::RepoError;

/// Shared state for the invalidation API router.
#[derive(Clone)]
pub struct ApiState {
    pub publish: Arc<PublishService>,
}

/// Build the invalidation API router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/check-changes", get(check_changes))
        .route("/publish-changes", post(publish_changes))
        .with_state(state)
}

async fn check_changes(State(state): State<ApiState>) -> Response {
    match state.publish.has_pending_changes().await {
        Ok(has_changes) => Json(CheckChangesResponse { has_changes }).into_response(),
        Err(err) => repo_error_response("check_changes", &err),
    }
}

async fn publish_changes(State(state): State<ApiState>) -> Response {
    match state.publish.publish_changes().await {
        Ok(outcome) => Json(PublishChangesResponse {
            success: true,
            published: outcome.published,
        })
        .into_response(),
        Err(InvalidationError::Repo(err)) => repo_error_response("publish_changes", &err),
        Err(InvalidationError::Tag(err)) => {
            error!(source = "publish_changes", error = %err, "tag invalidation failed");
            error_response(StatusCode::BAD_GATEWAY, "tag invalidation failed")
        }
    }
}

fn repo_error_response(source: &'static str, err: &RepoError) -> Response {
    error!(source, error = %err, "publish queue persistence failed");
    let status = match err {
        RepoError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, "publish queue unavailable")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
