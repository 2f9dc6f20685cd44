use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::HandoffId;
use super::repository::HandoffRepository;
use super::service::{HandoffError, HandoffOffer, HandoffService};
use crate::workflows::transport::authorization::{RepositoryError, RideRepository};

/// Router builder exposing HTTP endpoints for offering and resolving
/// handoffs.
pub fn handoff_router<H, R>(service: Arc<HandoffService<H, R>>) -> Router
where
    H: HandoffRepository + 'static,
    R: RideRepository + 'static,
{
    Router::new()
        .route("/api/v1/handoffs", post(offer_handler::<H, R>))
        .route(
            "/api/v1/handoffs/:handoff_id/accept",
            post(accept_handler::<H, R>),
        )
        .route(
            "/api/v1/handoffs/:handoff_id/refuse",
            post(refuse_handler::<H, R>),
        )
        .route(
            "/api/v1/handoffs/:handoff_id/withdraw",
            post(withdraw_handler::<H, R>),
        )
        .with_state(service)
}

pub(crate) async fn offer_handler<H, R>(
    State(service): State<Arc<HandoffService<H, R>>>,
    axum::Json(offer): axum::Json<HandoffOffer>,
) -> Response
where
    H: HandoffRepository + 'static,
    R: RideRepository + 'static,
{
    match service.offer(offer, Utc::now()) {
        Ok(handoff) => (StatusCode::CREATED, axum::Json(handoff)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_handler<H, R>(
    State(service): State<Arc<HandoffService<H, R>>>,
    Path(handoff_id): Path<String>,
) -> Response
where
    H: HandoffRepository + 'static,
    R: RideRepository + 'static,
{
    match service.accept(&HandoffId(handoff_id), Utc::now()) {
        Ok(handoff) => (StatusCode::OK, axum::Json(handoff)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn refuse_handler<H, R>(
    State(service): State<Arc<HandoffService<H, R>>>,
    Path(handoff_id): Path<String>,
) -> Response
where
    H: HandoffRepository + 'static,
    R: RideRepository + 'static,
{
    match service.refuse(&HandoffId(handoff_id), Utc::now()) {
        Ok(handoff) => (StatusCode::OK, axum::Json(handoff)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn withdraw_handler<H, R>(
    State(service): State<Arc<HandoffService<H, R>>>,
    Path(handoff_id): Path<String>,
) -> Response
where
    H: HandoffRepository + 'static,
    R: RideRepository + 'static,
{
    match service.withdraw(&HandoffId(handoff_id), Utc::now()) {
        Ok(handoff) => (StatusCode::OK, axum::Json(handoff)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: HandoffError) -> Response {
    let status = match &error {
        HandoffError::RideNotFound(_) | HandoffError::NotFound(_) => StatusCode::NOT_FOUND,
        HandoffError::SameDriver | HandoffError::RideClosed { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        HandoffError::AlreadyResolved { .. } => StatusCode::CONFLICT,
        HandoffError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        HandoffError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
