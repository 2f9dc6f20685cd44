use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PatientId, RideId, RideStatus};
use super::repository::{DocumentRepository, RepositoryError, RideRepository};
use super::service::{
    AttachmentOutcome, AttachmentRequest, AuthorizationService, AuthorizationServiceError, NewRide,
};
use super::temporal::ScanSubmission;

/// Router builder exposing HTTP endpoints for the ride store and the quota
/// engine.
pub fn authorization_router<R, D>(service: Arc<AuthorizationService<R, D>>) -> Router
where
    R: RideRepository + 'static,
    D: DocumentRepository + 'static,
{
    Router::new()
        .route("/api/v1/rides", post(submit_ride_handler::<R, D>))
        .route("/api/v1/rides/:ride_id", get(ride_handler::<R, D>))
        .route(
            "/api/v1/rides/:ride_id/status",
            post(ride_status_handler::<R, D>),
        )
        .route(
            "/api/v1/rides/:ride_id/quota",
            get(ride_quota_handler::<R, D>),
        )
        .route(
            "/api/v1/patients/:patient_id/documents",
            post(attach_document_handler::<R, D>),
        )
        .with_state(service)
}

pub(crate) async fn submit_ride_handler<R, D>(
    State(service): State<Arc<AuthorizationService<R, D>>>,
    axum::Json(new_ride): axum::Json<NewRide>,
) -> Response
where
    R: RideRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.submit_ride(new_ride) {
        Ok(ride) => (StatusCode::CREATED, axum::Json(ride)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ride_handler<R, D>(
    State(service): State<Arc<AuthorizationService<R, D>>>,
    Path(ride_id): Path<String>,
) -> Response
where
    R: RideRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.ride(&RideId(ride_id)) {
        Ok(ride) => (StatusCode::OK, axum::Json(ride)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RideStatusPayload {
    pub(crate) status: RideStatus,
}

pub(crate) async fn ride_status_handler<R, D>(
    State(service): State<Arc<AuthorizationService<R, D>>>,
    Path(ride_id): Path<String>,
    axum::Json(payload): axum::Json<RideStatusPayload>,
) -> Response
where
    R: RideRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.set_status(&RideId(ride_id), payload.status) {
        Ok(ride) => (StatusCode::OK, axum::Json(ride)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ride_quota_handler<R, D>(
    State(service): State<Arc<AuthorizationService<R, D>>>,
    Path(ride_id): Path<String>,
) -> Response
where
    R: RideRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.ride_quota(&RideId(ride_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttachDocumentPayload {
    pub(crate) ride_id: String,
    #[serde(default)]
    pub(crate) uploaded_at: Option<DateTime<Utc>>,
    pub(crate) max_authorized_trips: u32,
    #[serde(default)]
    pub(crate) prescribed_on: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) acknowledge_risk: bool,
}

pub(crate) async fn attach_document_handler<R, D>(
    State(service): State<Arc<AuthorizationService<R, D>>>,
    Path(patient_id): Path<String>,
    axum::Json(payload): axum::Json<AttachDocumentPayload>,
) -> Response
where
    R: RideRepository + 'static,
    D: DocumentRepository + 'static,
{
    let request = AttachmentRequest {
        ride_id: RideId(payload.ride_id),
        scan: ScanSubmission {
            patient_id: PatientId(patient_id),
            uploaded_at: payload.uploaded_at.unwrap_or_else(Utc::now),
            max_authorized_trips: payload.max_authorized_trips,
            prescribed_on: payload.prescribed_on,
        },
        acknowledge_risk: payload.acknowledge_risk,
    };

    match service.attach_document(request) {
        Ok(AttachmentOutcome::Attached {
            document,
            risk_acknowledged,
        }) => {
            let body = json!({
                "status": "attached",
                "document": document,
                "risk_acknowledged": risk_acknowledged,
            });
            (StatusCode::CREATED, axum::Json(body)).into_response()
        }
        Ok(AttachmentOutcome::BlockedPendingConfirmation {
            ride_on,
            prescribed_on,
        }) => {
            let body = json!({
                "status": "blocked_pending_confirmation",
                "ride_on": ride_on,
                "prescribed_on": prescribed_on,
                "message": "prescription is dated after the ride it covers; correct the date or resubmit with acknowledge_risk",
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AuthorizationServiceError) -> Response {
    let status = match &error {
        AuthorizationServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AuthorizationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AuthorizationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AuthorizationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
