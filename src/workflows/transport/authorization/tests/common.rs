use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::transport::authorization::domain::{
    DocumentId, DocumentKind, PatientId, PrescriptionDocument, Ride, RideId, RideStatus,
    TransportKind,
};
use crate::workflows::transport::authorization::evaluation::{QuotaConfig, QuotaEngine};
use crate::workflows::transport::authorization::memory::{
    InMemoryDocumentRepository, InMemoryRideRepository,
};
use crate::workflows::transport::authorization::repository::{RepositoryError, RideRepository};
use crate::workflows::transport::authorization::router::authorization_router;
use crate::workflows::transport::authorization::service::AuthorizationService;
use crate::workflows::transport::authorization::temporal::ScanSubmission;

pub(super) fn patient() -> PatientId {
    PatientId("patient-0421".to_string())
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn on(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn single_leg(id: &str, scheduled_at: DateTime<Utc>) -> Ride {
    Ride {
        id: RideId(id.to_string()),
        patient_id: patient(),
        scheduled_at,
        kind: TransportKind::OneWay,
        round_trip: false,
        status: RideStatus::Scheduled,
    }
}

pub(super) fn round_trip(id: &str, scheduled_at: DateTime<Utc>) -> Ride {
    Ride {
        id: RideId(id.to_string()),
        patient_id: patient(),
        scheduled_at,
        kind: TransportKind::RoundTrip,
        round_trip: true,
        status: RideStatus::Scheduled,
    }
}

pub(super) fn authorization(
    id: &str,
    uploaded_at: DateTime<Utc>,
    max_authorized_trips: u32,
) -> PrescriptionDocument {
    PrescriptionDocument {
        id: DocumentId(id.to_string()),
        patient_id: patient(),
        kind: DocumentKind::TransportAuthorization,
        uploaded_at,
        max_authorized_trips,
    }
}

pub(super) fn insurance_card(id: &str, uploaded_at: DateTime<Utc>) -> PrescriptionDocument {
    PrescriptionDocument {
        id: DocumentId(id.to_string()),
        patient_id: patient(),
        kind: DocumentKind::InsuranceCard,
        uploaded_at,
        max_authorized_trips: 0,
    }
}

pub(super) fn engine() -> QuotaEngine {
    QuotaEngine::new(QuotaConfig::default())
}

pub(super) fn scan(prescribed_on: Option<NaiveDate>) -> ScanSubmission {
    ScanSubmission {
        patient_id: patient(),
        uploaded_at: at(2024, 3, 1),
        max_authorized_trips: 6,
        prescribed_on,
    }
}

pub(super) fn build_service() -> (
    AuthorizationService<InMemoryRideRepository, InMemoryDocumentRepository>,
    Arc<InMemoryRideRepository>,
    Arc<InMemoryDocumentRepository>,
) {
    let rides = Arc::new(InMemoryRideRepository::default());
    let documents = Arc::new(InMemoryDocumentRepository::default());
    let service =
        AuthorizationService::new(rides.clone(), documents.clone(), QuotaConfig::default());
    (service, rides, documents)
}

pub(super) fn authorization_router_with_service(
    service: AuthorizationService<InMemoryRideRepository, InMemoryDocumentRepository>,
) -> axum::Router {
    authorization_router(Arc::new(service))
}

pub(super) struct UnavailableRideRepository;

impl RideRepository for UnavailableRideRepository {
    fn insert(&self, _ride: Ride) -> Result<Ride, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _ride: Ride) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RideId) -> Result<Option<Ride>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_patient(&self, _patient: &PatientId) -> Result<Vec<Ride>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
