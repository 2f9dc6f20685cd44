use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    PatientId, PrescriptionDocument, QuotaOutcome, Ride, RideId, RideStatus, TransportKind,
};
use super::evaluation::{QuotaConfig, QuotaEngine};
use super::repository::{DocumentRepository, RepositoryError, RideRepository};
use super::temporal::{temporal_risk, IntakeGate, IntakeViolation, ScanSubmission};
use super::DocumentId;

/// Service composing the ride and document stores, the quota engine, and the
/// temporal intake gate.
pub struct AuthorizationService<R, D> {
    rides: Arc<R>,
    documents: Arc<D>,
    engine: Arc<QuotaEngine>,
    gate: IntakeGate,
}

static RIDE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_ride_id() -> RideId {
    let id = RIDE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RideId(format!("ride-{id:06}"))
}

fn next_document_id() -> DocumentId {
    let id = DOCUMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DocumentId(format!("doc-{id:06}"))
}

/// Driver-entered payload for a new ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRide {
    pub patient_id: PatientId,
    pub scheduled_at: DateTime<Utc>,
    pub kind: TransportKind,
    pub round_trip: bool,
}

/// Request to attach a freshly scanned authorization to the ride it covers.
#[derive(Debug, Clone)]
pub struct AttachmentRequest {
    pub ride_id: RideId,
    pub scan: ScanSubmission,
    pub acknowledge_risk: bool,
}

/// Outcome of an attach action. Blocking on temporal risk is a first-class
/// result, not an error: the driver must either correct the date or resubmit
/// with the risk acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentOutcome {
    Attached {
        document: PrescriptionDocument,
        risk_acknowledged: bool,
    },
    BlockedPendingConfirmation {
        ride_on: NaiveDate,
        prescribed_on: NaiveDate,
    },
}

impl<R, D> AuthorizationService<R, D>
where
    R: RideRepository + 'static,
    D: DocumentRepository + 'static,
{
    pub fn new(rides: Arc<R>, documents: Arc<D>, config: QuotaConfig) -> Self {
        Self {
            rides,
            documents,
            engine: Arc::new(QuotaEngine::new(config)),
            gate: IntakeGate,
        }
    }

    /// Record a new ride for the driver's schedule.
    pub fn submit_ride(&self, new_ride: NewRide) -> Result<Ride, AuthorizationServiceError> {
        let ride = Ride {
            id: next_ride_id(),
            patient_id: new_ride.patient_id,
            scheduled_at: new_ride.scheduled_at,
            kind: new_ride.kind,
            round_trip: new_ride.round_trip,
            status: RideStatus::Scheduled,
        };

        let stored = self.rides.insert(ride)?;
        Ok(stored)
    }

    pub fn ride(&self, id: &RideId) -> Result<Ride, AuthorizationServiceError> {
        let ride = self.rides.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(ride)
    }

    /// Advance a ride's lifecycle tag as the driver progresses it.
    pub fn set_status(
        &self,
        id: &RideId,
        status: RideStatus,
    ) -> Result<Ride, AuthorizationServiceError> {
        let mut ride = self.rides.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        ride.status = status;
        self.rides.update(ride.clone())?;
        Ok(ride)
    }

    /// Evaluate a ride against fresh snapshots of the patient's documents and
    /// ride history.
    pub fn ride_quota(&self, id: &RideId) -> Result<RideQuotaView, AuthorizationServiceError> {
        let ride = self.rides.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let documents = self.documents.for_patient(&ride.patient_id)?;
        let rides = self.rides.for_patient(&ride.patient_id)?;

        let outcome = self.engine.evaluate(&ride, &documents, &rides);
        Ok(RideQuotaView::from_outcome(&ride, &outcome))
    }

    /// Validate a scan, run the temporal check against the covered ride, and
    /// store the document unless the check demands an explicit confirmation.
    pub fn attach_document(
        &self,
        request: AttachmentRequest,
    ) -> Result<AttachmentOutcome, AuthorizationServiceError> {
        let ride = self
            .rides
            .fetch(&request.ride_id)?
            .ok_or(RepositoryError::NotFound)?;

        let (document, prescribed_on) = self
            .gate
            .document_from_scan(next_document_id(), request.scan)?;

        if document.patient_id != ride.patient_id {
            return Err(IntakeViolation::PatientMismatch.into());
        }

        let ride_on = ride.scheduled_at.date_naive();
        let risky = temporal_risk(ride_on, prescribed_on);

        if risky && !request.acknowledge_risk {
            return Ok(AttachmentOutcome::BlockedPendingConfirmation {
                ride_on,
                prescribed_on,
            });
        }

        if risky {
            tracing::warn!(
                ride = %ride.id.0,
                %prescribed_on,
                %ride_on,
                "attaching authorization dated after its ride on driver override"
            );
        }

        let stored = self.documents.insert(document)?;
        Ok(AttachmentOutcome::Attached {
            document: stored,
            risk_acknowledged: risky,
        })
    }
}

/// Error raised by the authorization service.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Banner-ready projection of a quota outcome for API responses and reports.
#[derive(Debug, Clone, Serialize)]
pub struct RideQuotaView {
    pub ride_id: RideId,
    pub patient_id: PatientId,
    pub state: &'static str,
    pub state_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_authorized: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
}

impl RideQuotaView {
    pub fn from_outcome(ride: &Ride, outcome: &QuotaOutcome) -> Self {
        match outcome {
            QuotaOutcome::NotRequired => Self {
                ride_id: ride.id.clone(),
                patient_id: ride.patient_id.clone(),
                state: "not_required",
                state_label: "No authorization required",
                consumed: None,
                max_authorized: None,
                remaining: None,
            },
            QuotaOutcome::Evaluated(evaluation) => Self {
                ride_id: ride.id.clone(),
                patient_id: ride.patient_id.clone(),
                state: evaluation.state.tag(),
                state_label: evaluation.state.label(),
                consumed: evaluation.consumed,
                max_authorized: evaluation.max_authorized,
                remaining: evaluation.remaining,
            },
        }
    }
}
