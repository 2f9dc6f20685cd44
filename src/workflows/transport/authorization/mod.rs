//! Transport-authorization tracking: the prescription-quota engine, the
//! temporal validity gate, and the ride/document stores they read from.
//!
//! The engine is a pure computation over supplied snapshots; the service
//! re-reads fresh snapshots per call and the HTTP layer maps outcomes onto
//! banner-ready views.

pub mod domain;
pub(crate) mod evaluation;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod temporal;

#[cfg(test)]
mod tests;

pub use domain::{
    DocumentId, DocumentKind, PatientId, PrescriptionDocument, QuotaEvaluation, QuotaOutcome,
    QuotaState, Ride, RideId, RideStatus, TransportKind,
};
pub use evaluation::{QuotaConfig, QuotaEngine};
pub use memory::{InMemoryDocumentRepository, InMemoryRideRepository};
pub use repository::{DocumentRepository, RepositoryError, RideRepository};
pub use router::authorization_router;
pub use service::{
    AttachmentOutcome, AttachmentRequest, AuthorizationService, AuthorizationServiceError, NewRide,
    RideQuotaView,
};
pub use temporal::{temporal_risk, IntakeGate, IntakeViolation, ScanSubmission};
