use super::domain::{DocumentId, PatientId, PrescriptionDocument, Ride, RideId};

/// Storage abstraction for the ride store so the service module can be
/// exercised in isolation.
pub trait RideRepository: Send + Sync {
    fn insert(&self, ride: Ride) -> Result<Ride, RepositoryError>;
    fn update(&self, ride: Ride) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RideId) -> Result<Option<Ride>, RepositoryError>;
    fn for_patient(&self, patient: &PatientId) -> Result<Vec<Ride>, RepositoryError>;
}

/// Storage abstraction for scanned documents. Documents are append-only:
/// there is no update, a newer upload supersedes.
pub trait DocumentRepository: Send + Sync {
    fn insert(
        &self,
        document: PrescriptionDocument,
    ) -> Result<PrescriptionDocument, RepositoryError>;
    fn fetch(&self, id: &DocumentId) -> Result<Option<PrescriptionDocument>, RepositoryError>;
    fn for_patient(
        &self,
        patient: &PatientId,
    ) -> Result<Vec<PrescriptionDocument>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
