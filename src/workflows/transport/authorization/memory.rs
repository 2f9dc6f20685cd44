use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{DocumentId, PatientId, PrescriptionDocument, Ride, RideId};
use super::repository::{DocumentRepository, RepositoryError, RideRepository};

/// In-memory ride store backing the server and the test suites.
#[derive(Default, Clone)]
pub struct InMemoryRideRepository {
    records: Arc<Mutex<HashMap<RideId, Ride>>>,
}

impl RideRepository for InMemoryRideRepository {
    fn insert(&self, ride: Ride) -> Result<Ride, RepositoryError> {
        let mut guard = self.records.lock().expect("ride mutex poisoned");
        if guard.contains_key(&ride.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(ride.id.clone(), ride.clone());
        Ok(ride)
    }

    fn update(&self, ride: Ride) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("ride mutex poisoned");
        if guard.contains_key(&ride.id) {
            guard.insert(ride.id.clone(), ride);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RideId) -> Result<Option<Ride>, RepositoryError> {
        let guard = self.records.lock().expect("ride mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_patient(&self, patient: &PatientId) -> Result<Vec<Ride>, RepositoryError> {
        let guard = self.records.lock().expect("ride mutex poisoned");
        let mut rides: Vec<Ride> = guard
            .values()
            .filter(|ride| ride.patient_id == *patient)
            .cloned()
            .collect();
        rides.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(rides)
    }
}

/// In-memory document store. Append-only, like the real one.
#[derive(Default, Clone)]
pub struct InMemoryDocumentRepository {
    records: Arc<Mutex<HashMap<DocumentId, PrescriptionDocument>>>,
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn insert(
        &self,
        document: PrescriptionDocument,
    ) -> Result<PrescriptionDocument, RepositoryError> {
        let mut guard = self.records.lock().expect("document mutex poisoned");
        if guard.contains_key(&document.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<PrescriptionDocument>, RepositoryError> {
        let guard = self.records.lock().expect("document mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_patient(
        &self,
        patient: &PatientId,
    ) -> Result<Vec<PrescriptionDocument>, RepositoryError> {
        let guard = self.records.lock().expect("document mutex poisoned");
        let mut documents: Vec<PrescriptionDocument> = guard
            .values()
            .filter(|document| document.patient_id == *patient)
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
        Ok(documents)
    }
}
