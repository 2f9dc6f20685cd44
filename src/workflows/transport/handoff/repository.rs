use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{HandoffId, RideHandoff};
use crate::workflows::transport::authorization::RepositoryError;

/// Storage abstraction for handoff offers.
pub trait HandoffRepository: Send + Sync {
    fn insert(&self, handoff: RideHandoff) -> Result<RideHandoff, RepositoryError>;
    fn update(&self, handoff: RideHandoff) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &HandoffId) -> Result<Option<RideHandoff>, RepositoryError>;
}

/// In-memory handoff store backing the server and the test suites.
#[derive(Default, Clone)]
pub struct InMemoryHandoffRepository {
    records: Arc<Mutex<HashMap<HandoffId, RideHandoff>>>,
}

impl HandoffRepository for InMemoryHandoffRepository {
    fn insert(&self, handoff: RideHandoff) -> Result<RideHandoff, RepositoryError> {
        let mut guard = self.records.lock().expect("handoff mutex poisoned");
        if guard.contains_key(&handoff.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(handoff.id.clone(), handoff.clone());
        Ok(handoff)
    }

    fn update(&self, handoff: RideHandoff) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("handoff mutex poisoned");
        if guard.contains_key(&handoff.id) {
            guard.insert(handoff.id.clone(), handoff);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &HandoffId) -> Result<Option<RideHandoff>, RepositoryError> {
        let guard = self.records.lock().expect("handoff mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}
