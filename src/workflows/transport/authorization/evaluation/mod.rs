mod config;
mod ledger;
mod policy;

pub use config::QuotaConfig;

use super::domain::{PrescriptionDocument, QuotaEvaluation, QuotaOutcome, Ride, RideStatus};

/// Stateless evaluator deciding, per ride, whether the patient's transport
/// authorization is missing, open-ended, healthy, nearly exhausted, or
/// exhausted.
///
/// Pure over its inputs: callers supply fresh ride/document snapshots and
/// re-invoke whenever those change. The engine holds no cache and performs no
/// I/O.
pub struct QuotaEngine {
    config: QuotaConfig,
}

impl QuotaEngine {
    pub fn new(config: QuotaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    /// Evaluate one ride against the patient's document and ride history.
    ///
    /// Rides outside the authorization-requiring set, and rides already
    /// finished, yield `NotRequired`. A blank patient identifier or the
    /// absence of any transport authorization yields `Missing` rather than an
    /// error; both are recoverable by a normal driver action.
    pub fn evaluate(
        &self,
        ride: &Ride,
        documents: &[PrescriptionDocument],
        rides: &[Ride],
    ) -> QuotaOutcome {
        if !ride.kind.requires_authorization() || ride.status == RideStatus::Finished {
            return QuotaOutcome::NotRequired;
        }

        if ride.patient_id.is_blank() {
            return QuotaOutcome::Evaluated(QuotaEvaluation::missing());
        }

        let governing = match ledger::governing_prescription(&ride.patient_id, documents) {
            Some(document) => document,
            None => return QuotaOutcome::Evaluated(QuotaEvaluation::missing()),
        };

        if governing.max_authorized_trips >= self.config.unlimited_trip_threshold {
            return QuotaOutcome::Evaluated(QuotaEvaluation::unlimited(
                governing.max_authorized_trips,
            ));
        }

        let consumed = ledger::consumed_since(
            &ride.patient_id,
            governing.uploaded_at,
            rides,
            &self.config,
        );

        QuotaOutcome::Evaluated(policy::classify(governing, consumed, &self.config))
    }
}

impl Default for QuotaEngine {
    fn default() -> Self {
        Self::new(QuotaConfig::default())
    }
}
