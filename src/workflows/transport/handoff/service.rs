use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{DriverId, HandoffId, HandoffStatus, RideHandoff};
use super::repository::HandoffRepository;
use crate::workflows::transport::authorization::{
    RepositoryError, RideId, RideRepository, RideStatus,
};

/// Service enforcing the accept/refuse semantics of peer-to-peer ride offers.
pub struct HandoffService<H, R> {
    handoffs: Arc<H>,
    rides: Arc<R>,
}

static HANDOFF_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_handoff_id() -> HandoffId {
    let id = HANDOFF_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    HandoffId(format!("handoff-{id:06}"))
}

/// Driver-entered payload offering a ride to a peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffOffer {
    pub ride_id: RideId,
    pub from_driver: DriverId,
    pub to_driver: DriverId,
}

impl<H, R> HandoffService<H, R>
where
    H: HandoffRepository + 'static,
    R: RideRepository + 'static,
{
    pub fn new(handoffs: Arc<H>, rides: Arc<R>) -> Self {
        Self { handoffs, rides }
    }

    /// Offer a ride to another driver. The ride must exist and still be open.
    pub fn offer(
        &self,
        offer: HandoffOffer,
        offered_at: DateTime<Utc>,
    ) -> Result<RideHandoff, HandoffError> {
        let ride = self
            .rides
            .fetch(&offer.ride_id)?
            .ok_or_else(|| HandoffError::RideNotFound(offer.ride_id.0.clone()))?;

        if offer.from_driver == offer.to_driver {
            return Err(HandoffError::SameDriver);
        }

        if matches!(ride.status, RideStatus::Finished | RideStatus::Cancelled) {
            return Err(HandoffError::RideClosed {
                ride: ride.id.0,
                status: ride.status.label(),
            });
        }

        let handoff = RideHandoff {
            id: next_handoff_id(),
            ride_id: offer.ride_id,
            from_driver: offer.from_driver,
            to_driver: offer.to_driver,
            status: HandoffStatus::Offered,
            offered_at,
            resolved_at: None,
        };

        let stored = self.handoffs.insert(handoff)?;
        Ok(stored)
    }

    pub fn accept(
        &self,
        id: &HandoffId,
        resolved_at: DateTime<Utc>,
    ) -> Result<RideHandoff, HandoffError> {
        self.resolve(id, HandoffStatus::Accepted, resolved_at)
    }

    pub fn refuse(
        &self,
        id: &HandoffId,
        resolved_at: DateTime<Utc>,
    ) -> Result<RideHandoff, HandoffError> {
        self.resolve(id, HandoffStatus::Refused, resolved_at)
    }

    /// The offering driver can take an unanswered offer back.
    pub fn withdraw(
        &self,
        id: &HandoffId,
        resolved_at: DateTime<Utc>,
    ) -> Result<RideHandoff, HandoffError> {
        self.resolve(id, HandoffStatus::Withdrawn, resolved_at)
    }

    fn resolve(
        &self,
        id: &HandoffId,
        status: HandoffStatus,
        resolved_at: DateTime<Utc>,
    ) -> Result<RideHandoff, HandoffError> {
        let mut handoff = self
            .handoffs
            .fetch(id)?
            .ok_or_else(|| HandoffError::NotFound(id.0.clone()))?;

        if handoff.status != HandoffStatus::Offered {
            return Err(HandoffError::AlreadyResolved {
                id: handoff.id.0,
                status: handoff.status.label(),
            });
        }

        handoff.status = status;
        handoff.resolved_at = Some(resolved_at);
        self.handoffs.update(handoff.clone())?;
        Ok(handoff)
    }
}

/// Error raised by the handoff service.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("ride {0} not found")]
    RideNotFound(String),
    #[error("a ride cannot be offered to the driver who already holds it")]
    SameDriver,
    #[error("ride {ride} is {status} and can no longer be handed off")]
    RideClosed { ride: String, status: &'static str },
    #[error("handoff {0} not found")]
    NotFound(String),
    #[error("handoff {id} was already {status}")]
    AlreadyResolved { id: String, status: &'static str },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::transport::authorization::{
        InMemoryRideRepository, PatientId, Ride, TransportKind,
    };
    use crate::workflows::transport::handoff::repository::InMemoryHandoffRepository;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn seeded_service() -> (
        HandoffService<InMemoryHandoffRepository, InMemoryRideRepository>,
        RideId,
    ) {
        let rides = Arc::new(InMemoryRideRepository::default());
        let ride = Ride {
            id: RideId("ride-000042".to_string()),
            patient_id: PatientId("patient-0421".to_string()),
            scheduled_at: at(12),
            kind: TransportKind::OneWay,
            round_trip: false,
            status: RideStatus::Scheduled,
        };
        let ride_id = ride.id.clone();
        rides.insert(ride).expect("seed ride");

        let service = HandoffService::new(Arc::new(InMemoryHandoffRepository::default()), rides);
        (service, ride_id)
    }

    fn offer_for(ride_id: &RideId) -> HandoffOffer {
        HandoffOffer {
            ride_id: ride_id.clone(),
            from_driver: DriverId("driver-ana".to_string()),
            to_driver: DriverId("driver-bruno".to_string()),
        }
    }

    #[test]
    fn offered_rides_can_be_accepted() {
        let (service, ride_id) = seeded_service();

        let handoff = service.offer(offer_for(&ride_id), at(10)).expect("offer");
        assert_eq!(handoff.status, HandoffStatus::Offered);

        let accepted = service.accept(&handoff.id, at(11)).expect("accept");
        assert_eq!(accepted.status, HandoffStatus::Accepted);
        assert_eq!(accepted.resolved_at, Some(at(11)));
    }

    #[test]
    fn offered_rides_can_be_refused() {
        let (service, ride_id) = seeded_service();

        let handoff = service.offer(offer_for(&ride_id), at(10)).expect("offer");
        let refused = service.refuse(&handoff.id, at(11)).expect("refuse");

        assert_eq!(refused.status, HandoffStatus::Refused);
    }

    #[test]
    fn resolved_offers_cannot_be_resolved_again() {
        let (service, ride_id) = seeded_service();

        let handoff = service.offer(offer_for(&ride_id), at(10)).expect("offer");
        service.refuse(&handoff.id, at(11)).expect("refuse");

        let error = service
            .accept(&handoff.id, at(12))
            .expect_err("already resolved");
        assert!(matches!(
            error,
            HandoffError::AlreadyResolved {
                status: "refused",
                ..
            }
        ));
    }

    #[test]
    fn offers_to_the_holding_driver_are_rejected() {
        let (service, ride_id) = seeded_service();
        let mut offer = offer_for(&ride_id);
        offer.to_driver = offer.from_driver.clone();

        let error = service.offer(offer, at(10)).expect_err("same driver");
        assert!(matches!(error, HandoffError::SameDriver));
    }

    #[test]
    fn closed_rides_cannot_be_offered() {
        let (service, ride_id) = seeded_service();
        let rides = Arc::new(InMemoryRideRepository::default());
        let ride = Ride {
            id: RideId("ride-000043".to_string()),
            patient_id: PatientId("patient-0421".to_string()),
            scheduled_at: at(12),
            kind: TransportKind::OneWay,
            round_trip: false,
            status: RideStatus::Cancelled,
        };
        rides.insert(ride.clone()).expect("seed ride");
        let service_closed =
            HandoffService::new(Arc::new(InMemoryHandoffRepository::default()), rides);

        let error = service_closed
            .offer(
                HandoffOffer {
                    ride_id: ride.id.clone(),
                    from_driver: DriverId("driver-ana".to_string()),
                    to_driver: DriverId("driver-bruno".to_string()),
                },
                at(10),
            )
            .expect_err("closed ride");
        assert!(matches!(error, HandoffError::RideClosed { .. }));

        // The open ride from the main fixture still accepts offers.
        service.offer(offer_for(&ride_id), at(10)).expect("offer");
    }

    #[test]
    fn unknown_rides_surface_ride_not_found() {
        let (service, _) = seeded_service();

        let error = service
            .offer(offer_for(&RideId("ride-999999".to_string())), at(10))
            .expect_err("unknown ride");
        assert!(matches!(error, HandoffError::RideNotFound(_)));
    }
}
