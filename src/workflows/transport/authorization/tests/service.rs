use super::common::*;
use crate::workflows::transport::authorization::domain::{
    QuotaState, RideId, RideStatus, TransportKind,
};
use crate::workflows::transport::authorization::repository::{
    DocumentRepository, RepositoryError,
};
use crate::workflows::transport::authorization::service::{
    AttachmentOutcome, AttachmentRequest, AuthorizationServiceError, NewRide,
};

fn new_ride(round_trip: bool) -> NewRide {
    NewRide {
        patient_id: patient(),
        scheduled_at: at(2024, 3, 10),
        kind: if round_trip {
            TransportKind::RoundTrip
        } else {
            TransportKind::OneWay
        },
        round_trip,
    }
}

#[test]
fn submit_assigns_an_identity_and_schedules_the_ride() {
    let (service, _, _) = build_service();

    let ride = service.submit_ride(new_ride(false)).expect("ride stored");

    assert!(ride.id.0.starts_with("ride-"));
    assert_eq!(ride.status, RideStatus::Scheduled);
    assert_eq!(service.ride(&ride.id).expect("fetch").id, ride.id);
}

#[test]
fn set_status_advances_the_lifecycle() {
    let (service, _, _) = build_service();
    let ride = service.submit_ride(new_ride(false)).expect("ride stored");

    let updated = service
        .set_status(&ride.id, RideStatus::Started)
        .expect("status update");

    assert_eq!(updated.status, RideStatus::Started);
}

#[test]
fn unknown_rides_surface_not_found() {
    let (service, _, _) = build_service();

    let error = service
        .ride(&RideId("ride-999999".to_string()))
        .expect_err("missing ride");

    assert!(matches!(
        error,
        AuthorizationServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn quota_reflects_snapshots_refreshed_between_calls() {
    let (service, _, _) = build_service();
    let ride = service.submit_ride(new_ride(true)).expect("ride stored");

    let before = service.ride_quota(&ride.id).expect("quota");
    assert_eq!(before.state, QuotaState::Missing.tag());

    let outcome = service
        .attach_document(AttachmentRequest {
            ride_id: ride.id.clone(),
            scan: scan(Some(on(2024, 3, 1))),
            acknowledge_risk: false,
        })
        .expect("attach succeeds");
    assert!(matches!(outcome, AttachmentOutcome::Attached { .. }));

    let after = service.ride_quota(&ride.id).expect("quota");
    assert_eq!(after.state, QuotaState::Ok.tag());
    assert_eq!(after.consumed, Some(1.0));
    assert_eq!(after.remaining, Some(5.0));
}

#[test]
fn risky_attachments_block_until_acknowledged() {
    let (service, _, documents) = build_service();
    let ride = service.submit_ride(new_ride(false)).expect("ride stored");

    let outcome = service
        .attach_document(AttachmentRequest {
            ride_id: ride.id.clone(),
            scan: scan(Some(on(2024, 3, 11))),
            acknowledge_risk: false,
        })
        .expect("blocked is not an error");

    assert_eq!(
        outcome,
        AttachmentOutcome::BlockedPendingConfirmation {
            ride_on: on(2024, 3, 10),
            prescribed_on: on(2024, 3, 11),
        }
    );
    assert!(
        documents.for_patient(&patient()).expect("query").is_empty(),
        "blocked attach must not store the document"
    );
}

#[test]
fn acknowledged_risk_attaches_the_document() {
    let (service, _, documents) = build_service();
    let ride = service.submit_ride(new_ride(false)).expect("ride stored");

    let outcome = service
        .attach_document(AttachmentRequest {
            ride_id: ride.id.clone(),
            scan: scan(Some(on(2024, 3, 11))),
            acknowledge_risk: true,
        })
        .expect("attach succeeds");

    match outcome {
        AttachmentOutcome::Attached {
            document,
            risk_acknowledged,
        } => {
            assert!(risk_acknowledged);
            assert_eq!(document.max_authorized_trips, 6);
        }
        other => panic!("expected attached outcome, got {other:?}"),
    }
    assert_eq!(documents.for_patient(&patient()).expect("query").len(), 1);
}

#[test]
fn safe_attachments_proceed_without_interruption() {
    let (service, _, _) = build_service();
    let ride = service.submit_ride(new_ride(false)).expect("ride stored");

    let outcome = service
        .attach_document(AttachmentRequest {
            ride_id: ride.id.clone(),
            scan: scan(Some(on(2024, 3, 10))),
            acknowledge_risk: false,
        })
        .expect("attach succeeds");

    match outcome {
        AttachmentOutcome::Attached {
            risk_acknowledged, ..
        } => assert!(!risk_acknowledged),
        other => panic!("expected attached outcome, got {other:?}"),
    }
}

#[test]
fn attach_rejects_scans_for_a_different_patient() {
    use crate::workflows::transport::authorization::domain::PatientId;

    let (service, _, _) = build_service();
    let ride = service.submit_ride(new_ride(false)).expect("ride stored");

    let mut submission = scan(Some(on(2024, 3, 1)));
    submission.patient_id = PatientId("patient-9999".to_string());

    let error = service
        .attach_document(AttachmentRequest {
            ride_id: ride.id,
            scan: submission,
            acknowledge_risk: false,
        })
        .expect_err("patient mismatch rejected");

    assert!(matches!(error, AuthorizationServiceError::Intake(_)));
}

#[test]
fn attach_validates_the_scan_before_the_temporal_check() {
    let (service, _, _) = build_service();
    let ride = service.submit_ride(new_ride(false)).expect("ride stored");

    let error = service
        .attach_document(AttachmentRequest {
            ride_id: ride.id,
            scan: scan(None),
            acknowledge_risk: true,
        })
        .expect_err("missing prescribed date rejected");

    assert!(matches!(error, AuthorizationServiceError::Intake(_)));
}
