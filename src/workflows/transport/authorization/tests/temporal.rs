use super::common::*;
use crate::workflows::transport::authorization::domain::{DocumentId, DocumentKind, PatientId};
use crate::workflows::transport::authorization::temporal::{
    temporal_risk, IntakeGate, IntakeViolation,
};

#[test]
fn same_day_prescription_is_not_risky() {
    assert!(!temporal_risk(on(2024, 3, 10), on(2024, 3, 10)));
}

#[test]
fn prescription_dated_after_the_ride_is_risky() {
    assert!(temporal_risk(on(2024, 3, 10), on(2024, 3, 11)));
}

#[test]
fn prescription_dated_before_the_ride_is_not_risky() {
    assert!(!temporal_risk(on(2024, 3, 10), on(2024, 3, 9)));
}

#[test]
fn time_of_day_is_ignored_by_the_check() {
    // Scans carry full timestamps; the check only ever sees calendar days,
    // so a late-evening ride and a same-day prescription stay safe.
    let ride_on = at(2024, 3, 10).date_naive();
    assert!(!temporal_risk(ride_on, on(2024, 3, 10)));
}

#[test]
fn gate_requires_a_prescribed_date() {
    let error = IntakeGate
        .document_from_scan(DocumentId("doc-1".to_string()), scan(None))
        .expect_err("prescribed date missing");

    assert!(matches!(error, IntakeViolation::MissingPrescribedDate));
}

#[test]
fn gate_rejects_blank_patient_identifiers() {
    let mut submission = scan(Some(on(2024, 3, 1)));
    submission.patient_id = PatientId(String::new());

    let error = IntakeGate
        .document_from_scan(DocumentId("doc-1".to_string()), submission)
        .expect_err("blank patient rejected");

    assert!(matches!(error, IntakeViolation::BlankPatient));
}

#[test]
fn gate_rejects_zero_capacity_authorizations() {
    let mut submission = scan(Some(on(2024, 3, 1)));
    submission.max_authorized_trips = 0;

    let error = IntakeGate
        .document_from_scan(DocumentId("doc-1".to_string()), submission)
        .expect_err("zero capacity rejected");

    assert!(matches!(error, IntakeViolation::ZeroCapacity));
}

#[test]
fn gate_produces_a_storable_authorization() {
    let (document, prescribed_on) = IntakeGate
        .document_from_scan(DocumentId("doc-9".to_string()), scan(Some(on(2024, 3, 1))))
        .expect("scan is valid");

    assert_eq!(document.id, DocumentId("doc-9".to_string()));
    assert_eq!(document.kind, DocumentKind::TransportAuthorization);
    assert_eq!(document.patient_id, patient());
    assert_eq!(document.max_authorized_trips, 6);
    assert_eq!(prescribed_on, on(2024, 3, 1));
}
