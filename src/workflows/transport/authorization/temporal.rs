use chrono::NaiveDate;

use super::domain::{DocumentId, DocumentKind, PatientId, PrescriptionDocument};

/// Day-granularity comparison of a prescription's written date against the
/// ride it covers.
///
/// A prescription dated strictly after its ride is the pattern the payer
/// rejects at reimbursement time; same-day prescriptions are valid.
pub fn temporal_risk(ride_on: NaiveDate, prescribed_on: NaiveDate) -> bool {
    prescribed_on > ride_on
}

/// Validation errors raised when a scanned authorization enters the system.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("patient identifier is blank")]
    BlankPatient,
    #[error("prescribed date is required before a transport authorization can be attached")]
    MissingPrescribedDate,
    #[error("a transport authorization must grant at least one trip")]
    ZeroCapacity,
    #[error("scan patient does not match the covered ride's patient")]
    PatientMismatch,
}

/// Scan payload captured by the upload workflow, before validation.
///
/// `prescribed_on` is the date written by the physician on the paper form; it
/// can differ from the upload timestamp and is what the temporal check reads.
#[derive(Debug, Clone)]
pub struct ScanSubmission {
    pub patient_id: PatientId,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub max_authorized_trips: u32,
    pub prescribed_on: Option<NaiveDate>,
}

/// Gate turning a raw scan into a storable `PrescriptionDocument`.
///
/// Shape violations are surfaced to the caller immediately; the temporal risk
/// itself is not an error and is decided afterwards against the covered ride.
#[derive(Debug, Clone, Default)]
pub struct IntakeGate;

impl IntakeGate {
    pub fn document_from_scan(
        &self,
        id: DocumentId,
        scan: ScanSubmission,
    ) -> Result<(PrescriptionDocument, NaiveDate), IntakeViolation> {
        if scan.patient_id.is_blank() {
            return Err(IntakeViolation::BlankPatient);
        }

        let prescribed_on = scan
            .prescribed_on
            .ok_or(IntakeViolation::MissingPrescribedDate)?;

        if scan.max_authorized_trips == 0 {
            return Err(IntakeViolation::ZeroCapacity);
        }

        let document = PrescriptionDocument {
            id,
            patient_id: scan.patient_id,
            kind: DocumentKind::TransportAuthorization,
            uploaded_at: scan.uploaded_at,
            max_authorized_trips: scan.max_authorized_trips,
        };

        Ok((document, prescribed_on))
    }
}
