use chrono::{DateTime, Utc};

use super::super::domain::{
    DocumentKind, PatientId, PrescriptionDocument, Ride, RideStatus,
};
use super::config::QuotaConfig;

/// Select the governing prescription for a patient: the transport
/// authorization with the greatest `uploaded_at`. Identical upload timestamps
/// are broken by greater document id so the selection stays deterministic.
pub(crate) fn governing_prescription<'a>(
    patient: &PatientId,
    documents: &'a [PrescriptionDocument],
) -> Option<&'a PrescriptionDocument> {
    documents
        .iter()
        .filter(|document| document.kind == DocumentKind::TransportAuthorization)
        .filter(|document| !document.patient_id.is_blank() && document.patient_id == *patient)
        .max_by(|a, b| {
            a.uploaded_at
                .cmp(&b.uploaded_at)
                .then_with(|| a.id.cmp(&b.id))
        })
}

/// Sum the trip-pair units consumed by the patient's rides inside the
/// governing window. Cancelled rides never consume; every other lifecycle
/// state does, including finished rides.
pub(crate) fn consumed_since(
    patient: &PatientId,
    window_start: DateTime<Utc>,
    rides: &[Ride],
    config: &QuotaConfig,
) -> f64 {
    rides
        .iter()
        .filter(|ride| ride.patient_id == *patient)
        .filter(|ride| ride.status != RideStatus::Cancelled)
        .filter(|ride| ride.scheduled_at >= window_start)
        .map(|ride| {
            if ride.round_trip {
                config.round_trip_weight
            } else {
                config.single_leg_weight
            }
        })
        .sum()
}
