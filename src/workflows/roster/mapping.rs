use crate::workflows::transport::authorization::{DocumentKind, RideStatus, TransportKind};

/// Dispatch exports are hand-maintained spreadsheets; normalize the cell
/// before matching so casing, stray whitespace, and separator style do not
/// reject otherwise good rows.
fn normalize(value: &str) -> String {
    value
        .trim_start_matches('\u{feff}')
        .replace(['-', '_', '/'], " ")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn kind_for(value: &str) -> Option<TransportKind> {
    match normalize(value).as_str() {
        "one way" | "oneway" | "single" => Some(TransportKind::OneWay),
        "return" => Some(TransportKind::Return),
        "round trip" | "roundtrip" => Some(TransportKind::RoundTrip),
        "consultation" => Some(TransportKind::Consultation),
        "hospitalization" | "hospitalisation" => Some(TransportKind::Hospitalization),
        "day hospital" => Some(TransportKind::DayHospital),
        "private" | "courtesy" => Some(TransportKind::Private),
        _ => None,
    }
}

pub(crate) fn status_for(value: &str) -> Option<RideStatus> {
    match normalize(value).as_str() {
        "scheduled" | "planned" => Some(RideStatus::Scheduled),
        "dispatched" => Some(RideStatus::Dispatched),
        "started" | "in progress" => Some(RideStatus::Started),
        "finished" | "done" | "completed" => Some(RideStatus::Finished),
        "cancelled" | "canceled" => Some(RideStatus::Cancelled),
        _ => None,
    }
}

pub(crate) fn document_kind_for(value: &str) -> Option<DocumentKind> {
    match normalize(value).as_str() {
        "transport authorization" | "authorization" | "bt" | "bon de transport" => {
            Some(DocumentKind::TransportAuthorization)
        }
        "insurance card" | "carte vitale" => Some(DocumentKind::InsuranceCard),
        "identity" | "identity document" | "id" => Some(DocumentKind::Identity),
        _ => None,
    }
}

pub(crate) fn truthy(value: &str) -> bool {
    matches!(normalize(value).as_str(), "yes" | "y" | "true" | "1" | "x")
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize(value)
}
