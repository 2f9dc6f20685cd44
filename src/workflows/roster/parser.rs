use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::mapping;
use super::RosterImportError;
use crate::workflows::transport::authorization::{
    DocumentId, DocumentKind, PatientId, PrescriptionDocument, Ride, RideId, RideStatus,
    TransportKind,
};

#[derive(Debug, Deserialize)]
struct RideRow {
    #[serde(rename = "Ride ID")]
    id: String,
    #[serde(rename = "Patient")]
    patient: String,
    #[serde(rename = "Scheduled At")]
    scheduled_at: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Round Trip", default, deserialize_with = "empty_string_as_none")]
    round_trip: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentRow {
    #[serde(rename = "Document ID")]
    id: String,
    #[serde(rename = "Patient")]
    patient: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Uploaded At")]
    uploaded_at: String,
    #[serde(rename = "Max Trips", default, deserialize_with = "empty_string_as_none")]
    max_trips: Option<String>,
}

pub(crate) fn parse_rides<R: Read>(reader: R) -> Result<Vec<Ride>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rides = Vec::new();

    for record in csv_reader.deserialize::<RideRow>() {
        let row = record?;

        let scheduled_at =
            parse_datetime(&row.scheduled_at).ok_or_else(|| RosterImportError::InvalidTimestamp {
                row: row.id.clone(),
                value: row.scheduled_at.clone(),
            })?;

        let kind = mapping::kind_for(&row.kind).ok_or_else(|| RosterImportError::UnknownKind {
            row: row.id.clone(),
            value: row.kind.clone(),
        })?;

        let status = match row.status.as_deref() {
            Some(value) => {
                mapping::status_for(value).ok_or_else(|| RosterImportError::UnknownStatus {
                    row: row.id.clone(),
                    value: value.to_string(),
                })?
            }
            None => RideStatus::Scheduled,
        };

        let round_trip = row
            .round_trip
            .as_deref()
            .map(mapping::truthy)
            .unwrap_or(kind == TransportKind::RoundTrip);

        rides.push(Ride {
            id: RideId(row.id),
            patient_id: PatientId(row.patient),
            scheduled_at,
            kind,
            round_trip,
            status,
        });
    }

    Ok(rides)
}

pub(crate) fn parse_documents<R: Read>(
    reader: R,
) -> Result<Vec<PrescriptionDocument>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut documents = Vec::new();

    for record in csv_reader.deserialize::<DocumentRow>() {
        let row = record?;

        let uploaded_at =
            parse_datetime(&row.uploaded_at).ok_or_else(|| RosterImportError::InvalidTimestamp {
                row: row.id.clone(),
                value: row.uploaded_at.clone(),
            })?;

        let kind = mapping::document_kind_for(&row.kind).ok_or_else(|| {
            RosterImportError::UnknownDocumentType {
                row: row.id.clone(),
                value: row.kind.clone(),
            }
        })?;

        // Only authorizations carry a trip count; other scans default to zero.
        let max_authorized_trips = match (&row.max_trips, kind) {
            (Some(value), _) => {
                value
                    .parse::<u32>()
                    .map_err(|_| RosterImportError::InvalidTripCount {
                        row: row.id.clone(),
                        value: value.clone(),
                    })?
            }
            (None, DocumentKind::TransportAuthorization) => {
                return Err(RosterImportError::InvalidTripCount {
                    row: row.id.clone(),
                    value: String::new(),
                })
            }
            (None, _) => 0,
        };

        documents.push(PrescriptionDocument {
            id: DocumentId(row.id),
            patient_id: PatientId(row.patient),
            kind,
            uploaded_at,
            max_authorized_trips,
        });
    }

    Ok(documents)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_datetime(value)
}
