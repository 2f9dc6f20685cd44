//! Offline quota audit over dispatch CSV exports.
//!
//! Drivers can pull ride and document snapshots out of their dispatch tooling
//! and run the same quota engine against them without touching the live
//! stores.

mod mapping;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::transport::authorization::{
    PrescriptionDocument, QuotaEngine, Ride, RideQuotaView,
};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidTimestamp { row: String, value: String },
    UnknownKind { row: String, value: String },
    UnknownStatus { row: String, value: String },
    UnknownDocumentType { row: String, value: String },
    InvalidTripCount { row: String, value: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidTimestamp { row, value } => {
                write!(f, "row '{}': '{}' is not a timestamp", row, value)
            }
            RosterImportError::UnknownKind { row, value } => {
                write!(f, "row '{}': unknown transport kind '{}'", row, value)
            }
            RosterImportError::UnknownStatus { row, value } => {
                write!(f, "row '{}': unknown ride status '{}'", row, value)
            }
            RosterImportError::UnknownDocumentType { row, value } => {
                write!(f, "row '{}': unknown document type '{}'", row, value)
            }
            RosterImportError::InvalidTripCount { row, value } => {
                write!(
                    f,
                    "row '{}': '{}' is not a valid authorized trip count",
                    row, value
                )
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Parsed snapshot of a driver's rides and patient documents.
#[derive(Debug, Clone)]
pub struct TransportRoster {
    pub rides: Vec<Ride>,
    pub documents: Vec<PrescriptionDocument>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        rides_path: P,
        documents_path: Q,
    ) -> Result<TransportRoster, RosterImportError> {
        let rides = std::fs::File::open(rides_path)?;
        let documents = std::fs::File::open(documents_path)?;
        Self::from_readers(rides, documents)
    }

    pub fn from_readers<A: Read, B: Read>(
        rides: A,
        documents: B,
    ) -> Result<TransportRoster, RosterImportError> {
        Ok(TransportRoster {
            rides: parser::parse_rides(rides)?,
            documents: parser::parse_documents(documents)?,
        })
    }
}

/// Evaluate every ride in the roster, ordered by schedule, producing the same
/// banner views the HTTP API serves.
pub fn quota_report(roster: &TransportRoster, engine: &QuotaEngine) -> Vec<RideQuotaView> {
    let mut rides = roster.rides.clone();
    rides.sort_by(|a, b| {
        a.scheduled_at
            .cmp(&b.scheduled_at)
            .then_with(|| a.id.0.cmp(&b.id.0))
    });

    rides
        .iter()
        .map(|ride| {
            let outcome = engine.evaluate(ride, &roster.documents, &roster.rides);
            RideQuotaView::from_outcome(ride, &outcome)
        })
        .collect()
}
