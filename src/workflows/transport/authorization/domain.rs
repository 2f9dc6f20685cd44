use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for scheduled rides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RideId(pub String);

/// Identifier wrapper for scanned documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// Stable patient identifier correlating rides, documents, and quota windows.
///
/// The upstream system keyed this on the patient's display name; a typo there
/// splits the consumption history, so the identifier is an opaque stable key
/// and blank values are treated as absence of coverage rather than matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(pub String);

impl PatientId {
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Transport categories offered to drivers when scheduling a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    OneWay,
    Return,
    RoundTrip,
    Consultation,
    Hospitalization,
    DayHospital,
    Private,
}

impl TransportKind {
    /// Medical transport categories are reimbursed by the payer and require a
    /// transport authorization; private courtesy rides do not.
    pub const fn requires_authorization(self) -> bool {
        !matches!(self, Self::Private)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OneWay => "One-way",
            Self::Return => "Return",
            Self::RoundTrip => "Round trip",
            Self::Consultation => "Consultation",
            Self::Hospitalization => "Hospitalization",
            Self::DayHospital => "Day hospital",
            Self::Private => "Private",
        }
    }
}

/// Lifecycle tag mutated by the driver as the ride progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Scheduled,
    Dispatched,
    Started,
    Finished,
    Cancelled,
}

impl RideStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Dispatched => "Dispatched",
            Self::Started => "Started",
            Self::Finished => "Finished",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// A planned or completed transport. Read-only input to the quota engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ride {
    pub id: RideId,
    pub patient_id: PatientId,
    pub scheduled_at: DateTime<Utc>,
    pub kind: TransportKind,
    pub round_trip: bool,
    pub status: RideStatus,
}

/// Document categories a driver can scan into a patient file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    TransportAuthorization,
    InsuranceCard,
    Identity,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TransportAuthorization => "Transport authorization",
            Self::InsuranceCard => "Insurance card",
            Self::Identity => "Identity document",
        }
    }
}

/// A scanned paper prescription ("bon de transport") granting authorized trips.
///
/// Immutable once stored; a newer upload for the same patient supersedes it as
/// the governing prescription from its `uploaded_at` onward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionDocument {
    pub id: DocumentId,
    pub patient_id: PatientId,
    pub kind: DocumentKind,
    pub uploaded_at: DateTime<Utc>,
    pub max_authorized_trips: u32,
}

/// Per-ride authorization status surfaced to the driver as a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaState {
    Missing,
    ValidUnlimited,
    Ok,
    Low,
    Exhausted,
}

impl QuotaState {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::ValidUnlimited => "valid_unlimited",
            Self::Ok => "ok",
            Self::Low => "low",
            Self::Exhausted => "exhausted",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Missing => "No transport authorization on file",
            Self::ValidUnlimited => "Open-ended series authorization",
            Self::Ok => "Authorization on file",
            Self::Low => "Authorization nearly exhausted",
            Self::Exhausted => "Authorization exhausted",
        }
    }
}

/// Result of evaluating one ride against the patient's governing prescription.
///
/// `consumed` and `remaining` are only defined for counted prescriptions; a
/// missing or open-ended authorization leaves them unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaEvaluation {
    pub state: QuotaState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_authorized: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
}

impl QuotaEvaluation {
    pub(crate) fn missing() -> Self {
        Self {
            state: QuotaState::Missing,
            consumed: None,
            max_authorized: None,
            remaining: None,
        }
    }

    pub(crate) fn unlimited(max_authorized: u32) -> Self {
        Self {
            state: QuotaState::ValidUnlimited,
            consumed: None,
            max_authorized: Some(max_authorized),
            remaining: None,
        }
    }
}

/// Outcome of the per-ride policy filter plus evaluation.
///
/// Rides outside the authorization-requiring set (and rides already finished)
/// produce `NotRequired` rather than an error or a banner.
#[derive(Debug, Clone, PartialEq)]
pub enum QuotaOutcome {
    NotRequired,
    Evaluated(QuotaEvaluation),
}

impl QuotaOutcome {
    pub fn evaluation(&self) -> Option<&QuotaEvaluation> {
        match self {
            Self::NotRequired => None,
            Self::Evaluated(evaluation) => Some(evaluation),
        }
    }
}
