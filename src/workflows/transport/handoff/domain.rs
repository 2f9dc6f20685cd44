use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::transport::authorization::RideId;

/// Identifier wrapper for drivers exchanging rides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(pub String);

/// Identifier wrapper for handoff offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandoffId(pub String);

/// Lifecycle of a peer-to-peer ride offer. Only an `Offered` handoff can be
/// resolved; every other state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStatus {
    Offered,
    Accepted,
    Refused,
    Withdrawn,
}

impl HandoffStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
            Self::Withdrawn => "withdrawn",
        }
    }
}

/// A ride offered by one driver to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideHandoff {
    pub id: HandoffId,
    pub ride_id: RideId,
    pub from_driver: DriverId,
    pub to_driver: DriverId,
    pub status: HandoffStatus,
    pub offered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}
