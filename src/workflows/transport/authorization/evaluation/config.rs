use serde::{Deserialize, Serialize};

/// Dials governing quota classification.
///
/// Authorizations are granted in round-trip units: a round trip consumes a
/// full unit, a single leg half of one. A prescription whose trip count meets
/// `unlimited_trip_threshold` is an open-ended series authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaConfig {
    pub unlimited_trip_threshold: u32,
    pub low_remaining_threshold: f64,
    pub round_trip_weight: f64,
    pub single_leg_weight: f64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            unlimited_trip_threshold: 1000,
            low_remaining_threshold: 1.0,
            round_trip_weight: 1.0,
            single_leg_weight: 0.5,
        }
    }
}
