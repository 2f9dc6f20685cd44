use super::super::domain::{PrescriptionDocument, QuotaEvaluation, QuotaState};
use super::config::QuotaConfig;

/// Classify a counted prescription from its consumption total.
///
/// `remaining <= 0` exhausts the authorization even when later rides pushed
/// consumption past the cap; the driver needs the warning on every ride still
/// ahead of them.
pub(crate) fn classify(
    governing: &PrescriptionDocument,
    consumed: f64,
    config: &QuotaConfig,
) -> QuotaEvaluation {
    let max_authorized = governing.max_authorized_trips;
    let remaining = f64::from(max_authorized) - consumed;

    let state = if remaining <= 0.0 {
        QuotaState::Exhausted
    } else if remaining <= config.low_remaining_threshold {
        QuotaState::Low
    } else {
        QuotaState::Ok
    };

    QuotaEvaluation {
        state,
        consumed: Some(consumed),
        max_authorized: Some(max_authorized),
        remaining: Some(remaining),
    }
}
