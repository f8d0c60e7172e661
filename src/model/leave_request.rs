use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a time-off request. Stored lowercase in the `state` column.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveState {
    Draft,
    Confirmed,
    Approved,
    Refused,
    Cancelled,
}

impl LeaveState {
    /// Only requests that never reached validation may be removed;
    /// approved and confirmed ones stay for the audit trail.
    pub fn is_deletable(self) -> bool {
        matches!(
            self,
            LeaveState::Draft | LeaveState::Cancelled | LeaveState::Refused
        )
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub date_from: NaiveDateTime,
    pub date_to: NaiveDateTime,
    pub leave_type: String,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::LeaveState;

    #[test]
    fn state_round_trips_through_its_column_form() {
        for state in [
            LeaveState::Draft,
            LeaveState::Confirmed,
            LeaveState::Approved,
            LeaveState::Refused,
            LeaveState::Cancelled,
        ] {
            let stored = state.to_string();
            assert_eq!(stored, stored.to_lowercase());
            assert_eq!(stored.parse::<LeaveState>().unwrap(), state);
        }
    }

    #[test]
    fn only_unvalidated_states_are_deletable() {
        assert!(LeaveState::Draft.is_deletable());
        assert!(LeaveState::Cancelled.is_deletable());
        assert!(LeaveState::Refused.is_deletable());
        assert!(!LeaveState::Confirmed.is_deletable());
        assert!(!LeaveState::Approved.is_deletable());
    }
}
