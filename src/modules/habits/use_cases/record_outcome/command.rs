use crate::modules::habits::core::habit::{HabitId, RecordId};
use crate::modules::habits::core::schedule::SlotTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub record_id: RecordId,
    pub user_id: String,
    pub habit_id: HabitId,
    pub success: bool,
    pub target_slot: Option<SlotTime>,
}

impl RecordOutcome {
    /// A command for a new record, identified by a fresh provisional id.
    pub fn new(
        user_id: impl Into<String>,
        habit_id: HabitId,
        success: bool,
        target_slot: Option<SlotTime>,
    ) -> Self {
        Self {
            record_id: RecordId::provisional(),
            user_id: user_id.into(),
            habit_id,
            success,
            target_slot,
        }
    }
}

#[cfg(test)]
mod record_outcome_command_tests {
    use super::*;
    use crate::tests::fixtures::habits::{USER_ID, slot};
    use rstest::rstest;

    #[rstest]
    fn it_should_create_the_command_with_a_provisional_id() {
        let command = RecordOutcome::new(USER_ID, 3, true, Some(slot("09:00")));
        assert!(command.record_id.is_provisional());
        assert_eq!(command.user_id, "user-fixed-0001");
        assert_eq!(command.target_slot, Some(slot("09:00")));
    }
}
