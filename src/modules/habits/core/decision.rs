use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::habit::{HabitId, RecordId};
use crate::modules::habits::core::intents::HabitIntent;
use crate::modules::habits::core::schedule::SlotTime;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DecideError {
    #[error("habit {0} not found")]
    HabitNotFound(HabitId),

    #[error("record {0} not found")]
    RecordNotFound(RecordId),

    #[error("record {0} is still being saved")]
    RecordNotConfirmed(RecordId),

    #[error("habit {0} is inactive")]
    HabitInactive(HabitId),

    #[error("habit {0} is not scheduled today")]
    NotScheduledToday(HabitId),

    #[error("slot {0} is not part of the habit's schedule")]
    UnknownSlot(SlotTime),

    #[error("slot {0} already has a record today")]
    SlotAlreadyRecorded(SlotTime),

    #[error("habit name must not be empty")]
    EmptyName,
}

#[derive(Debug)]
pub enum Decision {
    Accepted {
        events: Vec<HabitEvent>,
        intents: Vec<HabitIntent>,
    },
    Rejected {
        reason: DecideError,
    },
}
