use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::habit::{HabitId, RecordId};
use crate::modules::habits::core::intents::HabitIntent;
use crate::modules::habits::core::ports::{HabitStore, StoreError, bounded};
use std::time::Duration;
use tracing::{info, warn};

pub const RECORD_SAVE_FAILED: &str = "Could not save the record. Please try again.";
pub const RECORD_UNDO_FAILED: &str = "Could not undo the record. Please try again.";
pub const HABIT_SAVE_FAILED: &str = "Could not save the habit. Please try again.";
pub const HABIT_DELETE_FAILED: &str = "Could not delete the habit. Please try again.";

/// What executing a batch of intents produced: follow-up events to commit,
/// whether the caller must re-fetch, and the first failure if any.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub events: Vec<HabitEvent>,
    pub refetch: bool,
    pub created_habit: Option<HabitId>,
    pub error: Option<StoreError>,
}

impl DispatchReport {
    fn fail(&mut self, error: StoreError, rollback: Vec<HabitEvent>, notice: &str) {
        self.events.extend(rollback);
        self.events.push(HabitEvent::NoticeRaised {
            message: notice.to_string(),
        });
        self.refetch = true;
        self.error = Some(error);
    }
}

/// Execute intents against the store in order, each bounded by `timeout`.
/// Stops at the first failed mutation. A failed clear of today's records is only
/// logged and the batch continues.
pub async fn dispatch_intents<TStore>(
    store: &TStore,
    user_id: &str,
    timeout: Duration,
    intents: Vec<HabitIntent>,
) -> DispatchReport
where
    TStore: HabitStore + ?Sized,
{
    let mut report = DispatchReport::default();
    for intent in intents {
        match intent {
            HabitIntent::InsertRecord {
                provisional,
                record,
            } => match bounded(timeout, store.insert_record(&record)).await {
                Ok(saved) => report.events.push(HabitEvent::RecordConfirmed {
                    provisional,
                    record: saved,
                }),
                Err(err) => {
                    warn!(habit_id = record.habit_id, error = %err, "record insert failed, rolling back");
                    report.fail(
                        err,
                        vec![HabitEvent::RecordDiscarded { provisional }],
                        RECORD_SAVE_FAILED,
                    );
                    break;
                }
            },
            HabitIntent::DeleteRecord { record_id } => {
                let settled = HabitEvent::RecordDeleteSettled {
                    record_id: RecordId::Persisted(record_id),
                };
                match bounded(timeout, store.delete_record(record_id)).await {
                    Ok(()) => report.events.push(settled),
                    Err(err) => {
                        warn!(record_id, error = %err, "record delete failed, rolling back");
                        report.fail(err, vec![settled], RECORD_UNDO_FAILED);
                        break;
                    }
                }
            }
            HabitIntent::InsertHabit { draft } => {
                match bounded(timeout, store.insert_habit(user_id, &draft)).await {
                    Ok(row) => {
                        info!(habit_id = row.id, "habit created");
                        report.created_habit = Some(row.id);
                    }
                    Err(err) => {
                        warn!(error = %err, "habit insert failed");
                        report.fail(err, vec![], HABIT_SAVE_FAILED);
                        break;
                    }
                }
            }
            HabitIntent::UpdateHabit { habit_id, draft } => {
                match bounded(timeout, store.update_habit(habit_id, &draft)).await {
                    Ok(()) => info!(habit_id, "habit updated"),
                    Err(err) => {
                        warn!(habit_id, error = %err, "habit update failed");
                        report.fail(err, vec![], HABIT_SAVE_FAILED);
                        break;
                    }
                }
            }
            HabitIntent::DeleteHabit { habit_id } => {
                match bounded(timeout, store.delete_habit(habit_id)).await {
                    Ok(()) => info!(habit_id, "habit deleted"),
                    Err(err) => {
                        warn!(habit_id, error = %err, "habit delete failed");
                        report.fail(err, vec![], HABIT_DELETE_FAILED);
                        break;
                    }
                }
            }
            HabitIntent::ClearTodayRecords { habit_id, since } => {
                match bounded(timeout, store.delete_records_since(habit_id, since)).await {
                    Ok(removed) => info!(habit_id, removed, "cleared today's records after schedule change"),
                    Err(err) => warn!(habit_id, error = %err, "could not clear today's records, continuing"),
                }
            }
            HabitIntent::Refetch => report.refetch = true,
        }
    }
    report
}
