use crate::modules::habits::core::decision::{DecideError, Decision};
use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::habit::RecordId;
use crate::modules::habits::core::intents::HabitIntent;
use crate::modules::habits::core::state::HabitsState;
use crate::modules::habits::use_cases::undo_record::command::UndoRecord;

/// Removes the record from view right away and asks for the delete.
/// A record the store has not confirmed yet cannot be undone.
pub fn decide_undo(state: &HabitsState, command: UndoRecord) -> Decision {
    let record_id = command.record_id;
    match (state.find_record(&record_id), record_id) {
        (None, _) => Decision::Rejected {
            reason: DecideError::RecordNotFound(record_id),
        },
        (Some(_), RecordId::Provisional(_)) => Decision::Rejected {
            reason: DecideError::RecordNotConfirmed(record_id),
        },
        (Some(_), RecordId::Persisted(id)) => Decision::Accepted {
            events: vec![HabitEvent::RecordRemoved { record_id }],
            intents: vec![HabitIntent::DeleteRecord { record_id: id }],
        },
    }
}

#[cfg(test)]
mod undo_record_decide_tests {
    use super::*;
    use crate::modules::habits::core::evaluate::{DisplayState, evaluate};
    use crate::modules::habits::core::evolve::evolve;
    use crate::tests::fixtures::habits::{HabitBuilder, RecordBuilder, local_at, slot};
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> HabitsState {
        let confirmed = RecordBuilder::new(1)
            .id(8)
            .logged_at(local_at(2026, 10, 19, 8, 50))
            .slot("09:00")
            .build();
        HabitsState {
            habits: vec![
                HabitBuilder::new(1)
                    .slots(&["09:00", "21:00"])
                    .records(vec![confirmed])
                    .build(),
            ],
            ..HabitsState::default()
        }
    }

    #[rstest]
    fn it_should_remove_the_record_and_ask_for_the_delete(state: HabitsState) {
        let decision = decide_undo(
            &state,
            UndoRecord {
                record_id: RecordId::Persisted(8),
            },
        );
        let Decision::Accepted { events, intents } = decision else {
            panic!("expected Accepted");
        };
        assert_eq!(intents, vec![HabitIntent::DeleteRecord { record_id: 8 }]);

        let now = local_at(2026, 10, 19, 9, 10);
        assert_eq!(
            evaluate(state.habit(1).unwrap(), &now).state,
            DisplayState::Countdown {
                slot: slot("21:00"),
                minutes_remaining: 710
            }
        );
        let undone = events.into_iter().fold(state, evolve);
        assert_eq!(
            evaluate(undone.habit(1).unwrap(), &now).state,
            DisplayState::AwaitingInput {
                slot: Some(slot("09:00"))
            }
        );
    }

    #[rstest]
    fn it_should_reject_unknown_records(state: HabitsState) {
        let decision = decide_undo(
            &state,
            UndoRecord {
                record_id: RecordId::Persisted(99),
            },
        );
        assert!(matches!(
            decision,
            Decision::Rejected {
                reason: DecideError::RecordNotFound(RecordId::Persisted(99))
            }
        ));
    }

    #[rstest]
    fn it_should_reject_records_still_being_saved(state: HabitsState) {
        let provisional = RecordBuilder::new(1).provisional().build();
        let record_id = provisional.id;
        let state = evolve(
            state,
            HabitEvent::RecordSpliced {
                record: provisional,
            },
        );
        let decision = decide_undo(&state, UndoRecord { record_id });
        assert!(matches!(
            decision,
            Decision::Rejected {
                reason: DecideError::RecordNotConfirmed(_)
            }
        ));
    }
}
