use crate::modules::habits::core::evaluate::DisplayState;
use crate::modules::habits::core::habit::HabitId;
use crate::modules::habits::use_cases::manage_habit::command::ManageHabit;
use crate::modules::habits::use_cases::record_outcome::command::RecordOutcome;
use crate::modules::habits::use_cases::undo_record::command::UndoRecord;
use crate::tests::fixtures::app::TestApp;
use crate::tests::fixtures::habits::{HabitBuilder, USER_ID, local_at, slot};

fn display_state(test_app: &TestApp, habit_id: HabitId) -> DisplayState {
    test_app
        .state
        .habits
        .board()
        .card(habit_id)
        .unwrap()
        .evaluation
        .state
        .clone()
}

#[tokio::test]
async fn walks_a_twice_daily_habit_through_one_day() {
    let test_app = TestApp::at(local_at(2026, 10, 19, 8, 30));
    let habit_id = test_app
        .state
        .manage_habit
        .handle(ManageHabit::Create {
            draft: HabitBuilder::new(0)
                .name("Vitamins")
                .slots(&["09:00", "21:00"])
                .draft(),
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        display_state(&test_app, habit_id),
        DisplayState::AwaitingInput {
            slot: Some(slot("09:00"))
        }
    );

    let morning = test_app
        .state
        .record_outcome
        .handle(RecordOutcome::new(USER_ID, habit_id, true, None))
        .await
        .unwrap();
    assert_eq!(morning.target_slot, Some(slot("09:00")));

    let board = test_app.state.habits.board();
    let card = board.card(habit_id).unwrap();
    assert_eq!(
        card.evaluation.state,
        DisplayState::Countdown {
            slot: slot("21:00"),
            minutes_remaining: 750
        }
    );
    assert_eq!(card.message.as_deref(), Some("12h 30m left"));

    test_app.clock.set(local_at(2026, 10, 19, 20, 30));
    test_app.state.habits.tick().await;
    let evening = test_app
        .state
        .record_outcome
        .handle(RecordOutcome::new(USER_ID, habit_id, false, None))
        .await
        .unwrap();
    assert_eq!(evening.target_slot, Some(slot("21:00")));
    assert_eq!(display_state(&test_app, habit_id), DisplayState::Completed);

    test_app
        .state
        .undo_record
        .handle(UndoRecord {
            record_id: evening.id,
        })
        .await
        .unwrap();
    assert_eq!(
        display_state(&test_app, habit_id),
        DisplayState::AwaitingInput {
            slot: Some(slot("21:00"))
        }
    );
    assert_eq!(test_app.store.records().await, vec![morning]);

    test_app
        .state
        .manage_habit
        .handle(ManageHabit::Update {
            habit_id,
            draft: HabitBuilder::new(habit_id)
                .name("Vitamins")
                .slots(&["10:00"])
                .draft(),
        })
        .await
        .unwrap();
    assert!(test_app.store.records().await.is_empty());
    assert_eq!(display_state(&test_app, habit_id), DisplayState::DayEnded);

    test_app.clock.set(local_at(2026, 10, 20, 0, 1));
    test_app.state.habits.tick().await;
    assert_eq!(
        display_state(&test_app, habit_id),
        DisplayState::Countdown {
            slot: slot("10:00"),
            minutes_remaining: 599
        }
    );
}

#[tokio::test]
async fn keeps_an_in_flight_record_visible_across_a_refetch() {
    let test_app = TestApp::new();
    let habit_id = test_app
        .seed_habit(HabitBuilder::new(0).slots(&["09:00"]).draft())
        .await;
    test_app.store.set_delay_ms(50);

    let recording = {
        let handler = test_app.state.record_outcome.clone();
        tokio::spawn(async move {
            handler
                .handle(RecordOutcome::new(USER_ID, habit_id, true, None))
                .await
        })
    };
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    // The insert is already waiting out its delay; the re-fetch runs without one.
    test_app.store.set_delay_ms(0);
    test_app.state.habits.refresh().await.unwrap();

    let today = |test_app: &TestApp| {
        test_app
            .state
            .habits
            .board()
            .card(habit_id)
            .unwrap()
            .habit
            .today_records
            .clone()
    };
    let during = today(&test_app);
    assert_eq!(during.len(), 1);
    assert!(during[0].id.is_provisional());

    let saved = recording.await.unwrap().unwrap();
    assert_eq!(today(&test_app), vec![saved]);
}
