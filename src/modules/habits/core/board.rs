// Board: the evaluated view of HabitsState that the HTTP surface serves and the
// reconciler publishes after every batch and tick.

use crate::modules::habits::core::evaluate::{Evaluation, evaluate};
use crate::modules::habits::core::habit::{Habit, HabitId};
use crate::modules::habits::core::state::{HabitsState, LoadStatus, Notice};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitCard {
    pub habit: Habit,
    pub day_labels: Vec<&'static str>,
    pub evaluation: Evaluation,
    pub message: Option<String>,
}

impl HabitCard {
    fn of(habit: &Habit, now: &DateTime<FixedOffset>) -> Self {
        let evaluation = evaluate(habit, now);
        Self {
            habit: habit.clone(),
            day_labels: habit.schedule.days.labels(),
            message: evaluation.state.message(),
            evaluation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub generated_at: DateTime<FixedOffset>,
    #[serde(flatten)]
    pub load_status: LoadStatus,
    pub cards: Vec<HabitCard>,
    pub selected: Option<HabitCard>,
    pub editing: Option<HabitId>,
    pub notices: Vec<Notice>,
}

impl Board {
    pub fn card(&self, habit_id: HabitId) -> Option<&HabitCard> {
        self.cards.iter().find(|c| c.habit.id == habit_id)
    }
}

pub fn build_board(state: &HabitsState, now: &DateTime<FixedOffset>) -> Board {
    let cards: Vec<HabitCard> = state
        .habits
        .iter()
        .map(|habit| HabitCard::of(habit, now))
        .collect();
    let selected = state
        .selected
        .and_then(|id| cards.iter().find(|c| c.habit.id == id).cloned());
    Board {
        generated_at: *now,
        load_status: state.load_status.clone(),
        cards,
        selected,
        editing: state.editing_habit().map(|h| h.id),
        notices: state.notices.clone(),
    }
}
