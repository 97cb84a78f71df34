// Background workers: the evaluator tick and the change feed consumer.
//
// Responsibilities
// - Re-evaluate the board on a fixed interval so countdowns and windows move
//   without user input; the reconciler re-fetches on day rollover.
// - Turn store change notifications into re-fetches, one per burst.

use crate::modules::habits::core::ports::HabitStore;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use crate::shared::infrastructure::change_feed::ChangeEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub fn spawn_tick_worker<TStore>(
    habits: Arc<HabitsReconciler<TStore>>,
    every: Duration,
) -> JoinHandle<()>
where
    TStore: HabitStore + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        info!(every_secs = every.as_secs(), "tick worker started");
        loop {
            ticker.tick().await;
            debug!("tick");
            habits.tick().await;
        }
    })
}

pub fn spawn_change_worker<TStore>(
    habits: Arc<HabitsReconciler<TStore>>,
    changes: broadcast::Receiver<ChangeEvent>,
) -> JoinHandle<()>
where
    TStore: HabitStore + ?Sized + 'static,
{
    tokio::spawn(run_change_worker(habits, changes))
}

/// Consumes the feed until it closes. Events already queued behind the first
/// one are drained, so a burst costs a single re-fetch.
pub async fn run_change_worker<TStore>(
    habits: Arc<HabitsReconciler<TStore>>,
    mut changes: broadcast::Receiver<ChangeEvent>,
) where
    TStore: HabitStore + ?Sized,
{
    loop {
        match changes.recv().await {
            Ok(first) => {
                let mut burst = vec![first];
                while let Ok(next) = changes.try_recv() {
                    burst.push(next);
                }
                debug!(events = burst.len(), "change burst received");
                for event in &burst {
                    if habits.on_change(event).await {
                        break;
                    }
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "change feed lagged, re-fetching");
                let _ = habits.refresh().await;
            }
            Err(RecvError::Closed) => {
                info!("change feed closed, stopping worker");
                break;
            }
        }
    }
}
