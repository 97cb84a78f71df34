use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use habit_tracker::modules::coach::adapters::outbound::rest_coach::RestCoachClient;
use habit_tracker::modules::coach::adapters::outbound::scripted_coach::ScriptedCoach;
use habit_tracker::modules::coach::core::ports::CoachClient;
use habit_tracker::modules::coach::use_cases::send_message::handler::SendMessageHandler;
use habit_tracker::modules::habits::adapters::outbound::in_memory_store::InMemoryHabitStore;
use habit_tracker::modules::habits::adapters::outbound::rest_store::RestHabitStore;
use habit_tracker::modules::habits::core::ports::HabitStore;
use habit_tracker::modules::habits::use_cases::reconciler::HabitsReconciler;
use habit_tracker::modules::notifications::adapters::outbound::in_memory_registry::InMemoryPushRegistry;
use habit_tracker::modules::notifications::adapters::outbound::rest_registry::RestPushRegistry;
use habit_tracker::modules::notifications::core::ports::PushRegistry;
use habit_tracker::modules::notifications::use_cases::toggle_push::handler::TogglePushHandler;
use habit_tracker::shared::core::clock::{Clock, SystemClock};
use habit_tracker::shared::infrastructure::change_feed::ChangeFeed;
use habit_tracker::shared::infrastructure::rest_client::{RestClient, RestConfig};
use habit_tracker::shell::config::{AppConfig, Backend, CoachBackend};
use habit_tracker::shell::http::router;
use habit_tracker::shell::state::AppState;
use habit_tracker::shell::workers::{spawn_change_worker, spawn_tick_worker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let rest_client = match &config.remote {
        Some(remote) => Some(
            RestClient::new(RestConfig {
                base_url: remote.base_url.clone(),
                api_key: remote.api_key.clone(),
                access_token: remote.access_token.clone(),
                timeout: config.request_timeout,
            })
            .context("could not build the REST client")?,
        ),
        None => None,
    };

    let changes = Arc::new(ChangeFeed::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let remote_store = match (&config.store, &rest_client) {
        (Backend::Remote, Some(client)) => Some(client),
        _ => None,
    };
    let store: Arc<dyn HabitStore> = match remote_store {
        Some(client) => Arc::new(RestHabitStore::new(client.clone(), config.request_timeout)),
        None => Arc::new(InMemoryHabitStore::with_change_feed(changes.clone())),
    };
    let registry: Arc<dyn PushRegistry> = match remote_store {
        Some(client) => Arc::new(RestPushRegistry::new(client.clone())),
        None => Arc::new(InMemoryPushRegistry::new()),
    };
    let coach: Arc<dyn CoachClient> = match (&config.coach, &rest_client) {
        (CoachBackend::Remote, Some(client)) => Arc::new(RestCoachClient::new(client.clone())),
        _ => Arc::new(ScriptedCoach::new()),
    };
    tracing::info!(store = ?config.store, coach = ?config.coach, user_id = %config.user_id, "adapters selected");

    let habits = Arc::new(HabitsReconciler::new(
        config.user_id.clone(),
        store,
        clock.clone(),
        config.request_timeout,
    ));
    if let Err(err) = habits.refresh().await {
        tracing::warn!(error = %err, "initial load failed, serving the retry path");
    }

    let send_message = Arc::new(SendMessageHandler::new(
        coach,
        clock,
        config.request_timeout,
    ));
    let toggle_push = Arc::new(TogglePushHandler::new(
        registry,
        config.user_id.clone(),
        config.vapid_public_key.clone(),
        config.request_timeout,
    ));

    spawn_tick_worker(habits.clone(), config.tick_interval);
    spawn_change_worker(habits.clone(), changes.subscribe());

    let state = AppState::new(habits, send_message, toggle_push, changes);
    let app = router(state);

    tracing::info!("habit tracker listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("could not bind {}", config.bind_addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
