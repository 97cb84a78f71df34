// Composition root for the habit tracker.
//
// Responsibilities
// - Read config from environment.
// - Instantiate the store, coach and push adapters the config selects.
// - Wire them into use case handlers through AppState.
// - Spawn background workers (evaluator tick, change feed consumer).

pub mod config;
pub mod http;
pub mod state;
pub mod workers;
