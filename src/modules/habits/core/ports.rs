// Ports define what the habits core needs from the backing store, without implementing it.
//
// Purpose
// - Describe the habit and record queries and mutations as one async trait.
//
// Responsibilities
// - Keep the core independent of the remote data store by coding against `HabitStore`.
// - Carry the timeout policy: every call made through `bounded` fails with
//   `StoreError::Timeout` once the configured bound elapses.
//
// Boundaries
// - No concrete input or output here. Adapters implement the trait in adapters/outbound.
//
// Testing guidance
// - Use the in-memory store; it has switches for offline mode, per-operation
//   failures and artificial latency.

use crate::modules::habits::core::habit::{Habit, HabitDraft, HabitId, HabitRecord};
use crate::modules::habits::core::schedule::{Schedule, SlotTime};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Table names as the store and its change feed report them.
pub const HABITS_TABLE: &str = "habit";
pub const RECORDS_TABLE: &str = "habitRecords";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("could not decode store response: {0}")]
    Decode(String),
}

/// A persisted habit as the store returns it, before today's records are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRow {
    pub id: HabitId,
    pub name: String,
    pub description: Option<String>,
    pub schedule: Schedule,
    pub active: bool,
}

impl HabitRow {
    pub fn into_habit(self, today_records: Vec<HabitRecord>) -> Habit {
        Habit {
            id: self.id,
            name: self.name,
            description: self.description,
            schedule: self.schedule,
            active: self.active,
            today_records,
        }
    }
}

/// Record fields sent on insert. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub user_id: String,
    pub habit_id: HabitId,
    pub success: bool,
    pub created_at: DateTime<Utc>,
    pub target_slot: Option<SlotTime>,
}

#[async_trait]
pub trait HabitStore: Send + Sync {
    /// All habits of the user, in creation order.
    async fn list_habits(&self, user_id: &str) -> Result<Vec<HabitRow>, StoreError>;

    /// Records of the user created at or after `since`.
    async fn list_records_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<HabitRecord>, StoreError>;

    /// The latest `limit` records of one habit, newest first.
    async fn recent_records(
        &self,
        habit_id: HabitId,
        limit: usize,
    ) -> Result<Vec<HabitRecord>, StoreError>;

    async fn insert_habit(&self, user_id: &str, draft: &HabitDraft)
    -> Result<HabitRow, StoreError>;

    async fn update_habit(&self, habit_id: HabitId, draft: &HabitDraft) -> Result<(), StoreError>;

    async fn delete_habit(&self, habit_id: HabitId) -> Result<(), StoreError>;

    async fn insert_record(&self, record: &NewRecord) -> Result<HabitRecord, StoreError>;

    async fn delete_record(&self, record_id: i64) -> Result<(), StoreError>;

    /// Deletes the habit's records created at or after `since`; returns how many went.
    async fn delete_records_since(
        &self,
        habit_id: HabitId,
        since: DateTime<Utc>,
    ) -> Result<usize, StoreError>;
}

pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| StoreError::Timeout(timeout))?
}
