// In memory implementation of the HabitStore port.
//
// Purpose
// - Support handler tests, the e2e flow and local development without the remote store.
//
// Responsibilities
// - Keep habit rows and records per user in memory, assigning sequential ids.
// - Publish a change event on the feed after every successful mutation, like the
//   remote store's realtime channel does.
// - Offer failure switches: offline mode, per-operation failures and a delay.

use crate::modules::habits::core::habit::{HabitDraft, HabitId, HabitRecord, RecordId};
use crate::modules::habits::core::ports::{
    HABITS_TABLE, HabitRow, HabitStore, NewRecord, RECORDS_TABLE, StoreError,
};
use crate::shared::infrastructure::change_feed::{ChangeEvent, ChangeFeed, ChangeKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    ListHabits,
    ListRecords,
    RecentRecords,
    InsertHabit,
    UpdateHabit,
    DeleteHabit,
    InsertRecord,
    DeleteRecord,
    DeleteRecords,
}

struct OwnedHabit {
    user_id: String,
    row: HabitRow,
}

#[derive(Default)]
pub struct InMemoryHabitStore {
    habits: RwLock<Vec<OwnedHabit>>,
    records: RwLock<Vec<HabitRecord>>,
    next_habit_id: AtomicI64,
    next_record_id: AtomicI64,
    offline: AtomicBool,
    delay_ms: AtomicU64,
    failing: Mutex<HashSet<StoreOperation>>,
    feed: Option<Arc<ChangeFeed>>,
}

impl InMemoryHabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_change_feed(feed: Arc<ChangeFeed>) -> Self {
        Self {
            feed: Some(feed),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub async fn fail_on(&self, operation: StoreOperation) {
        self.failing.lock().await.insert(operation);
    }

    pub async fn recover(&self, operation: StoreOperation) {
        self.failing.lock().await.remove(&operation);
    }

    /// Inserts a record as-is, bypassing failure switches and the change feed.
    pub async fn seed_record(&self, record: HabitRecord) {
        if let RecordId::Persisted(id) = record.id {
            self.next_record_id.fetch_max(id, Ordering::SeqCst);
        }
        self.records.write().await.push(record);
    }

    pub async fn records(&self) -> Vec<HabitRecord> {
        self.records.read().await.clone()
    }

    async fn guard(&self, operation: StoreOperation) -> Result<(), StoreError> {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store offline".into()));
        }
        if self.failing.lock().await.contains(&operation) {
            return Err(StoreError::Backend(format!("{operation:?} failed")));
        }
        Ok(())
    }

    fn notify(&self, table: &str, kind: ChangeKind) {
        if let Some(feed) = &self.feed {
            feed.publish(ChangeEvent::new(table, kind));
        }
    }
}

#[async_trait]
impl HabitStore for InMemoryHabitStore {
    async fn list_habits(&self, user_id: &str) -> Result<Vec<HabitRow>, StoreError> {
        self.guard(StoreOperation::ListHabits).await?;
        Ok(self
            .habits
            .read()
            .await
            .iter()
            .filter(|h| h.user_id == user_id)
            .map(|h| h.row.clone())
            .collect())
    }

    async fn list_records_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<HabitRecord>, StoreError> {
        self.guard(StoreOperation::ListRecords).await?;
        let mut records: Vec<HabitRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && r.created_at >= since)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn recent_records(
        &self,
        habit_id: HabitId,
        limit: usize,
    ) -> Result<Vec<HabitRecord>, StoreError> {
        self.guard(StoreOperation::RecentRecords).await?;
        let mut records: Vec<HabitRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.habit_id == habit_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn insert_habit(
        &self,
        user_id: &str,
        draft: &HabitDraft,
    ) -> Result<HabitRow, StoreError> {
        self.guard(StoreOperation::InsertHabit).await?;
        let row = HabitRow {
            id: self.next_habit_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: draft.name.clone(),
            description: draft.description.clone(),
            schedule: draft.schedule.clone(),
            active: draft.active,
        };
        self.habits.write().await.push(OwnedHabit {
            user_id: user_id.to_string(),
            row: row.clone(),
        });
        self.notify(HABITS_TABLE, ChangeKind::Insert);
        Ok(row)
    }

    async fn update_habit(&self, habit_id: HabitId, draft: &HabitDraft) -> Result<(), StoreError> {
        self.guard(StoreOperation::UpdateHabit).await?;
        {
            let mut habits = self.habits.write().await;
            let owned = habits
                .iter_mut()
                .find(|h| h.row.id == habit_id)
                .ok_or_else(|| StoreError::NotFound(format!("habit {habit_id}")))?;
            owned.row.name = draft.name.clone();
            owned.row.description = draft.description.clone();
            owned.row.schedule = draft.schedule.clone();
            owned.row.active = draft.active;
        }
        self.notify(HABITS_TABLE, ChangeKind::Update);
        Ok(())
    }

    async fn delete_habit(&self, habit_id: HabitId) -> Result<(), StoreError> {
        self.guard(StoreOperation::DeleteHabit).await?;
        {
            let mut habits = self.habits.write().await;
            let before = habits.len();
            habits.retain(|h| h.row.id != habit_id);
            if habits.len() == before {
                return Err(StoreError::NotFound(format!("habit {habit_id}")));
            }
        }
        self.records.write().await.retain(|r| r.habit_id != habit_id);
        self.notify(HABITS_TABLE, ChangeKind::Delete);
        Ok(())
    }

    async fn insert_record(&self, record: &NewRecord) -> Result<HabitRecord, StoreError> {
        self.guard(StoreOperation::InsertRecord).await?;
        let saved = HabitRecord {
            id: RecordId::Persisted(self.next_record_id.fetch_add(1, Ordering::SeqCst) + 1),
            user_id: record.user_id.clone(),
            habit_id: record.habit_id,
            success: record.success,
            created_at: record.created_at,
            target_slot: record.target_slot,
        };
        self.records.write().await.push(saved.clone());
        self.notify(RECORDS_TABLE, ChangeKind::Insert);
        Ok(saved)
    }

    async fn delete_record(&self, record_id: i64) -> Result<(), StoreError> {
        self.guard(StoreOperation::DeleteRecord).await?;
        {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|r| r.id != RecordId::Persisted(record_id));
            if records.len() == before {
                return Err(StoreError::NotFound(format!("record {record_id}")));
            }
        }
        self.notify(RECORDS_TABLE, ChangeKind::Delete);
        Ok(())
    }

    async fn delete_records_since(
        &self,
        habit_id: HabitId,
        since: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        self.guard(StoreOperation::DeleteRecords).await?;
        let removed = {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|r| !(r.habit_id == habit_id && r.created_at >= since));
            before - records.len()
        };
        if removed > 0 {
            self.notify(RECORDS_TABLE, ChangeKind::Delete);
        }
        Ok(removed)
    }
}
