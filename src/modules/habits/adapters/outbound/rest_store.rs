// HabitStore backed by the hosted PostgREST tables `habit` and `habitRecords`.
//
// Notes
// - Column names follow the hosted schema: `day` (weekday ordinals, Monday = 0),
//   `time` (slot labels), `activate`, `result` and `recordTime`.
// - A stored slot label that does not parse is read back as "no slot" rather
//   than failing the whole load; the evaluator then matches it by time.
// - Out-of-range weekday ordinals and unreadable schedule times are skipped the
//   same way, so one bad row never hides the rest of the list.

use crate::modules::habits::core::habit::{HabitDraft, HabitId, HabitRecord, RecordId};
use crate::modules::habits::core::ports::{
    HABITS_TABLE, HabitRow, HabitStore, NewRecord, RECORDS_TABLE, StoreError,
};
use crate::modules::habits::core::schedule::{Schedule, SlotTime, WeekdaySet};
use crate::shared::infrastructure::rest_client::{RestClient, RestError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct HabitDto {
    pub id: HabitId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub day: Option<Vec<u8>>,
    #[serde(default)]
    pub time: Option<Vec<String>>,
    #[serde(default)]
    pub activate: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RecordDto {
    pub id: i64,
    pub user_id: String,
    pub habit_id: HabitId,
    pub result: bool,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "recordTime", default)]
    pub record_time: Option<String>,
}

pub fn habit_row(dto: HabitDto) -> HabitRow {
    let habit_id = dto.id;
    let ordinals = dto.day.unwrap_or_default().into_iter().filter(|&ordinal| {
        let valid = ordinal <= 6;
        if !valid {
            debug!(habit_id, ordinal, "ignoring weekday ordinal");
        }
        valid
    });
    let days = WeekdaySet::from_ordinals(ordinals).unwrap_or_default();
    let slots = dto
        .time
        .unwrap_or_default()
        .iter()
        .filter_map(|raw| {
            raw.parse::<SlotTime>()
                .inspect_err(|err| debug!(habit_id, error = %err, "ignoring time slot"))
                .ok()
        })
        .collect();
    HabitRow {
        id: dto.id,
        name: dto.name,
        description: dto.description,
        schedule: Schedule::new(days, slots).normalized(),
        active: dto.activate.unwrap_or(true),
    }
}

pub fn habit_record(dto: RecordDto) -> HabitRecord {
    let target_slot = dto.record_time.as_deref().and_then(|raw| {
        raw.parse::<SlotTime>()
            .inspect_err(|err| debug!(record_id = dto.id, error = %err, "ignoring slot label"))
            .ok()
    });
    HabitRecord {
        id: RecordId::Persisted(dto.id),
        user_id: dto.user_id,
        habit_id: dto.habit_id,
        success: dto.result,
        created_at: dto.created_at,
        target_slot,
    }
}

pub fn habit_body(user_id: Option<&str>, draft: &HabitDraft) -> Value {
    let mut body = json!({
        "name": draft.name,
        "description": draft.description,
        "day": draft.schedule.days.ordinals(),
        "time": draft.schedule.slots.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "activate": draft.active,
    });
    if let Some(user_id) = user_id {
        body["user_id"] = json!(user_id);
    }
    body
}

pub fn record_body(record: &NewRecord) -> Value {
    json!({
        "user_id": record.user_id,
        "habit_id": record.habit_id,
        "result": record.success,
        "created_at": timestamp(&record.created_at),
        "recordTime": record.target_slot.map(|slot| slot.to_string()),
    })
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn eq(value: impl ToString) -> String {
    format!("eq.{}", value.to_string())
}

pub struct RestHabitStore {
    client: RestClient,
    timeout: Duration,
}

impl RestHabitStore {
    pub fn new(client: RestClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn path(table: &str) -> String {
        format!("rest/v1/{table}")
    }

    fn store_error(&self, err: RestError) -> StoreError {
        match err {
            RestError::Timeout => StoreError::Timeout(self.timeout),
            RestError::Status { status: 404, body } => StoreError::NotFound(body),
            RestError::Decode(message) => StoreError::Decode(message),
            other => StoreError::Backend(other.to_string()),
        }
    }

    async fn records(&self, query: &[(&str, String)]) -> Result<Vec<HabitRecord>, StoreError> {
        let rows: Vec<RecordDto> = self
            .client
            .get_json(&Self::path(RECORDS_TABLE), query)
            .await
            .map_err(|err| self.store_error(err))?;
        Ok(rows.into_iter().map(habit_record).collect())
    }
}

#[async_trait]
impl HabitStore for RestHabitStore {
    async fn list_habits(&self, user_id: &str) -> Result<Vec<HabitRow>, StoreError> {
        let rows: Vec<HabitDto> = self
            .client
            .get_json(
                &Self::path(HABITS_TABLE),
                &[
                    ("select", "*".to_string()),
                    ("user_id", eq(user_id)),
                    ("order", "id.asc".to_string()),
                ],
            )
            .await
            .map_err(|err| self.store_error(err))?;
        Ok(rows.into_iter().map(habit_row).collect())
    }

    async fn list_records_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<HabitRecord>, StoreError> {
        self.records(&[
            ("select", "*".to_string()),
            ("user_id", eq(user_id)),
            ("created_at", format!("gte.{}", timestamp(&since))),
            ("order", "created_at.asc".to_string()),
        ])
        .await
    }

    async fn recent_records(
        &self,
        habit_id: HabitId,
        limit: usize,
    ) -> Result<Vec<HabitRecord>, StoreError> {
        self.records(&[
            ("select", "*".to_string()),
            ("habit_id", eq(habit_id)),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ])
        .await
    }

    async fn insert_habit(
        &self,
        user_id: &str,
        draft: &HabitDraft,
    ) -> Result<HabitRow, StoreError> {
        let rows: Vec<HabitDto> = self
            .client
            .insert_returning(&Self::path(HABITS_TABLE), &habit_body(Some(user_id), draft))
            .await
            .map_err(|err| self.store_error(err))?;
        rows.into_iter()
            .next()
            .map(habit_row)
            .ok_or_else(|| StoreError::Decode("insert returned no habit".into()))
    }

    async fn update_habit(&self, habit_id: HabitId, draft: &HabitDraft) -> Result<(), StoreError> {
        self.client
            .patch(
                &Self::path(HABITS_TABLE),
                &[("id", eq(habit_id))],
                &habit_body(None, draft),
            )
            .await
            .map_err(|err| self.store_error(err))
    }

    async fn delete_habit(&self, habit_id: HabitId) -> Result<(), StoreError> {
        self.client
            .delete(&Self::path(HABITS_TABLE), &[("id", eq(habit_id))])
            .await
            .map_err(|err| self.store_error(err))
    }

    async fn insert_record(&self, record: &NewRecord) -> Result<HabitRecord, StoreError> {
        let rows: Vec<RecordDto> = self
            .client
            .insert_returning(&Self::path(RECORDS_TABLE), &record_body(record))
            .await
            .map_err(|err| self.store_error(err))?;
        rows.into_iter()
            .next()
            .map(habit_record)
            .ok_or_else(|| StoreError::Decode("insert returned no record".into()))
    }

    async fn delete_record(&self, record_id: i64) -> Result<(), StoreError> {
        self.client
            .delete(&Self::path(RECORDS_TABLE), &[("id", eq(record_id))])
            .await
            .map_err(|err| self.store_error(err))
    }

    async fn delete_records_since(
        &self,
        habit_id: HabitId,
        since: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let removed: Vec<Value> = self
            .client
            .delete_returning(
                &Self::path(RECORDS_TABLE),
                &[
                    ("habit_id", eq(habit_id)),
                    ("created_at", format!("gte.{}", timestamp(&since))),
                ],
            )
            .await
            .map_err(|err| self.store_error(err))?;
        Ok(removed.len())
    }
}
