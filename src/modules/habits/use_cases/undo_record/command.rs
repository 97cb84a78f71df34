use crate::modules::habits::core::habit::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    pub record_id: RecordId,
}
