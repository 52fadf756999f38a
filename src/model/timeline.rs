//! Timeline records: nodes in a run's progress tree.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TaskResult;

/// A node in the run's progress tree (job, phase, task, or a task's own
/// sub-steps).
///
/// Every field but `id` is optional: an update only carries the fields the
/// task sent, and the timeline store applies them as a field-level upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,

    /// Always within `0..=100`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_operation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TimelineRecordState>,
}

impl TimelineRecord {
    /// An update carrying only the record id.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            parent_id: None,
            name: None,
            record_type: None,
            order: None,
            percent_complete: None,
            current_operation: None,
            result: None,
            start_time: None,
            finish_time: None,
            state: None,
        }
    }
}

/// Where a timeline record stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineRecordState {
    Pending,
    InProgress,
    Completed,
}

impl TimelineRecordState {
    /// Parses a state name, ignoring case.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "inprogress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}
