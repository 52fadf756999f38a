//! Per-run tracking of timeline records created through `logdetail`.
//!
//! The tracker remembers the last update sent for each record id so it can
//! reject updates that break the run's tree before they reach the timeline
//! store. The store stays authoritative; the tracker only holds what was
//! explicitly sent, one entry per id, replaced on every update.
//!
//! One tracker belongs to one run and must see that run's commands in
//! emission order. It is owned by [`crate::run::JobRun`] and lent to the
//! handler for each command.

use std::collections::HashMap;

use jiff::Timestamp;
use uuid::Uuid;

use crate::error::{CommandError, Result};
use crate::model::{TimelineRecord, TimelineRecordState};

#[derive(Debug, Default)]
pub struct TimelineTracker {
    records: HashMap<Uuid, TimelineRecord>,
}

impl TimelineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<&TimelineRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates an update against what the run has seen and fills defaults.
    ///
    /// Does not change the tracker; call [`TimelineTracker::commit`] once the
    /// returned record has been forwarded.
    pub fn prepare(&self, mut record: TimelineRecord, now: Timestamp) -> Result<TimelineRecord> {
        if let Some(tracked) = self.records.get(&record.id) {
            match record.parent_id {
                Some(parent) if tracked.parent_id != Some(parent) => {
                    return Err(CommandError::ParentChanged { id: record.id });
                }
                Some(_) => {}
                None => record.parent_id = tracked.parent_id,
            }
        } else {
            if record.name.as_deref().is_none_or(str::is_empty) {
                return Err(CommandError::MissingRecordName(record.id));
            }
            if record.record_type.as_deref().is_none_or(str::is_empty) {
                return Err(CommandError::MissingRecordType(record.id));
            }
            if let Some(parent) = record.parent_id
                && !self.records.contains_key(&parent)
            {
                return Err(CommandError::UnknownParent { parent });
            }

            record.start_time.get_or_insert(now);
            record.state.get_or_insert(TimelineRecordState::InProgress);
        }

        if record.state == Some(TimelineRecordState::Completed) {
            record.percent_complete.get_or_insert(100);
            record.finish_time.get_or_insert(now);
        }

        Ok(record)
    }

    /// Replaces the tracked entry for the record's id.
    pub fn commit(&mut self, record: TimelineRecord) {
        self.records.insert(record.id, record);
    }
}
