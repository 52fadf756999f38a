//! `logdetail`: create and update timeline records for a task's sub-steps.

use jiff::{Timestamp, civil, tz::TimeZone};
use uuid::Uuid;

use crate::convert::parse_percent;
use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::{CommandError, Result};
use crate::model::{Command, TaskResult, TimelineRecord, TimelineRecordState};

const NAME: &str = "logdetail";

const ID: &str = "id";
const PARENT_ID: &str = "parentid";
const RECORD_NAME: &str = "name";
const RECORD_TYPE: &str = "type";
const ORDER: &str = "order";
const PROGRESS: &str = "progress";
const RESULT: &str = "result";
const START_TIME: &str = "starttime";
const FINISH_TIME: &str = "finishtime";
const STATE: &str = "state";

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: NAME,
    aliases: &[],
    allowed_in_restricted_mode: true,
};

pub struct DetailCommand;

impl WorkerCommand for DetailCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let now = Timestamp::now();
        let record = parse_record(command, now)?;
        let record = scope.timeline.prepare(record, now)?;
        scope.context.update_timeline_record(&record);
        scope.timeline.commit(record);
        Ok(())
    }
}

/// Builds an update from exactly the properties the command carries.
fn parse_record(command: &Command, now: Timestamp) -> Result<TimelineRecord> {
    let id = command
        .non_empty_property(ID)
        .ok_or(CommandError::MissingRecordId)?;
    let id = parse_uuid(ID, id)?;
    if id.is_nil() {
        return Err(CommandError::MissingRecordId);
    }

    let mut record = TimelineRecord::new(id);

    if let Some(parent) = command.property(PARENT_ID) {
        record.parent_id = Some(parse_uuid(PARENT_ID, parent)?).filter(|p| !p.is_nil());
    }

    record.name = command.property(RECORD_NAME).map(String::from);
    record.record_type = command.property(RECORD_TYPE).map(String::from);
    record.order = command
        .property(ORDER)
        .and_then(|o| o.trim().parse::<i32>().ok());
    record.percent_complete = command.property(PROGRESS).and_then(parse_percent);
    record.current_operation = command.non_empty_data().map(String::from);
    record.result = command
        .property(RESULT)
        .map(|r| TaskResult::parse(r).unwrap_or(TaskResult::Succeeded));
    record.start_time = command
        .property(START_TIME)
        .map(|t| parse_timestamp(t).unwrap_or(now));
    record.finish_time = command
        .property(FINISH_TIME)
        .map(|t| parse_timestamp(t).unwrap_or(now));
    record.state = command
        .property(STATE)
        .map(|s| TimelineRecordState::parse(s).unwrap_or(TimelineRecordState::Pending));

    Ok(record)
}

fn parse_uuid(property: &'static str, text: &str) -> Result<Uuid> {
    Uuid::parse_str(text.trim()).map_err(|e| CommandError::InvalidValue {
        command: NAME,
        property,
        reason: e.to_string(),
    })
}

/// Best-effort timestamp parsing.
///
/// Accepts RFC 3339 timestamps with an offset, and civil date-times or
/// dates, which are taken as UTC.
fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if let Ok(ts) = text.parse::<Timestamp>() {
        return Some(ts);
    }
    if let Ok(dt) = text.parse::<civil::DateTime>() {
        return dt.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp());
    }
    if let Ok(date) = text.parse::<civil::Date>() {
        return date.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp());
    }
    None
}
