//! In-process execution context.
//!
//! Holds all job state in memory and records every side effect so callers
//! can inspect what a sequence of commands did.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::convert::parse_bool;
use crate::model::{Attachment, Endpoint, Issue, TaskResult, TimelineRecord, Variable};
use crate::secret::SecretMasker;

use super::{ExecutionContext, JobExtension, RepositoryMap, VariableFlags};

/// Maps a directory inside the job container to its location on the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathMapping {
    pub container: PathBuf,
    pub host: PathBuf,
}

/// One progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub percent: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

/// An [`ExecutionContext`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryContext {
    /// Job variables, keyed by lower-cased name.
    pub variables: BTreeMap<String, Variable>,

    /// Task variables, keyed by lower-cased name.
    pub task_variables: BTreeMap<String, Variable>,

    pub endpoints: Vec<Endpoint>,
    pub prepend_path: Vec<String>,
    pub result: Option<TaskResult>,
    pub completed: bool,
    pub enforce_read_only: bool,
    pub path_mappings: Vec<PathMapping>,
    pub repositories: Option<RepositoryMap>,
    pub masker: SecretMasker,

    /// Records as the timeline store sees them after upserting every update.
    pub timeline: BTreeMap<Uuid, TimelineRecord>,

    /// Every update sent to the timeline store, in order.
    pub timeline_updates: Vec<TimelineRecord>,

    pub issues: Vec<Issue>,
    pub warnings: Vec<String>,
    pub debug_log: Vec<String>,
    pub progress: Vec<Progress>,
    pub attachments: Vec<Attachment>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job variable as if it came from the job definition.
    pub fn insert_variable(&mut self, variable: Variable) {
        if variable.secret {
            self.masker.add_value(&variable.value);
        }
        self.variables.insert(key(&variable.name), variable);
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(&key(name))
    }

    pub fn task_variable(&self, name: &str) -> Option<&Variable> {
        self.task_variables.get(&key(name))
    }

    pub fn endpoint(&self, id: Uuid) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }
}

impl ExecutionContext for MemoryContext {
    fn update_timeline_record(&mut self, record: &TimelineRecord) {
        self.timeline_updates.push(record.clone());
        self.timeline
            .entry(record.id)
            .and_modify(|existing| upsert(existing, record))
            .or_insert_with(|| record.clone());
    }

    fn report_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn debug(&mut self, message: &str) {
        self.debug_log.push(message.to_string());
    }

    fn progress(&mut self, percent: i32, operation: Option<&str>) {
        self.progress.push(Progress {
            percent,
            operation: operation.map(String::from),
        });
    }

    fn queue_attachment(&mut self, attachment_type: &str, name: &str, path: &Path) {
        self.attachments.push(Attachment {
            attachment_type: attachment_type.to_string(),
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }

    fn set_variable(&mut self, name: &str, value: &str, flags: VariableFlags) {
        self.insert_variable(Variable {
            name: name.to_string(),
            value: value.to_string(),
            secret: flags.secret,
            output: flags.output,
            read_only: flags.read_only,
        });
    }

    fn is_variable_read_only(&self, name: &str) -> bool {
        self.variable(name).is_some_and(|v| v.read_only)
    }

    fn variable_bool(&self, name: &str) -> Option<bool> {
        self.variable(name).and_then(|v| parse_bool(&v.value))
    }

    fn set_task_variable(&mut self, name: &str, value: &str, secret: bool, read_only: bool) {
        if secret {
            self.masker.add_value(value);
        }
        self.task_variables.insert(
            key(name),
            Variable {
                name: name.to_string(),
                value: value.to_string(),
                secret,
                output: false,
                read_only,
            },
        );
    }

    fn is_task_variable_read_only(&self, name: &str) -> bool {
        self.task_variable(name).is_some_and(|v| v.read_only)
    }

    fn enforce_read_only_variables(&self) -> bool {
        self.enforce_read_only
    }

    fn translate_to_host_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        let mapping = self
            .path_mappings
            .iter()
            .filter(|m| path.starts_with(&m.container))
            .max_by_key(|m| m.container.components().count());

        match mapping.and_then(|m| path.strip_prefix(&m.container).ok().map(|rest| (m, rest))) {
            Some((m, rest)) if rest.as_os_str().is_empty() => m.host.clone(),
            Some((m, rest)) => m.host.join(rest),
            None => path.to_path_buf(),
        }
    }

    fn job_extension(&self) -> Option<&dyn JobExtension> {
        self.repositories.as_ref().map(|r| r as &dyn JobExtension)
    }

    fn mask_secret(&mut self, value: &str) {
        self.masker.add_value(value);
    }

    fn endpoint_mut(&mut self, id: Uuid) -> Option<&mut Endpoint> {
        self.endpoints.iter_mut().find(|e| e.id == id)
    }

    fn prepend_path_mut(&mut self) -> &mut Vec<String> {
        &mut self.prepend_path
    }

    fn result(&self) -> Option<TaskResult> {
        self.result
    }

    fn set_result(&mut self, result: TaskResult) {
        self.result = Some(result);
    }

    fn force_complete(&mut self) {
        self.completed = true;
    }
}

/// Variable names are case-insensitive.
fn key(name: &str) -> String {
    name.to_lowercase()
}

/// Applies the fields set on `update` to `existing`.
fn upsert(existing: &mut TimelineRecord, update: &TimelineRecord) {
    macro_rules! take {
        ($($field:ident),*) => {
            $(if update.$field.is_some() {
                existing.$field.clone_from(&update.$field);
            })*
        };
    }
    take!(
        parent_id,
        name,
        record_type,
        order,
        percent_complete,
        current_operation,
        result,
        start_time,
        finish_time,
        state
    );
}
