//! The execution context: job-scoped state and host services.
//!
//! Handlers never own run state. Everything they read or change lives
//! behind [`ExecutionContext`], which the embedding worker implements.
//! [`MemoryContext`] is a complete in-process implementation used by the
//! CLI and the tests.

mod memory;
mod repository;

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::model::{Endpoint, Issue, TaskResult, TimelineRecord};

pub use memory::{MemoryContext, PathMapping, Progress};
pub use repository::{Repository, RepositoryMap};

/// Job-scoped state and host services that command handlers call into.
pub trait ExecutionContext {
    // ── Reporting ──

    /// Upserts a timeline record in the authoritative store.
    ///
    /// Only the fields set on `record` are applied; repeated calls for the
    /// same id must be safe.
    fn update_timeline_record(&mut self, record: &TimelineRecord);

    fn report_issue(&mut self, issue: Issue);

    fn warning(&mut self, message: &str);

    fn debug(&mut self, message: &str);

    fn progress(&mut self, percent: i32, operation: Option<&str>);

    /// Queues a host file for upload.
    fn queue_attachment(&mut self, attachment_type: &str, name: &str, path: &Path);

    // ── Variables ──

    fn set_variable(&mut self, name: &str, value: &str, flags: VariableFlags);

    fn is_variable_read_only(&self, name: &str) -> bool;

    /// Reads a job variable as a boolean.
    ///
    /// `None` when the variable is unset or not a recognizable boolean.
    fn variable_bool(&self, name: &str) -> Option<bool>;

    /// Task-scoped variables have no output flag.
    fn set_task_variable(&mut self, name: &str, value: &str, secret: bool, read_only: bool);

    fn is_task_variable_read_only(&self, name: &str) -> bool;

    /// Whether writes to read-only variables fail (`true`) or only warn.
    fn enforce_read_only_variables(&self) -> bool;

    // ── Host services ──

    /// Maps a path as seen inside the job container to the host path.
    fn translate_to_host_path(&self, path: &str) -> PathBuf;

    /// The job extension registered for the run's host type, if any.
    fn job_extension(&self) -> Option<&dyn JobExtension>;

    /// Registers a value with the secret masker.
    fn mask_secret(&mut self, value: &str);

    // ── Mutable job state ──

    fn endpoint_mut(&mut self, id: Uuid) -> Option<&mut Endpoint>;

    /// Directories to put in front of `PATH` for later steps.
    fn prepend_path_mut(&mut self) -> &mut Vec<String>;

    fn result(&self) -> Option<TaskResult>;

    fn set_result(&mut self, result: TaskResult);

    /// Ends the current task immediately after this command.
    fn force_complete(&mut self);
}

/// Flags attached to a job variable when it is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariableFlags {
    pub secret: bool,
    pub output: bool,
    pub read_only: bool,
}

/// Host-type specific knowledge about where sources live.
pub trait JobExtension {
    /// Maps a local (host) path to the repository that contains it.
    fn convert_local_path(&self, host_path: &Path) -> RepoPath;
}

/// A host path expressed relative to a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoPath {
    pub repo_name: Option<String>,
    pub relative_path: Option<String>,
}
