//! Worker-side processing of task logging commands.
//!
//! A task process emits logging commands while it runs. The worker parses
//! each one into a [`Command`] and hands it to a [`JobRun`], which routes it
//! through a [`Dispatcher`] to the matching handler. Handlers validate the
//! command and apply it to the run's [`ExecutionContext`]: timeline records,
//! issues, variables, endpoints, attachments, and the task result.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod job;
pub mod model;
pub mod restricted;
pub mod run;
pub mod secret;
pub mod timeline;

pub use context::{ExecutionContext, MemoryContext};
pub use dispatch::{CommandDescriptor, Dispatch, Dispatcher, Scope, WorkerCommand};
pub use error::{CommandError, ErrorKind, RegistryError};
pub use model::Command;
pub use run::JobRun;
pub use secret::SecretMasker;
pub use timeline::TimelineTracker;
