//! Core data model for the logging-command protocol.
//!
//! These types describe what a task process sends (commands) and what the
//! worker records on its behalf: timeline records, issues, variables,
//! endpoints, and attachments.

mod attachment;
mod command;
mod endpoint;
mod issue;
mod result;
mod timeline;
mod variable;

pub use attachment::Attachment;
pub use command::Command;
pub use endpoint::Endpoint;
pub use issue::{Issue, IssueType};
pub use result::TaskResult;
pub use timeline::{TimelineRecord, TimelineRecordState};
pub use variable::Variable;
