//! The task logging commands.
//!
//! Each submodule holds one handler (or a family sharing validation) and
//! the property names it reads. Property keys are always lower-case.

mod attachment;
mod complete;
mod debug;
mod detail;
mod endpoint;
mod issue;
mod path;
mod progress;
mod secret;
mod variable;

pub use attachment::{
    AddAttachmentCommand, FILE_ATTACHMENT_TYPE, SUMMARY_TYPE, UploadFileCommand,
    UploadSummaryCommand,
};
pub use complete::CompleteCommand;
pub use debug::DebugCommand;
pub use detail::DetailCommand;
pub use endpoint::SetEndpointCommand;
pub use issue::IssueCommand;
pub use path::PrependPathCommand;
pub use progress::ProgressCommand;
pub use secret::SetSecretCommand;
pub use variable::{MULTILINE_SECRET_OVERRIDE, SetTaskVariableCommand, SetVariableCommand};

use crate::convert::parse_bool;
use crate::dispatch::WorkerCommand;
use crate::error::{CommandError, Result};
use crate::model::Command;

/// Every task command, in registration order.
pub fn all() -> Vec<Box<dyn WorkerCommand>> {
    vec![
        Box::new(IssueCommand),
        Box::new(ProgressCommand),
        Box::new(DetailCommand),
        Box::new(CompleteCommand),
        Box::new(SetSecretCommand),
        Box::new(SetVariableCommand),
        Box::new(AddAttachmentCommand),
        Box::new(DebugCommand),
        Box::new(UploadSummaryCommand),
        Box::new(UploadFileCommand),
        Box::new(SetTaskVariableCommand),
        Box::new(SetEndpointCommand),
        Box::new(PrependPathCommand),
    ]
}

/// A property that must be present and non-empty.
fn require<'c>(
    command: &'c Command,
    name: &'static str,
    property: &'static str,
) -> Result<&'c str> {
    command
        .non_empty_property(property)
        .ok_or(CommandError::MissingProperty {
            command: name,
            property,
        })
}

/// A data payload that must be present and non-empty.
fn require_data<'c>(command: &'c Command, name: &'static str) -> Result<&'c str> {
    command
        .non_empty_data()
        .ok_or(CommandError::MissingData(name))
}

/// A boolean property. Absent or unparseable values read as `false`.
fn flag(command: &Command, property: &str) -> bool {
    command
        .property(property)
        .and_then(parse_bool)
        .unwrap_or(false)
}
