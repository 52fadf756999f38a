//! `addattachment`, `uploadsummary`, `uploadfile`: queue files for upload.
//!
//! The two upload commands are presets of `addattachment` with a fixed type
//! and a name taken from the file itself.

use std::path::Path;

use crate::context::ExecutionContext;
use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::{CommandError, Result};
use crate::model::Command;

use super::require_data;

/// Attachment type for markdown summaries shown on the run page.
pub const SUMMARY_TYPE: &str = "DistributedTask.Core.Summary";

/// Attachment type for arbitrary uploaded files.
pub const FILE_ATTACHMENT_TYPE: &str = "DistributedTask.Core.FileAttachment";

const TYPE: &str = "type";
const NAME: &str = "name";

static ADD_ATTACHMENT: CommandDescriptor = CommandDescriptor {
    name: "addattachment",
    aliases: &[],
    allowed_in_restricted_mode: false,
};

static UPLOAD_SUMMARY: CommandDescriptor = CommandDescriptor {
    name: "uploadsummary",
    aliases: &[],
    allowed_in_restricted_mode: false,
};

static UPLOAD_FILE: CommandDescriptor = CommandDescriptor {
    name: "uploadfile",
    aliases: &[],
    allowed_in_restricted_mode: false,
};

pub struct AddAttachmentCommand;

impl WorkerCommand for AddAttachmentCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &ADD_ATTACHMENT
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        add_attachment(
            scope.context,
            ADD_ATTACHMENT.name,
            command.property(TYPE),
            command.property(NAME),
            command.data.as_deref(),
        )
    }
}

pub struct UploadSummaryCommand;

impl WorkerCommand for UploadSummaryCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &UPLOAD_SUMMARY
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        upload(scope.context, UPLOAD_SUMMARY.name, SUMMARY_TYPE, command)
    }
}

pub struct UploadFileCommand;

impl WorkerCommand for UploadFileCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &UPLOAD_FILE
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        upload(scope.context, UPLOAD_FILE.name, FILE_ATTACHMENT_TYPE, command)
    }
}

fn upload(
    context: &mut dyn ExecutionContext,
    command_name: &'static str,
    attachment_type: &str,
    command: &Command,
) -> Result<()> {
    let data = require_data(command, command_name)?;
    let name = Path::new(data)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    add_attachment(
        context,
        command_name,
        Some(attachment_type),
        name.as_deref(),
        Some(data),
    )
}

fn add_attachment(
    context: &mut dyn ExecutionContext,
    command_name: &'static str,
    attachment_type: Option<&str>,
    name: Option<&str>,
    data: Option<&str>,
) -> Result<()> {
    let attachment_type = attachment_type
        .filter(|t| !t.is_empty())
        .ok_or(CommandError::MissingProperty {
            command: command_name,
            property: TYPE,
        })?;
    let name = name
        .filter(|n| !n.is_empty())
        .ok_or(CommandError::MissingProperty {
            command: command_name,
            property: NAME,
        })?;
    check_file_name(command_name, TYPE, attachment_type)?;
    check_file_name(command_name, NAME, name)?;

    let path = context.translate_to_host_path(data.unwrap_or_default());
    if path.as_os_str().is_empty() || !path.is_file() {
        return Err(CommandError::AttachmentNotFound {
            command: command_name,
            path,
        });
    }

    context.queue_attachment(attachment_type, name, &path);
    Ok(())
}

fn check_file_name(command: &'static str, property: &'static str, value: &str) -> Result<()> {
    match value.chars().find(|&c| is_invalid_file_name_char(c)) {
        Some(c) => Err(CommandError::InvalidValue {
            command,
            property,
            reason: format!("contains the invalid file name character {c:?}"),
        }),
        None => Ok(()),
    }
}

#[cfg(windows)]
fn is_invalid_file_name_char(c: char) -> bool {
    (c as u32) < 32 || matches!(c, '"' | '<' | '>' | '|' | ':' | '*' | '?' | '\\' | '/')
}

#[cfg(not(windows))]
fn is_invalid_file_name_char(c: char) -> bool {
    matches!(c, '\0' | '/')
}
