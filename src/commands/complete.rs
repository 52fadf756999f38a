//! `complete`: set the task result.

use crate::convert::convert_to_bool;
use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::{CommandError, Result};
use crate::model::{Command, TaskResult};

use super::require;

const NAME: &str = "complete";

const RESULT: &str = "result";
const DONE: &str = "done";

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: NAME,
    aliases: &[],
    allowed_in_restricted_mode: true,
};

pub struct CompleteCommand;

impl WorkerCommand for CompleteCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let text = require(command, NAME, RESULT)?;
        let result = TaskResult::parse(text).ok_or_else(|| CommandError::InvalidValue {
            command: NAME,
            property: RESULT,
            reason: format!("'{text}' is not a task result"),
        })?;

        let context = &mut *scope.context;
        let merged = TaskResult::merge(context.result(), result);
        context.set_result(merged);
        context.progress(100, command.data.as_deref());

        if convert_to_bool(command.non_empty_property(DONE), false) {
            context.force_complete();
        }
        Ok(())
    }
}
