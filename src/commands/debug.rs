//! `debug`: write to the run's debug log.

use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::Result;
use crate::model::Command;

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: "debug",
    aliases: &[],
    allowed_in_restricted_mode: true,
};

pub struct DebugCommand;

impl WorkerCommand for DebugCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        scope
            .context
            .debug(command.data.as_deref().unwrap_or_default());
        Ok(())
    }
}
