//! `setsecret`: register a value with the secret masker.

use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::Result;
use crate::model::Command;

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: "setsecret",
    aliases: &[],
    allowed_in_restricted_mode: true,
};

pub struct SetSecretCommand;

impl WorkerCommand for SetSecretCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        if let Some(secret) = command.non_empty_data() {
            scope.context.mask_secret(secret);
        }
        Ok(())
    }
}
