//! `setprogress`: report task progress.

use crate::convert::parse_percent;
use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::Result;
use crate::model::Command;

const VALUE: &str = "value";

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: "setprogress",
    aliases: &[],
    allowed_in_restricted_mode: true,
};

pub struct ProgressCommand;

impl WorkerCommand for ProgressCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let percent = command
            .property(VALUE)
            .and_then(parse_percent)
            .unwrap_or(0);
        scope.context.progress(percent, command.data.as_deref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::commands::test_support::execute;
    use crate::context::{MemoryContext, Progress};

    fn progress_of(command: &Command) -> Progress {
        let mut ctx = MemoryContext::new();
        execute(&ProgressCommand, &mut ctx, command).unwrap();
        ctx.progress.pop().unwrap()
    }

    #[test]
    fn forwards_clamped_percent_and_message() {
        let p = progress_of(
            &Command::new("setprogress")
                .with_property(VALUE, "140")
                .with_data("uploading"),
        );
        assert_eq!(p.percent, 100);
        assert_eq!(p.operation.as_deref(), Some("uploading"));
    }

    #[test]
    fn missing_or_bad_value_is_zero() {
        assert_eq!(progress_of(&Command::new("setprogress")).percent, 0);
        assert_eq!(
            progress_of(&Command::new("setprogress").with_property(VALUE, "ten")).percent,
            0
        );
    }
}
