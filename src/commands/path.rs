//! `prependpath`: add a directory to the job's PATH additions.

use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::Result;
use crate::model::Command;

use super::require_data;

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: "prependpath",
    aliases: &[],
    allowed_in_restricted_mode: true,
};

pub struct PrependPathCommand;

impl WorkerCommand for PrependPathCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    /// Moves `data` to the end of the list. The consumer reverses the list
    /// when building PATH, so the newest entry takes precedence.
    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let entry = require_data(command, DESCRIPTOR.name)?;
        let paths = scope.context.prepend_path_mut();
        paths.retain(|p| p != entry);
        paths.push(entry.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::commands::test_support::execute;
    use crate::context::MemoryContext;
    use crate::error::CommandError;

    fn prepend(path: &str) -> Command {
        Command::new("prependpath").with_data(path)
    }

    #[test]
    fn repeated_entry_moves_to_end() {
        let mut ctx = MemoryContext::new();
        for path in ["/opt/a", "/opt/b", "/opt/a"] {
            execute(&PrependPathCommand, &mut ctx, &prepend(path)).unwrap();
        }
        assert_eq!(ctx.prepend_path, ["/opt/b", "/opt/a"]);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let mut ctx = MemoryContext::new();
        execute(&PrependPathCommand, &mut ctx, &prepend("/Opt/A")).unwrap();
        execute(&PrependPathCommand, &mut ctx, &prepend("/opt/a")).unwrap();
        assert_eq!(ctx.prepend_path.len(), 2);
    }

    #[test]
    fn empty_data_fails() {
        let mut ctx = MemoryContext::new();
        let err = execute(&PrependPathCommand, &mut ctx, &prepend("")).unwrap_err();
        assert!(matches!(err, CommandError::MissingData("prependpath")));
        assert!(ctx.prepend_path.is_empty());
    }
}
