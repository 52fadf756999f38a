//! Command registry and dispatch.
//!
//! The dispatcher is built once at worker startup and shared by reference.
//! It holds no run state: the per-run timeline tracker and the execution
//! context travel in a [`Scope`] supplied by the caller.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::commands;
use crate::context::ExecutionContext;
use crate::error::{CommandError, RegistryError, Result};
use crate::model::Command;
use crate::timeline::TimelineTracker;

/// Static description of a command handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],

    /// Whether the command may run in a reduced-trust step.
    pub allowed_in_restricted_mode: bool,
}

/// What a handler may touch while processing one command.
pub struct Scope<'a> {
    pub context: &'a mut dyn ExecutionContext,
    pub timeline: &'a mut TimelineTracker,
}

/// A handler for one logging command.
pub trait WorkerCommand {
    fn descriptor(&self) -> &'static CommandDescriptor;

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()>;
}

/// The outcome of a dispatch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran to completion.
    Handled,

    /// No handler is registered under the command's name.
    Unrecognized,
}

/// Maps command names and aliases to handlers.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn WorkerCommand>>,
    names: HashMap<&'static str, usize>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dispatcher with every standard task command installed.
    pub fn task_commands() -> core::result::Result<Self, RegistryError> {
        let mut dispatcher = Self::new();
        for handler in commands::all() {
            dispatcher.install(handler)?;
        }
        Ok(dispatcher)
    }

    /// Registers a handler under its name and aliases.
    ///
    /// Fails without registering anything if any of those names is taken.
    pub fn install(
        &mut self,
        handler: Box<dyn WorkerCommand>,
    ) -> core::result::Result<(), RegistryError> {
        let descriptor = handler.descriptor();
        let names = std::iter::once(descriptor.name).chain(descriptor.aliases.iter().copied());

        let mut seen = Vec::new();
        for name in names {
            if self.names.contains_key(name) || seen.contains(&name) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
            seen.push(name);
        }

        let index = self.handlers.len();
        self.handlers.push(handler);
        for name in seen {
            self.names.insert(name, index);
        }
        Ok(())
    }

    /// Descriptors of every installed handler, in installation order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static CommandDescriptor> + '_ {
        self.handlers.iter().map(|h| h.descriptor())
    }

    /// Looks up a handler by exact name or alias.
    pub fn resolve(&self, name: &str) -> Option<&dyn WorkerCommand> {
        self.names.get(name).map(|&i| self.handlers[i].as_ref())
    }

    /// Runs the handler registered for `command.name`.
    ///
    /// An unknown name is reported as [`Dispatch::Unrecognized`], not an error.
    /// In restricted mode, handlers not marked as allowed are rejected.
    pub fn dispatch(
        &self,
        scope: &mut Scope<'_>,
        command: &Command,
        restricted: bool,
    ) -> Result<Dispatch> {
        let Some(handler) = self.resolve(&command.name) else {
            warn!(command = %command.name, "unrecognized logging command");
            return Ok(Dispatch::Unrecognized);
        };

        let descriptor = handler.descriptor();
        if restricted && !descriptor.allowed_in_restricted_mode {
            warn!(command = %command.name, "rejected in restricted mode");
            return Err(CommandError::Restricted(command.name.clone()));
        }

        debug!(command = descriptor.name, "dispatching");
        handler.execute(scope, command)?;
        Ok(Dispatch::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::context::MemoryContext;

    struct Noop(&'static CommandDescriptor);

    impl WorkerCommand for Noop {
        fn descriptor(&self) -> &'static CommandDescriptor {
            self.0
        }

        fn execute(&self, scope: &mut Scope<'_>, _command: &Command) -> Result<()> {
            scope.context.debug("noop ran");
            Ok(())
        }
    }

    static PING: CommandDescriptor = CommandDescriptor {
        name: "ping",
        aliases: &["p"],
        allowed_in_restricted_mode: false,
    };

    static PONG: CommandDescriptor = CommandDescriptor {
        name: "pong",
        aliases: &["p"],
        allowed_in_restricted_mode: true,
    };

    fn run(
        dispatcher: &Dispatcher,
        command: &Command,
        restricted: bool,
    ) -> (MemoryContext, Result<Dispatch>) {
        let mut ctx = MemoryContext::new();
        let mut timeline = TimelineTracker::new();
        let result = dispatcher.dispatch(
            &mut Scope {
                context: &mut ctx,
                timeline: &mut timeline,
            },
            command,
            restricted,
        );
        (ctx, result)
    }

    #[test]
    fn task_commands_install_cleanly() {
        let dispatcher = Dispatcher::task_commands().unwrap();
        assert_eq!(dispatcher.descriptors().count(), 13);
        assert!(dispatcher.resolve("issue").is_some());
        assert!(dispatcher.resolve("logissue").is_some());
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.install(Box::new(Noop(&PING))).unwrap();
        let err = dispatcher.install(Box::new(Noop(&PONG))).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(ref n) if n == "p"));
        // The failed install left nothing behind.
        assert!(dispatcher.resolve("pong").is_none());
    }

    #[test]
    fn alias_dispatches_to_handler() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.install(Box::new(Noop(&PING))).unwrap();
        let (ctx, result) = run(&dispatcher, &Command::new("p"), false);
        assert_eq!(result.unwrap(), Dispatch::Handled);
        assert_eq!(ctx.debug_log, vec!["noop ran"]);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let dispatcher = Dispatcher::task_commands().unwrap();
        let (_, result) = run(&dispatcher, &Command::new("SetSecret"), false);
        assert_eq!(result.unwrap(), Dispatch::Unrecognized);
    }

    #[test]
    fn unknown_command_is_unrecognized() {
        let dispatcher = Dispatcher::task_commands().unwrap();
        let (_, result) = run(&dispatcher, &Command::new("nosuchcommand"), true);
        assert_eq!(result.unwrap(), Dispatch::Unrecognized);
    }

    #[test]
    fn restricted_mode_rejects_disallowed_handlers() {
        let dispatcher = Dispatcher::task_commands().unwrap();
        let command = Command::new("setendpoint")
            .with_property("id", uuid::Uuid::new_v4().to_string())
            .with_property("field", "url")
            .with_data("https://example.com");
        let (_, result) = run(&dispatcher, &command, true);
        assert!(matches!(result, Err(CommandError::Restricted(ref n)) if n == "setendpoint"));
    }

    #[test]
    fn restricted_mode_allows_marked_handlers() {
        let dispatcher = Dispatcher::task_commands().unwrap();
        let (ctx, result) = run(&dispatcher, &Command::new("debug").with_data("hi"), true);
        assert_eq!(result.unwrap(), Dispatch::Handled);
        assert_eq!(ctx.debug_log, vec!["hi"]);
    }

    #[test]
    fn restricted_allowlist_matches_command_table() {
        let dispatcher = Dispatcher::task_commands().unwrap();
        let mut blocked: Vec<_> = dispatcher
            .descriptors()
            .filter(|d| !d.allowed_in_restricted_mode)
            .map(|d| d.name)
            .collect();
        blocked.sort_unstable();
        assert_eq!(
            blocked,
            vec!["addattachment", "setendpoint", "uploadfile", "uploadsummary"]
        );
    }
}
