//! `setvariable` and `settaskvariable`: write job- and task-scoped variables.
//!
//! Both refuse to overwrite read-only variables and refuse secrets that span
//! lines unless the job explicitly allows it.

use std::env;

use tracing::warn;

use crate::context::{ExecutionContext, VariableFlags};
use crate::convert::convert_to_bool;
use crate::dispatch::{CommandDescriptor, Scope, WorkerCommand};
use crate::error::{CommandError, Result};
use crate::model::Command;

use super::{flag, require};

/// Job variable (or, failing that, environment variable) that permits
/// multi-line secrets.
pub const MULTILINE_SECRET_OVERRIDE: &str = "SYSTEM_UNSAFEALLOWMULTILINESECRET";

const VARIABLE: &str = "variable";
const IS_SECRET: &str = "issecret";
const IS_OUTPUT: &str = "isoutput";
const IS_READ_ONLY: &str = "isreadonly";

static SET_VARIABLE: CommandDescriptor = CommandDescriptor {
    name: "setvariable",
    aliases: &[],
    allowed_in_restricted_mode: true,
};

static SET_TASK_VARIABLE: CommandDescriptor = CommandDescriptor {
    name: "settaskvariable",
    aliases: &[],
    allowed_in_restricted_mode: true,
};

pub struct SetVariableCommand;

impl WorkerCommand for SetVariableCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &SET_VARIABLE
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let name = require(command, SET_VARIABLE.name, VARIABLE)?;
        let value = command.data.as_deref().unwrap_or_default();
        let flags = VariableFlags {
            secret: flag(command, IS_SECRET),
            output: flag(command, IS_OUTPUT),
            read_only: flag(command, IS_READ_ONLY),
        };

        let context = &mut *scope.context;
        if context.is_variable_read_only(name) {
            return refuse_read_only(context, SET_VARIABLE.name, name);
        }
        if flags.secret {
            check_multiline(context, SET_VARIABLE.name, value)?;
        }

        context.set_variable(name, value, flags);
        Ok(())
    }
}

pub struct SetTaskVariableCommand;

impl WorkerCommand for SetTaskVariableCommand {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &SET_TASK_VARIABLE
    }

    fn execute(&self, scope: &mut Scope<'_>, command: &Command) -> Result<()> {
        let name = require(command, SET_TASK_VARIABLE.name, VARIABLE)?;
        let value = command.data.as_deref().unwrap_or_default();
        let secret = flag(command, IS_SECRET);
        let read_only = flag(command, IS_READ_ONLY);

        let context = &mut *scope.context;
        if context.is_task_variable_read_only(name) {
            return refuse_read_only(context, SET_TASK_VARIABLE.name, name);
        }
        if secret {
            check_multiline(context, SET_TASK_VARIABLE.name, value)?;
        }

        context.set_task_variable(name, value, secret, read_only);
        Ok(())
    }
}

/// Rejects a write to a read-only variable.
///
/// Fails when enforcement is on; otherwise warns and skips the write.
fn refuse_read_only(
    context: &mut dyn ExecutionContext,
    command: &'static str,
    name: &str,
) -> Result<()> {
    if context.enforce_read_only_variables() {
        return Err(CommandError::ReadOnlyVariable {
            command,
            name: name.to_string(),
        });
    }

    warn!(command, variable = name, "ignored write to read-only variable");
    context.warning(&format!(
        "{command}: variable '{name}' is read-only and was not changed"
    ));
    Ok(())
}

fn check_multiline(
    context: &dyn ExecutionContext,
    command: &'static str,
    value: &str,
) -> Result<()> {
    if !value.contains('\n') {
        return Ok(());
    }

    let env_value = env::var(MULTILINE_SECRET_OVERRIDE).ok();
    let job_value = context.variable_bool(MULTILINE_SECRET_OVERRIDE);
    if multiline_secret_allowed(job_value, env_value.as_deref()) {
        Ok(())
    } else {
        Err(CommandError::MultilineSecret(command))
    }
}

/// The job variable decides when set; otherwise the environment does.
fn multiline_secret_allowed(job_value: Option<bool>, env_value: Option<&str>) -> bool {
    job_value.unwrap_or_else(|| convert_to_bool(env_value, false))
}
