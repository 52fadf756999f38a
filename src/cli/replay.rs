//! Replaying recorded commands through a job run.

use serde::Serialize;
use tracing::warn;

use crate::context::{ExecutionContext, MemoryContext, Progress};
use crate::dispatch::{Dispatch, Dispatcher};
use crate::model::{
    Attachment, Command, Endpoint, Issue, TaskResult, TimelineRecord, Variable,
};
use crate::run::JobRun;

/// A command that no handler claimed.
#[derive(Debug, Clone, Serialize)]
pub(super) struct Unrecognized {
    pub line: usize,
    pub name: String,
}

/// A command whose handler failed.
#[derive(Debug, Clone, Serialize)]
pub(super) struct Failure {
    pub line: usize,
    pub command: String,
    pub error: String,
}

/// What a replay did, plus the final state of its context.
#[derive(Debug)]
pub(super) struct Outcome {
    pub context: MemoryContext,
    pub restricted: bool,
    pub processed: usize,
    pub unrecognized: Vec<Unrecognized>,
    pub failures: Vec<Failure>,
    pub stopped_early: bool,
}

/// Feeds each non-blank JSON line of `input` to a fresh run.
///
/// A line that is not a command aborts the replay. A command that fails
/// marks the run Failed and the replay moves on.
pub(super) fn replay(
    dispatcher: &Dispatcher,
    context: MemoryContext,
    restricted: bool,
    input: &str,
) -> Result<Outcome, String> {
    let mut run = JobRun::new(context, restricted);
    let mut processed = 0;
    let mut unrecognized = Vec::new();
    let mut failures = Vec::new();
    let mut stopped_early = false;

    for (index, text) in input.lines().enumerate() {
        let line = index + 1;
        if text.trim().is_empty() {
            continue;
        }
        if run.context().completed {
            stopped_early = true;
            break;
        }

        let command: Command = serde_json::from_str(text)
            .map_err(|e| format!("line {line}: not a logging command: {e}"))?;
        processed += 1;

        match run.process(dispatcher, &command) {
            Ok(Dispatch::Handled) => {}
            Ok(Dispatch::Unrecognized) => unrecognized.push(Unrecognized {
                line,
                name: command.name,
            }),
            Err(e) => {
                warn!(line, command = %command.name, error = %e, "command failed");
                let context = run.context_mut();
                let merged = TaskResult::merge(context.result(), TaskResult::Failed);
                context.set_result(merged);
                failures.push(Failure {
                    line,
                    command: command.name,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(Outcome {
        context: run.finish(),
        restricted,
        processed,
        unrecognized,
        failures,
        stopped_early,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct Summary<'a> {
    restricted: bool,
    processed: usize,
    stopped_early: bool,
    result: Option<TaskResult>,
    completed: bool,
    unrecognized: &'a [Unrecognized],
    failures: &'a [Failure],
    timeline: Vec<&'a TimelineRecord>,
    issues: &'a [Issue],
    variables: Vec<&'a Variable>,
    task_variables: Vec<&'a Variable>,
    endpoints: &'a [Endpoint],
    prepend_path: &'a [String],
    attachments: &'a [Attachment],
    progress: &'a [Progress],
    warnings: &'a [String],
    debug: &'a [String],
}

impl Outcome {
    /// The summary as pretty JSON, with every registered secret masked.
    pub fn to_json(&self) -> Result<String, String> {
        let ctx = &self.context;
        let summary = Summary {
            restricted: self.restricted,
            processed: self.processed,
            stopped_early: self.stopped_early,
            result: ctx.result,
            completed: ctx.completed,
            unrecognized: &self.unrecognized,
            failures: &self.failures,
            timeline: ctx.timeline.values().collect(),
            issues: &ctx.issues,
            variables: ctx.variables.values().collect(),
            task_variables: ctx.task_variables.values().collect(),
            endpoints: &ctx.endpoints,
            prepend_path: &ctx.prepend_path,
            attachments: &ctx.attachments,
            progress: &ctx.progress,
            warnings: &ctx.warnings,
            debug: &ctx.debug_log,
        };
        ctx.masker
            .mask_json(&summary)
            .map_err(|e| format!("failed to serialize summary: {e}"))
    }

    /// One-line description for stderr.
    pub fn describe(&self) -> String {
        let result = self
            .context
            .result
            .map_or_else(|| "no result".to_string(), |r| r.to_string());
        format!(
            "Replayed {} command(s), {} failed, {}",
            self.processed,
            self.failures.len(),
            result
        )
    }
}
