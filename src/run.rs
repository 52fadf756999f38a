//! A single job run: the owner of all per-run command state.

use tracing::info;

use crate::context::ExecutionContext;
use crate::dispatch::{Dispatch, Dispatcher, Scope};
use crate::error::Result;
use crate::model::Command;
use crate::timeline::TimelineTracker;

/// Processes one run's commands, strictly one at a time.
///
/// `process` takes `&mut self`, so commands for a run cannot be submitted
/// concurrently. Runs that execute in parallel each get their own `JobRun`.
pub struct JobRun<C> {
    context: C,
    timeline: TimelineTracker,
    restricted: bool,
}

impl<C: ExecutionContext> JobRun<C> {
    pub fn new(context: C, restricted: bool) -> Self {
        Self {
            context,
            timeline: TimelineTracker::new(),
            restricted,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn timeline(&self) -> &TimelineTracker {
        &self.timeline
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Dispatches the next command of the run.
    pub fn process(&mut self, dispatcher: &Dispatcher, command: &Command) -> Result<Dispatch> {
        let mut scope = Scope {
            context: &mut self.context,
            timeline: &mut self.timeline,
        };
        dispatcher.dispatch(&mut scope, command, self.restricted)
    }

    /// Ends the run, dropping its tracker and returning the context.
    pub fn finish(self) -> C {
        info!(
            records = self.timeline.len(),
            restricted = self.restricted,
            "job run finished"
        );
        self.context
    }
}
