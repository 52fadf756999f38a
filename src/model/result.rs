//! Task result and the worst-result-wins merge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The outcome of a task, a timeline record, or a whole run.
///
/// Variants are declared from best to worst; the derived ordering is used
/// by [`TaskResult::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskResult {
    Succeeded,
    SucceededWithIssues,
    Failed,
    Cancelled,
    Skipped,
}

impl TaskResult {
    /// Parses a result name, ignoring case.
    ///
    /// Accepts the single-l spelling `Canceled` as well.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "succeeded" => Some(Self::Succeeded),
            "succeededwithissues" => Some(Self::SucceededWithIssues),
            "failed" => Some(Self::Failed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// Merges an incoming result into the current one.
    ///
    /// A run with no result yet takes the incoming one. Once a run is
    /// cancelled or skipped it stays that way. Otherwise the worse result wins.
    pub fn merge(current: Option<Self>, incoming: Self) -> Self {
        match current {
            None => incoming,
            Some(current) if current > Self::Failed => current,
            Some(current) => current.max(incoming),
        }
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Succeeded => "Succeeded",
            Self::SucceededWithIssues => "SucceededWithIssues",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Skipped => "Skipped",
        };
        f.write_str(s)
    }
}
