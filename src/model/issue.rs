//! Issues: errors and warnings a task reports against the run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An error or warning attached to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub issue_type: IssueType,

    /// `General`, or `Code` when the issue points at a source location.
    pub category: String,

    pub message: String,

    /// Every property of the originating command, plus derived ones such as `repo`.
    pub data: BTreeMap<String, String>,
}

/// The severity of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    Error,
    Warning,
}

impl IssueType {
    /// Parses `error` or `warning`, ignoring case.
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("error") {
            Some(Self::Error)
        } else if text.eq_ignore_ascii_case("warning") {
            Some(Self::Warning)
        } else {
            None
        }
    }
}
