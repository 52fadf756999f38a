//! Variables in the job and task scopes.

use serde::{Deserialize, Serialize};

/// A variable and the flags attached to it when it was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Variable {
    pub name: String,

    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub secret: bool,

    /// Published to downstream jobs. Only meaningful in the job scope.
    #[serde(default)]
    pub output: bool,

    #[serde(default)]
    pub read_only: bool,
}
