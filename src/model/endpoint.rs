//! Service endpoints available to a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A named connection to an external service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Endpoint {
    pub id: Uuid,

    #[serde(default)]
    pub url: Option<Url>,

    #[serde(default)]
    pub data: BTreeMap<String, String>,

    /// Credentials. Values are secrets and must be masked before display.
    #[serde(default)]
    pub auth_parameters: BTreeMap<String, String>,
}

impl Endpoint {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            url: None,
            data: BTreeMap::new(),
            auth_parameters: BTreeMap::new(),
        }
    }
}
