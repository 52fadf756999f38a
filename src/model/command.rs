//! Command: one parsed logging command emitted by a task.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A parsed logging command: name, properties, and an optional data payload.
///
/// Property keys are lower-cased on construction so lookups are
/// case-insensitive. When a key appears twice, the last value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,

    #[serde(default, deserialize_with = "lowercase_keys")]
    pub properties: BTreeMap<String, String>,

    #[serde(default)]
    pub data: Option<String>,
}

impl Command {
    /// Creates a command with no properties and no data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            data: None,
        }
    }

    /// Adds a property, lower-casing the key.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_lowercase(), value.into());
        self
    }

    /// Sets the data payload.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Looks up a property by its (lower-case) key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Looks up a property, treating an empty value as absent.
    pub fn non_empty_property(&self, key: &str) -> Option<&str> {
        self.property(key).filter(|v| !v.is_empty())
    }

    /// The data payload, treating an empty payload as absent.
    pub fn non_empty_data(&self) -> Option<&str> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }
}

fn lowercase_keys<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    // A JSON object with duplicate keys yields them in order; later ones overwrite.
    let raw: Vec<(String, String)> = deserializer.deserialize_map(PairsVisitor)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect())
}

struct PairsVisitor;

impl<'de> serde::de::Visitor<'de> for PairsVisitor {
    type Value = Vec<(String, String)>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a map of string properties")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut pairs = Vec::new();
        while let Some((k, v)) = map.next_entry::<String, String>()? {
            pairs.push((k, v));
        }
        Ok(pairs)
    }
}
