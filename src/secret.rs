//! Secret masking for everything the worker prints.

use serde::Serialize;
use serde_json::Value;

/// The text that replaces a masked value.
pub const MASK: &str = "***";

/// Redacts registered values from text.
#[derive(Debug, Clone, Default)]
pub struct SecretMasker {
    values: Vec<String>,
}

impl SecretMasker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a value. Empty values and repeats are ignored.
    pub fn add_value(&mut self, value: &str) {
        if value.is_empty() || self.values.iter().any(|v| v == value) {
            return;
        }
        self.values.push(value.to_string());
        // Longest first, so a secret containing another is masked whole.
        self.values.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `text` with every registered value replaced by [`MASK`].
    pub fn mask(&self, text: &str) -> String {
        let mut masked = text.to_string();
        for value in &self.values {
            if masked.contains(value.as_str()) {
                masked = masked.replace(value.as_str(), MASK);
            }
        }
        masked
    }

    /// Serializes `value` to pretty JSON with every string value masked
    /// before escaping. Object keys are left as they are.
    pub fn mask_json(&self, value: &impl Serialize) -> serde_json::Result<String> {
        let mut tree = serde_json::to_value(value)?;
        self.mask_value(&mut tree);
        serde_json::to_string_pretty(&tree)
    }

    fn mask_value(&self, value: &mut Value) {
        match value {
            Value::String(s) => *s = self.mask(s),
            Value::Array(items) => items.iter_mut().for_each(|v| self.mask_value(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.mask_value(v)),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_registered_values() {
        let mut masker = SecretMasker::new();
        masker.add_value("hunter2");
        assert_eq!(masker.mask("password is hunter2"), "password is ***");
    }

    #[test]
    fn ignores_empty_and_duplicate_values() {
        let mut masker = SecretMasker::new();
        masker.add_value("");
        masker.add_value("abc");
        masker.add_value("abc");
        assert_eq!(masker.len(), 1);
    }

    #[test]
    fn longer_secret_masked_whole() {
        let mut masker = SecretMasker::new();
        masker.add_value("abc");
        masker.add_value("abcdef");
        assert_eq!(masker.mask("x abcdef y"), "x *** y");
    }

    #[test]
    fn json_masks_multiline_values_before_escaping() {
        let mut masker = SecretMasker::new();
        masker.add_value("line1\nline2");
        let json = masker
            .mask_json(&serde_json::json!({ "value": "line1\nline2", "n": 3 }))
            .unwrap();
        assert!(json.contains("\"***\""));
        assert!(!json.contains("line1"));
    }

    #[test]
    fn json_keys_are_not_masked() {
        let mut masker = SecretMasker::new();
        masker.add_value("alpha");
        masker.add_value("beta");
        let json = masker
            .mask_json(&serde_json::json!({ "alpha": "x", "beta": "alpha" }))
            .unwrap();
        let tree: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(tree["alpha"], "x");
        assert_eq!(tree["beta"], "***");
    }

    #[test]
    fn unregistered_text_unchanged() {
        let masker = SecretMasker::new();
        assert!(masker.is_empty());
        assert_eq!(masker.mask("nothing secret"), "nothing secret");
    }
}
