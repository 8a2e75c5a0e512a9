//! Form input values, field errors and reference option sets

use std::collections::BTreeMap;
use std::fmt;

use crate::models::RecordId;

/// Raw field input keyed by field name; absent fields read as empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).trim().is_empty()
    }

    /// True when every field is empty
    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Validation failures, at most one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message reported for a field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for FieldErrors {}

/// One selectable record in a reference dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefOption {
    pub id: RecordId,
    pub label: String,
}

impl RefOption {
    pub fn new(id: RecordId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Currently loaded options for each reference source ("drivers", "vehicles")
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceOptions {
    sources: BTreeMap<String, Vec<RefOption>>,
}

impl ReferenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, source: &str, options: Vec<RefOption>) {
        self.sources.insert(source.to_string(), options);
    }

    pub fn with(mut self, source: &str, options: Vec<RefOption>) -> Self {
        self.set(source, options);
        self
    }

    pub fn get(&self, source: &str) -> &[RefOption] {
        self.sources.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, source: &str, id: RecordId) -> bool {
        self.get(source).iter().any(|option| option.id == id)
    }

    /// Merge another set in, replacing sources present in both
    pub fn extend(&mut self, other: ReferenceOptions) {
        self.sources.extend(other.sources);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_read_as_empty() {
        let values = FormValues::new().with("source", "Pune");
        assert_eq!(values.get("source"), "Pune");
        assert_eq!(values.get("destination"), "");
        assert!(values.is_blank("destination"));
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("puc", "PUC is required");
        errors.add("puc", "PUC must be either \"Valid\" or \"Expired\"");
        assert_eq!(errors.get("puc"), Some("PUC is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_reference_lookup() {
        let options = ReferenceOptions::new().with("drivers", vec![RefOption::new(3, "Asha")]);
        assert!(options.contains("drivers", 3));
        assert!(!options.contains("drivers", 4));
        assert!(options.get("vehicles").is_empty());
    }
}
