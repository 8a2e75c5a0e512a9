//! Declarative field schemas and their validation

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

use super::values::{FieldErrors, FormValues, ReferenceOptions};
use crate::models::RecordId;

/// How a field is entered
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    /// Fixed set of allowed values
    Choice(Vec<String>),
    DateTime,
    /// Id of a record from a loaded reference source
    Reference { source: &'static str },
}

/// A single constraint; rules are checked in order and the first failure is reported
#[derive(Debug, Clone)]
pub enum Rule {
    Required(String),
    Pattern { regex: Regex, message: String },
    MinLength(usize, String),
    MaxLength(usize, String),
    OneOf(Vec<String>, String),
    ValidDateTime(String),
    NotBeforeNow(String),
    NotBefore { field: &'static str, message: String },
    Reference { source: &'static str, message: String },
}

/// Everything validation needs besides the input itself
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub now: NaiveDateTime,
    pub references: &'a ReferenceOptions,
}

impl<'a> ValidationContext<'a> {
    pub fn new(now: NaiveDateTime, references: &'a ReferenceOptions) -> Self {
        Self { now, references }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
    rules: Vec<Rule>,
}

impl FieldSchema {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            placeholder: "",
            rules: Vec::new(),
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn choice(name: &'static str, label: &'static str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(name, label, FieldKind::Choice(options))
    }

    pub fn datetime(name: &'static str, label: &'static str) -> Self {
        let mut field = Self::new(name, label, FieldKind::DateTime)
            .with_placeholder("YYYY-MM-DD or YYYY-MM-DDTHH:MM");
        field
            .rules
            .push(Rule::ValidDateTime(format!("{} must be a valid date", label)));
        field
    }

    pub fn reference(name: &'static str, label: &'static str, source: &'static str) -> Self {
        Self::new(name, label, FieldKind::Reference { source })
    }

    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn required(mut self, message: &str) -> Self {
        self.rules.insert(0, Rule::Required(message.to_string()));
        self
    }

    pub fn pattern(mut self, regex: &Regex, message: &str) -> Self {
        self.rules.push(Rule::Pattern {
            regex: regex.clone(),
            message: message.to_string(),
        });
        self
    }

    pub fn length(mut self, min: usize, max: usize, min_message: &str, max_message: &str) -> Self {
        self.rules.push(Rule::MinLength(min, min_message.to_string()));
        self.rules.push(Rule::MaxLength(max, max_message.to_string()));
        self
    }

    /// Restrict the value to the field's own choice list
    pub fn one_of(mut self, message: &str) -> Self {
        let options = match &self.kind {
            FieldKind::Choice(options) => options.clone(),
            _ => Vec::new(),
        };
        self.rules.push(Rule::OneOf(options, message.to_string()));
        self
    }

    pub fn not_before_now(mut self, message: &str) -> Self {
        self.rules.push(Rule::NotBeforeNow(message.to_string()));
        self
    }

    pub fn not_before(mut self, field: &'static str, message: &str) -> Self {
        self.rules.push(Rule::NotBefore {
            field,
            message: message.to_string(),
        });
        self
    }

    /// Require the value to be the id of a currently loaded option
    pub fn must_reference(mut self, message: &str) -> Self {
        if let FieldKind::Reference { source } = self.kind {
            self.rules.push(Rule::Reference {
                source,
                message: message.to_string(),
            });
        }
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required(_)))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Check one field; `values` gives access to sibling fields for cross-field rules
    pub fn check(&self, values: &FormValues, ctx: &ValidationContext<'_>) -> Result<(), String> {
        let value = values.get(self.name);

        if value.trim().is_empty() {
            return match self.rules.iter().find_map(|r| match r {
                Rule::Required(message) => Some(message.clone()),
                _ => None,
            }) {
                Some(message) => Err(message),
                None => Ok(()),
            };
        }

        for rule in &self.rules {
            match rule {
                Rule::Required(_) => {}
                Rule::Pattern { regex, message } => {
                    if !regex.is_match(value) {
                        return Err(message.clone());
                    }
                }
                Rule::MinLength(min, message) => {
                    if value.chars().count() < *min {
                        return Err(message.clone());
                    }
                }
                Rule::MaxLength(max, message) => {
                    if value.chars().count() > *max {
                        return Err(message.clone());
                    }
                }
                Rule::OneOf(options, message) => {
                    if !options.iter().any(|o| o == value) {
                        return Err(message.clone());
                    }
                }
                Rule::ValidDateTime(message) => {
                    if parse_datetime(value).is_none() {
                        return Err(message.clone());
                    }
                }
                Rule::NotBeforeNow(message) => {
                    if let Some(at) = parse_datetime(value) {
                        if at < ctx.now {
                            return Err(message.clone());
                        }
                    }
                }
                Rule::NotBefore { field, message } => {
                    if let (Some(at), Some(other)) =
                        (parse_datetime(value), parse_datetime(values.get(field)))
                    {
                        if at < other {
                            return Err(message.clone());
                        }
                    }
                }
                Rule::Reference { source, message } => {
                    let known = value
                        .trim()
                        .parse::<RecordId>()
                        .map(|id| ctx.references.contains(source, id))
                        .unwrap_or(false);
                    if !known {
                        return Err(message.clone());
                    }
                }
            }
        }

        Ok(())
    }
}

/// Ordered set of fields making up one entity form
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Empty create-mode values for every field
    pub fn default_values(&self) -> FormValues {
        self.fields
            .iter()
            .fold(FormValues::new(), |values, field| values.with(field.name, ""))
    }

    pub fn validate(&self, values: &FormValues, ctx: &ValidationContext<'_>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if let Err(message) = field.check(values, ctx) {
                errors.add(field.name, message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Parse the date-time spellings the forms accept, as local wall-clock time.
/// A bare date means the start of that day.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Local).naive_local());
    }

    const FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return Some(at);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::RefOption;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_required_reports_only_required_message() {
        let field = FieldSchema::text("name", "Name")
            .required("Name is required")
            .length(2, 50, "too short", "too long");
        let refs = ReferenceOptions::new();
        let ctx = ValidationContext::new(now(), &refs);

        assert_eq!(
            field.check(&FormValues::new(), &ctx),
            Err("Name is required".to_string())
        );
        assert_eq!(
            field.check(&FormValues::new().with("name", "   "), &ctx),
            Err("Name is required".to_string())
        );
    }

    #[test]
    fn test_optional_empty_field_skips_rules() {
        let field = FieldSchema::text("note", "Note").length(2, 5, "short", "long");
        let refs = ReferenceOptions::new();
        let ctx = ValidationContext::new(now(), &refs);
        assert!(field.check(&FormValues::new(), &ctx).is_ok());
        assert!(!field.is_required());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let field = FieldSchema::text("name", "Name").length(2, 3, "short", "long");
        let refs = ReferenceOptions::new();
        let ctx = ValidationContext::new(now(), &refs);
        assert!(field.check(&FormValues::new().with("name", "äöü"), &ctx).is_ok());
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert_eq!(
            parse_datetime("2030-06-01"),
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("2030-06-01T12:30"), parse_datetime("2030-06-01 12:30:00"));
        assert!(parse_datetime("2030-06-01T12:30:00.250").is_some());
        assert!(parse_datetime("2030-06-01T12:30:00Z").is_some());
        assert!(parse_datetime("next tuesday").is_none());
        assert!(parse_datetime("2030-13-01").is_none());
    }

    #[test]
    fn test_not_before_is_inclusive() {
        let schema = FormSchema::new(vec![
            FieldSchema::datetime("start", "Start"),
            FieldSchema::datetime("end", "End").not_before("start", "End before start"),
        ]);
        let refs = ReferenceOptions::new();
        let ctx = ValidationContext::new(now(), &refs);

        let same = FormValues::new()
            .with("start", "2030-07-01T10:00")
            .with("end", "2030-07-01T10:00");
        assert!(schema.validate(&same, &ctx).is_ok());

        let earlier = same.clone().with("end", "2030-07-01T09:59");
        let errors = schema.validate(&earlier, &ctx).unwrap_err();
        assert_eq!(errors.get("end"), Some("End before start"));
        assert!(!errors.contains("start"));
    }

    #[test]
    fn test_reference_must_be_loaded() {
        let field = FieldSchema::reference("driver", "Driver", "drivers")
            .required("Driver is required")
            .must_reference("Select a driver from the list");
        let refs = ReferenceOptions::new().with("drivers", vec![RefOption::new(3, "Asha")]);
        let ctx = ValidationContext::new(now(), &refs);

        assert!(field.check(&FormValues::new().with("driver", "3"), &ctx).is_ok());
        assert_eq!(
            field.check(&FormValues::new().with("driver", "9"), &ctx),
            Err("Select a driver from the list".to_string())
        );
        assert!(field.check(&FormValues::new().with("driver", "abc"), &ctx).is_err());
    }

    #[test]
    fn test_default_values_cover_every_field() {
        let schema = FormSchema::new(vec![
            FieldSchema::text("a", "A"),
            FieldSchema::choice("b", "B", &["x", "y"]),
        ]);
        let values = schema.default_values();
        assert_eq!(values.iter().count(), 2);
        assert!(values.is_empty());
    }
}
