//! Schema-driven form validation

pub mod schema;
pub mod values;

pub use schema::{parse_datetime, FieldKind, FieldSchema, FormSchema, Rule, ValidationContext};
pub use values::{FieldErrors, FormValues, RefOption, ReferenceOptions};
