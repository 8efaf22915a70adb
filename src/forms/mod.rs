// src/forms/mod.rs
// DOCUMENTATION: Form validation layer
// PURPOSE: Collect field-level errors and turn raw form input into typed values

pub mod upload;

pub use upload::*;

use std::collections::BTreeMap;
use validator::{ValidationError, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const ENTER_A_NUMBER: &str = "Enter a number.";

/// Field errors keyed by form field name, plus errors not tied to one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn has(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn merge(&mut self, other: FormErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
        self.non_field.extend(other.non_field);
    }

    /// Ok when nothing was recorded, otherwise the errors themselves
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                form_errors.add(field, describe(error));
            }
        }
        form_errors
    }
}

/// Human readable message for a validator error
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).cloned();
    match error.code.as_ref() {
        "length" => {
            let len = param("value").and_then(|v| v.as_str().map(|s| s.chars().count() as u64));
            let min = param("min").and_then(|v| v.as_u64());
            let max = param("max").and_then(|v| v.as_u64());
            match (len, min, max) {
                (Some(0), _, _) => REQUIRED.to_string(),
                (Some(len), _, Some(max)) if len > max => {
                    format!("Ensure this value has at most {} characters.", max)
                }
                (_, Some(min), _) => format!("Ensure this value has at least {} characters.", min),
                _ => "Ensure this value has a valid length.".to_string(),
            }
        }
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Ensure this value is between {} and {}.", min, max),
            _ => "Ensure this value is within the allowed range.".to_string(),
        },
        "email" => "Enter a valid email address.".to_string(),
        other => format!("Invalid value ({}).", other),
    }
}

/// Trim a text field; empty input becomes None
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a required floating point field, recording an error on failure
pub fn parse_float(field: &str, raw: &str, errors: &mut FormErrors) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.add(field, ENTER_A_NUMBER);
            None
        }
    }
}
