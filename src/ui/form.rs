use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::modules::{ColumnSpec, InputType};
use crate::record::Record;

/// Submitted form entries, as strings, keyed by input name
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub input_type: InputType,
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub title: String,
    pub fields: Vec<FormField>,
    pub submit_label: String,
}

impl FormView {
    /// One required input per column, blank
    pub fn from_columns(title: &str, columns: &[ColumnSpec]) -> Self {
        let fields = columns
            .iter()
            .map(|c| FormField {
                name: c.name.clone(),
                label: c.label.clone(),
                input_type: c.input_type,
                value: String::new(),
                required: true,
            })
            .collect();
        Self { title: title.to_string(), fields, submit_label: "Save".to_string() }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill out the {0} field")]
    Missing(String),
    #[error("{label}: {value:?} is not a valid {kind}")]
    Invalid { label: String, value: String, kind: &'static str },
}

/// Copy record values into fields with matching names; nulls become ""
pub fn populate_form(form: &mut FormView, record: &Record) {
    for field in form.fields.iter_mut() {
        if record.has(&field.name) {
            field.value = record.display(&field.name);
        }
    }
}

/// Check entries the way the browser's constraint validation would:
/// required fields present, typed inputs parseable. Nothing else.
pub fn check_values(form: &FormView, values: &FormValues) -> Result<(), FormError> {
    for field in &form.fields {
        let value = values.get(&field.name).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() {
            if field.required {
                return Err(FormError::Missing(field.label.clone()));
            }
            continue;
        }
        let kind = match field.input_type {
            InputType::Number if value.parse::<f64>().is_err() => Some("number"),
            InputType::Date if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => Some("date"),
            InputType::Email if !is_email(value) => Some("email address"),
            _ => None,
        };
        if let Some(kind) = kind {
            return Err(FormError::Invalid { label: field.label.clone(), value: value.to_string(), kind });
        }
    }
    Ok(())
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Payload for the form's own fields, every value a string
pub fn form_data(form: &FormView, values: &FormValues) -> Record {
    let mut record = Record::new();
    for field in &form.fields {
        let value = values.get(&field.name).cloned().unwrap_or_default();
        record.set(field.name.clone(), Value::String(value));
    }
    record
}

/// Parse `name=value` pairs given on a command line
pub fn parse_assignments<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<FormValues, String> {
    let mut values = FormValues::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got {:?}", pair))?;
        values.insert(key.trim().to_string(), value.to_string());
    }
    Ok(values)
}
