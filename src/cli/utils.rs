use serde::Serialize;
use serde_json::{json, Value};

use crate::browser::{render_form, render_table, TableView};
use crate::cli::OutputFormat;
use crate::context::{render_header, HeaderSlot};
use crate::ui::{FormView, Severity, Toast};

/// Marks a failure the user has already been shown, so `main` exits
/// non-zero without printing it a second time.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AlreadyReported(pub String);

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn output_table(output_format: &OutputFormat, table: &TableView) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(table),
        OutputFormat::Text => {
            print!("{}", render_table(table));
            Ok(())
        }
    }
}

pub fn output_form(output_format: &OutputFormat, form: &FormView) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(form),
        OutputFormat::Text => {
            print!("{}", render_form(form));
            Ok(())
        }
    }
}

pub fn output_header(output_format: &OutputFormat, slot: &HeaderSlot) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(slot),
        OutputFormat::Text => {
            print!("{}", render_header(slot));
            Ok(())
        }
    }
}

/// Toasts go to stderr in text mode so piped tables stay clean
pub fn output_toasts(output_format: &OutputFormat, toasts: &[Toast]) -> anyhow::Result<()> {
    if toasts.is_empty() {
        return Ok(());
    }
    match output_format {
        OutputFormat::Json => {
            let items: Vec<Value> = toasts
                .iter()
                .map(|t| json!({ "message": t.message, "severity": t.severity, "color": t.severity.color() }))
                .collect();
            output_json(&json!({ "toasts": items }))
        }
        OutputFormat::Text => {
            for toast in toasts {
                let marker = match toast.severity {
                    Severity::Success => "✓",
                    Severity::Error => "✗",
                    Severity::Info => "i",
                };
                eprintln!("{} {}", marker, toast.message);
            }
            Ok(())
        }
    }
}
