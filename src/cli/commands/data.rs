use clap::Subcommand;
use serde_json::json;

use crate::browser::{BrowserError, RecordBrowser};
use crate::cli::utils::*;
use crate::cli::{App, OutputFormat};
use crate::ui::{parse_assignments, FormValues};

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List a module's records, optionally searching its first column")]
    List {
        #[arg(help = "Module name (e.g. premises, complaints, inspections)")]
        module: String,
        #[arg(long, short, help = "Case-insensitive search on the first column")]
        search: Option<String>,
    },

    #[command(about = "Show one record as its edit form")]
    Show {
        #[arg(help = "Module name")]
        module: String,
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Add a record")]
    Add {
        #[arg(help = "Module name")]
        module: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", help = "Field value; repeat for each column")]
        set: Vec<String>,
    },

    #[command(about = "Edit a record; unspecified fields keep their current values")]
    Edit {
        #[arg(help = "Module name")]
        module: String,
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", help = "Field value to change")]
        set: Vec<String>,
    },

    #[command(about = "Delete a record after confirmation")]
    Delete {
        #[arg(help = "Module name")]
        module: String,
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

pub async fn handle(cmd: DataCommands, app: &App) -> anyhow::Result<()> {
    match cmd {
        DataCommands::List { module, search } => {
            let mut browser = app.browser(&module, false).await?;
            browser.list(search.as_deref().unwrap_or("")).await?;
            output_table(&app.output, browser.table())
        }
        DataCommands::Show { module, id } => {
            let mut browser = app.browser(&module, false).await?;
            let form = browser.open_edit(&id).await.map_err(|e| reported(app, e))?;
            output_form(&app.output, &form)
        }
        DataCommands::Add { module, set } => {
            let values = assignments(&set)?;
            let mut browser = app.browser(&module, false).await?;
            browser.open_add();
            browser.submit(&values).await.map_err(|e| reported(app, e))?;
            finish(app, &mut browser)
        }
        DataCommands::Edit { module, id, set } => {
            let overrides = assignments(&set)?;
            let mut browser = app.browser(&module, false).await?;
            let form = browser.open_edit(&id).await.map_err(|e| reported(app, e))?;

            let mut values: FormValues = form.fields.iter().map(|f| (f.name.clone(), f.value.clone())).collect();
            values.extend(overrides);

            browser.submit(&values).await.map_err(|e| reported(app, e))?;
            finish(app, &mut browser)
        }
        DataCommands::Delete { module, id, yes } => {
            let mut browser = app.browser(&module, yes).await?;
            if !browser.delete(&id).await.map_err(|e| reported(app, e))? {
                return output_success(&app.output, "Delete cancelled", Some(json!({ "deleted": false })));
            }
            finish(app, &mut browser)
        }
    }
}

fn assignments(pairs: &[String]) -> anyhow::Result<FormValues> {
    parse_assignments(pairs.iter().map(String::as_str)).map_err(anyhow::Error::msg)
}

/// Errors the browser already alerted are not printed again; JSON callers
/// still get a structured error on stdout.
fn reported(app: &App, e: BrowserError) -> anyhow::Error {
    if let (OutputFormat::Json, BrowserError::Backend(err)) = (&app.output, &e) {
        if let Err(out) = output_error(&app.output, &err.to_string(), Some(err.error_code())) {
            return out;
        }
    }
    match e {
        BrowserError::Backend(_) | BrowserError::NotFound(_) => AlreadyReported(e.to_string()).into(),
        other => other.into(),
    }
}

/// After a mutation: toasts, then the refreshed listing
fn finish(app: &App, browser: &mut RecordBrowser) -> anyhow::Result<()> {
    let toasts = browser.toasts_mut().drain();
    output_toasts(&app.output, &toasts)?;
    output_table(&app.output, browser.table())
}
