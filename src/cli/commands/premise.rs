use clap::Subcommand;
use serde_json::json;

use crate::browser::TableView;
use crate::cli::utils::*;
use crate::cli::{App, OutputFormat};
use crate::context::{load_premise_context, render_header, HeaderSlot};
use crate::filter::{Filter, SortDirection};

#[derive(Subcommand)]
pub enum PremiseCommands {
    #[command(about = "Show a premise's context header and its inspections")]
    Show {
        #[arg(help = "Premise ID")]
        id: String,
    },
}

pub async fn handle(cmd: PremiseCommands, app: &App) -> anyhow::Result<()> {
    match cmd {
        PremiseCommands::Show { id } => {
            app.require_user().await?;
            let inspections = app.modules.get("inspections")?.clone();

            let mut filter = Filter::new(&inspections.table)?;
            filter
                .eq("premise_id", id.trim())?
                .order(&inspections.columns[0].name, SortDirection::Asc)?;

            // The header and its inspections are independent reads
            let mut slot = HeaderSlot::Empty;
            let (premise, rows) = futures::join!(
                load_premise_context(app.client.as_ref(), &id, &mut slot),
                async {
                    if id.trim().is_empty() {
                        Ok(Vec::new())
                    } else {
                        app.client.select(&filter).await
                    }
                },
            );

            if let Err(e) = premise {
                output_header(&app.output, &slot)?;
                return Err(AlreadyReported(e.to_string()).into());
            }

            let mut table = TableView::for_module(&inspections);
            match rows {
                Ok(rows) => table.set_rows(&inspections, &rows),
                Err(e) => tracing::error!(premise_id = %id, "listing inspections failed: {}", e),
            }

            match app.output {
                OutputFormat::Json => output_json(&json!({ "header": slot, "inspections": table })),
                OutputFormat::Text => {
                    print!("{}", render_header(&slot));
                    println!();
                    output_table(&app.output, &table)
                }
            }
        }
    }
}
