use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{App, OutputFormat};

#[derive(Subcommand)]
pub enum ModuleCommands {
    #[command(about = "List configured modules")]
    List,

    #[command(about = "Show a module's table and columns")]
    Show {
        #[arg(help = "Module name")]
        name: String,
    },
}

pub async fn handle(cmd: ModuleCommands, app: &App) -> anyhow::Result<()> {
    match cmd {
        ModuleCommands::List => match app.output {
            OutputFormat::Json => {
                let modules: Vec<_> = app
                    .modules
                    .iter()
                    .map(|(name, m)| json!({ "name": name, "table": m.table, "title": m.title, "scoped": m.scoped }))
                    .collect();
                output_json(&json!({ "modules": modules }))
            }
            OutputFormat::Text => {
                println!("{:<15} {:<15} {:<8} {}", "NAME", "TABLE", "SCOPED", "TITLE");
                println!("{}", "-".repeat(60));
                for (name, m) in app.modules.iter() {
                    let scoped = if m.scoped { "yes" } else { "no" };
                    println!("{:<15} {:<15} {:<8} {}", name, m.table, scoped, m.title);
                }
                Ok(())
            }
        },
        ModuleCommands::Show { name } => {
            let module = app.modules.get(&name)?;
            match app.output {
                OutputFormat::Json => output_json(module),
                OutputFormat::Text => {
                    println!("{} ({})", module.title, module.table);
                    if !module.subtitle.is_empty() {
                        println!("{}", module.subtitle);
                    }
                    println!();
                    println!("{:<22} {:<22} {}", "COLUMN", "LABEL", "TYPE");
                    for column in &module.columns {
                        println!("{:<22} {:<22} {}", column.name, column.label, column.input_type.as_str());
                    }
                    Ok(())
                }
            }
        }
    }
}
