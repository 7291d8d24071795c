use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{App, OutputFormat};
use crate::ui::Theme;

#[derive(Subcommand)]
pub enum ThemeCommands {
    #[command(about = "Show the saved theme")]
    Show,

    #[command(about = "Switch between light and dark")]
    Toggle,
}

pub async fn handle(cmd: ThemeCommands, app: &App) -> anyhow::Result<()> {
    let theme = match cmd {
        ThemeCommands::Show => app.prefs.load_theme()?,
        ThemeCommands::Toggle => app.prefs.toggle_theme()?,
    };
    output_theme(&app.output, theme)
}

fn output_theme(output_format: &OutputFormat, theme: Theme) -> anyhow::Result<()> {
    let (background, foreground) = theme.palette();
    match output_format {
        OutputFormat::Json => output_json(&json!({
            "theme": theme,
            "background": background,
            "foreground": foreground,
        })),
        OutputFormat::Text => {
            println!("Theme: {} (background {}, text {})", theme, background, foreground);
            Ok(())
        }
    }
}
