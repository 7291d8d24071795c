use clap::Subcommand;
use serde_json::json;

use crate::access::{apply_location_filters, describe_location_filter, get_current_user_profile, Role, UserProfile};
use crate::cli::utils::*;
use crate::cli::{App, OutputFormat};
use crate::filter::filter_where::FilterWhere;
use crate::filter::Predicate;

#[derive(Subcommand)]
pub enum AccessCommands {
    #[command(about = "Show the signed-in user's location scope and the row filter it produces")]
    Show,

    #[command(about = "Evaluate the location filter for a hypothetical profile")]
    Check {
        #[arg(long, default_value = "user", help = "Role name")]
        role: String,
        #[arg(long)]
        ward: Option<String>,
        #[arg(long)]
        sub_county: Option<String>,
        #[arg(long)]
        county: Option<String>,
        #[arg(long, value_delimiter = ',', help = "Comma-separated ward list")]
        allowed_wards: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "Comma-separated sub-county list")]
        allowed_subcounties: Vec<String>,
    },
}

pub async fn handle(cmd: AccessCommands, app: &App) -> anyhow::Result<()> {
    match cmd {
        AccessCommands::Show => {
            app.require_user().await?;
            let profile = get_current_user_profile(app.client.as_ref()).await;
            report(app, profile.as_ref())
        }
        AccessCommands::Check { role, ward, sub_county, county, allowed_wards, allowed_subcounties } => {
            let profile = UserProfile {
                id: "check".to_string(),
                role: Role::from(role),
                ward,
                sub_county,
                county,
                allowed_wards: Some(allowed_wards),
                allowed_subcounties: Some(allowed_subcounties),
                ..UserProfile::default()
            };
            report(app, Some(&profile))
        }
    }
}

fn report(app: &App, profile: Option<&UserProfile>) -> anyhow::Result<()> {
    let scope = describe_location_filter(profile);
    let predicate = apply_location_filters(profile, &app.config.access);
    let filter = predicate_text(&predicate)?;

    match app.output {
        OutputFormat::Json => output_json(&json!({
            "scope": scope,
            "role": profile.map(|p| p.role.to_string()),
            "unrestricted": predicate.is_unrestricted(),
            "filter": filter,
        })),
        OutputFormat::Text => {
            println!("Scope:  {}", scope);
            println!("Filter: {}", filter);
            Ok(())
        }
    }
}

fn predicate_text(predicate: &Predicate) -> anyhow::Result<String> {
    let text = match predicate {
        Predicate::Unrestricted => "none (all rows)".to_string(),
        Predicate::MatchNone | Predicate::Where(_) => FilterWhere::generate(&predicate.conditions())?
            .into_iter()
            .map(|(column, condition)| format!("{}={}", column, condition))
            .collect::<Vec<_>>()
            .join("&"),
    };
    Ok(text)
}
