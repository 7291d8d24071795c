use std::io::{self, BufRead, Write};
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::access::{describe_location_filter, get_current_user_profile};
use crate::auth::{decode_claims, logout, require_login, AuthGate};
use crate::cli::utils::*;
use crate::cli::{App, OutputFormat};
use crate::ui::ToastStack;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and forget the saved session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show the signed-in user's profile and visibility scope")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, app: &App) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };

            let session = app.client.sign_in(&email, &password).await?;
            if let Some(store) = &app.sessions {
                store.save(&session)?;
            }
            tracing::info!(user = %session.user.id, "signed in");

            output_success(
                &app.output,
                &format!("Signed in as {}", session.user.email.as_deref().unwrap_or(&email)),
                Some(json!({ "user": session.user, "expires_at": session.expires_at })),
            )
        }
        AuthCommands::Logout => {
            let mut toasts = ToastStack::new(Duration::from_millis(app.config.ui.toast_duration_ms));
            let ended = logout(app.client.as_ref(), &mut toasts).await;
            output_toasts(&app.output, &toasts.drain())?;
            if !ended {
                return Err(AlreadyReported("sign-out failed".to_string()).into());
            }
            if let Some(store) = &app.sessions {
                store.clear()?;
            }

            if let OutputFormat::Json = app.output {
                output_json(&json!({ "success": true }))?;
            }
            Ok(())
        }
        AuthCommands::Status => {
            let session = app.sessions.as_ref().and_then(|store| store.load().ok().flatten());
            let expires_at = session.as_ref().and_then(|s| {
                s.expires_at.or_else(|| {
                    decode_claims(&s.access_token)
                        .ok()
                        .and_then(|c| chrono::DateTime::from_timestamp(c.exp, 0))
                })
            });

            match require_login(app.client.as_ref()).await {
                AuthGate::Authenticated(user) => match app.output {
                    OutputFormat::Json => output_json(&json!({
                        "authenticated": true,
                        "user": user,
                        "expires_at": expires_at,
                    })),
                    OutputFormat::Text => {
                        println!("Signed in as {}", user.email.as_deref().unwrap_or(&user.id));
                        if let Some(exp) = expires_at {
                            let remaining = exp - Utc::now();
                            println!("Session expires {} ({} min)", exp.format("%Y-%m-%d %H:%M UTC"), remaining.num_minutes());
                        }
                        Ok(())
                    }
                },
                AuthGate::Redirect { to } => match app.output {
                    OutputFormat::Json => output_json(&json!({ "authenticated": false, "redirect": to })),
                    OutputFormat::Text => {
                        println!("Not signed in. Run `ephis auth {}`", to);
                        Ok(())
                    }
                },
            }
        }
        AuthCommands::Whoami => {
            let user = app.require_user().await?;
            let profile = get_current_user_profile(app.client.as_ref()).await;
            let scope = describe_location_filter(profile.as_ref());

            match app.output {
                OutputFormat::Json => output_json(&json!({
                    "user": user,
                    "profile": profile,
                    "scope": scope,
                })),
                OutputFormat::Text => {
                    println!("User:  {}", user.email.as_deref().unwrap_or(&user.id));
                    if let Some(profile) = &profile {
                        println!("Role:  {}", profile.role);
                    }
                    println!("Scope: {}", scope);
                    Ok(())
                }
            }
        }
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
