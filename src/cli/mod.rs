pub mod commands;
pub mod config;
pub mod fixture;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::access::{apply_location_filters, get_current_user_profile};
use crate::auth::{require_login, AuthGate, SessionStore, User};
use crate::browser::RecordBrowser;
use crate::client::{DataClient, RestClient};
use crate::config::AppConfig;
use crate::filter::Predicate;
use crate::modules::{ModuleConfig, ModuleRegistry};
use crate::ui::{Preferences, TerminalPrompt};

#[derive(Parser)]
#[command(name = "ephis")]
#[command(about = "EPHIS admin CLI - premises, complaints and inspections")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Use a seeded in-memory backend instead of the hosted one")]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and edit module records")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },

    #[command(about = "Premise context header")]
    Premise {
        #[command(subcommand)]
        cmd: commands::premise::PremiseCommands,
    },

    #[command(about = "Inspect location-based visibility")]
    Access {
        #[command(subcommand)]
        cmd: commands::access::AccessCommands,
    },

    #[command(about = "Light/dark theme preference")]
    Theme {
        #[command(subcommand)]
        cmd: commands::theme::ThemeCommands,
    },

    #[command(about = "Configured record modules")]
    Module {
        #[command(subcommand)]
        cmd: commands::module::ModuleCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs, built once per invocation
pub struct App {
    pub config: AppConfig,
    pub config_dir: PathBuf,
    pub client: Arc<dyn DataClient>,
    /// `None` offline, where sessions are not persisted
    pub sessions: Option<SessionStore>,
    pub modules: ModuleRegistry,
    pub prefs: Preferences,
    pub output: OutputFormat,
}

impl App {
    pub fn build(config: AppConfig, offline: bool, output: OutputFormat) -> anyhow::Result<Self> {
        let config_dir = config::get_config_dir()?;
        let modules = ModuleRegistry::load(&config::modules_file(&config_dir))?;

        let (client, sessions): (Arc<dyn DataClient>, Option<SessionStore>) = if offline {
            tracing::info!("using offline backend");
            (Arc::new(fixture::offline_client()), None)
        } else {
            if config.backend.url.is_empty() {
                anyhow::bail!("No backend URL configured; set EPHIS_BACKEND_URL or pass --offline");
            }
            let store = SessionStore::new(&config_dir);
            let session = config::load_saved_session(&store);
            let client = RestClient::new(&config.backend)?.with_session(session);
            (Arc::new(client), Some(store))
        };

        Ok(Self {
            prefs: Preferences::new(&config_dir),
            config,
            config_dir,
            client,
            sessions,
            modules,
            output,
        })
    }

    /// The signed-in user, or an error pointing at `auth login`
    pub async fn require_user(&self) -> anyhow::Result<User> {
        match require_login(self.client.as_ref()).await {
            AuthGate::Authenticated(user) => Ok(user),
            AuthGate::Redirect { to } => {
                Err(anyhow::anyhow!("Not signed in. Run `ephis auth {}` first", to))
            }
        }
    }

    /// Jurisdiction predicate for scoped modules; unscoped modules see everything
    pub async fn scope_for(&self, module: &ModuleConfig) -> Predicate {
        if !module.scoped {
            return Predicate::Unrestricted;
        }
        let profile = get_current_user_profile(self.client.as_ref()).await;
        apply_location_filters(profile.as_ref(), &self.config.access)
    }

    /// A browser bound to `module`, scoped for the signed-in user
    pub async fn browser(&self, module: &str, assume_yes: bool) -> anyhow::Result<RecordBrowser> {
        self.require_user().await?;
        let config = self.modules.get(module)?.clone();
        let scope = self.scope_for(&config).await;

        let browser = RecordBrowser::new(self.client.clone(), Arc::new(TerminalPrompt::new(assume_yes)), config)?
            .with_scope(scope)
            .with_toast_duration(Duration::from_millis(self.config.ui.toast_duration_ms));
        Ok(browser)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();
    let app = App::build(config, cli.offline, output_format)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &app).await,
        Commands::Data { cmd } => commands::data::handle(cmd, &app).await,
        Commands::Premise { cmd } => commands::premise::handle(cmd, &app).await,
        Commands::Access { cmd } => commands::access::handle(cmd, &app).await,
        Commands::Theme { cmd } => commands::theme::handle(cmd, &app).await,
        Commands::Module { cmd } => commands::module::handle(cmd, &app).await,
    }
}
