use serde::{Deserialize, Serialize};
use std::env;

use crate::access::{AccessPolicy, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub access: AccessPolicy,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub toast_duration_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Backend overrides
        if let Ok(v) = env::var("EPHIS_BACKEND_URL") {
            self.backend.url = v;
        }
        if let Ok(v) = env::var("EPHIS_ANON_KEY") {
            self.backend.anon_key = v;
        }
        if let Ok(v) = env::var("EPHIS_REQUEST_TIMEOUT_SECS") {
            self.backend.request_timeout_secs = v.parse().unwrap_or(self.backend.request_timeout_secs);
        }

        // Access policy overrides
        if let Ok(v) = env::var("ACCESS_MISSING_PROFILE") {
            self.access.missing_profile = v.parse().unwrap_or(self.access.missing_profile);
        }
        if let Ok(v) = env::var("ACCESS_UNASSIGNED_FIELD_ROLE") {
            self.access.unassigned_field_role = v.parse().unwrap_or(self.access.unassigned_field_role);
        }
        if let Ok(v) = env::var("ACCESS_UNASSIGNED_OTHER_ROLE") {
            self.access.unassigned_other_role = v.parse().unwrap_or(self.access.unassigned_other_role);
        }
        if let Ok(v) = env::var("ACCESS_UNRESTRICTED_ROLES") {
            self.access.unrestricted_roles = parse_roles(&v);
        }
        if let Ok(v) = env::var("ACCESS_FIELD_ROLES") {
            self.access.field_roles = parse_roles(&v);
        }

        // UI overrides
        if let Ok(v) = env::var("EPHIS_TOAST_MS") {
            self.ui.toast_duration_ms = v.parse().unwrap_or(self.ui.toast_duration_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                request_timeout_secs: 30,
            },
            access: AccessPolicy::default(),
            ui: UiConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                request_timeout_secs: 15,
            },
            access: AccessPolicy::default(),
            ui: UiConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                request_timeout_secs: 10,
            },
            access: AccessPolicy::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 4000,
        }
    }
}

fn parse_roles(v: &str) -> Vec<Role> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Role::from)
        .collect()
}
