use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::auth::{Session, SessionStore};

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("EPHIS_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("ephis")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn modules_file(config_dir: &std::path::Path) -> PathBuf {
    config_dir.join("modules.yaml")
}

/// Session left by an earlier `auth login`. Expired or unreadable sessions
/// are dropped so the gate sends the user back to login.
pub fn load_saved_session(store: &SessionStore) -> Option<Session> {
    match store.load() {
        Ok(Some(session)) if session.is_expired(Utc::now()) => {
            tracing::info!("saved session expired at {:?}", session.expires_at);
            None
        }
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("ignoring saved session: {}", e);
            None
        }
    }
}
