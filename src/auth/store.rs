use std::fs;
use std::path::{Path, PathBuf};

use super::Session;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt session file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Keeps the signed-in session between invocations in `session.json`
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(config_dir: &Path) -> Self {
        Self { path: config_dir.join("session.json") }
    }

    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;
    use serde_json::Map;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ephis-session-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_load_clear() {
        let dir = scratch_dir();
        let store = SessionStore::new(&dir);
        assert!(store.load().unwrap().is_none());

        let session = Session {
            access_token: "token".into(),
            refresh_token: "refresh".into(),
            expires_at: None,
            user: User { id: "u1".into(), email: Some("officer@ephis.ke".into()), user_metadata: Map::new() },
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();

        fs::remove_dir_all(dir).ok();
    }
}
