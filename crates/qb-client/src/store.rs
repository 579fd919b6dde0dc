//! On-device session state: the access token and the selected character.
//!
//! Stored as a small JSON file. A store opened with
//! [`SessionStore::in_memory`] keeps everything in memory instead.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use qb_core::CharacterId;

use crate::error::{ClientError, ClientResult};
use crate::token::{TokenClaims, decode_claims};

/// File name of the session file inside the data directory.
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionData {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    selected_character: Option<CharacterId>,
}

/// Persistent key/value session state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
    data: SessionData,
}

impl SessionStore {
    /// Open the session file at `path`. A missing file is an empty session.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            SessionData::default()
        };
        debug!(path = %path.display(), "opened session store");
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: SessionData::default(),
        }
    }

    /// Platform data directory for Questbook, if one can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "questbook").map(|d| d.data_dir().to_path_buf())
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The stored access token.
    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    /// The stored access token, or [`ClientError::NotLoggedIn`].
    pub fn require_token(&self) -> ClientResult<&str> {
        self.token().ok_or(ClientError::NotLoggedIn)
    }

    /// Claims of the stored token.
    pub fn claims(&self) -> ClientResult<TokenClaims> {
        decode_claims(self.require_token()?)
    }

    /// Store a new access token.
    pub fn set_token(&mut self, token: impl Into<String>) -> ClientResult<()> {
        self.data.token = Some(token.into());
        self.save()
    }

    /// The selected character.
    pub fn selected_character(&self) -> Option<CharacterId> {
        self.data.selected_character
    }

    /// The selected character, or [`ClientError::NoCharacterSelected`].
    pub fn require_selected(&self) -> ClientResult<CharacterId> {
        self.selected_character()
            .ok_or(ClientError::NoCharacterSelected)
    }

    /// Remember `id` as the selected character.
    pub fn select_character(&mut self, id: CharacterId) -> ClientResult<()> {
        self.data.selected_character = Some(id);
        self.save()
    }

    /// Forget the token and the selection.
    pub fn clear(&mut self) -> ClientResult<()> {
        self.data = SessionData::default();
        self.save()
    }

    fn save(&self) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.data)?)?;

        // The file holds a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::encode_test_token;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join(SESSION_FILE)).unwrap();
        assert!(store.token().is_none());
        assert!(store.selected_character().is_none());
        assert!(matches!(store.require_token(), Err(ClientError::NotLoggedIn)));
        assert!(matches!(
            store.require_selected(),
            Err(ClientError::NoCharacterSelected)
        ));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SESSION_FILE);

        let mut store = SessionStore::open(&path).unwrap();
        store
            .set_token(encode_test_token("ana@example.com", 4, "player"))
            .unwrap();
        store.select_character(CharacterId(9)).unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.selected_character(), Some(CharacterId(9)));
        assert_eq!(reopened.claims().unwrap().email, "ana@example.com");
    }

    #[test]
    fn clear_forgets_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);

        let mut store = SessionStore::open(&path).unwrap();
        store.set_token("a.b.c").unwrap();
        store.select_character(CharacterId(1)).unwrap();
        store.clear().unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        assert!(reopened.token().is_none());
        assert!(reopened.selected_character().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = SessionStore::open(&path).unwrap();
        store.set_token("a.b.c").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn in_memory_writes_nothing() {
        let mut store = SessionStore::in_memory();
        store.select_character(CharacterId(3)).unwrap();
        assert_eq!(store.require_selected().unwrap(), CharacterId(3));
        assert!(store.path().is_none());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            SessionStore::open(&path),
            Err(ClientError::Json(_))
        ));
    }
}
