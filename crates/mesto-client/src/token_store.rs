//! File-backed token store.
//!
//! The file holds a flat JSON object of string values, mirroring a browser
//! local-storage area; the token lives under [`TOKEN_KEY`]. Other keys are
//! preserved on write.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mesto_core::{TOKEN_KEY, TokenStore, TokenStoreError};
use tracing::debug;

type Document = BTreeMap<String, String>;

/// Token store persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<Document, TokenStoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }
        serde_json::from_slice(&raw).map_err(|err| TokenStoreError::Malformed {
            path: self.path.clone(),
            detail: err.to_string(),
        })
    }

    fn write(&self, document: &Document) -> Result<(), TokenStoreError> {
        if document.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => Err(self.io_error(err)),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let body = serde_json::to_vec_pretty(document).map_err(|err| TokenStoreError::Malformed {
            path: self.path.clone(),
            detail: err.to_string(),
        })?;

        // Write beside the target and rename so readers never see a partial file.
        let staging = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&staging).map_err(|err| self.io_error(err))?;
        restrict_permissions(&file).map_err(|err| self.io_error(err))?;
        file.write_all(&body).map_err(|err| self.io_error(err))?;
        file.sync_all().map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), "token store written");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self
            .read()?
            .remove(TOKEN_KEY)
            .filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut document = self.read()?;
        document.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write(&document)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut document = match self.read() {
            Ok(document) => document,
            // An unreadable session is discarded rather than left in place.
            Err(TokenStoreError::Malformed { .. }) => Document::new(),
            Err(err) => return Err(err),
        };
        document.remove(TOKEN_KEY);
        self.write(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_token() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert_eq!(store.load()?, None);
        store.clear()?;
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn save_creates_parent_dirs_and_uses_jwt_key() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mesto").join("session.json");
        let store = FileTokenStore::new(&path);

        store.save("abc.def.ghi")?;

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;
        assert_eq!(raw, serde_json::json!({ "jwt": "abc.def.ghi" }));
        assert_eq!(store.load()?.as_deref(), Some("abc.def.ghi"));
        Ok(())
    }

    #[test]
    fn clear_keeps_unrelated_keys() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"jwt":"old","theme":"dark"}"#)?;
        let store = FileTokenStore::new(&path);

        store.clear()?;

        assert_eq!(store.load()?, None);
        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;
        assert_eq!(raw, serde_json::json!({ "theme": "dark" }));
        Ok(())
    }

    #[test]
    fn malformed_file_is_reported_and_cleared() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "not json")?;
        let store = FileTokenStore::new(&path);

        assert!(matches!(
            store.load(),
            Err(TokenStoreError::Malformed { .. })
        ));
        store.clear()?;
        assert!(!path.exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let store = FileTokenStore::new(dir.path().join("session.json"));
        store.save("secret")?;
        let mode = fs::metadata(store.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }
}
