//! Session token persisted in a single file between invocations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;
use vm_client::TokenStore;

pub const DEFAULT_TOKEN_FILE: &str = ".voltmarket-token";

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw.trim().to_owned()).filter(|token| !token.is_empty()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read token file");
                None
            }
        }
    }

    fn save(&self, token: &str) {
        if let Err(err) = fs::write(&self.path, token) {
            warn!(path = %self.path.display(), error = %err, "could not write token file");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), error = %err, "could not remove token file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_survives_a_new_store_and_clears() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("token");

        let store = FileTokenStore::new(&path);
        assert_eq!(store.load(), None);
        store.save("abc123");

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.load().as_deref(), Some("abc123"));

        reopened.clear();
        assert!(!path.exists());
        // clearing twice is not an error
        reopened.clear();
        Ok(())
    }

    #[test]
    fn blank_file_means_no_session() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("token");
        fs::write(&path, "  \n")?;

        assert_eq!(FileTokenStore::new(&path).load(), None);
        Ok(())
    }
}
