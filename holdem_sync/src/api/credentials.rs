//! Bearer credential sources.
//!
//! The pipeline asks its [`TokenSource`] for a token on every request, so a
//! token stored after the client was built is still picked up.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Capability to read the current bearer token, if any.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Always unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// In-memory token that can be replaced after the client is built.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    slot: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(token.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }
}

impl TokenSource for SharedToken {
    fn token(&self) -> Option<String> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }
}

/// Token persisted in a file, re-read on every request.
///
/// A missing or blank file means no token.
#[derive(Debug, Clone)]
pub struct FileToken {
    path: PathBuf,
}

impl FileToken {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a token for subsequent requests.
    pub fn store(&self, token: &str) -> io::Result<()> {
        std::fs::write(&self.path, token)
    }

    /// Forget the persisted token.
    pub fn remove(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

impl TokenSource for FileToken {
    fn token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read token file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("holdem_sync_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_no_token() {
        assert_eq!(NoToken.token(), None);
    }

    #[test]
    fn test_static_token() {
        assert_eq!(StaticToken("abc".to_string()).token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_shared_token_set_after_clone() {
        let source = SharedToken::new();
        let handle = source.clone();
        assert_eq!(source.token(), None);

        handle.set("late-token");
        assert_eq!(source.token().as_deref(), Some("late-token"));

        handle.clear();
        assert_eq!(source.token(), None);
    }

    #[test]
    fn test_file_token_missing_file() {
        let source = FileToken::new(temp_path("missing"));
        assert_eq!(source.token(), None);
    }

    #[test]
    fn test_file_token_reread_each_call() {
        let path = temp_path("reread");
        let source = FileToken::new(path.clone());

        source.store("first\n").unwrap();
        assert_eq!(source.token().as_deref(), Some("first"));

        source.store("second").unwrap();
        assert_eq!(source.token().as_deref(), Some("second"));

        source.store("   ").unwrap();
        assert_eq!(source.token(), None);

        source.remove().unwrap();
        source.remove().unwrap();
        assert_eq!(source.token(), None);
    }
}
