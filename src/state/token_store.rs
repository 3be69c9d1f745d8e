//! Persisted credential slots: the bearer token and the intended redirect path.
//!
//! DESIGN
//! ======
//! Both slots live behind the `TokenStore` trait so the session controller,
//! request authorizer and route guard share one injected instance instead of
//! ambient global state. Reads never fail: unreadable storage reads as empty
//! and is logged. The file-backed store keeps both slots in one small JSON
//! document, written via temp-file + rename so a crash never leaves a torn
//! slot file behind.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod tests;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// File name of the slot document inside the state directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Errors produced when writing a slot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session store encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key-value slots for one client installation.
pub trait TokenStore: Send + Sync {
    /// Current bearer token, if any.
    fn token(&self) -> Option<String>;

    /// Overwrite the token slot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the slot cannot be persisted.
    fn store_token(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the token slot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the slot cannot be persisted.
    fn clear_token(&self) -> Result<(), StoreError>;

    /// Path recorded by the route guard before a login redirect, if any.
    fn intended_path(&self) -> Option<String>;

    /// Record the path to replay after the next successful login.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the slot cannot be persisted.
    fn set_intended_path(&self, path: &str) -> Result<(), StoreError>;

    /// Remove the intended-path slot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the slot cannot be persisted.
    fn clear_intended_path(&self) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Slots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    intended_path: Option<String>,
}

impl Slots {
    fn is_empty(&self) -> bool {
        self.token.is_none() && self.intended_path.is_none()
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store. Used with `BOUNTYDESK_EPHEMERAL` and in tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slots: Mutex<Slots>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token, as if a previous process had logged in.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { slots: Mutex::new(Slots { token: Some(token.to_owned()), intended_path: None }) }
    }

    fn update(&self, f: impl FnOnce(&mut Slots)) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut slots);
    }

    fn read(&self) -> Slots {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.read().token
    }

    fn store_token(&self, token: &str) -> Result<(), StoreError> {
        self.update(|s| s.token = Some(token.to_owned()));
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StoreError> {
        self.update(|s| s.token = None);
        Ok(())
    }

    fn intended_path(&self) -> Option<String> {
        self.read().intended_path
    }

    fn set_intended_path(&self, path: &str) -> Result<(), StoreError> {
        self.update(|s| s.intended_path = Some(path.to_owned()));
        Ok(())
    }

    fn clear_intended_path(&self) -> Result<(), StoreError> {
        self.update(|s| s.intended_path = None);
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Store persisted as `session.json` under a state directory.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Store rooted at `dir`. The directory is created lazily on first write.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self { path: dir.join(SESSION_FILE_NAME), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Slots {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Slots::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session store unreadable; treating as empty");
                return Slots::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session store corrupt; treating as empty");
            Slots::default()
        })
    }

    fn update(&self, f: impl FnOnce(&mut Slots)) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.load();
        f(&mut slots);
        self.persist(&slots)
    }

    fn persist(&self, slots: &Slots) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };

        if slots.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_err(e)),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_vec_pretty(slots)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(io_err)?;
        restrict_permissions(&tmp).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.load().token
    }

    fn store_token(&self, token: &str) -> Result<(), StoreError> {
        self.update(|s| s.token = Some(token.to_owned()))
    }

    fn clear_token(&self) -> Result<(), StoreError> {
        self.update(|s| s.token = None)
    }

    fn intended_path(&self) -> Option<String> {
        self.load().intended_path
    }

    fn set_intended_path(&self, path: &str) -> Result<(), StoreError> {
        self.update(|s| s.intended_path = Some(path.to_owned()))
    }

    fn clear_intended_path(&self) -> Result<(), StoreError> {
        self.update(|s| s.intended_path = None)
    }
}
