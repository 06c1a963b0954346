//! # Session persistence
//!
//! The engine only decides *what* is persisted (a [`StoredSession`]) and
//! *when* (after every reconciled change). Storage itself sits behind the
//! [`SessionStore`] trait. Writes are plain last-writer-wins overwrites.
//!
//! A store that cannot be read behaves like an empty one: the caller falls
//! back to defaults.

use crate::{core::paths::PathError, models::StoredSession};
use log::{debug, warn};
use std::{
    cell::{Cell, RefCell},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Why a session could not be saved.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the session file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The session could not be encoded as JSON.
    #[error("Failed to encode session: {0}")]
    Json(#[from] serde_json::Error),
    /// The session location could not be determined.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

/// Where the session lives between runs.
pub trait SessionStore: std::fmt::Debug {
    /// The stored session, or `None` when there is none or it cannot be read.
    fn load(&self) -> Option<StoredSession>;

    /// Overwrites the stored session.
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;
}

/// A session stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// A store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at the default location (`~/.config/itcmd/session.json`).
    pub fn at_default_location() -> Result<Self, StoreError> {
        Ok(Self::new(crate::core::paths::get_session_path()?))
    }

    /// The session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<StoredSession> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored session at '{}'", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Could not read session '{}': {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session '{}': {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(session)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// The file store at the default location, or a memory store when that
/// location cannot be used. In the latter case the session lasts one run.
pub fn open_default_store() -> Box<dyn SessionStore> {
    store_or_memory(FileSessionStore::at_default_location())
}

/// Boxes the located file store, falling back to a [`MemorySessionStore`] on error.
pub fn store_or_memory(located: Result<FileSessionStore, StoreError>) -> Box<dyn SessionStore> {
    match located {
        Ok(store) => {
            debug!("Session file: {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("Session will not be saved this run: {}", e);
            Box::new(MemorySessionStore::new())
        }
    }
}

/// A store that keeps the session in memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    stored: RefCell<Option<StoredSession>>,
    writes: Cell<usize>,
}

impl MemorySessionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `session`.
    pub fn with(session: StoredSession) -> Self {
        Self {
            stored: RefCell::new(Some(session)),
            writes: Cell::new(0),
        }
    }

    /// Number of successful `save` calls.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<StoredSession> {
        self.stored.borrow().clone()
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        *self.stored.borrow_mut() = Some(session.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{from_stored, to_stored};
    use crate::models::{OsId, SessionState, ShellId, Theme};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(FileSessionStore::new(path).load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        let state = SessionState {
            os: OsId::Windows,
            shell: ShellId::Cmd,
            category: "services".to_string(),
            task: "service_status".to_string(),
            search: "svc".to_string(),
            admin: true,
            redact: false,
            theme: Some(Theme::Dark),
        };
        store.save(&to_stored(&state)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(from_stored(&loaded), state);
    }

    #[test]
    fn test_partial_record_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"os":"linux","redact":false}"#).unwrap();

        let loaded = FileSessionStore::new(path).load().unwrap();
        assert_eq!(loaded.os.as_deref(), Some("linux"));
        assert_eq!(loaded.redact, Some(false));
        assert!(loaded.task.is_none());
    }

    #[test]
    fn test_wrongly_typed_field_is_dropped_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"os":"linux","category":"disk","admin":"yes","redact":false,"search":42}"#,
        )
        .unwrap();

        let loaded = FileSessionStore::new(path).load().unwrap();
        assert_eq!(loaded.os.as_deref(), Some("linux"));
        assert_eq!(loaded.category.as_deref(), Some("disk"));
        assert_eq!(loaded.redact, Some(false));
        assert!(loaded.admin.is_none());
        assert!(loaded.search.is_none());

        let state = from_stored(&loaded);
        assert_eq!(state.os, OsId::Linux);
        assert!(!state.admin);
        assert!(!state.redact);
    }

    #[test]
    fn test_null_field_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"theme":null,"task":"open_ports"}"#).unwrap();

        let loaded = FileSessionStore::new(path).load().unwrap();
        assert!(loaded.theme.is_none());
        assert_eq!(loaded.task.as_deref(), Some("open_ports"));
    }

    #[test]
    fn test_non_object_record_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"["linux", true]"#).unwrap();
        assert!(FileSessionStore::new(path).load().is_none());
    }

    #[test]
    fn test_unusable_location_falls_back_to_memory() {
        let store = store_or_memory(Err(StoreError::Path(PathError::ConfigDirNotFound)));
        assert!(store.load().is_none());
        store.save(&StoredSession::default()).unwrap();
        assert_eq!(store.load(), Some(StoredSession::default()));
    }

    #[test]
    fn test_located_file_store_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = store_or_memory(Ok(FileSessionStore::new(&path)));
        store.save(&StoredSession::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_path_error_names_its_cause_once() {
        let err = StoreError::Path(PathError::ConfigDirCreation {
            path: "/tmp/blocked/itcmd".to_string(),
            source: std::io::Error::other("Not a directory"),
        });
        let message = err.to_string();
        assert!(message.starts_with("Path error: Could not create config directory"));
        assert_eq!(message.matches("Not a directory").count(), 1);
    }

    #[test]
    fn test_absent_theme_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);
        store.save(&to_stored(&SessionState::default())).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("theme"));
        assert!(raw.contains("\"redact\": true"));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());
        store.save(&StoredSession::default()).unwrap();
        store.save(&StoredSession::default()).unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.load(), Some(StoredSession::default()));
    }
}
