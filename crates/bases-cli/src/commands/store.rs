//! File-backed decision history
//!
//! Decisions live in memory for the process and are written to a JSON file
//! (session id → decisions) after every append. Load and save failures are
//! logged and swallowed here: the engine keeps working from what is in memory.
//!
//! A history file that exists but cannot be loaded is never overwritten. Before
//! the first write it is moved aside to `<path>.corrupt`; if that fails, new
//! decisions stay in memory only.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use bases_core::history::{Decision, HistoryRepository, InMemoryHistory};
use bases_core::Result;

type StoredSessions = BTreeMap<String, Vec<Decision>>;

pub struct FileHistory {
    path: PathBuf,
    inner: InMemoryHistory,
    /// Set while the file on disk holds data this process could not load
    unreadable: AtomicBool,
}

impl FileHistory {
    /// Open the history file, starting empty if it is missing or unreadable
    pub fn open(path: &Path) -> Self {
        let (inner, unreadable) = match load(path) {
            Ok(sessions) => {
                // Stored most recent first
                let replay = sessions
                    .into_iter()
                    .map(|(session, decisions)| (session, decisions.into_iter().rev().collect()));
                (InMemoryHistory::from_sessions(replay), false)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not load decision history, starting empty"
                );
                (InMemoryHistory::new(), true)
            }
        };

        Self {
            path: path.to_path_buf(),
            inner,
            unreadable: AtomicBool::new(unreadable),
        }
    }

    fn save(&self) -> Result<()> {
        if self.unreadable.load(Ordering::SeqCst) {
            let backup = corrupt_path(&self.path);
            fs::rename(&self.path, &backup)?;
            tracing::warn!(
                path = %self.path.display(),
                backup = %backup.display(),
                "Moved unreadable decision history aside"
            );
            self.unreadable.store(false, Ordering::SeqCst);
        }

        let mut sessions = StoredSessions::new();
        for session in self.inner.sessions() {
            let decisions = self.inner.list_all(&session)?;
            sessions.insert(session, decisions);
        }

        let json = serde_json::to_string_pretty(&sessions)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Read the stored sessions. A missing file is an empty history.
pub(crate) fn load(path: &Path) -> Result<StoredSessions> {
    if !path.exists() {
        return Ok(StoredSessions::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// `<path>.corrupt`, next to the original file
pub(crate) fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".corrupt");
    PathBuf::from(name)
}

impl HistoryRepository for FileHistory {
    fn record(&self, session: &str, decision: Decision) -> Result<()> {
        self.inner.record(session, decision)?;

        if let Err(e) = self.save() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist decision history"
            );
        }
        Ok(())
    }

    fn list_all(&self, session: &str) -> Result<Vec<Decision>> {
        self.inner.list_all(session)
    }
}
