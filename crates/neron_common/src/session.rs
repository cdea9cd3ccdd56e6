//! Session-scoped persistence.
//!
//! The only persisted fact is whether the greeting already played in this
//! session. The runtime store keeps a marker file under `$XDG_RUNTIME_DIR`,
//! which the system clears when the login session ends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

const GREETING_MARKER: &str = "neronexpert_greeted";

pub trait SessionStore: Send + Sync {
    fn greeted(&self) -> io::Result<bool>;
    fn mark_greeted(&self) -> io::Result<()>;
}

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    greeted: AtomicBool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn greeted(&self) -> io::Result<bool> {
        Ok(self.greeted.load(Ordering::SeqCst))
    }

    fn mark_greeted(&self) -> io::Result<()> {
        self.greeted.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Marker-file store scoped to the login session.
#[derive(Debug, Clone)]
pub struct RuntimeSessionStore {
    dir: PathBuf,
}

impl RuntimeSessionStore {
    /// `$XDG_RUNTIME_DIR/neron`, or the temp dir when there is none.
    pub fn discover() -> Self {
        let base = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
        Self::in_dir(base.join("neron"))
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn marker(&self) -> PathBuf {
        self.dir.join(GREETING_MARKER)
    }

    /// Forget the greeting (start a fresh session).
    pub fn reset(&self) -> io::Result<()> {
        match fs::remove_file(self.marker()) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl SessionStore for RuntimeSessionStore {
    fn greeted(&self) -> io::Result<bool> {
        self.marker().try_exists()
    }

    fn mark_greeted(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.marker(), b"true")?;
        debug!(path = %self.marker().display(), "greeting marked for session");
        Ok(())
    }
}
