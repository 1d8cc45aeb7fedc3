//! Key-value persistence of a session between runs.
//!
//! Each piece of state lives under its own key, so a missing or garbled
//! entry only resets that piece to its default.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::LayoutConfig;
use crate::model::{ProgressBlock, Section, Session};

pub const START_YEAR_KEY: &str = "timeline_startYear";
pub const END_YEAR_KEY: &str = "timeline_endYear";
pub const TOP_LABEL_KEY: &str = "timeline_topSectionLabel";
pub const BOTTOM_LABEL_KEY: &str = "timeline_bottomSectionLabel";
pub const BLOCKS_KEY: &str = "timeline_progressBlocks";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A string key-value store.
pub trait Store {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// In-memory store, for tests and hosts without a disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory. Writes go through a temporary file
/// and a rename so a crash never leaves a half-written value.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore").field("dir", &self.dir).finish()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        Ok(())
    }
}

/// True when no year range was ever saved, i.e. the host should prompt for one.
pub fn is_first_run(store: &dyn Store) -> StorageResult<bool> {
    Ok(store.get(START_YEAR_KEY)?.is_none())
}

/// Restore a session. Only store read failures are errors; unusable values
/// fall back to defaults.
pub fn load_session(store: &dyn Store, config: LayoutConfig) -> StorageResult<Session> {
    let mut session = Session::with_current_years().with_config(config);
    let (default_start, default_end) = session.years();

    let start = read_year(store, START_YEAR_KEY)?.unwrap_or(default_start);
    let end = read_year(store, END_YEAR_KEY)?.unwrap_or(default_end);
    if session.set_years(start, end).is_err() {
        tracing::warn!(start, end, "stored year range unusable, keeping defaults");
    }

    for (section, key) in [(Section::Top, TOP_LABEL_KEY), (Section::Bottom, BOTTOM_LABEL_KEY)] {
        if let Some(label) = store.get(key)?.filter(|l| !l.is_empty()) {
            session.set_section_label(section, label);
        }
    }

    if let Some(raw) = store.get(BLOCKS_KEY)? {
        match serde_json::from_str::<Vec<ProgressBlock>>(&raw) {
            Ok(blocks) => {
                let mut doc = session.to_document();
                doc.progress_blocks = blocks;
                if let Err(err) = session.apply_document(doc) {
                    tracing::warn!(%err, "stored blocks rejected, starting empty");
                }
            }
            Err(err) => tracing::warn!(%err, "stored blocks unreadable, starting empty"),
        }
    }

    tracing::debug!(blocks = session.blocks().len(), "session loaded");
    Ok(session)
}

fn read_year(store: &dyn Store, key: &str) -> StorageResult<Option<i32>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match raw.trim().parse() {
        Ok(year) => Ok(Some(year)),
        Err(_) => {
            tracing::warn!(key, value = %raw, "stored year unreadable");
            Ok(None)
        }
    }
}

/// Write all five keys.
pub fn save_session(store: &mut dyn Store, session: &Session) -> StorageResult<()> {
    let (start, end) = session.years();
    store.set(START_YEAR_KEY, &start.to_string())?;
    store.set(END_YEAR_KEY, &end.to_string())?;
    store.set(TOP_LABEL_KEY, session.section_label(Section::Top))?;
    store.set(BOTTOM_LABEL_KEY, session.section_label(Section::Bottom))?;
    store.set(BLOCKS_KEY, &serde_json::to_string(session.blocks())?)?;
    tracing::debug!(blocks = session.blocks().len(), "session saved");
    Ok(())
}
