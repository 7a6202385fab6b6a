use serde::{de::DeserializeOwned, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log {path:?} is not a valid JSON array: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize log {path:?}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("writer lock poisoned for {0:?}")]
    Poisoned(PathBuf),
}

/// A whole-document JSON array on disk.
///
/// Every mutation is a read-modify-write of the entire collection, serialized behind
/// a single writer lock and committed by writing a sibling temp file and renaming it
/// over the target. A reader therefore sees either the old collection or the new one,
/// never a torn write. A missing file is an empty collection. A file that exists but
/// does not parse is an error: it is never replaced with an empty array.
pub struct JsonLog<T> {
    path: PathBuf,
    writer: Mutex<()>,
    _entries: PhantomData<fn() -> T>,
}

impl<T> JsonLog<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
            _entries: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the full collection as currently committed.
    pub fn load(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock()?;
        self.read_all()
    }

    /// Commits the current collection plus `entry`; the caller keeps ownership.
    pub fn append(&self, entry: &T) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        let entries = self.read_all()?;
        let all: Vec<&T> = entries.iter().chain(std::iter::once(entry)).collect();
        self.replace(all.as_slice())
    }

    /// Runs `f` against the full collection under the writer lock and persists the result.
    pub fn modify<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> Result<R, StoreError> {
        let _guard = self.lock()?;
        let mut entries = self.read_all()?;
        let out = f(&mut entries);
        self.replace(entries.as_slice())?;
        Ok(out)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.writer
            .lock()
            .map_err(|_| StoreError::Poisoned(self.path.clone()))
    }

    fn read_all(&self) -> Result<Vec<T>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| self.io(source))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn replace<S: Serialize>(&self, entries: &[S]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::Serialization {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io(source))?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = File::create(&temp_path).map_err(|source| self.io(source))?;
            file.write_all(json.as_bytes())
                .map_err(|source| self.io(source))?;
            file.sync_all().map_err(|source| self.io(source))?;
        }

        // Atomic rename
        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io(source));
        }

        debug!("Committed {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("log"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
