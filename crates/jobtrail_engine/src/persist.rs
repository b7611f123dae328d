use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use trail_logging::trail_debug;

use crate::{HostError, KvHost};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ensure the data directory exists; create if missing.
pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_data_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // `persist` replaces an existing target in one rename.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// [`KvHost`] keeping one pretty-printed JSON file per key in a directory.
pub struct FileHost {
    dir: PathBuf,
    writer: AtomicFileWriter,
}

impl FileHost {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        ensure_data_dir(&dir)?;
        Ok(Self {
            writer: AtomicFileWriter::new(dir.clone()),
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(key: &str) -> Result<String, PersistError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(format!("{key}.json"))
        } else {
            Err(PersistError::InvalidKey(key.to_string()))
        }
    }

    fn read(&self, key: &str) -> Result<Option<Value>, PersistError> {
        let path = self.dir.join(Self::file_name(key)?);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(value)?;
        let target = self.writer.write(&Self::file_name(key)?, &content)?;
        trail_debug!("Persisted {} to {:?}", key, target);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), PersistError> {
        let path = self.dir.join(Self::file_name(key)?);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait::async_trait]
impl KvHost for FileHost {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        self.read(key)
            .map_err(|err| HostError::new(format!("read {key}"), err.to_string()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        self.write(key, &value)
            .map_err(|err| HostError::new(format!("write {key}"), err.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), HostError> {
        self.delete(key)
            .map_err(|err| HostError::new(format!("remove {key}"), err.to_string()))
    }
}
