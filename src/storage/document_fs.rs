// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filesystem-backed JSON document operations.
//!
//! Every record is one pretty-printed JSON file. Writes go to a uniquely
//! named temp file that is renamed over the target, so readers only ever see
//! a complete document. Unique keys are claimed with `create_new`, which the
//! OS guarantees to succeed for exactly one writer. Replacing or deleting an
//! existing document holds a per-path lock, so a delete that has returned
//! cannot be undone by an in-flight replace.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document (or unique key) already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Store used before `initialize()`
    #[error("Storage not initialized")]
    NotInitialized,

    /// Ownership check failed
    #[error("Permission denied: user {user_id} cannot modify {resource}")]
    PermissionDenied { user_id: String, resource: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// JSON document store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    paths: StoragePaths,
    initialized: bool,
    locks: Arc<PathLocks>,
}

/// Mutexes keyed by document path. Entries are dropped once unused.
#[derive(Debug, Default)]
struct PathLocks {
    entries: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    fn with_lock<T>(&self, path: &Path, f: impl FnOnce() -> T) -> T {
        let entry = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(path.to_path_buf()).or_default())
        };

        let result = {
            let _guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        // Two references left means only the map and this call hold it.
        if Arc::strong_count(&entry) == 2 {
            entries.remove(path);
        }
        result
    }
}

impl DocumentStore {
    /// Create a new DocumentStore instance.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
            locks: Arc::default(),
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Check if storage is initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Create all collection directories. Idempotent.
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [
            self.paths.accounts_dir(),
            self.paths.email_index_dir(),
            self.paths.ideas_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Write-read-delete probe used by the health endpoints.
    pub fn health_check(&self) -> StorageResult<()> {
        self.ensure_initialized()?;

        let test_file = self
            .paths
            .root()
            .join(format!(".health_check.{}", uuid::Uuid::new_v4()));
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "health check data mismatch",
            )));
        }

        Ok(())
    }

    // ========== Generic JSON Operations ==========

    /// Read a JSON file and deserialize it.
    ///
    /// A missing file is reported as `StorageError::NotFound`.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        self.ensure_initialized()?;

        let path = path.as_ref();
        let file = File::open(path).map_err(|e| not_found_or_io(e, path))?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        self.ensure_initialized()?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Replace an existing JSON file.
    ///
    /// The existence check and the write happen under the path's lock, so a
    /// concurrent [`delete`](Self::delete) either runs first and this returns
    /// `StorageError::NotFound`, or runs after and removes the new content.
    pub fn replace_json<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        self.ensure_initialized()?;

        let path = path.as_ref();
        self.locks.with_lock(path, || {
            if !path.is_file() {
                return Err(StorageError::NotFound(path.display().to_string()));
            }
            self.write_json(path, value)
        })
    }

    /// Write a JSON file only if it does not exist yet.
    ///
    /// Returns `StorageError::AlreadyExists` when another writer got there
    /// first.
    pub fn write_json_new<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        self.ensure_initialized()?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(path.display().to_string())
                } else {
                    StorageError::Io(e)
                }
            })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        self.ensure_initialized()?;

        let path = path.as_ref();
        self.locks
            .with_lock(path, || fs::remove_file(path))
            .map_err(|e| not_found_or_io(e, path))?;
        Ok(())
    }

    /// List the stems of all files in a directory with the given extension.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        self.ensure_initialized()?;

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != extension) {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    fn ensure_initialized(&self) -> StorageResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(StorageError::NotInitialized)
        }
    }
}

fn not_found_or_io(e: io::Error, path: &Path) -> StorageError {
    if e.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(path.display().to_string())
    } else {
        StorageError::Io(e)
    }
}
