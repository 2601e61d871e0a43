// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the document store layout.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Default root directory for persisted documents.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Account Paths ==========

    /// Directory containing all accounts.
    pub fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    /// Path to a specific account document.
    pub fn account(&self, account_id: &str) -> PathBuf {
        self.accounts_dir().join(format!("{account_id}.json"))
    }

    /// Directory holding the unique email index.
    pub fn email_index_dir(&self) -> PathBuf {
        self.accounts_dir().join("by-email")
    }

    /// Path to the index entry for an email address.
    ///
    /// The file name is the hex SHA-256 of the exact email bytes, so lookups
    /// stay case-sensitive and never put user input into a path.
    pub fn email_index(&self, email: &str) -> PathBuf {
        let digest = Sha256::digest(email.as_bytes());
        self.email_index_dir().join(format!("{digest:x}.json"))
    }

    // ========== Idea Paths ==========

    /// Directory containing all ideas.
    pub fn ideas_dir(&self) -> PathBuf {
        self.root.join("ideas")
    }

    /// Path to a specific idea document.
    pub fn idea(&self, idea_id: &str) -> PathBuf {
        self.ideas_dir().join(format!("{idea_id}.json"))
    }
}
