// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account repository.
//!
//! Accounts live under `accounts/{id}.json`. Email uniqueness is kept by a
//! separate index file per address (`accounts/by-email/{sha256}.json`) that
//! is claimed with an exclusive create, so two concurrent registrations for
//! the same email cannot both succeed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DocumentStore, StorageError, StorageResult};

/// Account stored in the document store.
///
/// `password_hash` is a PHC string; this type is never serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAccount {
    /// Unique account identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Unique email, compared exactly as stored
    pub email: String,
    /// Salted one-way password hash
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredAccount {
    /// Build a new account with a fresh id and timestamps.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EmailIndexEntry {
    account_id: String,
}

/// Repository for account operations.
pub struct AccountRepository<'a> {
    storage: &'a DocumentStore,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository.
    pub fn new(storage: &'a DocumentStore) -> Self {
        Self { storage }
    }

    /// Get an account by ID.
    pub fn get(&self, account_id: &str) -> StorageResult<StoredAccount> {
        if uuid::Uuid::parse_str(account_id).is_err() {
            return Err(StorageError::NotFound(format!("Account {account_id}")));
        }
        self.storage
            .read_json(self.storage.paths().account(account_id))
            .map_err(|e| match e {
                StorageError::NotFound(_) => {
                    StorageError::NotFound(format!("Account {account_id}"))
                }
                other => other,
            })
    }

    /// Get an account by ID, mapping "not found" to `None`.
    pub fn find(&self, account_id: &str) -> StorageResult<Option<StoredAccount>> {
        match self.get(account_id) {
            Ok(account) => Ok(Some(account)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Look up an account by its exact email.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredAccount>> {
        let index_path = self.storage.paths().email_index(email);
        let entry: EmailIndexEntry = match self.storage.read_json(index_path) {
            Ok(entry) => entry,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        self.find(&entry.account_id)
    }

    /// Create a new account.
    ///
    /// The account document is written first and the email index second; if
    /// the index is already claimed the document is removed again and
    /// `StorageError::AlreadyExists` is returned. An index entry therefore
    /// always points at an existing account.
    pub fn create(&self, account: &StoredAccount) -> StorageResult<()> {
        let account_path = self.storage.paths().account(&account.id);
        self.storage.write_json_new(&account_path, account)?;

        let entry = EmailIndexEntry {
            account_id: account.id.clone(),
        };
        match self
            .storage
            .write_json_new(self.storage.paths().email_index(&account.email), &entry)
        {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&account_path) {
                    tracing::warn!(
                        error = %cleanup,
                        account_id = %account.id,
                        "Failed to remove account document after index conflict"
                    );
                }
                match e {
                    StorageError::AlreadyExists(_) => Err(StorageError::AlreadyExists(format!(
                        "Account with email {}",
                        account.email
                    ))),
                    other => Err(other),
                }
            }
        }
    }
}
