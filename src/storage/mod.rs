// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent storage for accounts and ideas as JSON documents on the local
//! filesystem, rooted at `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   accounts/
//!     {account_id}.json
//!     by-email/
//!       {sha256(email)}.json   # unique email index -> account_id
//!   ideas/
//!     {idea_id}.json
//! ```
//!
//! ## Guarantees
//!
//! - Single-document writes are atomic (temp file + rename)
//! - Email uniqueness is enforced by exclusive creation of the index entry
//! - No cross-document transactions

pub mod document_fs;
pub mod ownership;
pub mod paths;
pub mod repository;

pub use document_fs::{DocumentStore, StorageError, StorageResult};
pub use ownership::{OwnedResource, OwnershipEnforcer};
pub use paths::StoragePaths;
pub use repository::{AccountRepository, Idea, IdeaRepository, StoredAccount};
