// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the DocumentStore for all file operations.

pub mod accounts;
pub mod ideas;

pub use accounts::{AccountRepository, StoredAccount};
pub use ideas::{Idea, IdeaRepository};
