// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::StoredAccount;

/// Identity attached to a request once its bearer token has been verified
/// and the account loaded.
///
/// This is also the public view of an account returned by the auth
/// endpoints. It never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Account ID (the token's `userId` claim)
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&StoredAccount> for AuthenticatedUser {
    fn from(account: &StoredAccount) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}
