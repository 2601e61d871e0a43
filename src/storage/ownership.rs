// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for mutating operations.
//!
//! Handlers locate the resource first, then call
//! [`OwnershipEnforcer::verify_ownership`] with the identity attached by the
//! authorization gate before changing anything.

use crate::auth::AuthenticatedUser;

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;

    /// Short description used in logs.
    fn resource_name(&self) -> String {
        "resource".to_string()
    }
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user owns this resource.
    ///
    /// # Errors
    /// Returns `StorageError::PermissionDenied` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()> {
        if self.owner_user_id() == user.id {
            Ok(())
        } else {
            Err(StorageError::PermissionDenied {
                user_id: user.id.clone(),
                resource: self.resource_name(),
            })
        }
    }
}
