// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings with a fresh random salt per call. Hashing is CPU
//! bound, so the async wrappers run it on the blocking thread pool.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, Error as ArgonError, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};

/// Target identifier for password hashing logs.
const TRACING_TARGET_PASSWORD: &str = "ideas_api::auth::password";

/// Password hashed once per hasher and compared against for unknown accounts.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

/// Failure that is not simply a wrong password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is invalid: {0}")]
    InvalidHash(String),

    #[error("password task failed: {0}")]
    Task(String),
}

/// Argon2id password hasher.
///
/// Construction hashes a dummy password with the same parameters, so the
/// first unknown-email login costs no more than any other.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Option<Arc<str>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::from_argon2(Argon2::default())
    }

    /// Argon2id with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self::from_argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn from_argon2(argon2: Argon2<'static>) -> Self {
        let mut hasher = Self {
            argon2,
            dummy_hash: None,
        };
        hasher.dummy_hash = hasher.hash_password(DUMMY_PASSWORD).ok().map(Arc::from);
        hasher
    }

    /// Hash a password with a new random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD,
                    error = %e,
                    "password hashing operation failed"
                );
                PasswordError::Hash(e.to_string())
            })?;
        Ok(hash.to_string())
    }

    /// Check a password against a stored hash.
    ///
    /// Returns `Ok(false)` for a wrong password and an error only when the
    /// stored hash cannot be used at all.
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET_PASSWORD,
                error = %e,
                "invalid password hash format"
            );
            PasswordError::InvalidHash(e.to_string())
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => {
                tracing::debug!(target: TRACING_TARGET_PASSWORD, "password mismatch");
                Ok(false)
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD,
                    error = %e,
                    "password verification system error"
                );
                Err(PasswordError::InvalidHash(e.to_string()))
            }
        }
    }

    /// Spend the same work as a real verification and always return `false`.
    ///
    /// Used on login for unknown emails so response timing does not reveal
    /// which addresses are registered.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        if let Some(hash) = &self.dummy_hash {
            let _ = self.verify_password(password, hash);
        }
        false
    }

    /// [`hash_password`](Self::hash_password) on the blocking pool.
    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }

    /// [`verify_password`](Self::verify_password) on the blocking pool.
    pub async fn verify(
        &self,
        password: String,
        stored_hash: String,
    ) -> Result<bool, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &stored_hash))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }

    /// [`verify_dummy_password`](Self::verify_dummy_password) on the blocking pool.
    pub async fn verify_dummy(&self, password: String) -> bool {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_dummy_password(&password))
            .await
            .unwrap_or(false)
    }
}
