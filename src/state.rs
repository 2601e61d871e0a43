// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CookiePolicy, PasswordHasher, TokenService};
use crate::config::Config;
use crate::storage::{DocumentStore, StoragePaths, StorageResult};

/// Shared, cheaply cloneable application state.
///
/// Everything in here is built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<DocumentStore>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
    pub cookies: CookiePolicy,
}

impl AppState {
    pub fn new(
        storage: DocumentStore,
        tokens: TokenService,
        passwords: PasswordHasher,
        cookies: CookiePolicy,
    ) -> Self {
        Self {
            storage: Arc::new(storage),
            tokens: Arc::new(tokens),
            passwords,
            cookies,
        }
    }

    /// Build state from configuration, creating the data directories.
    pub fn from_config(config: &Config) -> StorageResult<Self> {
        let mut storage = DocumentStore::new(StoragePaths::new(&config.data_dir));
        storage.initialize()?;

        let tokens = TokenService::new(
            &config.jwt_secret,
            config.access_token_ttl,
            config.refresh_token_ttl,
        );
        let cookies = CookiePolicy::new(
            config.environment.is_production(),
            tokens.refresh_ttl().as_secs(),
        );

        Ok(Self::new(storage, tokens, PasswordHasher::new(), cookies))
    }

    pub fn storage(&self) -> &DocumentStore {
        &self.storage
    }
}

/// State over a fresh temp directory. Keep the `TempDir` alive for the test.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    use crate::config::{DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL};

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut storage = DocumentStore::new(StoragePaths::new(temp_dir.path()));
    storage.initialize().expect("Failed to initialize storage");

    let secret = crate::auth::JwtSecret::new("test-secret").expect("valid secret");
    let tokens = TokenService::new(&secret, DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL);
    let cookies = CookiePolicy::new(false, tokens.refresh_ttl().as_secs());
    // Cheap parameters keep router tests fast.
    let params = argon2::Params::new(1024, 1, 1, None).expect("valid argon2 params");

    (
        AppState::new(storage, tokens, PasswordHasher::with_params(params), cookies),
        temp_dir,
    )
}
