// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token signing secret.

use std::fmt;
use std::sync::Arc;

use crate::config::{ConfigError, JWT_SECRET_ENV};

/// HS256 signing secret shared by access and refresh tokens.
///
/// The value never appears in `Debug` output or logs.
#[derive(Clone)]
pub struct JwtSecret(Arc<str>);

impl JwtSecret {
    /// Wrap a secret value. Blank secrets are rejected.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::Empty(JWT_SECRET_ENV));
        }
        Ok(Self(secret.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}
