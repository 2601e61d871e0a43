// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Refresh token cookie.
//!
//! The refresh token only ever travels in an HTTP-only cookie. Setting and
//! clearing use the same attributes so browsers replace the same cookie.

use axum::http::{header::COOKIE, HeaderMap};

/// Name of the refresh token cookie.
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Attributes applied to the refresh cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Add `Secure` (production only)
    pub secure: bool,
    /// Cookie lifetime, equal to the refresh token lifetime
    pub max_age_secs: u64,
}

impl CookiePolicy {
    pub fn new(secure: bool, max_age_secs: u64) -> Self {
        Self {
            secure,
            max_age_secs,
        }
    }

    /// `Set-Cookie` value carrying a refresh token.
    pub fn refresh_cookie(&self, token: &str) -> String {
        format!(
            "{REFRESH_COOKIE_NAME}={token}; {}; Max-Age={}",
            self.attributes(),
            self.max_age_secs
        )
    }

    /// `Set-Cookie` value that removes the refresh cookie.
    pub fn cleared_cookie(&self) -> String {
        format!(
            "{REFRESH_COOKIE_NAME}=; {}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.attributes()
        )
    }

    fn attributes(&self) -> String {
        let mut attributes = String::from("HttpOnly; SameSite=None; Path=/");
        if self.secure {
            attributes.push_str("; Secure");
        }
        attributes
    }
}

/// Find a cookie value across all `Cookie` headers.
///
/// Empty values count as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
