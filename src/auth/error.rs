// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Token failures collapse into one client-visible message per surface. The
//! specific cause is logged where the failure happens.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Bearer token failed verification or names an unknown account
    TokenFailed,
    /// Login with an unknown email or a wrong password
    InvalidCredentials,
    /// Refresh without the refresh cookie
    MissingRefreshToken,
    /// Refresh cookie failed verification
    InvalidRefreshToken,
    /// Refresh token names an account that no longer exists
    UnknownAccount,
    /// Internal error
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => "no_token",
            AuthError::TokenFailed => "token_failed",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MissingRefreshToken => "no_refresh_token",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::UnknownAccount => "user_not_found",
            AuthError::Internal(_) => "internal",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                write!(f, "Not authorized, no token")
            }
            AuthError::TokenFailed => write!(f, "Not authorized, token failed"),
            AuthError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AuthError::MissingRefreshToken => write!(f, "No refresh token"),
            AuthError::InvalidRefreshToken => write!(f, "Invalid refresh token"),
            AuthError::UnknownAccount => write!(f, "User not found"),
            AuthError::Internal(_) => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Internal authentication error");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
