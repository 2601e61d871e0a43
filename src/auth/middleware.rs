// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate for protected routes.
//!
//! Applied with `route_layer` so only matched protected routes pay for it:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/ideas", post(create_idea))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;
use crate::storage::AccountRepository;

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The header must be exactly the scheme, one space and a non-empty token.
/// Padding or embedded whitespace is malformed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Verify the bearer token and load the account it names.
pub fn authenticate(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        AuthError::TokenFailed
    })?;

    let account = AccountRepository::new(state.storage())
        .find(&claims.user_id)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or_else(|| {
            tracing::warn!(user_id = %claims.user_id, "Bearer token names an unknown account");
            AuthError::TokenFailed
        })?;

    Ok(AuthenticatedUser::from(&account))
}

/// Reject unauthenticated requests, otherwise attach the identity to the
/// request extensions for the `Auth` extractor.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
