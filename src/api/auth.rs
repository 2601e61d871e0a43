// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account and session endpoints.
//!
//! Register and login return an access token in the body and set the
//! refresh token cookie. Refresh reads that cookie and returns a new access
//! token. Logout clears it.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    Json,
};

use crate::{
    auth::{read_cookie, AuthError, AuthenticatedUser, REFRESH_COOKIE_NAME},
    error::ApiError,
    models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest},
    state::AppState,
    storage::{AccountRepository, StorageError, StoredAccount},
};

type CookieResponse<T> = (StatusCode, [(axum::http::HeaderName, String); 1], Json<T>);

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Issue both tokens for `account` and build the response with the cookie.
fn session_response(
    state: &AppState,
    status: StatusCode,
    account: &StoredAccount,
) -> Result<CookieResponse<AuthResponse>, ApiError> {
    let access_token = state.tokens.issue_access(&account.id)?;
    let refresh_token = state.tokens.issue_refresh(&account.id)?;

    Ok((
        status,
        [(SET_COOKIE, state.cookies.refresh_cookie(&refresh_token))],
        Json(AuthResponse {
            access_token,
            user: AuthenticatedUser::from(account),
        }),
    ))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; refresh cookie set", body = AuthResponse),
        (status = 400, description = "Missing fields or email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<CookieResponse<AuthResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let (Some(name), Some(email), Some(password)) = (
        required(request.name),
        required(request.email),
        request.password.filter(|p| !p.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    let accounts = AccountRepository::new(state.storage());
    if accounts.find_by_email(&email)?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = state.passwords.hash(password).await?;
    let account = StoredAccount::new(name, email, password_hash);

    match accounts.create(&account) {
        Ok(()) => {}
        Err(StorageError::AlreadyExists(_)) => {
            return Err(ApiError::conflict("User already exists"));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %account.id, "Account registered");
    session_response(&state, StatusCode::CREATED, &account)
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; refresh cookie set", body = AuthResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<CookieResponse<AuthResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let (Some(email), Some(password)) = (
        required(request.email),
        request.password.filter(|p| !p.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let Some(account) = AccountRepository::new(state.storage()).find_by_email(&email)? else {
        state.passwords.verify_dummy(password).await;
        tracing::debug!("Login for unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    if !state
        .passwords
        .verify(password, account.password_hash.clone())
        .await?
    {
        tracing::debug!(user_id = %account.id, "Login with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    tracing::info!(user_id = %account.id, "Logged in");
    session_response(&state, StatusCode::OK, &account)
}

/// Exchange the refresh cookie for a new access token.
///
/// The refresh token itself is not rotated.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    responses(
        (status = 200, description = "New access token", body = AuthResponse),
        (
            status = 401,
            description = "Missing, invalid or expired refresh cookie, or unknown account"
        )
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthResponse>, ApiError> {
    let token = read_cookie(&headers, REFRESH_COOKIE_NAME).ok_or(AuthError::MissingRefreshToken)?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Refresh token rejected");
        AuthError::InvalidRefreshToken
    })?;

    let account = AccountRepository::new(state.storage())
        .find(&claims.user_id)?
        .ok_or_else(|| {
            tracing::warn!(user_id = %claims.user_id, "Refresh token names an unknown account");
            AuthError::UnknownAccount
        })?;

    let access_token = state.tokens.issue_access(&account.id)?;
    Ok(Json(AuthResponse {
        access_token,
        user: AuthenticatedUser::from(&account),
    }))
}

/// Clear the refresh cookie. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Refresh cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(State(state): State<AppState>) -> CookieResponse<MessageResponse> {
    (
        StatusCode::OK,
        [(SET_COOKIE, state.cookies.cleared_cookie())],
        Json(MessageResponse::new("Logged out successfully")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{
        body_json, post_json, refresh_cookie_of, register, send, TestApp,
    };
    use axum::http::{header::COOKIE, Method, Request};
    use axum::body::Body;
    use serde_json::json;

    #[tokio::test]
    async fn register_returns_token_user_and_cookie() {
        let app = TestApp::new();
        let response = send(
            &app,
            post_json(
                "/api/auth/register",
                json!({"name": "Ann", "email": "a@x.com", "password": "secret1"}),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = refresh_cookie_of(&response).expect("refresh cookie set");
        assert!(cookie.contains("HttpOnly"));

        let body = body_json(response).await;
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["name"], "Ann");
        assert!(body["user"].get("password_hash").is_none());

        let claims = app.state.tokens.verify(body["accessToken"].as_str().unwrap()).unwrap();
        assert_eq!(claims.user_id, body["user"]["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn register_requires_all_fields() {
        let app = TestApp::new();
        for body in [
            json!({"email": "a@x.com", "password": "secret1"}),
            json!({"name": "  ", "email": "a@x.com", "password": "secret1"}),
            json!({"name": "Ann", "email": "a@x.com"}),
            json!({}),
        ] {
            let response = send(&app, post_json("/api/auth/register", body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"], "All fields are required");
        }
    }

    #[tokio::test]
    async fn register_without_json_body_is_missing_fields() {
        let app = TestApp::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/register")
            .body(Body::empty())
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "All fields are required");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let app = TestApp::new();
        register(&app, "Ann", "a@x.com", "secret1").await;

        let response = send(
            &app,
            post_json(
                "/api/auth/register",
                json!({"name": "Other", "email": "a@x.com", "password": "secret2"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "User already exists");
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_password() {
        let app = TestApp::new();
        let registered = register(&app, "Ann", "a@x.com", "secret1").await;

        let response = send(
            &app,
            post_json("/api/auth/login", json!({"email": "a@x.com", "password": "secret1"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(refresh_cookie_of(&response).is_some());
        let body = body_json(response).await;
        assert_eq!(body["user"]["id"], registered.user_id.as_str());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let app = TestApp::new();
        register(&app, "Ann", "a@x.com", "secret1").await;

        let wrong_password = send(
            &app,
            post_json("/api/auth/login", json!({"email": "a@x.com", "password": "nope"})),
        )
        .await;
        let unknown_email = send(
            &app,
            post_json("/api/auth/login", json!({"email": "b@x.com", "password": "secret1"})),
        )
        .await;

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        assert!(refresh_cookie_of(&wrong_password).is_none());

        let a = body_json(wrong_password).await;
        let b = body_json(unknown_email).await;
        assert_eq!(a, b);
        assert_eq!(a["error"], "Invalid Credentials");
    }

    #[tokio::test]
    async fn login_requires_email_and_password() {
        let app = TestApp::new();
        let response = send(&app, post_json("/api/auth/login", json!({"email": "a@x.com"}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Email and password are required");
    }

    fn refresh_request(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri("/api/auth/refresh");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn refresh_with_cookie_issues_access_token_for_same_account() {
        let app = TestApp::new();
        let registered = register(&app, "Ann", "a@x.com", "secret1").await;

        let response = send(&app, refresh_request(Some(&registered.cookie_pair()))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(refresh_cookie_of(&response).is_none());

        let body = body_json(response).await;
        let claims = app.state.tokens.verify(body["accessToken"].as_str().unwrap()).unwrap();
        assert_eq!(claims.user_id, registered.user_id);
        assert_eq!(body["user"]["email"], "a@x.com");
    }

    #[tokio::test]
    async fn refresh_without_cookie_is_rejected() {
        let app = TestApp::new();
        let response = send(&app, refresh_request(None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "No refresh token");
    }

    #[tokio::test]
    async fn refresh_with_tampered_cookie_is_rejected() {
        let app = TestApp::new();
        let registered = register(&app, "Ann", "a@x.com", "secret1").await;

        let (head, signature) = registered.refresh_token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{head}.{}", chars.into_iter().collect::<String>());

        let response = send(&app, refresh_request(Some(&format!("refreshToken={tampered}")))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid refresh token");
    }

    #[tokio::test]
    async fn refresh_for_deleted_account_is_rejected() {
        let app = TestApp::new();
        let token = app
            .state
            .tokens
            .issue_refresh(&uuid::Uuid::new_v4().to_string())
            .unwrap();

        let response = send(&app, refresh_request(Some(&format!("refreshToken={token}")))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "User not found");
    }

    #[tokio::test]
    async fn logout_always_clears_cookie() {
        let app = TestApp::new();
        for _ in 0..2 {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap();
            let response = send(&app, request).await;

            assert_eq!(response.status(), StatusCode::OK);
            let cookie = refresh_cookie_of(&response).unwrap();
            assert!(cookie.starts_with("refreshToken=;"));
            assert!(cookie.contains("Max-Age=0"));
            assert_eq!(
                body_json(response).await["message"],
                "Logged out successfully"
            );
        }
    }
}
