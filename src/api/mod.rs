// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # HTTP API
//!
//! | Route | Auth |
//! |-------|------|
//! | `POST /api/auth/{register,login,refresh,logout}` | none (refresh reads the cookie) |
//! | `GET /api/ideas`, `GET /api/ideas/{id}` | none |
//! | `POST /api/ideas`, `PUT/DELETE /api/ideas/{id}` | bearer |
//! | `GET /health`, `/health/live`, `/health/ready` | none |
//! | `GET /docs` | none |

use axum::{
    http::header,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_auth, AuthenticatedUser},
    models::{AuthResponse, IdeaRequest, LoginRequest, MessageResponse, RegisterRequest},
    state::AppState,
    storage::Idea,
};

pub mod auth;
pub mod health;
pub mod ideas;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/ideas", post(ideas::create_idea))
        .route(
            "/ideas/{idea_id}",
            put(ideas::update_idea).delete(ideas::delete_idea),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/ideas", get(ideas::list_ideas))
        .route("/ideas/{idea_id}", get(ideas::get_idea))
        .merge(protected);

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CorsLayer::very_permissive());

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(layers)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::refresh,
        auth::logout,
        ideas::list_ideas,
        ideas::get_idea,
        ideas::create_idea,
        ideas::update_idea,
        ideas::delete_idea,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            AuthenticatedUser,
            AuthResponse,
            RegisterRequest,
            LoginRequest,
            MessageResponse,
            Idea,
            IdeaRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token refresh"),
        (name = "Ideas", description = "Idea management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

/// Helpers for driving the full router in tests.
#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{AUTHORIZATION, CONTENT_TYPE, SET_COOKIE},
            request::Builder,
            Method, Request, Response, StatusCode,
        },
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::state::{test_state, AppState};

    pub struct TestApp {
        pub state: AppState,
        pub router: Router,
        _dir: TempDir,
    }

    impl TestApp {
        pub fn new() -> Self {
            let (state, dir) = test_state();
            Self {
                router: super::router(state.clone()),
                state,
                _dir: dir,
            }
        }
    }

    /// Tokens and id of an account created through the register endpoint.
    pub struct Registered {
        pub user_id: String,
        pub access_token: String,
        pub refresh_token: String,
    }

    impl Registered {
        /// `name=value` pair as a browser would send it back.
        pub fn cookie_pair(&self) -> String {
            format!("refreshToken={}", self.refresh_token)
        }
    }

    pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
        app.router.clone().oneshot(request).await.unwrap()
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn with_bearer(builder: Builder, token: Option<&str>) -> Builder {
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn refresh_cookie_of(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("refreshToken="))
            .map(str::to_string)
    }

    pub async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> Registered {
        let response = send(
            app,
            post_json(
                "/api/auth/register",
                json!({"name": name, "email": email, "password": password}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let cookie = refresh_cookie_of(&response).expect("refresh cookie set");
        let refresh_token = cookie
            .trim_start_matches("refreshToken=")
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let body = body_json(response).await;
        Registered {
            user_id: body["user"]["id"].as_str().unwrap().to_string(),
            access_token: body["accessToken"].as_str().unwrap().to_string(),
            refresh_token,
        }
    }
}
