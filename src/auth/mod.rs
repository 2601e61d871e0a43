// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with email and password
//! 2. Server returns a short-lived access token in the body and sets a
//!    long-lived refresh token in the `refreshToken` HTTP-only cookie
//! 3. Client sends `Authorization: Bearer <access token>` on protected calls
//! 4. When the access token expires the client calls refresh; the browser
//!    sends the cookie and gets a new access token
//!
//! ## Security
//!
//! - Tokens are HS256 JWTs signed with `JWT_SECRET`, verified with no leeway
//! - Passwords are stored as Argon2id PHC strings
//! - Unknown emails and wrong passwords are indistinguishable on login

pub mod claims;
pub mod cookie;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod secret;
pub mod token;

pub use claims::AuthenticatedUser;
pub use cookie::{read_cookie, CookiePolicy, REFRESH_COOKIE_NAME};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use password::{PasswordError, PasswordHasher};
pub use secret::JwtSecret;
pub use token::{TokenClaims, TokenError, TokenService};
