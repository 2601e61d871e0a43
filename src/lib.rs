// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ideas API - Idea board REST service
//!
//! Accounts register and log in with email and password, receive a
//! short-lived bearer token plus a refresh cookie, and manage ideas that only
//! their owner may change.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tokens, password hashing, refresh cookie and the bearer gate
//! - `storage` - JSON document store, repositories and ownership checks
//! - `config` / `telemetry` - Startup configuration and logging

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;
