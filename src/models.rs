// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies used by the REST API. Request fields are all
//! optional at the serde level so that missing or empty values are reported
//! with the API's own validation messages instead of a deserializer error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthenticatedUser;

// =============================================================================
// Auth Models
// =============================================================================

/// Registration request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned by register, login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Short-lived bearer token
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub user: AuthenticatedUser,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Idea Models
// =============================================================================

/// Create or update an idea.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct IdeaRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Array of strings, or one comma separated string
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<Value>,
}

/// Validated idea fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaFields {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl IdeaRequest {
    /// Check required fields. `None` if title, summary or description is
    /// missing or blank.
    pub fn validate(self) -> Option<IdeaFields> {
        let title = non_blank(self.title)?;
        let summary = non_blank(self.summary)?;
        let description = non_blank(self.description)?;
        Some(IdeaFields {
            title,
            summary,
            description,
            tags: normalize_tags(self.tags),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A comma separated string is split and trimmed with empty entries
/// dropped. An array keeps its string elements. Anything else is no tags.
pub fn normalize_tags(tags: Option<Value>) -> Vec<String> {
    match tags {
        Some(Value::String(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Query parameters for listing ideas.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIdeasQuery {
    /// Maximum number of ideas to return
    #[serde(rename = "_limit")]
    pub limit: Option<String>,
}

impl ListIdeasQuery {
    /// Build from raw query pairs. A repeated `_limit` uses its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let limit = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "_limit").then_some(value));
        Self { limit }
    }

    /// Parsed limit. Leading digits are read like `parseInt`, so `"5abc"` is
    /// 5 and `"abc"` is no limit. A negative value counts as its absolute
    /// value and zero means no limit.
    pub fn limit(&self) -> Option<usize> {
        let raw = self.limit.as_deref()?.trim_start();
        let unsigned = raw
            .strip_prefix('-')
            .or_else(|| raw.strip_prefix('+'))
            .unwrap_or(raw);

        let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }

        // Too many digits to fit still means "everything".
        let limit = digits.parse::<usize>().unwrap_or(usize::MAX);
        (limit > 0).then_some(limit)
    }
}
