// ABOUTME: Unified error handling with the provider error taxonomy and HTTP responses
// ABOUTME: Distinguishes unauthorized, transient, and malformed provider failures from local errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Application error types.
//!
//! The provider-facing taxonomy matters for callers: `ProviderUnauthorized`
//! triggers a refresh-then-retry-once in the sync engine and otherwise means
//! "disconnected", `ProviderTransient` is retryable at the caller's
//! discretion, and `ProviderMalformed` aborts the current batch without
//! persisting anything from it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Result alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Provider rejected the credential (expired, revoked, or invalid token).
    #[error("Provider authorization failed: {0}")]
    ProviderUnauthorized(String),

    /// Provider-side or network failure; a later retry may succeed.
    #[error("Provider unavailable: {0}")]
    ProviderTransient(String),

    /// The provider returned a response we could not decode.
    #[error("Malformed provider response: {0}")]
    ProviderMalformed(String),

    /// Referenced user, activity, or connection does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Caller supplied an invalid request.
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Provider rejected the credential.
    pub fn provider_unauthorized(msg: impl Into<String>) -> Self {
        Self::ProviderUnauthorized(msg.into())
    }

    /// Provider-side or network failure.
    pub fn provider_transient(msg: impl Into<String>) -> Self {
        Self::ProviderTransient(msg.into())
    }

    /// Undecodable provider response.
    pub fn provider_malformed(msg: impl Into<String>) -> Self {
        Self::ProviderMalformed(msg.into())
    }

    /// Missing resource.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Invalid caller input.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Configuration problem.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Database failure.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Unexpected internal failure.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the provider rejected our credential. Callers use this to
    /// decide between "refresh and retry once" and "treat as disconnected".
    #[must_use]
    pub const fn is_provider_unauthorized(&self) -> bool {
        matches!(self, Self::ProviderUnauthorized(_))
    }

    /// Stable machine-readable error code for the response body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ProviderUnauthorized(_) => "provider_unauthorized",
            Self::ProviderTransient(_) => "provider_unavailable",
            Self::ProviderMalformed(_) => "provider_malformed",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "configuration_error",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// HTTP status reflecting the taxonomy.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::ProviderUnauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::ProviderTransient(_) | Self::ProviderMalformed(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidInput(format!("Invalid UUID: {err}"))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal failure details stay in the logs, not the response.
        let details = match &self {
            Self::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                None
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                None
            }
            Self::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                None
            }
            Self::ProviderUnauthorized(msg)
            | Self::ProviderTransient(msg)
            | Self::ProviderMalformed(msg)
            | Self::NotFound(msg)
            | Self::InvalidInput(msg) => Some(msg.clone()),
        };

        let body = ErrorResponse {
            error: self.code(),
            details,
        };

        (self.status(), Json(body)).into_response()
    }
}
