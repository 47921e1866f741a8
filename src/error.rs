//! Error types for the recipe API client and the fetch service
//!
//! `ApiError` classifies a single failed upstream call. `RecipeError` wraps it at
//! an operation boundary with a human-readable prefix naming what failed, which is
//! the message the UI shows next to its retry affordance.

use std::fmt;

use thiserror::Error;

/// Message used when a failure carries no usable text of its own
const GENERIC_FAILURE: &str = "Unknown error";

/// Classified failure of a single call to the upstream API
///
/// All variants own their data as strings so the error can be cloned and handed
/// to every caller that joined a coalesced request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request did not complete within its timeout
    #[error("Request timed out")]
    NetworkTimeout,

    /// The response parsed but contained zero items
    #[error("{0}")]
    UpstreamEmptyResult(String),

    /// Non-2xx response or an error reported by the API itself
    #[error("{message}")]
    UpstreamError {
        /// HTTP status, when one was received
        status: Option<u16>,
        /// API-reported message, or a description of the status
        message: String,
    },

    /// Anything not classified above (connection failures, malformed bodies)
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Creates an `UpstreamEmptyResult` with the given description
    pub fn empty(what: impl Into<String>) -> Self {
        ApiError::UpstreamEmptyResult(what.into())
    }

    /// Creates an `Unknown` error, substituting a generic message for empty input
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ApiError::Unknown(GENERIC_FAILURE.to_string())
        } else {
            ApiError::Unknown(message)
        }
    }

    /// Creates an `UpstreamError` for a status code and optional API message
    pub fn upstream(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Upstream returned status {}", status));
        ApiError::UpstreamError {
            status: Some(status),
            message,
        }
    }

    /// Returns true for the empty-result variant
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ApiError::UpstreamEmptyResult(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::NetworkTimeout;
        }
        if let Some(status) = err.status() {
            return ApiError::upstream(status.as_u16(), Some(err.to_string()));
        }
        ApiError::unknown(err.to_string())
    }
}

/// Operation that was being performed when an `ApiError` occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RandomRecipes,
    PopularRecipes,
    RecipeDetail,
    SimilarRecipes,
    SearchRecipes,
    ConnectUser,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Operation::RandomRecipes => "Failed to fetch recipes",
            Operation::PopularRecipes => "Failed to fetch popular recipes",
            Operation::RecipeDetail => "Failed to fetch recipe details",
            Operation::SimilarRecipes => "Failed to fetch similar recipes",
            Operation::SearchRecipes => "Failed to search recipes",
            Operation::ConnectUser => "Failed to connect user",
        };
        f.write_str(prefix)
    }
}

/// An `ApiError` wrapped at an operation boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {source}")]
pub struct RecipeError {
    /// The operation that failed
    pub operation: Operation,
    /// The classified cause
    pub source: ApiError,
}

impl RecipeError {
    pub fn new(operation: Operation, source: ApiError) -> Self {
        Self { operation, source }
    }

    /// The underlying classified cause
    pub fn kind(&self) -> &ApiError {
        &self.source
    }
}

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// No API key was configured in any source
    #[error("No API key configured. Set api.api_key in config.toml or RECIPEBOOK__API__API_KEY")]
    MissingApiKey,

    /// A value was present but unusable
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
