// SPDX-License-Identifier: MIT

//! Typed errors for GraphQL dispatch
//!
//! Every failure of a single request ends up as one `GraphQLError`, whether
//! it happened on the wire, was reported by the service in its `errors`
//! array, or came back in a shape the caller did not expect.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while sending a request or decoding its response
#[derive(Debug, Error)]
pub enum GraphQLError {
    /// Network or protocol failure from the HTTP client
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status without a GraphQL error payload
    #[error("endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response carried a non-empty `errors` array
    #[error("remote error: {}", join_remote(.0))]
    Remote(Vec<RemoteError>),

    /// The response payload did not match the expected result shape
    #[error("unexpected response for '{field}': {reason}")]
    Decode { field: String, reason: String },

    /// Request variables could not be encoded as JSON
    #[error("failed to encode request variables: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Missing or invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GraphQLError {
    /// Create a decode error for a response field
    pub fn decode(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True when the request never produced a GraphQL response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    pub message: String,
    /// AppSync reports a machine-readable category here
    #[serde(
        default,
        rename = "errorType",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            Some(kind) => write!(f, "{}: {}", kind, self.message),
            None => f.write_str(&self.message),
        }
    }
}

fn join_remote(errors: &[RemoteError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
