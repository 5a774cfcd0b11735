// SPDX-License-Identifier: MIT

//! Typed error handling for compendium-cli
//!
//! `CompendiumError` is what a command returns; everything that aborts a run
//! ends up here. Per-item failures under a continue-on-error policy never do,
//! they are collected in the ingest report instead.

use crate::graphql::GraphQLError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for compendium-cli
#[derive(Debug, Error)]
pub enum CompendiumError {
    /// Input file could not be read or decoded
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Transport construction or a request outside the pipeline failed
    #[error(transparent)]
    GraphQL(#[from] GraphQLError),

    /// A request failed under an abort-on-first policy
    #[error("request for {label} failed")]
    Aborted {
        label: String,
        #[source]
        source: GraphQLError,
    },

    /// Some items failed and the caller asked for a strict exit status
    #[error("{failed} of {attempted} requests failed")]
    Incomplete { failed: usize, attempted: usize },

    /// Request variables could not be encoded
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Writing to the report sink failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by the document reader, always before any remote call
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `index` is 1-based, counting every document in the stream
    #[error("invalid YAML in document {index}")]
    Document {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },
}

impl CompendiumError {
    /// Wrap a request failure that stopped the run
    pub fn aborted(label: impl Into<String>, source: GraphQLError) -> Self {
        Self::Aborted {
            label: label.into(),
            source,
        }
    }
}
