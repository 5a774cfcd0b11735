// SPDX-License-Identifier: MIT

//! GraphQL module - request/response types and transports
//!
//! This module provides the `Transport` trait the ingestion pipeline
//! dispatches through, plus the HTTP implementation:
//! - [client] - reqwest-backed client for a single GraphQL endpoint
//! - [request] - request and response envelopes
//! - [error] - transport, remote and decode errors

pub mod client;
pub mod error;
pub mod request;
pub mod transport;

pub use client::{ClientConfig, GraphQLClient};
pub use error::{GraphQLError, RemoteError};
pub use request::{GraphQLRequest, GraphQLResponse};
pub use transport::Transport;
