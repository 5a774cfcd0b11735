// SPDX-License-Identifier: MIT

use super::error::GraphQLError;
use super::request::{GraphQLRequest, GraphQLResponse};
use async_trait::async_trait;

/// Request/response channel to a single GraphQL endpoint.
///
/// Authentication is entirely the implementation's concern; callers only
/// see the decoded `{data, errors}` envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post one request and wait for its response
    async fn post(&self, request: &GraphQLRequest) -> Result<GraphQLResponse, GraphQLError>;
}
