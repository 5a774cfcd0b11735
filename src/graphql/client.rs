// SPDX-License-Identifier: MIT

//! HTTP transport - posts GraphQL requests to the Compendium endpoint

use super::error::GraphQLError;
use super::request::{GraphQLRequest, GraphQLResponse};
use super::transport::Transport;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::env;
use url::Url;

pub const ENDPOINT_VAR: &str = "COMPENDIUM_GRAPHQL_URL";
pub const API_KEY_VAR: &str = "COMPENDIUM_API_KEY";
pub const AUTH_TOKEN_VAR: &str = "COMPENDIUM_AUTH_TOKEN";
pub const REGION_VAR: &str = "AWS_REGION";

/// Connection settings for [`GraphQLClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Url,
    pub region: Option<String>,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
}

impl ClientConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            region: None,
            api_key: None,
            auth_token: None,
        }
    }

    /// Build the config from the process environment.
    ///
    /// Requires `COMPENDIUM_GRAPHQL_URL` unless `endpoint` overrides it.
    /// Optionally uses `COMPENDIUM_API_KEY`, `COMPENDIUM_AUTH_TOKEN` and `AWS_REGION`.
    pub fn from_env(endpoint: Option<String>) -> Result<Self, GraphQLError> {
        Self::from_lookup(endpoint, |key| env::var(key).ok())
    }

    fn from_lookup<F>(endpoint: Option<String>, lookup: F) -> Result<Self, GraphQLError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw = endpoint
            .or_else(|| non_empty(ENDPOINT_VAR))
            .ok_or_else(|| GraphQLError::config(format!("{} must be set", ENDPOINT_VAR)))?;
        let endpoint = Url::parse(&raw)
            .map_err(|e| GraphQLError::config(format!("invalid endpoint '{}': {}", raw, e)))?;

        Ok(Self {
            endpoint,
            region: non_empty(REGION_VAR),
            api_key: non_empty(API_KEY_VAR),
            auth_token: non_empty(AUTH_TOKEN_VAR),
        })
    }
}

/// reqwest-backed [`Transport`]
pub struct GraphQLClient {
    client: Client,
    endpoint: Url,
}

impl GraphQLClient {
    pub fn new(config: &ClientConfig) -> Result<Self, GraphQLError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                GraphQLError::config(format!("{} is not a valid header value", API_KEY_VAR))
            })?;
            headers.insert("x-api-key", value);
        }

        if let Some(token) = &config.auth_token {
            let value = HeaderValue::from_str(token).map_err(|_| {
                GraphQLError::config(format!("{} is not a valid header value", AUTH_TOKEN_VAR))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        log::info!(
            "GraphQL client: endpoint={}, region={}, has_api_key={}, has_auth_token={}",
            config.endpoint,
            config.region.as_deref().unwrap_or("-"),
            config.api_key.is_some(),
            config.auth_token.is_some()
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Transport for GraphQLClient {
    async fn post(&self, request: &GraphQLRequest) -> Result<GraphQLResponse, GraphQLError> {
        log::debug!(
            "posting {} to {}",
            request.operation_name().unwrap_or("anonymous operation"),
            self.endpoint
        );

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            // Auth and validation failures still come back as a GraphQL error payload
            return match serde_json::from_str::<GraphQLResponse>(&body) {
                Ok(GraphQLResponse {
                    errors: Some(errors),
                    ..
                }) if !errors.is_empty() => Err(GraphQLError::Remote(errors)),
                _ => Err(GraphQLError::Status { status, body }),
            };
        }

        serde_json::from_str(&body).map_err(|e| GraphQLError::decode("data", e.to_string()))
    }
}
