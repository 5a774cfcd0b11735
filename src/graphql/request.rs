// SPDX-License-Identifier: MIT

//! GraphQL request and response envelopes

use super::error::{GraphQLError, RemoteError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GraphQL operation ready to be posted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    pub variables: Map<String, Value>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>, variables: Map<String, Value>) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }

    /// Operation name declared by the document, e.g. `putNodes`
    pub fn operation_name(&self) -> Option<&str> {
        let doc = self.query.trim_start();
        let rest = doc
            .strip_prefix("mutation")
            .or_else(|| doc.strip_prefix("query"))?;
        let name = rest
            .trim_start()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .next()?;
        (!name.is_empty()).then_some(name)
    }
}

/// Raw response body: `{ "data": ..., "errors": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<RemoteError>>,
}

impl GraphQLResponse {
    /// Decode the value of a single top-level `data` field.
    ///
    /// A non-empty `errors` array wins over any partial data.
    pub fn into_field<T: DeserializeOwned>(self, field: &str) -> Result<T, GraphQLError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            return Err(GraphQLError::Remote(errors));
        }

        let mut data = match self.data {
            Some(Value::Object(map)) => map,
            Some(Value::Null) | None => {
                return Err(GraphQLError::decode(field, "response carries no data"))
            }
            Some(other) => {
                return Err(GraphQLError::decode(
                    field,
                    format!("expected data to be an object, got {}", other),
                ))
            }
        };

        let value = data
            .remove(field)
            .filter(|v| !v.is_null())
            .ok_or_else(|| GraphQLError::decode(field, "field missing from response data"))?;

        serde_json::from_value(value).map_err(|e| GraphQLError::decode(field, e.to_string()))
    }
}
