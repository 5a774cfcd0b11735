// SPDX-License-Identifier: MIT

//! YAML and GraphQL types for nodes and node types
//!
//! Field names follow the remote `NodeInput` schema (`typeId` is camelCase
//! both in YAML and on the wire).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form node metadata, kept in declaration order
pub type Metadata = Map<String, Value>;

/// A node as written in `.compendium.yml`, before normalization
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    pub id: String,
    pub name: String,
    pub type_id: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

/// A normalized node, serialized as a `NodeInput`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub type_id: String,
    pub metadata: Metadata,
    /// Ids of other nodes; not checked locally
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeRecord {
    pub id: String,
    pub name: String,
}

/// One document of `.compendium-config.yml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(rename = "nodeTypes", default)]
    pub node_types: Option<Vec<NodeTypeRecord>>,
}

/// Handle of the remote execution started by `putNodes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub execution_arn: String,
}

/// Echo of an upserted node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeResult {
    pub id: String,
    pub name: String,
}
