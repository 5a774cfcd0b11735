// SPDX-License-Identifier: MIT

//! The two Compendium mutations

use crate::compendium::ingest::pipeline::Mutation;
use crate::compendium::types::{ExecutionResult, NodeRecord, NodeTypeRecord, NodeTypeResult};
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

pub const PUT_NODES: &str = r#"
mutation putNodes($nodes:[NodeInput!]!) {
  putNodes(nodes:$nodes){
    executionArn
  }
}
"#;

pub const PUT_NODE_TYPE: &str = r#"
mutation putNodeTypes($id: ID!, $name: String!) {
  putNodeType(type: {id: $id, name: $name}) {
    id
    name
  }
}
"#;

/// Upserts a list of nodes and starts one remote execution for all of them
#[derive(Debug, Clone, Copy, Default)]
pub struct PutNodes;

impl Mutation for PutNodes {
    type Record = NodeRecord;
    type Output = ExecutionResult;

    fn document(&self) -> &'static str {
        PUT_NODES
    }

    fn field(&self) -> &'static str {
        "putNodes"
    }

    fn variables(&self, batch: &[NodeRecord]) -> Result<Map<String, Value>, serde_json::Error> {
        let mut vars = Map::new();
        vars.insert("nodes".to_string(), serde_json::to_value(batch)?);
        Ok(vars)
    }

    fn label(&self, batch: &[NodeRecord]) -> String {
        match batch {
            [node] => format!("node {}", node.id),
            _ => format!("batch of {} nodes", batch.len()),
        }
    }
}

/// Upserts a single node type
#[derive(Debug, Clone, Copy, Default)]
pub struct PutNodeType;

impl Mutation for PutNodeType {
    type Record = NodeTypeRecord;
    type Output = NodeTypeResult;

    fn document(&self) -> &'static str {
        PUT_NODE_TYPE
    }

    fn field(&self) -> &'static str {
        "putNodeType"
    }

    /// Variables are exactly the record's `id` and `name`
    fn variables(
        &self,
        batch: &[NodeTypeRecord],
    ) -> Result<Map<String, Value>, serde_json::Error> {
        match batch {
            [node_type] => to_object(node_type),
            _ => Err(serde_json::Error::custom(format!(
                "putNodeType takes one node type per request, got {}",
                batch.len()
            ))),
        }
    }

    fn label(&self, batch: &[NodeTypeRecord]) -> String {
        let ids: Vec<&str> = batch.iter().map(|t| t.id.as_str()).collect();
        format!("node type {}", ids.join(", "))
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde_json::Error::custom(format!(
            "expected an object, got {}",
            other
        ))),
    }
}
