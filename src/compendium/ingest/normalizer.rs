//! Node normalization - fills the fields the remote schema declares non-null

use crate::compendium::types::{NodeDocument, NodeRecord};

/// Normalize a decoded node: unset `metadata` becomes `{}`, unset
/// `dependencies` becomes `[]`.
pub fn normalize(document: NodeDocument) -> NodeRecord {
    NodeRecord {
        id: document.id,
        name: document.name,
        type_id: document.type_id,
        metadata: document.metadata.unwrap_or_default(),
        dependencies: document.dependencies.unwrap_or_default(),
    }
}

pub fn normalize_all(documents: Vec<NodeDocument>) -> Vec<NodeRecord> {
    documents.into_iter().map(normalize).collect()
}

impl From<NodeDocument> for NodeRecord {
    fn from(document: NodeDocument) -> Self {
        normalize(document)
    }
}
