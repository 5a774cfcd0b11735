//! Document reader - multi-document YAML loading
//!
//! A file holds zero or more YAML documents separated by `---`; each
//! non-empty document decodes into one record. The read is all-or-nothing:
//! the first bad document fails the whole file.

use super::normalizer;
use crate::compendium::error::ReadError;
use crate::compendium::types::{Config, NodeDocument, NodeRecord, NodeTypeRecord};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Key that merges another mapping into the current one (`<<: *anchor`)
const MERGE_KEY: &str = "<<";

/// Decode every document of a YAML stream, in source order.
///
/// Empty documents (a bare or trailing `---`) carry no record and are skipped.
/// Plain scalars decode into string fields as written, so `id: 42` is `"42"`,
/// and merge keys are applied before decoding.
pub fn read_documents<T: DeserializeOwned>(source: &str) -> Result<Vec<T>, ReadError> {
    let mut records = Vec::new();

    // The stream is walked twice in lockstep: once resolved into a `Value`
    // to find empty documents and merge keys, once for the verbatim decode.
    let resolved = serde_yaml::Deserializer::from_str(source);
    let verbatim = serde_yaml::Deserializer::from_str(source);

    for (i, (document, raw)) in resolved.zip(verbatim).enumerate() {
        let index = i + 1;
        let fail = |source: serde_yaml::Error| ReadError::Document { index, source };

        let mut value = Value::deserialize(document).map_err(fail)?;
        if value.is_null() {
            continue;
        }

        let record = if has_merge_keys(&value) {
            value.apply_merge().map_err(fail)?;
            decode_merged(&value)
        } else {
            T::deserialize(raw)
        };
        records.push(record.map_err(fail)?);
    }

    Ok(records)
}

fn has_merge_keys(value: &Value) -> bool {
    match value {
        Value::Mapping(map) => map
            .iter()
            .any(|(k, v)| k.as_str() == Some(MERGE_KEY) || has_merge_keys(v)),
        Value::Sequence(items) => items.iter().any(has_merge_keys),
        Value::Tagged(tagged) => has_merge_keys(&tagged.value),
        _ => false,
    }
}

/// A resolved `Value` has typed scalars, so the merged document is emitted
/// back to YAML and decoded from text like any other document.
fn decode_merged<T: DeserializeOwned>(value: &Value) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_str(&serde_yaml::to_string(value)?)
}

/// Read a file and decode its documents
pub fn read_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>, ReadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_documents(&content)
}

/// Load and normalize the nodes of a `.compendium.yml` file
pub fn read_nodes<P: AsRef<Path>>(path: P) -> Result<Vec<NodeRecord>, ReadError> {
    let documents: Vec<NodeDocument> = read_file(path)?;
    Ok(normalizer::normalize_all(documents))
}

/// Load the node types of every document of a `.compendium-config.yml` file
pub fn read_node_types<P: AsRef<Path>>(path: P) -> Result<Vec<NodeTypeRecord>, ReadError> {
    let configs: Vec<Config> = read_file(path)?;
    Ok(configs
        .into_iter()
        .flat_map(|c| c.node_types.unwrap_or_default())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_documents_in_order() {
        let yaml = r#"
id: a
name: A
typeId: service
---
id: b
name: B
typeId: service
dependencies: [a]
---
id: c
name: C
typeId: job
"#;
        let docs: Vec<NodeDocument> = read_documents(yaml).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(docs[1].dependencies, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_empty_stream_yields_nothing() {
        let docs: Vec<NodeDocument> = read_documents("").unwrap();
        assert!(docs.is_empty());

        let docs: Vec<NodeDocument> = read_documents("# nothing declared yet\n").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_plain_scalars_decode_as_strings() {
        let yaml = "id: 42\nname: 2024\ntypeId: t\ndependencies: [7, true]\n";
        let docs: Vec<NodeDocument> = read_documents(yaml).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "42");
        assert_eq!(docs[0].name, "2024");
        assert_eq!(
            docs[0].dependencies,
            Some(vec!["7".to_string(), "true".to_string()])
        );

        let configs: Vec<Config> = read_documents("nodeTypes:\n  - id: 1\n    name: 2\n").unwrap();
        let types = configs[0].node_types.as_ref().unwrap();
        assert_eq!(types[0].id, "1");
        assert_eq!(types[0].name, "2");
    }

    #[test]
    fn test_merge_keys_are_applied() {
        let yaml = r#"
id: a
name: A
typeId: service
---
<<: {typeId: service}
id: 7
name: B
metadata:
  <<: {team: core}
  repo: x
"#;
        let docs: Vec<NodeDocument> = read_documents(yaml).unwrap();
        assert_eq!(docs.len(), 2);

        let merged = &docs[1];
        assert_eq!(merged.id, "7");
        assert_eq!(merged.type_id, "service");
        let metadata = merged.metadata.as_ref().unwrap();
        assert!(!metadata.contains_key("<<"));
        assert_eq!(metadata["team"], "core");
        assert_eq!(metadata["repo"], "x");
    }

    #[test]
    fn test_skips_empty_documents() {
        let yaml = "---\nid: a\nname: A\ntypeId: t\n---\n---\nid: b\nname: B\ntypeId: t\n";
        let docs: Vec<NodeDocument> = read_documents(yaml).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_non_mapping_document_fails_whole_read() {
        let yaml = "id: a\nname: A\ntypeId: t\n---\n- just\n- a list\n";
        let err = read_documents::<NodeDocument>(yaml).unwrap_err();
        match err {
            ReadError::Document { index, .. } => assert_eq!(index, 2),
            other => panic!("Expected Document error, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_fails() {
        let yaml = "id: a\nname: [unterminated\n";
        assert!(read_documents::<NodeDocument>(yaml).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_nodes("does/not/exist.yml").unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.yml"));
    }

    #[test]
    fn test_read_nodes_normalizes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id: a\nname: A\ntypeId: t\n").unwrap();

        let nodes = read_nodes(file.path()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].metadata.is_empty());
        assert!(nodes[0].dependencies.is_empty());
    }

    #[test]
    fn test_read_node_types_concatenates_documents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
nodeTypes:
  - id: service
    name: Service
  - id: job
    name: Job
---
nodeTypes:
  - id: queue
    name: Queue
---
description: no node types here
"#
        )
        .unwrap();

        let types = read_node_types(file.path()).unwrap();
        let ids: Vec<&str> = types.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["service", "job", "queue"]);
    }

    #[test]
    fn test_node_type_requires_name() {
        let yaml = "nodeTypes:\n  - id: service\n";
        assert!(read_documents::<Config>(yaml).is_err());
    }
}
