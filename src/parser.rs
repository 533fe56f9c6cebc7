use crate::error::{TreesheetError, TreesheetResult};
use crate::types::{NodeFile, TreeNode};
use serde_yaml::Value;
use std::path::Path;

/// Parse a node file from disk.
pub fn parse_nodes(path: &Path) -> TreesheetResult<Vec<TreeNode>> {
    let content = std::fs::read_to_string(path)?;
    parse_nodes_str(&content).map_err(|e| match e {
        TreesheetError::Parse(msg) => {
            TreesheetError::Parse(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Parse node YAML: either a `nodes:` section or a bare sequence of nodes.
pub fn parse_nodes_str(content: &str) -> TreesheetResult<Vec<TreeNode>> {
    let yaml: Value = serde_yaml::from_str(content)?;

    if yaml.is_null() {
        return Ok(Vec::new());
    }
    if yaml.is_sequence() {
        return Ok(serde_yaml::from_value(yaml)?);
    }
    if yaml.get("nodes").is_some() {
        let file: NodeFile = serde_yaml::from_value(yaml)?;
        return Ok(file.nodes);
    }

    if yaml.is_mapping() {
        Err(TreesheetError::Parse("missing 'nodes' section".to_string()))
    } else {
        Err(TreesheetError::Parse(
            "expected a 'nodes' section or a list of nodes".to_string(),
        ))
    }
}
