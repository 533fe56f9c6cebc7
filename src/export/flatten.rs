//! Node list → label map + rows of identifier paths

use crate::error::ExportError;
use crate::resolver::{IdentifierLabelMap, PATH_DELIMITER, VIRTUAL_ROOT_LABEL};
use crate::types::{ExportRow, TreeNode};
use std::collections::HashMap;

/// Flattened tree ready to be written into a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTree {
    /// Every node in discovery order, the virtual root last
    pub labels: IdentifierLabelMap,
    /// One row per node, in discovery order
    pub rows: Vec<ExportRow>,
    /// Row of the virtual root
    pub sentinel: ExportRow,
}

/// Validate `nodes` and flatten them under a virtual root with id `root_id`.
///
/// Nodes whose parent is `None` or `root_id` are top-level. Duplicate ids,
/// unknown parents, cycles and nodes reusing `root_id` are rejected.
pub fn flatten_tree(nodes: &[TreeNode], root_id: u64) -> Result<FlatTree, ExportError> {
    let mut index: HashMap<u64, usize> = HashMap::with_capacity(nodes.len());
    for (pos, node) in nodes.iter().enumerate() {
        if node.id == root_id {
            return Err(ExportError::invalid_tree(format!(
                "node '{}' uses the virtual root id {}",
                node.label, root_id
            )));
        }
        if index.insert(node.id, pos).is_some() {
            return Err(ExportError::invalid_tree(format!(
                "duplicate node id {}",
                node.id
            )));
        }
    }

    let parent_of = |node: &TreeNode| node.parent.filter(|p| *p != root_id);

    let mut children: HashMap<u64, u32> = HashMap::new();
    for node in nodes {
        let key = parent_of(node).unwrap_or(root_id);
        if key != root_id && !index.contains_key(&key) {
            return Err(ExportError::invalid_tree(format!(
                "node {} references unknown parent {}",
                node.id, key
            )));
        }
        *children.entry(key).or_default() += 1;
    }

    let mut rows = Vec::with_capacity(nodes.len());
    for node in nodes {
        // Walk up to the top-level ancestor; a chain longer than the node
        // count can only come from a cycle.
        let mut chain = vec![node.id];
        let mut current = node;
        while let Some(parent) = parent_of(current) {
            if chain.len() > nodes.len() {
                return Err(ExportError::invalid_tree(format!(
                    "cycle detected through node {}",
                    node.id
                )));
            }
            chain.push(parent);
            current = &nodes[index[&parent]];
        }
        chain.reverse();

        let child_count = children.get(&node.id).copied().unwrap_or(0);
        let parent_label = parent_of(node)
            .map(|p| nodes[index[&p]].label.clone())
            .unwrap_or_default();

        rows.push(ExportRow {
            path: join_path(&chain),
            id: node.id,
            label: node.label.clone(),
            parent: parent_label,
            depth: chain.len() as u32,
            children: child_count,
            leaf: child_count == 0,
            description: node.description.clone(),
            weight: node.weight,
            active: node.active,
        });
    }

    let top_level = children.get(&root_id).copied().unwrap_or(0);
    let sentinel = ExportRow {
        path: root_id.to_string(),
        id: root_id,
        label: VIRTUAL_ROOT_LABEL.to_string(),
        children: top_level,
        leaf: top_level == 0,
        ..Default::default()
    };

    let mut labels: IdentifierLabelMap = nodes.iter().map(|n| (n.id, n.label.as_str())).collect();
    labels.insert(root_id, VIRTUAL_ROOT_LABEL);

    Ok(FlatTree {
        labels,
        rows,
        sentinel,
    })
}

fn join_path(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(&PATH_DELIMITER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportCause;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flatten_paths_and_counts() {
        let nodes = vec![
            TreeNode::new(3, "Root", None),
            TreeNode::new(12, "Child", Some(3)),
            TreeNode::new(7, "Leaf", Some(12)),
            TreeNode::new(8, "Sibling", Some(0)),
        ];
        let flat = flatten_tree(&nodes, 0).unwrap();

        let paths: Vec<&str> = flat.rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["3", "3/12", "3/12/7", "8"]);
        assert_eq!(flat.rows[1].parent, "Root");
        assert_eq!(flat.rows[0].parent, "");
        assert_eq!(flat.rows[0].children, 1);
        assert!(flat.rows[2].leaf);
        assert_eq!(flat.rows[2].depth, 3);

        assert_eq!(flat.sentinel.label, VIRTUAL_ROOT_LABEL);
        assert_eq!(flat.sentinel.children, 2);
        assert_eq!(flat.labels.len(), 5);
        let order: Vec<u64> = flat.labels.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![3, 12, 7, 8, 0]);
    }

    #[test]
    fn test_flatten_labels_cover_rows_and_root() {
        let trees = [
            vec![],
            vec![TreeNode::new(1, "Only", None)],
            vec![
                TreeNode::new(1, "a", None),
                TreeNode::new(2, "b", Some(1)),
                TreeNode::new(3, "c", Some(2)),
            ],
        ];
        for nodes in &trees {
            let flat = flatten_tree(nodes, 0).unwrap();
            assert_eq!(flat.labels.len(), flat.rows.len() + 1);
            assert_eq!(flat.labels.get(0), Some(VIRTUAL_ROOT_LABEL));
        }
    }

    #[test]
    fn test_flatten_keeps_defaults() {
        let flat = flatten_tree(&[TreeNode::new(1, "Only", None)], 0).unwrap();
        assert_eq!(flat.rows[0].description, "");
        assert_eq!(flat.rows[0].weight, 0);
        assert!(!flat.rows[0].active);
    }

    #[test]
    fn test_flatten_rejects_duplicates() {
        let nodes = vec![TreeNode::new(1, "a", None), TreeNode::new(1, "b", None)];
        let err = flatten_tree(&nodes, 0).unwrap_err();
        assert!(matches!(err.cause, ExportCause::InvalidTree(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn test_flatten_rejects_unknown_parent() {
        let nodes = vec![TreeNode::new(1, "a", Some(99))];
        assert!(flatten_tree(&nodes, 0).is_err());
    }

    #[test]
    fn test_flatten_rejects_root_id() {
        let nodes = vec![TreeNode::new(5, "a", None)];
        assert!(flatten_tree(&nodes, 5).is_err());
        assert!(flatten_tree(&nodes, 0).is_ok());
    }

    #[test]
    fn test_flatten_rejects_cycles() {
        let nodes = vec![
            TreeNode::new(1, "a", Some(2)),
            TreeNode::new(2, "b", Some(1)),
        ];
        let err = flatten_tree(&nodes, 0).unwrap_err();
        assert!(matches!(err.cause, ExportCause::InvalidTree(ref m) if m.contains("cycle")));

        let self_loop = vec![TreeNode::new(4, "self", Some(4))];
        assert!(flatten_tree(&self_loop, 0).is_err());
    }
}
