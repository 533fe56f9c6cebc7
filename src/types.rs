use serde::{Deserialize, Serialize};

//==============================================================================
// Input Model
//==============================================================================

/// One node of the source tree, as read from a node file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: u64,
    pub label: String,
    /// `None` (or the virtual root id) for top-level nodes
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub active: bool,
}

impl TreeNode {
    pub fn new(id: u64, label: impl Into<String>, parent: Option<u64>) -> Self {
        Self {
            id,
            label: label.into(),
            parent,
            description: String::new(),
            weight: 0,
            active: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Top-level layout of a node file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFile {
    pub nodes: Vec<TreeNode>,
}

//==============================================================================
// Export Model
//==============================================================================

/// Column headers of the exported node sheet, in column order.
pub const EXPORT_HEADERS: [&str; 10] = [
    "Path",
    "Id",
    "Label",
    "Parent",
    "Depth",
    "Children",
    "Leaf",
    "Description",
    "Weight",
    "Active",
];

/// Column holding the identifier path.
pub const PATH_COLUMN: usize = 0;

/// One flattened tree node. `path` holds identifiers until resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub path: String,
    pub id: u64,
    pub label: String,
    pub parent: String,
    pub depth: u32,
    pub children: u32,
    pub leaf: bool,
    pub description: String,
    pub weight: i64,
    pub active: bool,
}

impl ExportRow {
    /// Cell texts in [`EXPORT_HEADERS`] order.
    pub fn cells(&self) -> [String; 10] {
        [
            self.path.clone(),
            self.id.to_string(),
            self.label.clone(),
            self.parent.clone(),
            self.depth.to_string(),
            self.children.to_string(),
            bool_text(self.leaf).to_string(),
            self.description.clone(),
            self.weight.to_string(),
            bool_text(self.active).to_string(),
        ]
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}
