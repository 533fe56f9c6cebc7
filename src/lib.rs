//! Treesheet - tree export codec and path resolution engine
//!
//! Flattens a tree of labelled nodes into a workbook, rewrites identifier
//! paths (`3/12/7`) into readable label paths (`Root | Child | Leaf`), and
//! packs the finished workbook through a compact binary/text codec.
//!
//! # Features
//!
//! - CBOR → raw deflate → base64 object codec with SHA-256 content hashing
//! - Collision-free identifier substitution (segment or longest-first)
//! - In-memory workbook sink with Excel render/load adapters
//!
//! # Example
//!
//! ```no_run
//! use treesheet::export::Exporter;
//! use treesheet::parser::parse_nodes;
//! use std::path::Path;
//!
//! let nodes = parse_nodes(Path::new("nodes.yaml"))?;
//! let artifact = Exporter::default().export(&nodes)?;
//!
//! println!("Hash: {}", artifact.content_hash());
//! std::fs::write("nodes.xlsx", artifact.render_xlsx()?)?;
//! # Ok::<(), treesheet::error::TreesheetError>(())
//! ```

pub mod cli;
pub mod codec;
pub mod error;
pub mod excel;
pub mod export;
pub mod parser;
pub mod resolver;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use error::{TreesheetError, TreesheetResult};
pub use export::{ExportArtifact, ExportOptions, Exporter};
pub use resolver::{IdentifierLabelMap, PathResolver, SubstitutionStrategy};
pub use sink::{GridWorkbook, TabularSink};
pub use types::TreeNode;
