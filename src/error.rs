use thiserror::Error;

pub type TreesheetResult<T> = Result<T, TreesheetError>;
pub type CodecResult<T> = Result<T, CodecError>;
pub type SinkResult<T> = Result<T, SinkError>;
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Crate-level error returned by the CLI and the file-facing helpers.
#[derive(Error, Debug)]
pub enum TreesheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Excel error: {0}")]
    Xlsx(String),
}

/// Failures of the object codec, one variant per pipeline stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Violations reported by a tabular sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    #[error("Sheet index {index} out of range ({count} sheets)")]
    SheetOutOfRange { index: usize, count: usize },

    #[error("Row {row} out of range on sheet '{sheet}' ({rows} rows)")]
    RowOutOfRange {
        sheet: String,
        row: usize,
        rows: usize,
    },

    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    #[error("Duplicate sheet name: {0}")]
    DuplicateSheetName(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Path resolution failed: {0}")]
    PathResolution(#[from] SinkError),
}

/// Root cause carried by an [`ExportError`].
#[derive(Error, Debug)]
pub enum ExportCause {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),
}

/// Single failure surface of the export pipeline.
#[derive(Error, Debug)]
#[error("Export failed while {context}")]
pub struct ExportError {
    pub context: String,
    #[source]
    pub cause: ExportCause,
}

impl ExportError {
    pub fn new(context: impl Into<String>, cause: impl Into<ExportCause>) -> Self {
        Self {
            context: context.into(),
            cause: cause.into(),
        }
    }

    pub fn invalid_tree(message: impl Into<String>) -> Self {
        Self::new("validating nodes", ExportCause::InvalidTree(message.into()))
    }
}
