//! Tree → workbook export pipeline
//!
//! 1. Validate the node list and flatten it into rows of identifier paths
//! 2. Write header, rows and the sentinel root row into a sink
//! 3. Resolve identifier paths to label paths (drops the sentinel row)
//! 4. Autofit, append the Glossary sheet
//! 5. Encode the finished workbook through the object codec
//!
//! Every failure on the way surfaces as one [`ExportError`].

mod artifact;
mod flatten;

pub use artifact::{ExportArtifact, ExportSummary};
pub use flatten::{flatten_tree, FlatTree};

use crate::error::ExportError;
use crate::resolver::{CellRegion, PathResolver, ResolveReport, SubstitutionStrategy};
use crate::sink::{GridWorkbook, TabularSink};
use crate::types::{TreeNode, EXPORT_HEADERS, PATH_COLUMN};
use tracing::{debug, info};

/// Name of the fixed explanatory sheet.
pub const GLOSSARY_SHEET: &str = "Glossary";

/// Glossary rows, one per exported column.
pub const GLOSSARY_ENTRIES: [(&str, &str); 10] = [
    (
        "Path",
        "Labels from the top-level ancestor down to the node, separated by ' | '",
    ),
    ("Id", "Numeric node identifier"),
    ("Label", "Display label of the node"),
    (
        "Parent",
        "Label of the direct parent; empty for top-level nodes",
    ),
    ("Depth", "Number of labels in the path"),
    ("Children", "Number of direct child nodes"),
    ("Leaf", "TRUE when the node has no children"),
    ("Description", "Free-form node description"),
    ("Weight", "Numeric weight carried by the node"),
    ("Active", "TRUE when the node is flagged active"),
];

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Name of the node sheet
    pub sheet_name: String,
    /// Identifier of the synthetic root owning all top-level nodes
    pub root_id: u64,
    pub strategy: SubstitutionStrategy,
    pub include_glossary: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Nodes".to_string(),
            root_id: 0,
            strategy: SubstitutionStrategy::Segment,
            include_glossary: true,
        }
    }
}

/// Runs the export pipeline with one set of options.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Full pipeline: populate a fresh workbook and encode it.
    pub fn export(&self, nodes: &[TreeNode]) -> Result<ExportArtifact, ExportError> {
        let workbook = self.build_workbook(nodes)?;
        let artifact = ExportArtifact::encode(workbook)
            .map_err(|e| ExportError::new("encoding the workbook", e))?;
        info!(
            nodes = nodes.len(),
            blob_bytes = artifact.blob().len(),
            "export complete"
        );
        Ok(artifact)
    }

    /// Populate a fresh [`GridWorkbook`] with styled headers.
    pub fn build_workbook(&self, nodes: &[TreeNode]) -> Result<GridWorkbook, ExportError> {
        let mut workbook = GridWorkbook::new();
        self.populate(&mut workbook, nodes)?;

        for sheet in 0..workbook.sheets.len() {
            workbook
                .set_header_rows(sheet, 1)
                .map_err(|e| ExportError::new("styling headers", e))?;
        }
        Ok(workbook)
    }

    /// Write the node sheet (and glossary) into any sink.
    pub fn populate<S: TabularSink + ?Sized>(
        &self,
        sink: &mut S,
        nodes: &[TreeNode],
    ) -> Result<ResolveReport, ExportError> {
        let flat = flatten_tree(nodes, self.options.root_id)?;

        let sheet = sink
            .add_sheet(&self.options.sheet_name)
            .map_err(|e| ExportError::new("creating the node sheet", e))?;
        write_rows(sink, sheet, &flat).map_err(|e| ExportError::new("writing rows", e))?;

        let region = CellRegion::column_from(self.options.sheet_name.as_str(), PATH_COLUMN, 1);
        let report = PathResolver::with_strategy(&flat.labels, self.options.strategy)
            .resolve(sink, &region)
            .map_err(|e| ExportError::new("resolving identifier paths", e))?;

        sink.autofit_columns(sheet)
            .map_err(|e| ExportError::new("sizing columns", e))?;

        if self.options.include_glossary {
            write_glossary(sink).map_err(|e| ExportError::new("adding the glossary", e))?;
        }

        debug!(
            sheet = %self.options.sheet_name,
            rows = flat.rows.len(),
            cells = report.cells_rewritten,
            "populated sink"
        );
        Ok(report)
    }
}

/// Header at row 0, node rows from row 1, sentinel root row last.
fn write_rows<S: TabularSink + ?Sized>(
    sink: &mut S,
    sheet: usize,
    flat: &FlatTree,
) -> crate::error::SinkResult<()> {
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        sink.set_cell(sheet, 0, col, header)?;
    }

    let rows = flat.rows.iter().chain(std::iter::once(&flat.sentinel));
    for (offset, row) in rows.enumerate() {
        for (col, text) in row.cells().iter().enumerate() {
            sink.set_cell(sheet, offset + 1, col, text)?;
        }
    }

    Ok(())
}

fn write_glossary<S: TabularSink + ?Sized>(sink: &mut S) -> crate::error::SinkResult<()> {
    let sheet = sink.add_sheet(GLOSSARY_SHEET)?;
    sink.set_cell(sheet, 0, 0, "Term")?;
    sink.set_cell(sheet, 0, 1, "Definition")?;
    for (idx, (term, definition)) in GLOSSARY_ENTRIES.iter().enumerate() {
        sink.set_cell(sheet, idx + 1, 0, term)?;
        sink.set_cell(sheet, idx + 1, 1, definition)?;
    }
    sink.autofit_columns(sheet)
}
