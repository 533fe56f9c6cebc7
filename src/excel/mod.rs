//! Excel adapters for the in-memory workbook
//!
//! - Render: GridWorkbook → Excel (.xlsx), header rows styled
//! - Load: Excel (.xlsx) → GridWorkbook, every cell as text

mod exporter;
mod importer;

pub use exporter::{HeaderStyle, XlsxRenderer, STANDARD_BLUE};
pub use importer::XlsxLoader;
