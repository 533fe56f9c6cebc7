//! Excel loader - .xlsx → GridWorkbook

use crate::error::{TreesheetError, TreesheetResult};
use crate::sink::{GridSheet, GridWorkbook};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Reads Excel workbooks back into a [`GridWorkbook`].
#[derive(Debug, Clone)]
pub struct XlsxLoader {
    header_rows: usize,
}

impl Default for XlsxLoader {
    fn default() -> Self {
        Self { header_rows: 1 }
    }
}

impl XlsxLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leading rows per sheet to mark as header rows.
    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    pub fn load_path(&self, path: &Path) -> TreesheetResult<GridWorkbook> {
        let bytes = std::fs::read(path)?;
        self.load(&bytes)
    }

    /// Load every worksheet of an in-memory .xlsx file.
    pub fn load(&self, bytes: &[u8]) -> TreesheetResult<GridWorkbook> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
            .map_err(|e| TreesheetError::Xlsx(format!("Failed to open Excel data: {}", e)))?;

        let mut grid = GridWorkbook::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                TreesheetError::Xlsx(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            grid.sheets.push(self.read_sheet(&sheet_name, &range));
        }

        debug!(sheets = grid.sheets.len(), "loaded workbook");
        Ok(grid)
    }

    fn read_sheet(&self, name: &str, range: &Range<Data>) -> GridSheet {
        let mut sheet = GridSheet::new(name);
        let Some((start_row, start_col)) = range.start() else {
            return sheet;
        };

        // Ranges start at the first used cell; pad back to A1.
        let lead_rows = start_row as usize;
        let lead_cols = start_col as usize;
        sheet.rows.resize_with(lead_rows, Vec::new);

        for cells in range.rows() {
            let mut row = vec![String::new(); lead_cols];
            row.extend(cells.iter().map(cell_text));
            while row.last().is_some_and(String::is_empty) {
                row.pop();
            }
            sheet.rows.push(row);
        }

        while sheet.rows.last().is_some_and(Vec::is_empty) {
            sheet.rows.pop();
        }
        sheet.header_rows = self.header_rows.min(sheet.rows.len());
        sheet
    }
}

/// Text form of a cell as the sink stores it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{}", e),
    }
}
