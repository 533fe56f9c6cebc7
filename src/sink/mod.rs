//! Tabular sink capability and its in-memory implementation
//!
//! The resolver and the export pipeline only talk to [`TabularSink`].
//! [`GridWorkbook`] keeps every sheet as a dense grid of text cells so the
//! finished workbook can be handed to the object codec as-is, rendered to
//! `.xlsx` by [`crate::excel::XlsxRenderer`], or rebuilt from `.xlsx` by
//! [`crate::excel::XlsxLoader`].

use crate::error::{SinkError, SinkResult};
use serde::{Deserialize, Serialize};

/// Excel sheet name maximum length.
pub const MAX_SHEET_NAME_LEN: usize = 31;
/// Characters Excel refuses in sheet names.
pub const ILLEGAL_SHEET_NAME_CHARS: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];

/// Grid-of-cells capability the export core writes through.
pub trait TabularSink {
    /// Position of the sheet called `name`.
    fn sheet_index(&self, name: &str) -> Option<usize>;

    /// Append a sheet and return its index.
    fn add_sheet(&mut self, name: &str) -> SinkResult<usize>;

    /// Insert a sheet before `index` (or append when `index` is the sheet count).
    fn insert_sheet(&mut self, index: usize, name: &str) -> SinkResult<usize>;

    fn set_cell(&mut self, sheet: usize, row: usize, col: usize, text: &str) -> SinkResult<()>;

    /// Cell text, or `None` when the cell lies outside the populated grid.
    fn cell(&self, sheet: usize, row: usize, col: usize) -> SinkResult<Option<&str>>;

    /// Remove a row, shifting every later row up by one.
    fn delete_row(&mut self, sheet: usize, row: usize) -> SinkResult<()>;

    fn autofit_columns(&mut self, sheet: usize) -> SinkResult<()>;

    fn row_count(&self, sheet: usize) -> SinkResult<usize>;

    fn column_count(&self, sheet: usize) -> SinkResult<usize>;
}

/// One named sheet of text cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
    /// Leading rows rendered with the header style
    pub header_rows: usize,
    pub autofit: bool,
}

impl GridSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }
}

/// In-memory workbook; the canonical sink of the export pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridWorkbook {
    pub sheets: Vec<GridSheet>,
}

impl GridWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workbook with a single, empty sheet.
    pub fn with_sheet(name: &str) -> SinkResult<Self> {
        let mut workbook = Self::new();
        workbook.add_sheet(name)?;
        Ok(workbook)
    }

    pub fn sheet(&self, index: usize) -> SinkResult<&GridSheet> {
        let count = self.sheets.len();
        self.sheets
            .get(index)
            .ok_or(SinkError::SheetOutOfRange { index, count })
    }

    pub fn sheet_mut(&mut self, index: usize) -> SinkResult<&mut GridSheet> {
        let count = self.sheets.len();
        self.sheets
            .get_mut(index)
            .ok_or(SinkError::SheetOutOfRange { index, count })
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&GridSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Mark the first `rows` rows of a sheet as header rows.
    pub fn set_header_rows(&mut self, sheet: usize, rows: usize) -> SinkResult<()> {
        self.sheet_mut(sheet)?.header_rows = rows;
        Ok(())
    }

    /// Write `values` left to right starting at (`row`, `col`).
    pub fn write_row<S: AsRef<str>>(
        &mut self,
        sheet: usize,
        row: usize,
        col: usize,
        values: &[S],
    ) -> SinkResult<()> {
        for (offset, value) in values.iter().enumerate() {
            self.set_cell(sheet, row, col + offset, value.as_ref())?;
        }
        Ok(())
    }

    fn check_new_name(&self, name: &str) -> SinkResult<()> {
        validate_sheet_name(name)?;
        if self.sheets.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(SinkError::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}

/// Check a sheet name against Excel's naming rules.
pub fn validate_sheet_name(name: &str) -> SinkResult<()> {
    let invalid = |reason: &str| SinkError::InvalidSheetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid("name is longer than 31 characters"));
    }
    if let Some(c) = name.chars().find(|c| ILLEGAL_SHEET_NAME_CHARS.contains(c)) {
        return Err(invalid(&format!("character '{}' is not allowed", c)));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(invalid("name cannot start or end with an apostrophe"));
    }
    Ok(())
}

impl TabularSink for GridWorkbook {
    fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    fn add_sheet(&mut self, name: &str) -> SinkResult<usize> {
        self.insert_sheet(self.sheets.len(), name)
    }

    fn insert_sheet(&mut self, index: usize, name: &str) -> SinkResult<usize> {
        let count = self.sheets.len();
        if index > count {
            return Err(SinkError::SheetOutOfRange { index, count });
        }
        self.check_new_name(name)?;
        self.sheets.insert(index, GridSheet::new(name));
        Ok(index)
    }

    fn set_cell(&mut self, sheet: usize, row: usize, col: usize, text: &str) -> SinkResult<()> {
        let grid = self.sheet_mut(sheet)?;
        if grid.rows.len() <= row {
            grid.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut grid.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, String::new);
        }
        cells[col] = text.to_string();
        Ok(())
    }

    fn cell(&self, sheet: usize, row: usize, col: usize) -> SinkResult<Option<&str>> {
        Ok(self
            .sheet(sheet)?
            .rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str))
    }

    fn delete_row(&mut self, sheet: usize, row: usize) -> SinkResult<()> {
        let grid = self.sheet_mut(sheet)?;
        if row >= grid.rows.len() {
            return Err(SinkError::RowOutOfRange {
                sheet: grid.name.clone(),
                row,
                rows: grid.rows.len(),
            });
        }
        grid.rows.remove(row);
        if row < grid.header_rows {
            grid.header_rows -= 1;
        }
        Ok(())
    }

    fn autofit_columns(&mut self, sheet: usize) -> SinkResult<()> {
        self.sheet_mut(sheet)?.autofit = true;
        Ok(())
    }

    fn row_count(&self, sheet: usize) -> SinkResult<usize> {
        Ok(self.sheet(sheet)?.rows.len())
    }

    fn column_count(&self, sheet: usize) -> SinkResult<usize> {
        Ok(self.sheet(sheet)?.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cell_grows_grid() {
        let mut wb = GridWorkbook::with_sheet("Nodes").unwrap();
        wb.set_cell(0, 2, 3, "x").unwrap();
        assert_eq!(wb.row_count(0).unwrap(), 3);
        assert_eq!(wb.column_count(0).unwrap(), 4);
        assert_eq!(wb.cell(0, 2, 3).unwrap(), Some("x"));
        assert_eq!(wb.cell(0, 2, 0).unwrap(), Some(""));
        assert_eq!(wb.cell(0, 0, 0).unwrap(), None);
        assert_eq!(wb.cell(0, 9, 9).unwrap(), None);
    }

    #[test]
    fn test_delete_row_shifts_up() {
        let mut wb = GridWorkbook::with_sheet("Nodes").unwrap();
        for (row, text) in ["a", "b", "c"].iter().enumerate() {
            wb.set_cell(0, row, 0, text).unwrap();
        }
        wb.delete_row(0, 1).unwrap();
        assert_eq!(wb.row_count(0).unwrap(), 2);
        assert_eq!(wb.cell(0, 1, 0).unwrap(), Some("c"));
    }

    #[test]
    fn test_delete_row_out_of_range() {
        let mut wb = GridWorkbook::with_sheet("Nodes").unwrap();
        let err = wb.delete_row(0, 0).unwrap_err();
        assert!(matches!(err, SinkError::RowOutOfRange { row: 0, rows: 0, .. }));
    }

    #[test]
    fn test_delete_header_row_adjusts_header_count() {
        let mut wb = GridWorkbook::with_sheet("Nodes").unwrap();
        wb.write_row(0, 0, 0, &["Path", "Id"]).unwrap();
        wb.write_row(0, 1, 0, &["1", "1"]).unwrap();
        wb.set_header_rows(0, 1).unwrap();
        wb.delete_row(0, 0).unwrap();
        assert_eq!(wb.sheet(0).unwrap().header_rows, 0);
    }

    #[test]
    fn test_unknown_sheet_index() {
        let wb = GridWorkbook::new();
        assert_eq!(
            wb.row_count(0).unwrap_err(),
            SinkError::SheetOutOfRange { index: 0, count: 0 }
        );
    }

    #[test]
    fn test_insert_sheet_positions() {
        let mut wb = GridWorkbook::new();
        wb.add_sheet("Nodes").unwrap();
        wb.insert_sheet(0, "Cover").unwrap();
        assert_eq!(wb.sheet_names(), vec!["Cover", "Nodes"]);
        assert_eq!(wb.sheet_index("Nodes"), Some(1));
        assert!(wb.insert_sheet(5, "Late").is_err());
    }

    #[test]
    fn test_sheet_name_rules() {
        let mut wb = GridWorkbook::new();
        assert!(wb.add_sheet("Glossary").is_ok());
        assert!(matches!(
            wb.add_sheet("glossary").unwrap_err(),
            SinkError::DuplicateSheetName(_)
        ));
        assert!(wb.add_sheet("a/b").is_err());
        assert!(wb.add_sheet("").is_err());
        assert!(wb.add_sheet(&"x".repeat(32)).is_err());
        assert!(wb.add_sheet(&"x".repeat(31)).is_ok());
    }

    #[test]
    fn test_autofit_flag() {
        let mut wb = GridWorkbook::with_sheet("Nodes").unwrap();
        assert!(!wb.sheet(0).unwrap().autofit);
        wb.autofit_columns(0).unwrap();
        assert!(wb.sheet(0).unwrap().autofit);
    }
}
