//! Excel renderer - GridWorkbook → .xlsx

use crate::error::{TreesheetError, TreesheetResult};
use crate::sink::{GridSheet, GridWorkbook};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

/// Standard blue used for header fills.
pub const STANDARD_BLUE: u32 = 0x002D80;

/// Look of header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStyle {
    /// Fill colour as 0xRRGGBB
    pub fill: u32,
    /// Font colour as 0xRRGGBB
    pub font: u32,
    pub bold: bool,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            fill: STANDARD_BLUE,
            font: 0xFFFFFF,
            bold: true,
        }
    }
}

/// Writes a [`GridWorkbook`] out as an Excel workbook.
#[derive(Debug, Clone, Default)]
pub struct XlsxRenderer {
    header_style: HeaderStyle,
}

impl XlsxRenderer {
    pub fn new(header_style: HeaderStyle) -> Self {
        Self { header_style }
    }

    /// Render to an in-memory .xlsx file.
    pub fn render(&self, grid: &GridWorkbook) -> TreesheetResult<Vec<u8>> {
        let mut workbook = self.build(grid)?;
        workbook
            .save_to_buffer()
            .map_err(|e| TreesheetError::Xlsx(format!("Failed to save Excel buffer: {}", e)))
    }

    /// Render straight to a file on disk.
    pub fn save(&self, grid: &GridWorkbook, output_path: &Path) -> TreesheetResult<()> {
        let mut workbook = self.build(grid)?;
        workbook
            .save(output_path)
            .map_err(|e| TreesheetError::Xlsx(format!("Failed to save Excel file: {}", e)))?;
        debug!(path = %output_path.display(), "saved workbook");
        Ok(())
    }

    fn build(&self, grid: &GridWorkbook) -> TreesheetResult<Workbook> {
        let mut workbook = Workbook::new();
        let header_format = self.header_format();

        for sheet in &grid.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name).map_err(|e| {
                TreesheetError::Xlsx(format!("Failed to set worksheet name: {}", e))
            })?;
            Self::write_sheet(worksheet, sheet, &header_format)?;
        }

        Ok(workbook)
    }

    fn header_format(&self) -> Format {
        let style = self.header_style;
        let mut format = Format::new()
            .set_background_color(Color::RGB(style.fill))
            .set_pattern(FormatPattern::Solid)
            .set_font_color(Color::RGB(style.font));
        if style.bold {
            format = format.set_bold();
        }
        format
    }

    /// Write one sheet; empty cells stay blank.
    fn write_sheet(
        worksheet: &mut Worksheet,
        sheet: &GridSheet,
        header_format: &Format,
    ) -> TreesheetResult<()> {
        for (row_idx, cells) in sheet.rows.iter().enumerate() {
            let row = u32::try_from(row_idx).map_err(|_| {
                TreesheetError::Xlsx(format!("Row {} exceeds the Excel row limit", row_idx))
            })?;
            let is_header = row_idx < sheet.header_rows;

            for (col_idx, text) in cells.iter().enumerate() {
                let col = u16::try_from(col_idx).map_err(|_| {
                    TreesheetError::Xlsx(format!("Column {} exceeds the Excel column limit", col_idx))
                })?;

                let written = match (is_header, text.is_empty()) {
                    (true, _) => worksheet.write_string_with_format(row, col, text, header_format),
                    (false, false) => worksheet.write_string(row, col, text),
                    (false, true) => continue,
                };
                written.map_err(|e| {
                    TreesheetError::Xlsx(format!("Failed to write cell ({}, {}): {}", row, col, e))
                })?;
            }
        }

        if sheet.autofit {
            worksheet.autofit();
        }
        Ok(())
    }
}
