use crate::codec;
use crate::error::{CodecResult, TreesheetResult};
use crate::excel::XlsxRenderer;
use crate::sink::GridWorkbook;
use serde::Serialize;

/// A finished workbook together with its compressed blob.
///
/// The blob is always the codec encoding of the held workbook; both are
/// produced together and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    workbook: GridWorkbook,
    blob: Vec<u8>,
}

/// Short description of an artifact, printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub sheets: Vec<String>,
    /// Data rows per sheet, header rows excluded
    pub rows: Vec<usize>,
    pub blob_bytes: usize,
    pub content_hash: String,
}

impl ExportArtifact {
    pub fn encode(workbook: GridWorkbook) -> CodecResult<Self> {
        let blob = codec::compress_object(&workbook)?;
        Ok(Self { workbook, blob })
    }

    /// Reopen an artifact from a blob produced by [`ExportArtifact::encode`].
    pub fn from_blob(blob: Vec<u8>) -> CodecResult<Self> {
        let workbook = codec::decompress_object(&blob)?;
        Ok(Self { workbook, blob })
    }

    pub fn from_text(text: &str) -> CodecResult<Self> {
        Self::from_blob(codec::text_decode(text)?)
    }

    pub fn workbook(&self) -> &GridWorkbook {
        &self.workbook
    }

    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    pub fn into_workbook(self) -> GridWorkbook {
        self.workbook
    }

    /// Base64 transport form of the blob.
    pub fn to_text(&self) -> String {
        codec::text_encode(&self.blob)
    }

    /// SHA-256 of the transport text, lowercase hex.
    pub fn content_hash(&self) -> String {
        codec::hash(&self.to_text())
    }

    pub fn render_xlsx(&self) -> TreesheetResult<Vec<u8>> {
        XlsxRenderer::default().render(&self.workbook)
    }

    pub fn summary(&self) -> ExportSummary {
        let sheets = &self.workbook.sheets;
        ExportSummary {
            sheets: sheets.iter().map(|s| s.name.clone()).collect(),
            rows: sheets
                .iter()
                .map(|s| s.rows.len().saturating_sub(s.header_rows))
                .collect(),
            blob_bytes: self.blob.len(),
            content_hash: self.content_hash(),
        }
    }
}
