//! Identifier path → label path rewriting
//!
//! Cells in the resolved region hold `/`-delimited node identifiers such as
//! `3/12/7`. Each identifier is replaced by its label, delimiters become
//! ` | `, and stray separators at either end are trimmed away. Once the
//! region is done, the sentinel root row (row index == map size) is removed.

mod label_map;

pub use label_map::IdentifierLabelMap;

use crate::error::{ResolveResult, SinkError};
use crate::sink::TabularSink;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Delimiter between identifiers in an unresolved path.
pub const PATH_DELIMITER: char = '/';
/// Separator between labels in a resolved path.
pub const DISPLAY_SEPARATOR: &str = " | ";
/// Label of the synthetic root that owns every top-level node.
pub const VIRTUAL_ROOT_LABEL: &str = "VIRTUALROOTNODE";

/// How identifiers inside a cell are matched against the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubstitutionStrategy {
    /// Split on `/` and replace whole segments only.
    #[default]
    Segment,
    /// Literal substring replacement, longest identifier first
    /// (ties: larger number first). Substituted labels are not re-scanned.
    LongestFirst,
}

impl fmt::Display for SubstitutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionStrategy::Segment => write!(f, "segment"),
            SubstitutionStrategy::LongestFirst => write!(f, "longest-first"),
        }
    }
}

impl FromStr for SubstitutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "segment" => Ok(SubstitutionStrategy::Segment),
            "longest-first" | "longest_first" | "longest" => {
                Ok(SubstitutionStrategy::LongestFirst)
            }
            other => Err(format!(
                "Unknown substitution strategy '{}' (expected 'segment' or 'longest-first')",
                other
            )),
        }
    }
}

/// Rectangular block of cells on one sheet, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRegion {
    pub sheet: String,
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl CellRegion {
    pub fn new(
        sheet: impl Into<String>,
        (first_row, first_col): (usize, usize),
        (last_row, last_col): (usize, usize),
    ) -> Self {
        Self {
            sheet: sheet.into(),
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    /// A single column from `first_row` down to the end of the sheet.
    pub fn column_from(sheet: impl Into<String>, col: usize, first_row: usize) -> Self {
        Self::new(sheet, (first_row, col), (usize::MAX, col))
    }
}

/// Outcome of a [`PathResolver::resolve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveReport {
    pub cells_rewritten: usize,
    pub sentinel_removed: bool,
}

/// Rewrites identifier paths using one [`IdentifierLabelMap`].
pub struct PathResolver<'a> {
    map: &'a IdentifierLabelMap,
    strategy: SubstitutionStrategy,
    /// (identifier text, label), longest identifier first
    ordered_keys: Vec<(String, &'a str)>,
}

impl<'a> PathResolver<'a> {
    pub fn new(map: &'a IdentifierLabelMap) -> Self {
        Self::with_strategy(map, SubstitutionStrategy::default())
    }

    pub fn with_strategy(map: &'a IdentifierLabelMap, strategy: SubstitutionStrategy) -> Self {
        let ordered_keys = match strategy {
            SubstitutionStrategy::Segment => Vec::new(),
            SubstitutionStrategy::LongestFirst => {
                let mut keys: Vec<(u64, &'a str)> = map.iter().collect();
                keys.sort_by(|(a, _), (b, _)| {
                    let (a_len, b_len) = (a.to_string().len(), b.to_string().len());
                    b_len.cmp(&a_len).then(b.cmp(a))
                });
                keys.into_iter()
                    .map(|(id, label)| (id.to_string(), label))
                    .collect()
            }
        };

        Self {
            map,
            strategy,
            ordered_keys,
        }
    }

    pub fn strategy(&self) -> SubstitutionStrategy {
        self.strategy
    }

    /// Resolve the text of a single cell.
    pub fn resolve_text(&self, text: &str) -> String {
        let substituted = match self.strategy {
            SubstitutionStrategy::Segment => self.substitute_segments(text),
            SubstitutionStrategy::LongestFirst => self.substitute_longest_first(text),
        };
        normalize_separators(&substituted)
    }

    fn substitute_segments(&self, text: &str) -> String {
        text.split(PATH_DELIMITER)
            .map(|segment| {
                // Only the canonical decimal form names an id: no sign, no
                // leading zeros.
                let trimmed = segment.trim();
                trimmed
                    .parse::<u64>()
                    .ok()
                    .filter(|id| id.to_string() == trimmed)
                    .and_then(|id| self.map.get(id))
                    .unwrap_or(segment)
            })
            .collect::<Vec<_>>()
            .join(DISPLAY_SEPARATOR)
    }

    fn substitute_longest_first(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        let mut rest = text;

        'scan: while let Some(c) = rest.chars().next() {
            for (key, label) in &self.ordered_keys {
                if let Some(tail) = rest.strip_prefix(key.as_str()) {
                    out.push_str(label);
                    rest = tail;
                    continue 'scan;
                }
            }
            if c == PATH_DELIMITER {
                out.push_str(DISPLAY_SEPARATOR);
            } else {
                out.push(c);
            }
            rest = &rest[c.len_utf8()..];
        }

        out
    }

    /// Rewrite every cell of `region`, then drop the sentinel root row.
    ///
    /// The sink may be left partially rewritten when an error is returned.
    pub fn resolve<S: TabularSink + ?Sized>(
        &self,
        sink: &mut S,
        region: &CellRegion,
    ) -> ResolveResult<ResolveReport> {
        let sheet = sink
            .sheet_index(&region.sheet)
            .ok_or_else(|| SinkError::UnknownSheet(region.sheet.clone()))?;

        let rows = sink.row_count(sheet)?;
        let cols = sink.column_count(sheet)?;
        let mut report = ResolveReport::default();

        if rows > 0 && cols > 0 && region.first_row < rows && region.first_col < cols {
            let last_row = region.last_row.min(rows - 1);
            let last_col = region.last_col.min(cols - 1);

            for row in region.first_row..=last_row {
                for col in region.first_col..=last_col {
                    let original = sink.cell(sheet, row, col)?.unwrap_or_default();
                    let resolved = self.resolve_text(original);
                    trace!(row, col, %resolved, "resolved path cell");
                    sink.set_cell(sheet, row, col, &resolved)?;
                    report.cells_rewritten += 1;
                }
            }
        }

        let sentinel = self.map.len();
        if sentinel < sink.row_count(sheet)? {
            sink.delete_row(sheet, sentinel)?;
            report.sentinel_removed = true;
        } else {
            warn!(
                sheet = %region.sheet,
                row = sentinel,
                "sentinel root row not present, nothing removed"
            );
        }

        debug!(
            sheet = %region.sheet,
            cells = report.cells_rewritten,
            strategy = %self.strategy,
            "resolved identifier paths"
        );
        Ok(report)
    }
}

/// Resolve `region` of `sink` in place with the given strategy.
pub fn resolve_paths<S: TabularSink + ?Sized>(
    sink: &mut S,
    region: &CellRegion,
    map: &IdentifierLabelMap,
    strategy: SubstitutionStrategy,
) -> ResolveResult<ResolveReport> {
    PathResolver::with_strategy(map, strategy).resolve(sink, region)
}

/// Trim whitespace, then `|`, then whitespace again.
pub fn normalize_separators(text: &str) -> String {
    text.trim().trim_matches('|').trim().to_string()
}
