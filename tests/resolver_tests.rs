//! Path resolution tests
//!
//! Identifier substitution, separator normalisation, region handling and
//! sentinel row removal against the in-memory workbook sink.

use pretty_assertions::assert_eq;
use treesheet::error::{ResolveError, SinkError};
use treesheet::resolver::{
    resolve_paths, CellRegion, IdentifierLabelMap, PathResolver, SubstitutionStrategy,
    VIRTUAL_ROOT_LABEL,
};
use treesheet::sink::{GridWorkbook, TabularSink};

const BOTH: [SubstitutionStrategy; 2] = [
    SubstitutionStrategy::Segment,
    SubstitutionStrategy::LongestFirst,
];

fn map(pairs: &[(u64, &str)]) -> IdentifierLabelMap {
    IdentifierLabelMap::from_pairs(pairs.iter().copied())
}

/// Header, one row per path, then the sentinel row at index `map.len()`.
fn sheet_with_paths(paths: &[&str]) -> GridWorkbook {
    let mut wb = GridWorkbook::with_sheet("Nodes").unwrap();
    wb.set_cell(0, 0, 0, "Path").unwrap();
    for (idx, path) in paths.iter().enumerate() {
        wb.set_cell(0, idx + 1, 0, path).unwrap();
    }
    wb
}

fn column(wb: &GridWorkbook) -> Vec<String> {
    wb.sheet(0)
        .unwrap()
        .rows
        .iter()
        .map(|r| r.first().cloned().unwrap_or_default())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBSTITUTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_root_child_path() {
    let labels = map(&[(1, "Root"), (12, "Child")]);
    for strategy in BOTH {
        let resolver = PathResolver::with_strategy(&labels, strategy);
        assert_eq!(resolver.resolve_text("1/12"), "Root | Child", "{strategy}");
    }
}

#[test]
fn test_prefix_collision_is_avoided() {
    let labels = map(&[(1, "A"), (21, "B")]);
    for strategy in BOTH {
        let resolver = PathResolver::with_strategy(&labels, strategy);
        assert_eq!(resolver.resolve_text("21"), "B", "{strategy}");
        assert_eq!(resolver.resolve_text("1/21"), "A | B", "{strategy}");
    }
}

#[test]
fn test_labels_are_not_rescanned() {
    let labels = map(&[(1, "Item 2"), (2, "Two")]);
    for strategy in BOTH {
        let resolver = PathResolver::with_strategy(&labels, strategy);
        assert_eq!(resolver.resolve_text("1/2"), "Item 2 | Two", "{strategy}");
    }
}

#[test]
fn test_leading_and_trailing_delimiters_are_trimmed() {
    let labels = map(&[(3, "Root"), (12, "Child")]);
    for strategy in BOTH {
        let resolver = PathResolver::with_strategy(&labels, strategy);
        let out = resolver.resolve_text("/3/12/");
        assert_eq!(out, "Root | Child", "{strategy}");
        assert!(!out.starts_with('|') && !out.ends_with('|'));
        assert!(!out.contains('/'));
    }
}

#[test]
fn test_unknown_segments_stay_verbatim() {
    let labels = map(&[(1, "Root")]);
    let resolver = PathResolver::new(&labels);
    assert_eq!(resolver.strategy(), SubstitutionStrategy::Segment);
    assert_eq!(resolver.resolve_text("1/99/x"), "Root | 99 | x");
    assert_eq!(resolver.resolve_text(""), "");
}

#[test]
fn test_non_canonical_numbers_are_not_ids() {
    let labels = map(&[(5, "Five"), (7, "Seven")]);

    let segment = PathResolver::with_strategy(&labels, SubstitutionStrategy::Segment);
    assert_eq!(segment.resolve_text("007"), "007");
    assert_eq!(segment.resolve_text("+5"), "+5");
    assert_eq!(segment.resolve_text("+5/ 7 /007"), "+5 | Seven | 007");

    // substring matching still sees the digits inside the text
    let longest = PathResolver::with_strategy(&labels, SubstitutionStrategy::LongestFirst);
    assert_eq!(longest.resolve_text("007"), "00Seven");
    assert_eq!(longest.resolve_text("+5"), "+Five");
}

#[test]
fn test_longest_first_inside_free_text() {
    let labels = map(&[(7, "Seven"), (77, "SeventySeven")]);
    let resolver = PathResolver::with_strategy(&labels, SubstitutionStrategy::LongestFirst);
    assert_eq!(resolver.resolve_text("id77x7"), "idSeventySevenxSeven");
}

#[test]
fn test_strategy_parse_and_display() {
    for strategy in BOTH {
        let parsed: SubstitutionStrategy = strategy.to_string().parse().unwrap();
        assert_eq!(parsed, strategy);
    }
    assert!("greedy".parse::<SubstitutionStrategy>().is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// REGIONS AND SENTINEL ROW
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sentinel_row_is_removed() {
    // two nodes + virtual root
    let labels = map(&[(1, "Root"), (12, "Child"), (0, VIRTUAL_ROOT_LABEL)]);
    let mut wb = sheet_with_paths(&["1", "1/12", "0"]);
    assert_eq!(wb.row_count(0).unwrap(), 4);

    let report = resolve_paths(
        &mut wb,
        &CellRegion::column_from("Nodes", 0, 1),
        &labels,
        SubstitutionStrategy::Segment,
    )
    .unwrap();

    assert!(report.sentinel_removed);
    assert_eq!(report.cells_rewritten, 3);
    assert_eq!(column(&wb), vec!["Path", "Root", "Root | Child"]);
}

#[test]
fn test_rows_after_sentinel_shift_up() {
    let labels = map(&[(1, "Root"), (0, VIRTUAL_ROOT_LABEL)]);
    let mut wb = sheet_with_paths(&["1", "0", "trailer"]);
    resolve_paths(
        &mut wb,
        &CellRegion::column_from("Nodes", 0, 1),
        &labels,
        SubstitutionStrategy::Segment,
    )
    .unwrap();
    assert_eq!(column(&wb), vec!["Path", "Root", "trailer"]);
}

#[test]
fn test_missing_sentinel_is_reported() {
    let labels = map(&[(1, "Root"), (2, "Two"), (0, VIRTUAL_ROOT_LABEL)]);
    let mut wb = sheet_with_paths(&["1/2"]);
    let report = PathResolver::new(&labels)
        .resolve(&mut wb, &CellRegion::column_from("Nodes", 0, 1))
        .unwrap();
    assert!(!report.sentinel_removed);
    assert_eq!(column(&wb), vec!["Path", "Root | Two"]);
}

#[test]
fn test_region_is_clamped_and_bounded() {
    let labels = map(&[(1, "Root"), (0, VIRTUAL_ROOT_LABEL)]);
    let mut wb = sheet_with_paths(&["1", "0"]);
    wb.set_cell(0, 1, 1, "1").unwrap();

    let region = CellRegion::new("Nodes", (1, 0), (500, 0));
    PathResolver::new(&labels).resolve(&mut wb, &region).unwrap();

    let sheet = wb.sheet(0).unwrap();
    assert_eq!(sheet.rows[1][0], "Root");
    // outside the region
    assert_eq!(sheet.rows[1][1], "1");
    assert_eq!(sheet.rows[0][0], "Path");
}

#[test]
fn test_unknown_sheet_fails() {
    let labels = map(&[(1, "Root")]);
    let mut wb = sheet_with_paths(&["1"]);
    let err = PathResolver::new(&labels)
        .resolve(&mut wb, &CellRegion::column_from("Missing", 0, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::PathResolution(SinkError::UnknownSheet(ref name)) if name == "Missing"
    ));
}
