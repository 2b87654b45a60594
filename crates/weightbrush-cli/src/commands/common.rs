//! Shared CLI helpers used across multiple commands.

use anyhow::{Context, bail};
use std::path::{Path, PathBuf};
use weightbrush_config::{BrushSettings, load_settings};
use weightbrush_core::{Chunk, SelectionRegion};

/// Load settings from `--settings` or the user file, then validate them.
pub fn settings(path: Option<&Path>) -> anyhow::Result<BrushSettings> {
    let settings = load_settings(path)?;
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

/// Where to write results: `--output` if given, else the input file.
pub fn output_path(input: &Path, output: Option<&PathBuf>) -> PathBuf {
    output.cloned().unwrap_or_else(|| input.to_path_buf())
}

/// Parse a row list such as `0-3,7,9-10`; `None` selects every row.
///
/// Returns sorted, deduplicated indices below `count`.
pub fn parse_rows(list: Option<&str>, count: usize) -> anyhow::Result<Vec<usize>> {
    let Some(list) = list else {
        return Ok((0..count).collect());
    };
    let mut rows = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (parse_index(a)?, parse_index(b)?),
            None => {
                let i = parse_index(part)?;
                (i, i)
            }
        };
        if start > end {
            bail!("descending row range '{part}'");
        }
        if end >= count {
            bail!("row {end} out of range ({count} rows)");
        }
        rows.extend(start..=end);
    }
    rows.sort_unstable();
    rows.dedup();
    if rows.is_empty() {
        bail!("empty row list '{list}'");
    }
    Ok(rows)
}

fn parse_index(text: &str) -> anyhow::Result<usize> {
    text.trim()
        .parse()
        .with_context(|| format!("invalid row index '{}'", text.trim()))
}

/// Resolve driver names (or column numbers) to sorted column indices.
///
/// An empty list selects every driver.
pub fn resolve_drivers(wanted: &[String], names: &[String]) -> anyhow::Result<Vec<usize>> {
    if wanted.is_empty() {
        return Ok((0..names.len()).collect());
    }
    let mut columns = wanted
        .iter()
        .map(|driver| {
            names
                .iter()
                .position(|n| n == driver)
                .or_else(|| driver.parse::<usize>().ok().filter(|&c| c < names.len()))
                .with_context(|| format!("unknown driver '{driver}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    columns.sort_unstable();
    columns.dedup();
    Ok(columns)
}

/// Split sorted indices into inclusive contiguous runs.
pub fn runs(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = Vec::new();
    for &i in indices {
        match out.last_mut() {
            Some((_, end)) if *end + 1 == i => *end = i,
            _ => out.push((i, i)),
        }
    }
    out
}

/// One chunk per (row run × column run).
pub fn selection(rows: &[usize], columns: &[usize]) -> SelectionRegion {
    let column_runs = runs(columns);
    runs(rows)
        .into_iter()
        .flat_map(|(r0, r1)| {
            column_runs
                .iter()
                .map(move |&(c0, c1)| Chunk::new(r0, r1, c0, c1))
        })
        .fold(SelectionRegion::new(), SelectionRegion::with_chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_parse_ranges_and_singles() {
        assert_eq!(parse_rows(Some("0-2, 5,4"), 8).unwrap(), vec![0, 1, 2, 4, 5]);
        assert_eq!(parse_rows(None, 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn rows_out_of_range_fail() {
        assert!(parse_rows(Some("3"), 3).is_err());
        assert!(parse_rows(Some("2-1"), 3).is_err());
        assert!(parse_rows(Some("x"), 3).is_err());
    }

    #[test]
    fn drivers_by_name_or_index() {
        let names: Vec<String> = ["root", "arm_L", "arm_R"].map(String::from).into();
        let wanted = vec!["arm_R".to_string(), "0".to_string()];
        assert_eq!(resolve_drivers(&wanted, &names).unwrap(), vec![0, 2]);
        assert!(resolve_drivers(&["leg".to_string()], &names).is_err());
        assert_eq!(resolve_drivers(&[], &names).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn runs_group_contiguous_indices() {
        assert_eq!(runs(&[0, 1, 2, 5, 7, 8]), vec![(0, 2), (5, 5), (7, 8)]);
        assert!(runs(&[]).is_empty());
    }

    #[test]
    fn selection_covers_exact_cells() {
        let sel = selection(&[0, 1, 3], &[0, 2]);
        assert_eq!(sel.chunks().len(), 4);
        assert!(sel.contains(1, 2));
        assert!(!sel.contains(2, 0));
        assert!(!sel.contains(0, 1));
    }
}
