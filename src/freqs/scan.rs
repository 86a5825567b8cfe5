//! Whole-table frequency scan.
//!
//! Summarizes every informative column of a table at once: columns that are
//! too unique (identifiers, free text), constant, or beyond the column cap are
//! excluded, and rare values collapse into a `(HF)` bucket.

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::table::{Column, Table, Value};

use super::diagnostics::Diagnostics;
use super::frequency::{FrequencyRow, FrequencyTable};
use super::rank::{percent, renumber, SortMode};

/// Label of the synthetic bucket holding collapsed rare values.
pub const HF_LABEL: &str = "(HF)";

/// Options for [`scan`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScanOptions {
    /// Exclude columns whose distinct count exceeds this share of rows.
    pub max_variance_ratio: f64,
    /// Collapse values whose share of rows falls below this ratio into `(HF)`.
    pub min_variance_ratio: f64,
    /// Exclude columns holding a single distinct value.
    pub drop_zero_variance: bool,
    /// Keep at most this many columns (fewest distinct values first).
    pub top_columns: usize,
    /// Render a composition chart.
    pub plot: bool,
    /// Suppress diagnostic emission.
    pub quiet: bool,
    /// Export the chart.
    pub save_to_file: bool,
    /// Subdirectory for exported files.
    pub output_subdirectory: Option<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_variance_ratio: 0.9,
            min_variance_ratio: 0.0,
            drop_zero_variance: true,
            top_columns: 30,
            plot: false,
            quiet: false,
            save_to_file: false,
            output_subdirectory: None,
        }
    }
}

impl ScanOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upper distinct-share bound.
    #[must_use]
    pub fn max_variance_ratio(mut self, ratio: f64) -> Self {
        self.max_variance_ratio = ratio;
        self
    }

    /// Set the rare-value share bound.
    #[must_use]
    pub fn min_variance_ratio(mut self, ratio: f64) -> Self {
        self.min_variance_ratio = ratio;
        self
    }

    /// Enable or disable dropping constant columns.
    #[must_use]
    pub fn drop_zero_variance(mut self, drop: bool) -> Self {
        self.drop_zero_variance = drop;
        self
    }

    /// Set the column cap.
    #[must_use]
    pub fn top_columns(mut self, top: usize) -> Self {
        self.top_columns = top;
        self
    }

    /// Enable the composition chart.
    #[must_use]
    pub fn plot(mut self, plot: bool) -> Self {
        self.plot = plot;
        self
    }

    /// Suppress diagnostics.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Why a column was left out of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    /// Distinct count above `max_variance_ratio * rows`.
    TooManyDistinct,
    /// Exactly one distinct value.
    NoVariance,
    /// Ranked beyond `top_columns`.
    OverTopCap,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExclusionReason::TooManyDistinct => "too many distinct values",
            ExclusionReason::NoVariance => "no variance",
            ExclusionReason::OverTopCap => "over the column cap",
        })
    }
}

/// An excluded column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// Column name.
    pub column: String,
    /// Reason for exclusion.
    pub reason: ExclusionReason,
}

/// All exclusions from one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionReport {
    entries: Vec<Exclusion>,
}

impl ExclusionReport {
    fn push(&mut self, column: &str, reason: ExclusionReason) {
        self.entries.push(Exclusion { column: column.to_string(), reason });
    }

    /// All exclusions in detection order.
    #[must_use]
    pub fn entries(&self) -> &[Exclusion] {
        &self.entries
    }

    /// Whether nothing was excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Columns excluded for `reason`.
    #[must_use]
    pub fn columns(&self, reason: ExclusionReason) -> Vec<&str> {
        self.entries.iter().filter(|e| e.reason == reason).map(|e| e.column.as_str()).collect()
    }
}

/// Output of a whole-table scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Long-format table (`column, value, n, p, pcum, order`), or `None` when
    /// every column was excluded.
    pub table: Option<FrequencyTable>,
    /// Excluded columns.
    pub exclusions: ExclusionReport,
    /// Columns summarized, in table order.
    pub retained: Vec<String>,
    /// Composition chart when requested.
    pub chart: Option<crate::chart::Chart>,
    /// Path of the exported chart, if saved.
    pub exported: Option<std::path::PathBuf>,
    /// Diagnostic messages, in emission order.
    pub diagnostics: Vec<String>,
}

/// Scan every non-list column of `table`.
///
/// # Errors
///
/// Returns an error if `table` has no columns.
pub fn scan(table: &Table, opts: &ScanOptions) -> Result<ScanReport> {
    let mut diag = Diagnostics::new(opts.quiet);
    let report = scan_with(table, opts, &mut diag)?;
    Ok(ScanReport { diagnostics: diag.into_messages(), ..report })
}

pub(crate) fn scan_with(
    table: &Table,
    opts: &ScanOptions,
    diag: &mut Diagnostics,
) -> Result<ScanReport> {
    table.ensure_tabular()?;
    let nrow = table.nrow();
    let mut exclusions = ExclusionReport::default();

    let mut candidates: Vec<(&Column, usize)> = Vec::new();
    for column in table.columns().iter().filter(|c| !c.is_list()) {
        let distinct = column.n_distinct();
        if distinct as f64 > opts.max_variance_ratio * nrow as f64 {
            exclusions.push(column.name(), ExclusionReason::TooManyDistinct);
        } else if opts.drop_zero_variance && distinct == 1 {
            exclusions.push(column.name(), ExclusionReason::NoVariance);
        } else {
            candidates.push((column, distinct));
        }
    }

    let mut by_simplicity: Vec<usize> = (0..candidates.len()).collect();
    by_simplicity.sort_by_key(|&i| candidates[i].1);
    let mut keep = vec![false; candidates.len()];
    for (rank, &i) in by_simplicity.iter().enumerate() {
        if rank < opts.top_columns {
            keep[i] = true;
        } else {
            exclusions.push(candidates[i].0.name(), ExclusionReason::OverTopCap);
        }
    }
    let retained: Vec<&Column> =
        candidates.iter().zip(&keep).filter(|(_, &k)| k).map(|((c, _), _)| *c).collect();

    report_exclusions(&exclusions, opts, diag);

    if retained.is_empty() {
        diag.warn("No columns left to summarize after variance filters".to_string());
        let report = ScanReport {
            table: None,
            exclusions,
            retained: Vec::new(),
            chart: None,
            exported: None,
            diagnostics: Vec::new(),
        };
        return Ok(report);
    }

    let threshold = opts.min_variance_ratio * 100.0;
    let mut rows: Vec<FrequencyRow> = Vec::new();
    for column in &retained {
        rows.extend(summarize_column(column, nrow, threshold));
    }
    renumber_within_columns(&mut rows, nrow);

    let total = nrow as f64 * retained.len() as f64;
    let freq = FrequencyTable::new(
        vec!["column".to_string(), "value".to_string()],
        rows,
        total,
        SortMode::ByCountDesc,
    );
    let report = ScanReport {
        table: Some(freq),
        exclusions,
        retained: retained.iter().map(|c| c.name().to_string()).collect(),
        chart: None,
        exported: None,
        diagnostics: Vec::new(),
    };
    Ok(report)
}

fn report_exclusions(report: &ExclusionReport, opts: &ScanOptions, diag: &mut Diagnostics) {
    let too_many = report.columns(ExclusionReason::TooManyDistinct);
    if !too_many.is_empty() {
        diag.info(format!(
            "Removed {} columns with more than {}% distinct values: {}",
            too_many.len(),
            opts.max_variance_ratio * 100.0,
            too_many.join(", ")
        ));
    }
    let constant = report.columns(ExclusionReason::NoVariance);
    if !constant.is_empty() {
        diag.info(format!(
            "Removed {} columns with no variance: {}",
            constant.len(),
            constant.join(", ")
        ));
    }
    let capped = report.columns(ExclusionReason::OverTopCap);
    if !capped.is_empty() {
        diag.info(format!(
            "Removed {} columns over the top {} cap (most distinct values): {}",
            capped.len(),
            opts.top_columns,
            capped.join(", ")
        ));
    }
}

/// Count values of one column, collapse rare ones into `(HF)`, and rank.
///
/// Values are counted by their display form, so `1` and `"1"` share a row.
fn summarize_column(column: &Column, nrow: usize, threshold: f64) -> Vec<FrequencyRow> {
    let mut counts: Vec<(Value, f64)> = Vec::new();
    let mut index: HashMap<Value, usize> = HashMap::new();
    for value in column.values() {
        let key = display_value(value);
        match index.get(&key) {
            Some(&pos) => counts[pos].1 += 1.0,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1.0));
            }
        }
    }

    let nrow = nrow as f64;
    let hf_label = Value::from(HF_LABEL);
    let mut collapsed: Vec<(Value, f64)> = Vec::new();
    let mut hf = 0.0;
    for (value, n) in counts {
        if 100.0 * n / nrow < threshold {
            hf += n;
        } else {
            collapsed.push((value, n));
        }
    }
    if hf > 0.0 {
        match collapsed.iter_mut().find(|(value, _)| *value == hf_label) {
            Some((_, n)) => *n += hf,
            None => collapsed.push((hf_label, hf)),
        }
    }
    collapsed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let name = Value::from(column.name());
    collapsed
        .into_iter()
        .map(|(value, n)| FrequencyRow {
            keys: vec![name.clone(), value],
            n,
            p: percent(n, nrow),
            pcum: 0.0,
            order: 0,
        })
        .collect()
}

fn display_value(value: &Value) -> Value {
    if value.is_missing() {
        Value::Missing
    } else {
        Value::Text(value.to_string())
    }
}

/// `order` runs over the whole table; `pcum` restarts for each column.
fn renumber_within_columns(rows: &mut [FrequencyRow], nrow: usize) {
    let mut start = 0;
    while start < rows.len() {
        let column = rows[start].keys[0].clone();
        let end = rows[start..]
            .iter()
            .position(|r| r.keys[0] != column)
            .map_or(rows.len(), |offset| start + offset);
        renumber(&mut rows[start..end], nrow as f64);
        for (i, row) in rows[start..end].iter_mut().enumerate() {
            row.order = start + i + 1;
        }
        start = end;
    }
}
