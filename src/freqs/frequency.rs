//! Frequency rows and tables.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use crate::format::round_to;
use crate::table::Value;

use super::rank::{percent, renumber, sort_rows, SortMode};

/// One row per unique key combination.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRow {
    /// Key values, one per grouping column.
    pub keys: Vec<Value>,
    /// Count, or weighted sum.
    pub n: f64,
    /// Share of the grand total, 0-100 with two decimals.
    pub p: f64,
    /// Cumulative share in rank order.
    pub pcum: f64,
    /// 1-based dense rank.
    pub order: usize,
}

/// Subtotal for one outer grouping context (all keys but the last).
#[derive(Debug, Clone, PartialEq)]
pub struct Subtotal {
    /// Values of the outer keys; empty for a single-key table.
    pub context: Vec<Value>,
    /// Sum of `n` within the context.
    pub n: f64,
    /// Share of the grand total.
    pub p: f64,
}

/// A ranked frequency table.
///
/// Immutable once built: truncation and re-ranking return new tables.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    key_names: Vec<String>,
    rows: Vec<FrequencyRow>,
    total: f64,
    sort_mode: SortMode,
    weight: Option<String>,
    display_name: Option<String>,
    grouped: bool,
}

impl FrequencyTable {
    pub(crate) fn new(
        key_names: Vec<String>,
        rows: Vec<FrequencyRow>,
        total: f64,
        sort_mode: SortMode,
    ) -> Self {
        Self { key_names, rows, total, sort_mode, weight: None, display_name: None, grouped: false }
    }

    pub(crate) fn with_weight(mut self, weight: Option<&str>) -> Self {
        self.weight = weight.map(str::to_string);
        self
    }

    pub(crate) fn with_display_name(mut self, name: Option<&str>) -> Self {
        self.display_name = name.map(str::to_string);
        self
    }

    pub(crate) fn with_grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    /// Same metadata, different rows.
    pub(crate) fn with_rows(&self, rows: Vec<FrequencyRow>) -> Self {
        Self { rows, ..self.clone_meta() }
    }

    fn clone_meta(&self) -> Self {
        Self {
            key_names: self.key_names.clone(),
            rows: Vec::new(),
            total: self.total,
            sort_mode: self.sort_mode,
            weight: self.weight.clone(),
            display_name: self.display_name.clone(),
            grouped: self.grouped,
        }
    }

    /// Grouping column names.
    #[must_use]
    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Rows in rank order.
    #[must_use]
    pub fn rows(&self) -> &[FrequencyRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Grand total over the untruncated group set.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Sum of `n` over the rows held by this table.
    #[must_use]
    pub fn observed_total(&self) -> f64 {
        self.rows.iter().map(|r| r.n).sum()
    }

    /// Sort policy used to rank the rows.
    #[must_use]
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Weight column, if counts are weighted.
    #[must_use]
    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    /// Display name replacing the first key in labels.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Label for the first key: the display name if set, else its column name.
    #[must_use]
    pub fn primary_label(&self) -> &str {
        self.display_name
            .as_deref()
            .or_else(|| self.key_names.first().map(String::as_str))
            .unwrap_or("")
    }

    /// Whether subtotals per outer context are retained.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    /// Distinct values of key `idx`, in first-appearance (rank) order.
    #[must_use]
    pub fn distinct_key_values(&self, idx: usize) -> Vec<&Value> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if let Some(v) = row.keys.get(idx) {
                if !seen.contains(&v) {
                    seen.push(v);
                }
            }
        }
        seen
    }

    /// Subtotals per outer context, present when the table was built with
    /// `relative = true`.
    #[must_use]
    pub fn subtotals(&self) -> Option<Vec<Subtotal>> {
        if !self.grouped {
            return None;
        }
        let depth = self.key_names.len().saturating_sub(1);
        let mut index: HashMap<&[Value], usize> = HashMap::new();
        let mut sums: Vec<(Vec<Value>, f64)> = Vec::new();
        for row in &self.rows {
            let context = &row.keys[..depth.min(row.keys.len())];
            match index.get(context) {
                Some(&pos) => sums[pos].1 += row.n,
                None => {
                    index.insert(context, sums.len());
                    sums.push((context.to_vec(), row.n));
                }
            }
        }
        Some(
            sums.into_iter()
                .map(|(context, n)| Subtotal { p: percent(n, self.total), context, n })
                .collect(),
        )
    }

    /// Re-rank with `mode`, keeping grand-total percentages.
    ///
    /// Re-ranking a table with the mode it was ranked with yields the same order.
    #[must_use]
    pub fn rerank(&self, mode: SortMode) -> Self {
        let mut rows = self.rows.clone();
        sort_rows(&mut rows, mode);
        renumber(&mut rows, self.total);
        Self { rows, sort_mode: mode, ..self.clone_meta() }
    }

    /// Copy keeping only rows matching `keep`; percentages stay grand-total relative.
    #[must_use]
    pub fn filter(&self, keep: impl Fn(&FrequencyRow) -> bool) -> Self {
        let mut rows: Vec<FrequencyRow> = self.rows.iter().filter(|r| keep(*r)).cloned().collect();
        renumber(&mut rows, self.total);
        self.with_rows(rows)
    }

    /// Render as CSV: key columns, then `n, p, pcum, order`.
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        for (i, name) in self.key_names.iter().enumerate() {
            let name = match (i, self.display_name.as_deref()) {
                (0, Some(display)) => display,
                _ => name.as_str(),
            };
            out.push_str(&csv_field(name));
            out.push(',');
        }
        out.push_str("n,p,pcum,order\n");
        for row in &self.rows {
            for key in &row.keys {
                out.push_str(&csv_field(&key.to_string()));
                out.push(',');
            }
            let _ = writeln!(
                out,
                "{},{},{},{}",
                round_to(row.n, 6),
                row.p,
                row.pcum,
                row.order
            );
        }
        out
    }
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
