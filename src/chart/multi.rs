//! Composite view for many-key frequency tables.
//!
//! Each key combination becomes one bar; a dot matrix below the bars shows
//! which key values make up the combination. Combinations beyond the top
//! `n` merge into a single tail bar.

use crate::color::{Gradient, Rgba};
use crate::error::Result;
use crate::format::round_to;
use crate::freqs::diagnostics::Diagnostics;
use crate::freqs::group::group;
use crate::freqs::rank::{rank, SortMode};
use crate::freqs::scan::{scan_with, ScanOptions};
use crate::freqs::FrequencyTable;
use crate::table::{Table, Value};

use super::composition::{compose_composition, empty_composition};
use super::{variable_line, Chart, ChartKind, ChartStyle, Titles, DEFAULT_TITLE};

/// Label of the merged tail group.
pub const TAIL_LABEL: &str = "(Tail)";

const TAIL_FILL: Rgba = Rgba::rgb(160, 160, 160);

/// Options for [`compose_multi`].
#[derive(Debug, Clone, PartialEq)]
pub struct MultiOptions {
    /// Combinations kept before the tail.
    pub top: usize,
    /// Weight column.
    pub weight: Option<String>,
    /// Suppress diagnostics.
    pub quiet: bool,
    /// Visual style.
    pub style: ChartStyle,
    /// Replaces the default title.
    pub title: Option<String>,
    /// Replaces the generated subtitle.
    pub subtitle: Option<String>,
}

impl Default for MultiOptions {
    fn default() -> Self {
        Self {
            top: Self::DEFAULT_TOP,
            weight: None,
            quiet: false,
            style: ChartStyle::default(),
            title: None,
            subtitle: None,
        }
    }
}

impl MultiOptions {
    /// Default number of combinations before the tail.
    pub const DEFAULT_TOP: usize = 10;

    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of combinations kept before the tail.
    #[must_use]
    pub fn top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Weight counts by a column.
    #[must_use]
    pub fn weight(mut self, column: impl Into<String>) -> Self {
        self.weight = Some(column.into());
        self
    }

    /// Suppress diagnostics.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }
}

/// One bar of the composite view.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeBar {
    /// Axis label: the rank, or [`TAIL_LABEL`].
    pub label: String,
    /// Count.
    pub n: f64,
    /// Percentage of the grand total.
    pub p: f64,
    /// Cumulative percentage; bars are ordered by it.
    pub pcum: f64,
    /// Distinct values per key (one for regular bars, a union for the tail).
    pub values: Vec<Vec<Value>>,
    /// Whether this is the merged tail.
    pub is_tail: bool,
    /// Fill color.
    pub fill: Rgba,
}

/// A dot in the matrix: bar `bar` contains the value of row `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    /// Index into [`CompositeSpec::bars`].
    pub bar: usize,
    /// Index into [`CompositeSpec::dot_rows`].
    pub row: usize,
}

/// Bar panel plus dot matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSpec {
    /// Grouping key names.
    pub keys: Vec<String>,
    /// Bars in `pcum` order.
    pub bars: Vec<CompositeBar>,
    /// Dot-matrix row labels, `<key>: <value>`.
    pub dot_rows: Vec<String>,
    /// Dots, sharing the bars' x order.
    pub dots: Vec<Dot>,
}

/// Compose the composite view from raw data.
///
/// With no keys the whole table is scanned and drawn as a composition chart.
///
/// # Errors
///
/// Returns an error if a key or the weight column is invalid.
pub fn compose_multi(table: &Table, keys: &[&str], opts: &MultiOptions) -> Result<Chart> {
    if keys.is_empty() {
        let mut diag = Diagnostics::new(opts.quiet);
        let report = scan_with(table, &ScanOptions::new().quiet(opts.quiet), &mut diag)?;
        let chart = match &report.table {
            Some(scanned) => compose_composition(scanned, &opts.style)?,
            None => empty_composition(&opts.style),
        };
        return Ok(chart.retitle(opts.title.clone()));
    }

    let weight = opts.weight.as_deref();
    let groups = group(table, keys, weight)?;
    let total = groups.iter().map(|g| g.n).sum();
    let names = keys.iter().map(|k| (*k).to_string()).collect();
    let mode = SortMode::ByCountDesc;
    let freq = FrequencyTable::new(names, rank(groups, mode), total, mode).with_weight(weight);
    Ok(composite_chart(&freq, opts))
}

/// Composite view of an already ranked table.
pub(crate) fn composite_chart(table: &FrequencyTable, opts: &MultiOptions) -> Chart {
    let ranked;
    let table = if table.sort_mode() == SortMode::ByCountDesc {
        table
    } else {
        ranked = table.rerank(SortMode::ByCountDesc);
        &ranked
    };
    let width = table.key_names().len();
    let top = opts.top.max(1);

    let mut bars: Vec<CompositeBar> = table
        .rows()
        .iter()
        .take(top)
        .map(|r| CompositeBar {
            label: r.order.to_string(),
            n: r.n,
            p: r.p,
            pcum: r.pcum,
            values: r.keys.iter().map(|k| vec![k.clone()]).collect(),
            is_tail: false,
            fill: Rgba::TRANSPARENT,
        })
        .collect();

    let rest = table.rows().get(top..).unwrap_or_default();
    if !rest.is_empty() {
        let mut values: Vec<Vec<Value>> = vec![Vec::new(); width];
        for row in rest {
            for (slot, key) in values.iter_mut().zip(&row.keys) {
                if !slot.contains(key) {
                    slot.push(key.clone());
                }
            }
        }
        bars.push(CompositeBar {
            label: TAIL_LABEL.to_string(),
            n: rest.iter().map(|r| r.n).sum(),
            p: round_to(rest.iter().map(|r| r.p).sum(), 2),
            pcum: rest.last().map_or(100.0, |r| r.pcum),
            values,
            is_tail: true,
            fill: TAIL_FILL,
        });
        tracing::debug!(
            target: "trueno_freqs",
            merged = rest.len(),
            "merged low-frequency combinations into the tail"
        );
    }
    bars.sort_by(|a, b| a.pcum.total_cmp(&b.pcum));
    fill_bars(&mut bars, opts.style.gradient);

    let (dot_rows, dots) = dot_matrix(table.key_names(), &bars);
    let spec = CompositeSpec { keys: table.key_names().to_vec(), bars, dot_rows, dots };
    let titles = titles(table, opts, rest.len());
    Chart::new(ChartKind::Composite(spec), titles, opts.style.clone())
}

fn fill_bars(bars: &mut [CompositeBar], gradient: Gradient) {
    let p_max = bars.iter().filter(|b| !b.is_tail).map(|b| b.p).fold(0.0, f64::max);
    for bar in bars.iter_mut().filter(|b| !b.is_tail) {
        let t = if p_max > 0.0 { (bar.p / p_max) as f32 } else { 0.0 };
        bar.fill = gradient.at(t);
    }
}

/// Dot rows grouped by key, values in first-appearance order.
fn dot_matrix(keys: &[String], bars: &[CompositeBar]) -> (Vec<String>, Vec<Dot>) {
    let mut rows: Vec<(usize, &Value)> = Vec::new();
    for k in 0..keys.len() {
        for bar in bars {
            for value in bar.values.get(k).into_iter().flatten() {
                if !rows.iter().any(|(rk, rv)| *rk == k && *rv == value) {
                    rows.push((k, value));
                }
            }
        }
    }

    let mut dots = Vec::new();
    for (b, bar) in bars.iter().enumerate() {
        for (r, (k, value)) in rows.iter().enumerate() {
            if bar.values.get(*k).is_some_and(|vs| vs.contains(*value)) {
                dots.push(Dot { bar: b, row: r });
            }
        }
    }

    let labels = rows.iter().map(|(k, value)| format!("{}: {value}", keys[*k])).collect();
    (labels, dots)
}

fn titles(table: &FrequencyTable, opts: &MultiOptions, merged: usize) -> Titles {
    let subtitle = match &opts.subtitle {
        Some(text) => vec![text.clone()],
        None => {
            let names: Vec<&str> = table.key_names().iter().map(String::as_str).collect();
            let mut lines = vec![variable_line(&names)];
            if merged > 0 {
                lines.push(format!(
                    "Most frequent {} out of {} combinations, {merged} merged into {TAIL_LABEL}",
                    opts.top.max(1),
                    table.len()
                ));
            }
            if let Some(weight) = table.weight() {
                lines.push(format!("Weighted by {weight}"));
            }
            lines
        }
    };
    Titles {
        title: opts.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        subtitle,
        caption: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn survey() -> Table {
        Table::from_columns(vec![
            Column::new("x", ["a", "a", "b", "b", "a", "c", "a", "b"]),
            Column::new("y", ["u", "v", "u", "v", "u", "u", "u", "u"]),
            Column::new("z", ["1", "2", "3", "4", "1", "5", "1", "3"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_tail_merges_beyond_top() {
        let opts = MultiOptions::new().top(2);
        let chart = compose_multi(&survey(), &["x", "y", "z"], &opts).unwrap();
        let spec = chart.as_composite().unwrap();
        assert_eq!(spec.bars.len(), 3);
        let tail = spec.bars.last().unwrap();
        assert!(tail.is_tail);
        assert_eq!(tail.label, TAIL_LABEL);
        assert!((tail.n - 3.0).abs() < 1e-12);
        assert!((tail.pcum - 100.0).abs() < 1e-9);
        assert_eq!(tail.values[0], vec![Value::from("a"), Value::from("b"), Value::from("c")]);
    }

    #[test]
    fn test_bars_ordered_by_pcum() {
        let opts = MultiOptions::new().top(2);
        let chart = compose_multi(&survey(), &["x", "y", "z"], &opts).unwrap();
        let spec = chart.as_composite().unwrap();
        assert!(spec.bars.windows(2).all(|w| w[0].pcum <= w[1].pcum));
        assert_eq!(spec.bars[0].label, "1");
    }

    #[test]
    fn test_no_tail_when_under_top() {
        let chart = compose_multi(&survey(), &["x", "y", "z"], &MultiOptions::new()).unwrap();
        let spec = chart.as_composite().unwrap();
        assert!(spec.bars.iter().all(|b| !b.is_tail));
        assert_eq!(spec.bars.len(), 5);
    }

    #[test]
    fn test_dot_labels_and_positions() {
        let chart = compose_multi(&survey(), &["x", "y", "z"], &MultiOptions::new()).unwrap();
        let spec = chart.as_composite().unwrap();
        assert_eq!(spec.dot_rows[0], "x: a");
        assert!(spec.dot_rows.contains(&"z: 5".to_string()));
        // one dot per key for every regular bar
        assert_eq!(spec.dots.len(), spec.bars.len() * 3);
        let first: Vec<&str> = spec
            .dots
            .iter()
            .filter(|d| d.bar == 0)
            .map(|d| spec.dot_rows[d.row].as_str())
            .collect();
        assert_eq!(first, vec!["x: a", "y: u", "z: 1"]);
    }

    #[test]
    fn test_zero_keys_falls_back_to_composition() {
        let chart = compose_multi(&survey(), &[], &MultiOptions::new().quiet(true)).unwrap();
        let spec = chart.as_composition().unwrap();
        let names: Vec<&str> = spec.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_weighted_subtitle() {
        let t = survey().with_column("w", [1.0; 8]).unwrap();
        let chart = compose_multi(&t, &["x", "y"], &MultiOptions::new().weight("w")).unwrap();
        assert!(chart.titles().subtitle.iter().any(|l| l == "Weighted by w"));
    }
}
