//! Frequency tables: grouping, ranking, truncation and whole-table scans.
//!
//! [`freqs`] is the main entry point. Given grouping keys it counts, ranks and
//! truncates, then optionally composes and exports a chart. Given no keys it
//! scans the whole table instead.
//!
//! # Example
//!
//! ```
//! use trueno_freqs::freqs::{freqs, FreqsOptions, Top};
//! use trueno_freqs::table::Table;
//!
//! let data = Table::from_series("x", ["a", "b", "a", "c", "a", "b"]);
//! let report = freqs(&data, &["x"], &FreqsOptions::new().top(Top::N(2)).quiet(true)).unwrap();
//! let table = report.table.unwrap();
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.rows()[0].n, 3.0);
//! ```

pub(crate) mod diagnostics;
pub mod frequency;
pub mod group;
pub mod rank;
pub mod scan;
pub mod truncate;

use std::path::PathBuf;

pub use frequency::{FrequencyRow, FrequencyTable, Subtotal};
pub use group::{group, Group};
pub use rank::{percent, rank, SortMode};
pub use scan::{
    scan, Exclusion, ExclusionReason, ExclusionReport, ScanOptions, ScanReport, HF_LABEL,
};
pub use truncate::{observed_caption, truncate, Top, Truncation};

use crate::chart::compose::{needs_composite, MAX_PLOT_KEYS};
use crate::chart::composition::{compose_composition, empty_composition};
use crate::chart::{compose, compose_multi, Chart, ChartStyle, ComposeOptions, MultiOptions};
use crate::error::{Error, Result};
use crate::output::{Exporter, ImageFormat};
use crate::table::{Table, Value};

use diagnostics::Diagnostics;

/// Options for [`freqs`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FreqsOptions {
    /// Sum this numeric column instead of counting rows.
    pub weight_column: Option<String>,
    /// Keep per-context subtotals (see [`FrequencyTable::subtotals`]).
    pub relative: bool,
    /// Return the table even when a chart is rendered.
    pub return_table: bool,
    /// Label replacing the first key's name.
    pub display_name_override: Option<String>,
    /// Compose a chart.
    pub render_plot: bool,
    /// Leave rows with missing keys out of the chart.
    pub drop_missing_in_plot: bool,
    /// Replaces the default title.
    pub title_override: Option<String>,
    /// Replaces the generated subtitle.
    pub subtitle_override: Option<String>,
    /// Groups kept after ranking.
    pub top: Top,
    /// Rank by key values instead of counts.
    pub alphabetical_sort: bool,
    /// Export the chart.
    pub save_to_file: bool,
    /// Subdirectory of `output_root` for exported files.
    pub output_subdirectory: Option<String>,
    /// Root directory for exported files.
    pub output_root: PathBuf,
    /// Base name used in exported file names.
    pub output_name: String,
    /// Exported image format.
    pub image_format: ImageFormat,
    /// Suppress diagnostic emission.
    pub quiet: bool,
    /// Theme, gradient and dimensions.
    pub style: ChartStyle,
    /// Thresholds used when no keys are given.
    pub scan: ScanOptions,
}

impl Default for FreqsOptions {
    fn default() -> Self {
        Self {
            weight_column: None,
            relative: false,
            return_table: false,
            display_name_override: None,
            render_plot: false,
            drop_missing_in_plot: false,
            title_override: None,
            subtitle_override: None,
            top: Top::default(),
            alphabetical_sort: false,
            save_to_file: false,
            output_subdirectory: None,
            output_root: PathBuf::from("."),
            output_name: "data".to_string(),
            image_format: ImageFormat::default(),
            quiet: false,
            style: ChartStyle::default(),
            scan: ScanOptions::default(),
        }
    }
}

impl FreqsOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight counts by a numeric column.
    #[must_use]
    pub fn weight_column(mut self, column: impl Into<String>) -> Self {
        self.weight_column = Some(column.into());
        self
    }

    /// Keep per-context subtotals.
    #[must_use]
    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    /// Return the table alongside the chart.
    #[must_use]
    pub fn return_table(mut self, return_table: bool) -> Self {
        self.return_table = return_table;
        self
    }

    /// Label for the first key.
    #[must_use]
    pub fn display_name_override(mut self, name: impl Into<String>) -> Self {
        self.display_name_override = Some(name.into());
        self
    }

    /// Compose a chart.
    #[must_use]
    pub fn render_plot(mut self, render: bool) -> Self {
        self.render_plot = render;
        self
    }

    /// Leave missing keys out of the chart.
    #[must_use]
    pub fn drop_missing_in_plot(mut self, drop: bool) -> Self {
        self.drop_missing_in_plot = drop;
        self
    }

    /// Override the title.
    #[must_use]
    pub fn title_override(mut self, title: impl Into<String>) -> Self {
        self.title_override = Some(title.into());
        self
    }

    /// Override the subtitle.
    #[must_use]
    pub fn subtitle_override(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle_override = Some(subtitle.into());
        self
    }

    /// Set the truncation cap.
    #[must_use]
    pub fn top(mut self, top: impl Into<Top>) -> Self {
        self.top = top.into();
        self
    }

    /// Rank alphabetically.
    #[must_use]
    pub fn alphabetical_sort(mut self, alphabetical: bool) -> Self {
        self.alphabetical_sort = alphabetical;
        self
    }

    /// Export the chart.
    #[must_use]
    pub fn save_to_file(mut self, save: bool) -> Self {
        self.save_to_file = save;
        self
    }

    /// Export into a subdirectory.
    #[must_use]
    pub fn output_subdirectory(mut self, subdirectory: impl Into<String>) -> Self {
        self.output_subdirectory = Some(subdirectory.into());
        self
    }

    /// Set the export root.
    #[must_use]
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Set the base name of exported files.
    #[must_use]
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Set the export format.
    #[must_use]
    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// Suppress diagnostics.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set theme, gradient and dimensions.
    #[must_use]
    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the scan thresholds used without keys.
    #[must_use]
    pub fn scan(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }

    fn exporter(&self) -> Exporter {
        Exporter::new(&self.output_root)
            .subdirectory(self.output_subdirectory.as_deref())
            .format(self.image_format)
    }
}

impl From<usize> for FreqsOptions {
    /// Default options with a truncation cap.
    fn from(top: usize) -> Self {
        Self::new().top(top)
    }
}

/// Result of [`freqs`].
#[derive(Debug, Clone)]
pub struct FreqsReport {
    /// The (possibly truncated) table; present when requested or when no chart
    /// was rendered.
    pub table: Option<FrequencyTable>,
    /// The chart, when `render_plot` was set.
    pub chart: Option<Chart>,
    /// Scan details when no keys were given.
    pub scan: Option<ScanReport>,
    /// Path of the exported chart.
    pub exported: Option<PathBuf>,
    /// Diagnostic messages, in emission order.
    pub diagnostics: Vec<String>,
}

/// Count, rank and truncate `table` by `keys`; optionally chart the result.
///
/// With no keys the whole table is scanned (see [`freqs_df`]).
///
/// # Errors
///
/// Returns an error for an empty table, unknown or list-valued keys, a
/// non-numeric weight column, more than three keys with `render_plot`, or a
/// failed export.
pub fn freqs(table: &Table, keys: &[&str], opts: &FreqsOptions) -> Result<FreqsReport> {
    table.ensure_tabular()?;
    let mut diag = Diagnostics::new(opts.quiet);

    if keys.is_empty() {
        let scan_opts = ScanOptions {
            plot: opts.render_plot,
            quiet: opts.quiet,
            save_to_file: opts.save_to_file,
            output_subdirectory: opts.output_subdirectory.clone(),
            ..opts.scan.clone()
        };
        let exporter = opts.exporter();
        let report =
            scan_report(table, &scan_opts, &opts.style, &exporter, &opts.output_name, &mut diag)?;
        let report = ScanReport { diagnostics: diag.into_messages(), ..report };
        return Ok(FreqsReport {
            table: report.table.clone(),
            chart: report.chart.clone(),
            exported: report.exported.clone(),
            diagnostics: report.diagnostics.clone(),
            scan: Some(report),
        });
    }

    if opts.render_plot && keys.len() > MAX_PLOT_KEYS {
        return Err(Error::TooManyDimensions { requested: keys.len(), max: MAX_PLOT_KEYS });
    }

    let weight = opts.weight_column.as_deref();
    let groups = group(table, keys, weight)?;
    let total = groups.iter().map(|g| g.n).sum();
    let mode = SortMode::from_alphabetical(opts.alphabetical_sort);
    let names = keys.iter().map(|k| (*k).to_string()).collect();
    let ranked = FrequencyTable::new(names, rank(groups, mode), total, mode)
        .with_weight(weight)
        .with_display_name(opts.display_name_override.as_deref())
        .with_grouped(opts.relative);

    let truncation = truncate(&ranked, opts.top);
    if truncation.is_truncated() {
        diag.info(truncation.annotation.clone());
    }

    let mut chart = None;
    let mut exported = None;
    if opts.render_plot {
        let plotted = if opts.drop_missing_in_plot {
            ranked.filter(|r| !r.keys.iter().any(Value::is_missing))
        } else {
            ranked.clone()
        };
        let plot_cut = truncate(&plotted, opts.top);
        let (source, drawn) = if needs_composite(&plotted) {
            (&plotted, plotted.observed_total())
        } else {
            (&plot_cut.table, plot_cut.kept_n())
        };
        let mut compose_opts = ComposeOptions {
            style: opts.style.clone(),
            title: opts.title_override.clone(),
            subtitle: opts.subtitle_override.clone(),
            drop_missing: opts.drop_missing_in_plot,
            composite_top: opts.top.limit().unwrap_or(MultiOptions::DEFAULT_TOP),
            ..ComposeOptions::default()
        }
        .truncation(&plot_cut);
        compose_opts.caption = Some(observed_caption(drawn, ranked.total()));
        let composed = compose(source, &compose_opts)?;
        if opts.save_to_file {
            exported = Some(opts.exporter().export(&composed, &opts.output_name, keys)?);
        }
        chart = Some(composed);
    }

    let table = (opts.return_table || !opts.render_plot).then_some(truncation.table);
    Ok(FreqsReport { table, chart, scan: None, exported, diagnostics: diag.into_messages() })
}

/// Scan every column of `table` (whole-table mode).
///
/// With `plot` set a composition chart is attached; with `save_to_file` it is
/// exported as SVG under the current directory.
///
/// # Errors
///
/// Returns an error for an empty table or a failed export.
pub fn freqs_df(table: &Table, opts: &ScanOptions) -> Result<ScanReport> {
    let mut diag = Diagnostics::new(opts.quiet);
    let exporter = Exporter::default().subdirectory(opts.output_subdirectory.as_deref());
    let report = scan_report(table, opts, &ChartStyle::default(), &exporter, "data", &mut diag)?;
    Ok(ScanReport { diagnostics: diag.into_messages(), ..report })
}

/// Composite view of many-key combinations.
///
/// # Errors
///
/// Returns an error if a key or the weight column is invalid.
pub fn freqs_plot(table: &Table, keys: &[&str], opts: &MultiOptions) -> Result<Chart> {
    compose_multi(table, keys, opts)
}

fn scan_report(
    table: &Table,
    opts: &ScanOptions,
    style: &ChartStyle,
    exporter: &Exporter,
    base: &str,
    diag: &mut Diagnostics,
) -> Result<ScanReport> {
    let mut report = scan::scan_with(table, opts, diag)?;
    if opts.plot {
        let chart = match &report.table {
            Some(scanned) => compose_composition(scanned, style)?,
            None => empty_composition(style),
        };
        if opts.save_to_file {
            report.exported = Some(exporter.export(&chart, base, &[])?);
        }
        report.chart = Some(chart);
    }
    Ok(report)
}
