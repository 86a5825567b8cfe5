//! Stacked composition chart for whole-table scans.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::freqs::scan::HF_LABEL;
use crate::freqs::FrequencyTable;

use super::{Chart, ChartKind, ChartStyle, Titles, DEFAULT_TITLE};

const HF_FILL: Rgba = Rgba::rgb(190, 190, 190);

/// One value's share of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Value label (`NA` for missing, `(HF)` for the collapsed bucket).
    pub value: String,
    /// Count.
    pub n: f64,
    /// Share of the column's rows.
    pub p: f64,
    /// Fill color.
    pub fill: Rgba,
}

/// One 100%-stacked bar.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionColumn {
    /// Column name.
    pub name: String,
    /// Segments, largest first.
    pub segments: Vec<Segment>,
}

impl CompositionColumn {
    /// Sum of segment shares; 100 up to rounding.
    #[must_use]
    pub fn total_p(&self) -> f64 {
        self.segments.iter().map(|s| s.p).sum()
    }
}

/// All stacked bars of a scan chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionSpec {
    /// Columns in table order.
    pub columns: Vec<CompositionColumn>,
}

/// Compose a composition chart from a scan table (keys `column, value`).
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] if `table` is not in long scan format.
pub fn compose_composition(table: &FrequencyTable, style: &ChartStyle) -> Result<Chart> {
    if table.key_names() != ["column", "value"] {
        return Err(Error::InvalidOption(format!(
            "composition charts need (column, value) keys, got ({})",
            table.key_names().join(", ")
        )));
    }

    let columns: Vec<CompositionColumn> = table
        .distinct_key_values(0)
        .into_iter()
        .map(|column| {
            let rows: Vec<_> = table.rows().iter().filter(|r| &r.keys[0] == column).collect();
            let p_max = rows.iter().map(|r| r.p).fold(0.0, f64::max);
            let segments = rows
                .iter()
                .map(|r| {
                    let value = r.keys[1].to_string();
                    let fill = if value == HF_LABEL {
                        HF_FILL
                    } else {
                        let t = if p_max > 0.0 { (r.p / p_max) as f32 } else { 0.0 };
                        style.gradient.at(t)
                    };
                    Segment { value, n: r.n, p: r.p, fill }
                })
                .collect();
            CompositionColumn { name: column.to_string(), segments }
        })
        .collect();

    let subtitle = vec![format!("Value composition of {} columns", columns.len())];
    let titles = Titles { title: DEFAULT_TITLE.to_string(), subtitle, caption: None };
    Ok(Chart::new(ChartKind::Composition(CompositionSpec { columns }), titles, style.clone()))
}

/// Composition chart with nothing to draw.
pub(crate) fn empty_composition(style: &ChartStyle) -> Chart {
    let titles = Titles {
        title: DEFAULT_TITLE.to_string(),
        subtitle: vec!["No columns left to summarize".to_string()],
        caption: None,
    };
    Chart::new(ChartKind::Composition(CompositionSpec::default()), titles, style.clone())
}
