//! Bar chart composition for one to three grouping keys.
//!
//! Layout follows the number of keys: one key gives a single ranked panel,
//! two keys facet by the second key, three keys lay panels out on a grid of
//! the second and third key. A third key with more than a handful of values
//! would produce unreadable grids and degrades to the composite view in
//! [`super::multi`].

use trueno::Vector;

use crate::color::{Gradient, Rgba};
use crate::error::{Error, Result};
use crate::format::{format_count, format_pct};
use crate::freqs::truncate::Truncation;
use crate::freqs::FrequencyTable;
use crate::table::Value;

use super::facet::{Layout, PanelKey};
use super::multi::{composite_chart, MultiOptions};
use super::{variable_line, Chart, ChartKind, ChartStyle, Titles, DEFAULT_TITLE};

/// Maximum number of grouping keys a chart can show.
pub const MAX_PLOT_KEYS: usize = 3;

/// Bars shorter than this share of the count range carry their label outside.
const OUTSIDE_LABEL_FRACTION: f32 = 0.35;

/// Inside labels turn light from this share of the percentage midpoint.
const LIGHT_LABEL_FRACTION: f32 = 0.9;

/// Third-key cardinality above which the grid degrades to the composite view.
const MAX_GRID_COLUMNS: usize = 3;

/// Where a bar's label sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    /// Inside the bar, near its tip.
    Inside,
    /// Past the end of the bar, left-justified.
    Outside,
}

/// Label color class, resolved against the theme at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTone {
    /// For dark fills.
    Light,
    /// For light fills and the panel background.
    Dark,
}

/// One bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Value of the first key (the bar's axis category).
    pub category: Value,
    /// Count.
    pub n: f64,
    /// Percentage of the grand total.
    pub p: f64,
    /// Label text, e.g. `3 (50%)`.
    pub label: String,
    /// Label position.
    pub placement: LabelPlacement,
    /// Label tone.
    pub tone: LabelTone,
    /// Fill color.
    pub fill: Rgba,
}

/// Bars of one facet panel, in drawing order (top first).
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Facet values of this panel.
    pub key: PanelKey,
    /// Bars, largest first.
    pub bars: Vec<Bar>,
}

/// A bar chart ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    /// Panel arrangement.
    pub layout: Layout,
    /// Axis label of the bar categories.
    pub x_label: String,
    /// Panels in row-major order.
    pub panels: Vec<Panel>,
}

impl PlotSpec {
    /// All bars across panels.
    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.panels.iter().flat_map(|p| p.bars.iter())
    }

    /// Largest count, used as the common axis extent.
    #[must_use]
    pub fn max_n(&self) -> f64 {
        self.bars().map(|b| b.n).fold(0.0, f64::max)
    }
}

/// Options for [`compose`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    /// Visual style.
    pub style: ChartStyle,
    /// Replaces the default title.
    pub title: Option<String>,
    /// Replaces the generated subtitle.
    pub subtitle: Option<String>,
    /// Truncation note added to the subtitle.
    pub annotation: Option<String>,
    /// Caption, usually the observed-subset caption.
    pub caption: Option<String>,
    /// Remove rows with a missing key before composing.
    pub drop_missing: bool,
    /// Groups kept by the composite view before the tail.
    pub composite_top: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            style: ChartStyle::default(),
            title: None,
            subtitle: None,
            annotation: None,
            caption: None,
            drop_missing: false,
            composite_top: MultiOptions::DEFAULT_TOP,
        }
    }
}

impl ComposeOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style.
    #[must_use]
    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Override the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Override the subtitle.
    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Drop rows with missing keys.
    #[must_use]
    pub fn drop_missing(mut self, drop: bool) -> Self {
        self.drop_missing = drop;
        self
    }

    /// Take the annotation and caption from a truncation.
    #[must_use]
    pub fn truncation(mut self, truncation: &Truncation) -> Self {
        self.annotation = truncation.is_truncated().then(|| truncation.annotation.clone());
        self.caption = Some(truncation.caption());
        self
    }
}

/// Whether `table` will be drawn as the composite view rather than a grid.
#[must_use]
pub fn needs_composite(table: &FrequencyTable) -> bool {
    table.key_names().len() == MAX_PLOT_KEYS
        && table.distinct_key_values(MAX_PLOT_KEYS - 1).len() > MAX_GRID_COLUMNS
}

/// Compose a bar chart from a ranked frequency table.
///
/// # Errors
///
/// Returns [`Error::NoGroupingKeys`] for a keyless table and
/// [`Error::TooManyDimensions`] for more than three keys.
pub fn compose(table: &FrequencyTable, opts: &ComposeOptions) -> Result<Chart> {
    let requested = table.key_names().len();
    if requested == 0 {
        return Err(Error::NoGroupingKeys);
    }
    if requested > MAX_PLOT_KEYS {
        return Err(Error::TooManyDimensions { requested, max: MAX_PLOT_KEYS });
    }

    let dropped;
    let table = if opts.drop_missing {
        dropped = table.filter(|r| !r.keys.iter().any(Value::is_missing));
        &dropped
    } else {
        table
    };

    if needs_composite(table) {
        tracing::debug!(
            target: "trueno_freqs",
            third_key = %table.key_names()[2],
            values = table.distinct_key_values(2).len(),
            "third key too wide for a grid, using composite view"
        );
        let mut multi = MultiOptions::new().top(opts.composite_top).style(opts.style.clone());
        multi.title.clone_from(&opts.title);
        multi.subtitle.clone_from(&opts.subtitle);
        return Ok(composite_chart(table, &multi));
    }

    let key_names = table.key_names();
    let layout = match key_names {
        [_] => Layout::single(),
        [_, rows] => Layout::faceted(rows),
        [_, rows, cols] => Layout::grid(rows, cols),
        _ => return Err(Error::TooManyDimensions { requested, max: MAX_PLOT_KEYS }),
    };
    tracing::debug!(target: "trueno_freqs", ?layout, rows = table.len(), "composing bar chart");

    let mut panels = match &layout {
        Layout::Single => vec![Panel { key: PanelKey::whole(), bars: bars_for(table, |_| true) }],
        Layout::Faceted { .. } => table
            .distinct_key_values(1)
            .into_iter()
            .map(|row| Panel {
                key: PanelKey { row: Some(row.clone()), col: None },
                bars: bars_for(table, |keys| &keys[1] == row),
            })
            .collect(),
        Layout::Grid { .. } => {
            let cols = table.distinct_key_values(2);
            table
                .distinct_key_values(1)
                .into_iter()
                .flat_map(|row| cols.iter().map(move |col| (row, *col)))
                .map(|(row, col)| Panel {
                    key: PanelKey { row: Some(row.clone()), col: Some(col.clone()) },
                    bars: bars_for(table, |keys| &keys[1] == row && &keys[2] == col),
                })
                .collect()
        }
    };
    decorate(&mut panels, opts.style.gradient);

    let spec = PlotSpec {
        layout,
        x_label: table.primary_label().to_string(),
        panels,
    };
    Ok(Chart::new(ChartKind::Bars(spec), titles(table, opts), opts.style.clone()))
}

/// Bars for rows whose keys match, largest count first.
fn bars_for(table: &FrequencyTable, matches: impl Fn(&[Value]) -> bool) -> Vec<Bar> {
    let mut bars: Vec<Bar> = table
        .rows()
        .iter()
        .filter(|r| matches(&r.keys))
        .map(|r| Bar {
            category: r.keys[0].clone(),
            n: r.n,
            p: r.p,
            label: format!("{} ({})", format_count(r.n), format_pct(r.p)),
            placement: LabelPlacement::Inside,
            tone: LabelTone::Dark,
            fill: Rgba::TRANSPARENT,
        })
        .collect();
    bars.sort_by(|a, b| b.n.total_cmp(&a.n));
    bars
}

/// Assign label placement, tone and fill over all panels at once.
fn decorate(panels: &mut [Panel], gradient: Gradient) {
    let ns: Vec<f32> = panels.iter().flat_map(|p| &p.bars).map(|b| b.n as f32).collect();
    if ns.is_empty() {
        return;
    }
    let ps: Vec<f32> = panels.iter().flat_map(|p| &p.bars).map(|b| b.p as f32).collect();

    let ns = Vector::from_vec(ns);
    let ps = Vector::from_vec(ps);
    let n_min = ns.min().unwrap_or(0.0);
    let n_max = ns.max().unwrap_or(0.0);
    let p_min = ps.min().unwrap_or(0.0);
    let p_max = ps.max().unwrap_or(0.0);

    let outside_below = n_min + OUTSIDE_LABEL_FRACTION * (n_max - n_min);
    let light_from = LIGHT_LABEL_FRACTION * (p_min + p_max) / 2.0;

    for bar in panels.iter_mut().flat_map(|p| p.bars.iter_mut()) {
        bar.placement = if (bar.n as f32) < outside_below {
            LabelPlacement::Outside
        } else {
            LabelPlacement::Inside
        };
        bar.tone = match bar.placement {
            LabelPlacement::Inside if bar.p as f32 >= light_from => LabelTone::Light,
            _ => LabelTone::Dark,
        };
        let t = if p_max > 0.0 { bar.p as f32 / p_max } else { 0.0 };
        bar.fill = gradient.at(t);
    }
}

fn titles(table: &FrequencyTable, opts: &ComposeOptions) -> Titles {
    let subtitle = match &opts.subtitle {
        Some(text) => vec![text.clone()],
        None => {
            let mut names: Vec<&str> = table.key_names().iter().map(String::as_str).collect();
            names[0] = table.primary_label();
            let mut lines = vec![variable_line(&names)];
            lines.extend(opts.annotation.iter().filter(|a| !a.is_empty()).cloned());
            if let Some(weight) = table.weight() {
                lines.push(format!("Weighted by {weight}"));
            }
            lines
        }
    };
    Titles {
        title: opts.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        subtitle,
        caption: opts.caption.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freqs::group::group;
    use crate::freqs::rank::{rank, SortMode};
    use crate::freqs::truncate::{truncate, Top};
    use crate::table::{Column, Table};

    fn ranked(table: &Table, keys: &[&str]) -> FrequencyTable {
        let groups = group(table, keys, None).unwrap();
        let total = groups.iter().map(|g| g.n).sum();
        let names = keys.iter().map(|k| (*k).to_string()).collect();
        let mode = SortMode::ByCountDesc;
        FrequencyTable::new(names, rank(groups, mode), total, mode)
    }

    fn letters() -> Table {
        Table::from_series("x", ["a", "a", "b", "c", "c", "c"])
    }

    #[test]
    fn test_single_key_chart() {
        let chart = compose(&ranked(&letters(), &["x"]), &ComposeOptions::new()).unwrap();
        let spec = chart.as_bars().unwrap();
        assert_eq!(spec.layout, Layout::Single);
        let labels: Vec<&str> = spec.bars().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["3 (50%)", "2 (33.33%)", "1 (16.67%)"]);
        assert_eq!(chart.titles().title, DEFAULT_TITLE);
        assert_eq!(chart.titles().subtitle, vec!["Variable: x".to_string()]);
    }

    #[test]
    fn test_label_placement_and_tone() {
        let chart = compose(&ranked(&letters(), &["x"]), &ComposeOptions::new()).unwrap();
        let bars: Vec<&Bar> = chart.as_bars().unwrap().bars().collect();
        // range 1..3: outside below 1.7
        assert_eq!(bars[0].placement, LabelPlacement::Inside);
        assert_eq!(bars[1].placement, LabelPlacement::Inside);
        assert_eq!(bars[2].placement, LabelPlacement::Outside);
        // p midpoint 33.335: light from 30.0
        assert_eq!(bars[0].tone, LabelTone::Light);
        assert_eq!(bars[1].tone, LabelTone::Light);
        assert_eq!(bars[2].tone, LabelTone::Dark);
    }

    #[test]
    fn test_fill_darkens_with_share() {
        let chart = compose(&ranked(&letters(), &["x"]), &ComposeOptions::new()).unwrap();
        let bars: Vec<&Bar> = chart.as_bars().unwrap().bars().collect();
        assert!(bars[0].fill.relative_luminance() < bars[2].fill.relative_luminance());
    }

    #[test]
    fn test_two_keys_facet_by_second() {
        let t = Table::from_columns(vec![
            Column::new("x", ["a", "b", "b", "a", "a", "c"]),
            Column::new("y", ["u", "u", "u", "v", "u", "v"]),
        ])
        .unwrap();
        let chart = compose(&ranked(&t, &["x", "y"]), &ComposeOptions::new()).unwrap();
        let spec = chart.as_bars().unwrap();
        assert_eq!(spec.layout, Layout::faceted("y"));
        assert_eq!(spec.panels.len(), 2);
        assert_eq!(spec.panels[0].key.row, Some(Value::from("u")));
        let cats: Vec<String> =
            spec.panels[0].bars.iter().map(|b| b.category.to_string()).collect();
        assert_eq!(cats, vec!["a", "b"]);
        assert_eq!(chart.titles().subtitle[0], "x grouped by y");
    }

    #[test]
    fn test_three_keys_grid() {
        let t = Table::from_columns(vec![
            Column::new("x", ["a", "b", "a", "b"]),
            Column::new("y", ["u", "u", "v", "v"]),
            Column::new("z", ["p", "q", "p", "q"]),
        ])
        .unwrap();
        let chart = compose(&ranked(&t, &["x", "y", "z"]), &ComposeOptions::new()).unwrap();
        let spec = chart.as_bars().unwrap();
        assert_eq!(spec.layout, Layout::grid("y", "z"));
        assert_eq!(spec.panels.len(), 4);
        assert_eq!(chart.titles().subtitle[0], "x grouped by y and z");
    }

    #[test]
    fn test_wide_third_key_degrades() {
        let t = Table::from_columns(vec![
            Column::new("x", ["a", "a", "b", "b", "a"]),
            Column::new("y", ["u", "v", "u", "v", "u"]),
            Column::new("z", ["1", "2", "3", "4", "1"]),
        ])
        .unwrap();
        let freq = ranked(&t, &["x", "y", "z"]);
        assert!(needs_composite(&freq));
        let chart = compose(&freq, &ComposeOptions::new()).unwrap();
        assert!(chart.as_composite().is_some());
    }

    #[test]
    fn test_four_keys_rejected() {
        let t = Table::from_columns(vec![
            Column::new("a", ["1"]),
            Column::new("b", ["1"]),
            Column::new("c", ["1"]),
            Column::new("d", ["1"]),
        ])
        .unwrap();
        let err = compose(&ranked(&t, &["a", "b", "c", "d"]), &ComposeOptions::new()).unwrap_err();
        assert!(matches!(err, Error::TooManyDimensions { requested: 4, max: 3 }));
        assert!(err.to_string().contains("too complex to visualize"));
    }

    #[test]
    fn test_drop_missing() {
        let t = Table::from_series("x", [Some("a"), None, Some("a")]);
        let opts = ComposeOptions::new().drop_missing(true);
        let chart = compose(&ranked(&t, &["x"]), &opts).unwrap();
        assert!(chart.as_bars().unwrap().bars().all(|b| !b.category.is_missing()));
    }

    #[test]
    fn test_titles_with_truncation_and_overrides() {
        let freq = ranked(&letters(), &["x"])
            .with_weight(Some("w"))
            .with_display_name(Some("Letter"));
        let cut = truncate(&freq, Top::N(2));
        let chart = compose(&cut.table, &ComposeOptions::new().truncation(&cut)).unwrap();
        let titles = chart.titles();
        assert_eq!(titles.subtitle[0], "Variable: Letter");
        assert!(titles.subtitle[1].starts_with("Most frequent 2 out of 3"));
        assert_eq!(titles.subtitle[2], "Weighted by w");
        assert_eq!(titles.caption.as_deref(), Some("Observed: 5 of 6 (83.3%)"));
        assert_eq!(chart.as_bars().unwrap().x_label, "Letter");

        let custom = compose(&cut.table, &ComposeOptions::new().title("T").subtitle("S")).unwrap();
        assert_eq!(custom.titles().title, "T");
        assert_eq!(custom.titles().subtitle, vec!["S".to_string()]);
    }
}
