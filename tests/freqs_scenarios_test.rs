//! Scenario Tests - End-to-End Frequency Tables and Charts
//!
//! Each test drives the public API the way a caller would: build a table,
//! call `freqs`/`freqs_df`/`freqs_plot`, inspect the report.
//!
//! Run: cargo test --test freqs_scenarios_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use approx::assert_relative_eq;

use trueno_freqs::chart::{ChartKind, Layout};
use trueno_freqs::freqs::{ExclusionReason, ScanOptions, SortMode, Top};
use trueno_freqs::output::ImageFormat;
use trueno_freqs::prelude::*;

fn letters() -> Table {
    Table::from_series("x", ["a", "a", "b", "c", "c", "c"])
}

fn quiet() -> FreqsOptions {
    FreqsOptions::new().quiet(true)
}

fn row_tuple(table: &FrequencyTable) -> Vec<(String, f64, f64, f64, usize)> {
    table
        .rows()
        .iter()
        .map(|r| (r.keys[0].to_string(), r.n, r.p, r.pcum, r.order))
        .collect()
}

// ============================================================================
// SCENARIO A: descending counts
// ============================================================================

#[test]
fn scenario_a_ranked_by_count() {
    let report = freqs(&letters(), &["x"], &quiet()).unwrap();
    let table = report.table.unwrap();
    assert_eq!(
        row_tuple(&table),
        vec![
            ("c".to_string(), 3.0, 50.0, 50.0, 1),
            ("a".to_string(), 2.0, 33.33, 83.33, 2),
            ("b".to_string(), 1.0, 16.67, 100.0, 3),
        ]
    );
    assert_eq!(table.sort_mode(), SortMode::ByCountDesc);
}

// ============================================================================
// SCENARIO B: alphabetical
// ============================================================================

#[test]
fn scenario_b_alphabetical() {
    let report = freqs(&letters(), &["x"], &quiet().alphabetical_sort(true)).unwrap();
    let table = report.table.unwrap();
    let keys: Vec<String> = table.rows().iter().map(|r| r.keys[0].to_string()).collect();
    let orders: Vec<usize> = table.rows().iter().map(|r| r.order).collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert_eq!(orders, [1, 2, 3]);
    assert_relative_eq!(table.rows()[0].p, 33.33);
}

// ============================================================================
// SCENARIO C: truncation
// ============================================================================

#[test]
fn scenario_c_top_two() {
    let report = freqs(&letters(), &["x"], &FreqsOptions::new().top(Top::N(2))).unwrap();
    let table = report.table.unwrap();
    let keys: Vec<String> = table.rows().iter().map(|r| r.keys[0].to_string()).collect();
    assert_eq!(keys, ["c", "a"]);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].contains("2 out of 3"));
    assert!(report.diagnostics[0].contains("excluded n = 1"));
}

#[test]
fn scenario_c_alphabetical_annotation() {
    let opts = FreqsOptions::new().top(1).alphabetical_sort(true);
    let report = freqs(&letters(), &["x"], &opts).unwrap();
    assert!(report.diagnostics[0].contains("alphabetically"));
    assert_eq!(report.table.unwrap().rows()[0].keys[0].to_string(), "a");
}

#[test]
fn scenario_c_quiet_still_records_annotation() {
    let report = freqs(&letters(), &["x"], &quiet().top(2)).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.table.unwrap().len(), 2);
}

#[test]
fn scenario_c_caption_on_chart() {
    let opts = quiet().top(2).render_plot(true);
    let chart = freqs(&letters(), &["x"], &opts).unwrap().chart.unwrap();
    assert_eq!(chart.titles().caption.as_deref(), Some("Observed: 5 of 6 (83.3%)"));
    assert!(chart.titles().subtitle_text().contains("2 out of 3"));
    let drawn: f64 = chart.as_bars().unwrap().bars().map(|b| b.n).sum();
    assert_relative_eq!(drawn, 5.0);
}

#[test]
fn scenario_c_caption_counts_drawn_bars_when_missing_dropped() {
    let values = [Some("a"), Some("a"), Some("a"), None, None, Some("b"), Some("c")];
    let t = Table::from_series("x", values);
    let opts = quiet().top(2).render_plot(true).return_table(true).drop_missing_in_plot(true);
    let report = freqs(&t, &["x"], &opts).unwrap();
    let chart = report.chart.unwrap();
    let bars: Vec<String> =
        chart.as_bars().unwrap().bars().map(|b| b.category.to_string()).collect();
    assert_eq!(bars, ["a", "b"]);
    assert_eq!(chart.titles().caption.as_deref(), Some("Observed: 4 of 7 (57.1%)"));
    let table = report.table.unwrap();
    assert!(table.rows()[1].keys[0].is_missing());
}

// ============================================================================
// SCENARIO D: whole-table scan
// ============================================================================

#[test]
fn scenario_d_unique_ids_excluded() {
    let t = Table::from_columns(vec![
        Column::new("id", (1..=10).map(f64::from)),
        Column::new("group", ["a", "a", "b", "b", "b", "c", "c", "a", "b", "c"]),
    ])
    .unwrap();
    let report = freqs_df(&t, &ScanOptions::new().max_variance_ratio(0.9)).unwrap();
    assert_eq!(report.exclusions.columns(ExclusionReason::TooManyDistinct), ["id"]);
    assert_eq!(report.retained, ["group"]);
    assert!(report.diagnostics.iter().any(|d| d.contains("id")));
}

#[test]
fn scenario_d_everything_excluded_is_advisory() {
    let t = Table::from_columns(vec![
        Column::new("id", [1.0, 2.0, 3.0]),
        Column::new("constant", ["k", "k", "k"]),
    ])
    .unwrap();
    let report = freqs_df(&t, &ScanOptions::new().plot(true)).unwrap();
    assert!(report.table.is_none());
    assert!(report.chart.unwrap().as_composition().unwrap().columns.is_empty());
    assert!(report.diagnostics.iter().any(|d| d.contains("No columns left")));
}

#[test]
fn scenario_d_zero_keys_through_freqs() {
    let t = Table::from_columns(vec![
        Column::new("g", ["a", "b", "a", "b"]),
        Column::new("h", ["u", "u", "v", "v"]),
    ])
    .unwrap();
    let report = freqs(&t, &[], &quiet().render_plot(true)).unwrap();
    let spec = report.chart.unwrap();
    let spec = spec.as_composition().unwrap();
    assert_eq!(spec.columns.len(), 2);
    for column in &spec.columns {
        assert_relative_eq!(column.total_p(), 100.0, epsilon = 0.1);
    }
}

// ============================================================================
// SCENARIO E: degrade to the composite view
// ============================================================================

fn three_keys(third_levels: usize) -> Table {
    let n = 60;
    let x: Vec<String> = (0..n).map(|i| format!("x{}", i % 2)).collect();
    let y: Vec<String> = (0..n).map(|i| format!("y{}", i % 3)).collect();
    let z: Vec<String> = (0..n).map(|i| format!("z{}", i % third_levels)).collect();
    Table::from_columns(vec![Column::new("x", x), Column::new("y", y), Column::new("z", z)])
        .unwrap()
}

#[test]
fn scenario_e_high_cardinality_third_key() {
    let report = freqs(&three_keys(5), &["x", "y", "z"], &quiet().render_plot(true)).unwrap();
    let chart = report.chart.unwrap();
    assert!(matches!(chart.kind(), ChartKind::Composite(_)));
    let spec = chart.as_composite().unwrap();
    assert!(spec.dot_rows.iter().any(|r| r.starts_with("z: ")));
}

#[test]
fn scenario_e_composite_follows_top() {
    let opts = quiet().render_plot(true).top(Top::N(3));
    let chart = freqs(&three_keys(5), &["x", "y", "z"], &opts).unwrap().chart.unwrap();
    let spec = chart.as_composite().unwrap();
    assert_eq!(spec.bars.iter().filter(|b| !b.is_tail).count(), 3);
    assert!(spec.bars.last().unwrap().is_tail);

    let opts = quiet().render_plot(true).top(Top::All);
    let chart = freqs(&three_keys(5), &["x", "y", "z"], &opts).unwrap().chart.unwrap();
    let regular = chart.as_composite().unwrap().bars.iter().filter(|b| !b.is_tail).count();
    assert_eq!(regular, MultiOptions::DEFAULT_TOP);
}

/// 48 rows; the fourth `z` level is missing, so only three remain once dropped.
fn three_keys_with_missing_level() -> Table {
    let n = 48;
    let x: Vec<String> = (0..n).map(|i| format!("x{}", i % 2)).collect();
    let y: Vec<String> = (0..n).map(|i| format!("y{}", i % 3)).collect();
    let z: Vec<Option<String>> =
        (0..n).map(|i| Some((i / 6) % 4).filter(|&k| k < 3).map(|k| format!("z{k}"))).collect();
    Table::from_columns(vec![Column::new("x", x), Column::new("y", y), Column::new("z", z)])
        .unwrap()
}

#[test]
fn scenario_e_dropping_missing_third_level_gives_grid() {
    let opts = quiet().top(2).render_plot(true).drop_missing_in_plot(true);
    let chart = freqs(&three_keys_with_missing_level(), &["x", "y", "z"], &opts)
        .unwrap()
        .chart
        .unwrap();
    let spec = chart.as_bars().unwrap();
    assert!(matches!(spec.layout, Layout::Grid { .. }));
    assert_eq!(spec.bars().count(), 2);
    assert!(spec.bars().all(|b| !b.category.is_missing()));
    let drawn: f64 = spec.bars().map(|b| b.n).sum();
    assert_relative_eq!(drawn, 4.0);
    assert_eq!(chart.titles().caption.as_deref(), Some("Observed: 4 of 48 (8.3%)"));
}

#[test]
fn scenario_e_low_cardinality_third_key_is_grid() {
    let report = freqs(&three_keys(3), &["x", "y", "z"], &quiet().render_plot(true)).unwrap();
    let chart = report.chart.unwrap();
    let spec = chart.as_bars().unwrap();
    assert!(matches!(spec.layout, Layout::Grid { .. }));
}

// ============================================================================
// SCENARIO F: four keys
// ============================================================================

fn four_keys() -> Table {
    Table::from_columns(vec![
        Column::new("a", ["1", "1", "2"]),
        Column::new("b", ["u", "v", "u"]),
        Column::new("c", ["p", "p", "q"]),
        Column::new("d", ["s", "t", "t"]),
    ])
    .unwrap()
}

#[test]
fn scenario_f_plot_rejected() {
    let err = freqs(&four_keys(), &["a", "b", "c", "d"], &quiet().render_plot(true)).unwrap_err();
    assert!(matches!(err, Error::TooManyDimensions { requested: 4, max: 3 }));
    assert!(err.to_string().contains("too complex to visualize"));
}

#[test]
fn scenario_f_table_allowed() {
    let report = freqs(&four_keys(), &["a", "b", "c", "d"], &quiet()).unwrap();
    let table = report.table.unwrap();
    assert_eq!(table.key_names().len(), 4);
    assert_eq!(table.len(), 3);
    let header = table.to_csv_string();
    assert!(header.starts_with("a,b,c,d,n,p,pcum,order"));
}

// ============================================================================
// WEIGHTS, MISSING VALUES, ERRORS
// ============================================================================

#[test]
fn weighted_counts() {
    let t = Table::from_columns(vec![
        Column::new("x", ["a", "b", "a"]),
        Column::new("w", [1.5, 4.0, 0.5]),
    ])
    .unwrap();
    let report = freqs(&t, &["x"], &quiet().weight_column("w").render_plot(true).return_table(true))
        .unwrap();
    let table = report.table.unwrap();
    assert_eq!(table.rows()[0].keys[0].to_string(), "b");
    assert_relative_eq!(table.rows()[0].n, 4.0);
    assert_relative_eq!(table.rows()[1].n, 2.0);
    assert!(report.chart.unwrap().titles().subtitle_text().contains("Weighted by w"));
}

#[test]
fn missing_is_a_group() {
    let t = Table::from_series("x", vec![Value::from("a"), Value::Missing, Value::Missing]);
    let table = freqs(&t, &["x"], &quiet()).unwrap().table.unwrap();
    assert!(table.rows()[0].keys[0].is_missing());
    assert_relative_eq!(table.rows()[0].n, 2.0);
}

#[test]
fn missing_dropped_from_plot_only() {
    let t = Table::from_series("x", vec![Value::from("a"), Value::Missing, Value::Missing]);
    let opts = quiet().render_plot(true).return_table(true).drop_missing_in_plot(true);
    let report = freqs(&t, &["x"], &opts).unwrap();
    assert_eq!(report.table.unwrap().len(), 2);
    assert_eq!(report.chart.unwrap().as_bars().unwrap().bars().count(), 1);
}

#[test]
fn unknown_column_rejected() {
    assert!(matches!(freqs(&letters(), &["nope"], &quiet()), Err(Error::UnknownColumn(_))));
}

#[test]
fn non_numeric_weight_rejected() {
    let t = Table::from_columns(vec![Column::new("x", ["a"]), Column::new("w", ["heavy"])])
        .unwrap();
    assert!(matches!(
        freqs(&t, &["x"], &quiet().weight_column("w")),
        Err(Error::NonNumericWeight(_))
    ));
}

// ============================================================================
// OVERRIDES AND EXPORT
// ============================================================================

#[test]
fn title_and_display_name_overrides() {
    let opts = quiet()
        .render_plot(true)
        .title_override("Letters")
        .display_name_override("Letter");
    let chart = freqs(&letters(), &["x"], &opts).unwrap().chart.unwrap();
    assert_eq!(chart.titles().title, "Letters");
    assert!(chart.titles().subtitle_text().contains("Letter"));
    assert_eq!(chart.as_bars().unwrap().x_label, "Letter");
}

#[test]
fn export_png_into_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    let opts = quiet()
        .render_plot(true)
        .save_to_file(true)
        .output_root(dir.path())
        .output_subdirectory("plots")
        .output_name("letters")
        .image_format(ImageFormat::Png);
    let report = freqs(&letters(), &["x"], &opts).unwrap();
    let path = report.exported.unwrap();
    assert_eq!(path, dir.path().join("plots").join("viz_letters_x.png"));
    let bytes = std::fs::read(path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn composite_view_directly() {
    let chart = freqs_plot(&three_keys(5), &["x", "y", "z"], &MultiOptions::new().top(4)).unwrap();
    let spec = chart.as_composite().unwrap();
    assert_eq!(spec.bars.len(), 5);
    assert!(spec.bars.last().unwrap().is_tail);
    assert!(chart.to_svg().contains("(Tail)"));
}
