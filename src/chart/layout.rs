//! Chart geometry: lays a [`Chart`] out into a [`Scene`].

use crate::format::format_pct;
use crate::output::scene::{Scene, TextAnchor};

use super::compose::{LabelPlacement, LabelTone, PlotSpec};
use super::composition::CompositionSpec;
use super::facet::Layout;
use super::multi::CompositeSpec;
use super::{Chart, ChartKind, Theme, Titles};

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.6;

/// Space between panels.
const GAP: f32 = 6.0;

/// Plotting area left after titles and caption.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Frame {
    fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }
}

fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_WIDTH
}

/// Width of a label gutter fitting `labels`, capped at `max`.
fn gutter_width<'a>(labels: impl Iterator<Item = &'a str>, font_size: f32, max: f32) -> f32 {
    labels.map(|l| text_width(l, font_size)).fold(0.0, f32::max).min(max) + GAP
}

pub(crate) fn scene(chart: &Chart) -> Scene {
    let style = chart.style();
    let theme = &style.theme;
    let mut scene = Scene::new(style.width, style.height, theme.background);
    let frame = header(&mut scene, chart.titles(), theme);
    match chart.kind() {
        ChartKind::Bars(spec) => bars(&mut scene, spec, theme, frame),
        ChartKind::Composite(spec) => composite(&mut scene, spec, theme, frame),
        ChartKind::Composition(spec) => composition(&mut scene, spec, theme, frame),
    }
    scene
}

fn header(scene: &mut Scene, titles: &Titles, theme: &Theme) -> Frame {
    let margin = theme.margin as f32;
    let fs = theme.font_size;
    let (width, height) = (scene.width as f32, scene.height as f32);

    let mut y = (margin * 0.5).max(fs * 1.4);
    scene.heading(margin, y, &titles.title, fs * 1.4, theme.text_color);
    for line in &titles.subtitle {
        y += fs * 1.3;
        scene.text(margin, y, line, fs, theme.text_color, TextAnchor::Start);
    }

    let mut bottom = height - margin;
    if let Some(caption) = &titles.caption {
        scene.text(
            width - margin,
            height - margin * 0.4,
            caption,
            fs * 0.9,
            theme.text_color,
            TextAnchor::End,
        );
        bottom -= fs;
    }
    Frame { left: margin, top: y + fs, right: width - margin, bottom }
}

/// Panel grid dimensions (rows, cols).
fn grid_shape(spec: &PlotSpec) -> (usize, usize) {
    let panels = spec.panels.len().max(1);
    match spec.layout {
        Layout::Single => (1, 1),
        Layout::Faceted { .. } => (panels, 1),
        Layout::Grid { .. } => {
            let mut cols: Vec<_> = Vec::new();
            for panel in &spec.panels {
                if !cols.contains(&&panel.key.col) {
                    cols.push(&panel.key.col);
                }
            }
            let cols = cols.len().max(1);
            (panels.div_ceil(cols), cols)
        }
    }
}

fn bars(scene: &mut Scene, spec: &PlotSpec, theme: &Theme, frame: Frame) {
    let fs = theme.font_size;
    let top = frame.top + fs * 1.2;
    scene.text(frame.left, top - fs * 0.4, &spec.x_label, fs, theme.text_color, TextAnchor::Start);

    let (rows, cols) = grid_shape(spec);
    let cell_w = frame.width() / cols as f32;
    let cell_h = (frame.bottom - top).max(0.0) / rows as f32;
    let strip_h = if spec.layout == Layout::Single { 0.0 } else { fs * 1.6 };
    let max_n = spec.max_n();

    for (i, panel) in spec.panels.iter().enumerate() {
        let cell_x = frame.left + (i % cols) as f32 * cell_w;
        let cell_y = top + (i / cols) as f32 * cell_h;

        if let Some(strip) = panel.key.strip(&spec.layout) {
            scene.rect(cell_x, cell_y, cell_w - GAP, strip_h - 2.0, theme.strip_background);
            scene.text(
                cell_x + 4.0,
                cell_y + strip_h * 0.65,
                &strip,
                fs * 0.9,
                theme.text_color,
                TextAnchor::Start,
            );
        }

        let categories: Vec<String> = panel.bars.iter().map(|b| b.category.to_string()).collect();
        let label_fs = fs * 0.9;
        let gutter = gutter_width(categories.iter().map(String::as_str), label_fs, cell_w * 0.35);
        let (px, py) = (cell_x + gutter, cell_y + strip_h);
        let (pw, ph) = ((cell_w - gutter - GAP).max(0.0), (cell_h - strip_h - GAP).max(0.0));

        if theme.show_panel_border {
            scene.rect_outlined(px, py, pw, ph, theme.panel_background, theme.text_color);
        } else {
            scene.rect(px, py, pw, ph, theme.panel_background);
        }

        let extent = pw * 0.8;
        if theme.show_grid {
            for k in 1..=4 {
                let x = px + extent * k as f32 / 4.0;
                scene.line(x, py, x, py + ph, theme.grid_color, theme.grid_width);
            }
        }

        let band = ph / panel.bars.len().max(1) as f32;
        let bar_h = band * 0.75;
        for (j, (bar, category)) in panel.bars.iter().zip(&categories).enumerate() {
            let by = py + j as f32 * band + (band - bar_h) / 2.0;
            let len = if max_n > 0.0 { (bar.n / max_n) as f32 * extent } else { 0.0 };
            let baseline = by + bar_h / 2.0 + label_fs * 0.35;
            scene.rect(px, by, len, bar_h, bar.fill);
            scene.text(px - 4.0, baseline, category, label_fs, theme.text_color, TextAnchor::End);
            match bar.placement {
                LabelPlacement::Inside => {
                    let color = theme.tone_color(bar.tone);
                    scene.text(
                        px + len - 4.0,
                        baseline,
                        &bar.label,
                        label_fs,
                        color,
                        TextAnchor::End,
                    );
                }
                LabelPlacement::Outside => {
                    let color = theme.outside_label_color();
                    scene.text(
                        px + len + 4.0,
                        baseline,
                        &bar.label,
                        label_fs,
                        color,
                        TextAnchor::Start,
                    );
                }
            }
        }
    }
}

fn composite(scene: &mut Scene, spec: &CompositeSpec, theme: &Theme, frame: Frame) {
    let fs = theme.font_size;
    let label_fs = fs * 0.85;
    let gutter = gutter_width(
        spec.dot_rows.iter().map(String::as_str),
        label_fs,
        frame.width() * 0.35,
    );
    let px = frame.left + gutter;
    let pw = (frame.right - px).max(0.0);

    let bar_panel_h = frame.height() * 0.5;
    let axis_y = frame.top + bar_panel_h;
    let matrix_top = axis_y + fs * 1.6;
    let matrix_h = (frame.bottom - matrix_top).max(0.0);

    let col_w = pw / spec.bars.len().max(1) as f32;
    let bar_w = col_w * 0.7;
    let max_n = spec.bars.iter().map(|b| b.n).fold(0.0, f64::max);
    let usable_h = (bar_panel_h - fs * 1.4).max(0.0);

    scene.line(px, axis_y, px + pw, axis_y, theme.grid_color, theme.grid_width);
    for (i, bar) in spec.bars.iter().enumerate() {
        let cx = px + (i as f32 + 0.5) * col_w;
        let h = if max_n > 0.0 { (bar.n / max_n) as f32 * usable_h } else { 0.0 };
        scene.rect(cx - bar_w / 2.0, axis_y - h, bar_w, h, bar.fill);
        scene.text(
            cx,
            axis_y - h - 3.0,
            &format_pct(bar.p),
            label_fs,
            theme.text_color,
            TextAnchor::Middle,
        );
        scene.text(
            cx,
            axis_y + fs * 1.1,
            &bar.label,
            label_fs,
            theme.text_color,
            TextAnchor::Middle,
        );
    }

    let row_h = matrix_h / spec.dot_rows.len().max(1) as f32;
    let radius = (row_h.min(col_w) * 0.3).clamp(1.5, 6.0);
    let faint = theme.text_color.with_alpha(40);
    let row_y = |row: usize| matrix_top + (row as f32 + 0.5) * row_h;
    let col_x = |bar: usize| px + (bar as f32 + 0.5) * col_w;

    for (r, label) in spec.dot_rows.iter().enumerate() {
        let cy = row_y(r);
        scene.text(
            px - 6.0,
            cy + label_fs * 0.35,
            label,
            label_fs,
            theme.text_color,
            TextAnchor::End,
        );
        for b in 0..spec.bars.len() {
            scene.circle(col_x(b), cy, radius, faint);
        }
    }
    for b in 0..spec.bars.len() {
        let rows: Vec<usize> = spec.dots.iter().filter(|d| d.bar == b).map(|d| d.row).collect();
        if let (Some(first), Some(last)) = (rows.iter().min(), rows.iter().max()) {
            scene.line(col_x(b), row_y(*first), col_x(b), row_y(*last), theme.text_color, 1.5);
        }
    }
    for dot in &spec.dots {
        scene.circle(col_x(dot.bar), row_y(dot.row), radius, theme.text_color);
    }
}

fn composition(scene: &mut Scene, spec: &CompositionSpec, theme: &Theme, frame: Frame) {
    if spec.columns.is_empty() {
        return;
    }
    let fs = theme.font_size;
    let label_fs = fs * 0.85;
    let gutter = gutter_width(
        spec.columns.iter().map(|c| c.name.as_str()),
        fs,
        frame.width() * 0.3,
    );
    let px = frame.left + gutter;
    let pw = (frame.right - px).max(0.0);
    let band = frame.height() / spec.columns.len() as f32;
    let bar_h = band * 0.7;

    for (i, column) in spec.columns.iter().enumerate() {
        let y = frame.top + i as f32 * band + (band - bar_h) / 2.0;
        scene.text(
            px - 6.0,
            y + bar_h / 2.0 + fs * 0.35,
            &column.name,
            fs,
            theme.text_color,
            TextAnchor::End,
        );

        let total = column.total_p();
        let mut x = px;
        for segment in &column.segments {
            let w = if total > 0.0 { (segment.p / total) as f32 * pw } else { 0.0 };
            scene.rect_outlined(x, y, w, bar_h, segment.fill, theme.background);
            if w > text_width(&segment.value, label_fs) + 6.0 {
                let tone = if segment.fill.relative_luminance() < 0.35 {
                    LabelTone::Light
                } else {
                    LabelTone::Dark
                };
                let baseline = y + bar_h / 2.0 + label_fs * 0.35;
                scene.text(
                    x + w / 2.0,
                    baseline,
                    &segment.value,
                    label_fs,
                    theme.tone_color(tone),
                    TextAnchor::Middle,
                );
            }
            x += w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{compose, ComposeOptions};
    use crate::freqs::{freqs, FreqsOptions};
    use crate::output::scene::Shape;
    use crate::table::{Column, Table};

    fn chart(keys: &[&str], table: &Table) -> Chart {
        let opts = FreqsOptions::new().render_plot(true).quiet(true);
        let report = freqs(table, keys, &opts).unwrap();
        report.chart.unwrap()
    }

    fn letters() -> Table {
        Table::from_series("x", ["a", "a", "b", "c", "c", "c"])
    }

    #[test]
    fn test_bar_scene_contains_labels() {
        let scene = scene(&chart(&["x"], &letters()));
        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"Frequencies and Percentages"));
        assert!(texts.contains(&"3 (50%)"));
        assert!(texts.contains(&"c"));
    }

    #[test]
    fn test_bars_stay_inside_canvas() {
        let scene = scene(&chart(&["x"], &letters()));
        for shape in &scene.shapes {
            if let Shape::Rect { x, y, width, height, .. } = shape {
                assert!(*x >= 0.0 && *y >= 0.0);
                assert!(x + width <= scene.width as f32 + 0.01);
                assert!(y + height <= scene.height as f32 + 0.01);
            }
        }
    }

    #[test]
    fn test_longest_bar_is_widest() {
        let c = chart(&["x"], &letters());
        let fills: Vec<_> = c.as_bars().unwrap().bars().map(|b| b.fill).collect();
        let scene = scene(&c);
        let width_of = |fill| {
            scene.shapes.iter().find_map(|s| match s {
                Shape::Rect { width, fill: f, .. } if *f == fill => Some(*width),
                _ => None,
            })
        };
        assert!(width_of(fills[0]).unwrap() > width_of(fills[2]).unwrap());
    }

    #[test]
    fn test_facet_strips() {
        let t = Table::from_columns(vec![
            Column::new("x", ["a", "b", "a"]),
            Column::new("y", ["u", "u", "v"]),
        ])
        .unwrap();
        let scene = scene(&chart(&["x", "y"], &t));
        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"y: u"));
        assert!(texts.contains(&"y: v"));
    }

    #[test]
    fn test_composite_scene_has_dots() {
        let t = Table::from_columns(vec![
            Column::new("x", ["a", "a", "b", "b"]),
            Column::new("y", ["u", "v", "u", "v"]),
            Column::new("z", ["1", "2", "3", "4"]),
        ])
        .unwrap();
        let scene = scene(&chart(&["x", "y", "z"], &t));
        let circles = scene.shapes.iter().filter(|s| matches!(s, Shape::Circle { .. })).count();
        // 4 bars x 8 dot rows faint + 4 bars x 3 keys solid
        assert_eq!(circles, 4 * 8 + 4 * 3);
        assert!(scene.texts().any(|t| t == "z: 4"));
    }

    #[test]
    fn test_empty_panel_set_does_not_panic() {
        let t = Table::from_series("x", [Option::<&str>::None]);
        let freq = freqs(&t, &["x"], &FreqsOptions::new().quiet(true)).unwrap().table.unwrap();
        let chart = compose(&freq, &ComposeOptions::new().drop_missing(true)).unwrap();
        let scene = scene(&chart);
        assert!(scene.texts().any(|t| t == "Frequencies and Percentages"));
    }
}
