//! SVG output.
//!
//! Serializes a [`Scene`] to a standalone vector document.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use crate::color::Rgba;
use crate::error::Result;

use super::scene::{Scene, Shape, TextAnchor};

/// SVG document writer.
#[derive(Debug, Clone)]
pub struct SvgWriter<'a> {
    scene: &'a Scene,
}

impl<'a> SvgWriter<'a> {
    /// Writer for a laid-out scene.
    #[must_use]
    pub fn from_scene(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Render to an SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let scene = self.scene;
        let mut svg = String::with_capacity(256 + scene.shapes.len() * 96);

        let _ = writeln!(
            svg,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
                r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
            ),
            w = scene.width,
            h = scene.height
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            scene.background.to_css()
        );
        for shape in &scene.shapes {
            let _ = writeln!(svg, "  {}", shape_to_svg(shape));
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

fn stroke_attr(stroke: Option<Rgba>) -> String {
    stroke.map(|s| format!(r#" stroke="{}" stroke-width="1""#, s.to_css())).unwrap_or_default()
}

/// Escape XML special characters.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn shape_to_svg(shape: &Shape) -> String {
    match shape {
        Shape::Rect { x, y, width, height, fill, stroke } => format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"{}/>"#,
            fill.to_css(),
            stroke_attr(*stroke)
        ),
        Shape::Line { x1, y1, x2, y2, stroke, stroke_width } => format!(
            concat!(
                r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" "#,
                r#"stroke="{stroke}" stroke-width="{width}"/>"#
            ),
            x1 = x1,
            y1 = y1,
            x2 = x2,
            y2 = y2,
            stroke = stroke.to_css(),
            width = stroke_width
        ),
        Shape::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#, fill.to_css())
        }
        Shape::Text { x, y, text, font_size, fill, anchor, bold } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let weight = if *bold { r#" font-weight="bold""# } else { "" };
            format!(
                concat!(
                    r#"<text x="{x}" y="{y}" font-size="{size}" fill="{fill}" "#,
                    r#"text-anchor="{anchor}" font-family="sans-serif"{weight}>{text}</text>"#
                ),
                x = x,
                y = y,
                size = font_size,
                fill = fill.to_css(),
                anchor = anchor,
                weight = weight,
                text = escape(text)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        let mut s = Scene::new(100, 50, Rgba::WHITE);
        s.rect(10.0, 20.0, 30.0, 5.0, Rgba::rgb(255, 0, 0));
        s.line(0.0, 0.0, 100.0, 0.0, Rgba::BLACK, 2.0);
        s.circle(5.0, 5.0, 3.0, Rgba::BLACK);
        s.text(1.0, 2.0, "a < b & \"c\"", 12.0, Rgba::BLACK, TextAnchor::Middle);
        s
    }

    #[test]
    fn test_document_frame() {
        let svg = SvgWriter::from_scene(&scene()).render();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="100""#));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_shapes() {
        let svg = SvgWriter::from_scene(&scene()).render();
        assert!(svg.contains(r#"<rect x="10" y="20" width="30" height="5" fill="rgb(255,0,0)"/>"#));
        assert!(svg.contains(r#"stroke-width="2""#));
        assert!(svg.contains(r#"<circle cx="5""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_text_escaped() {
        let svg = SvgWriter::from_scene(&scene()).render();
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.svg");
        SvgWriter::from_scene(&scene()).write_to_file(&path).unwrap();
        assert!(fs::read_to_string(path).unwrap().contains("<svg"));
    }
}
