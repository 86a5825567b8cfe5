//! Backend-independent drawing primitives.
//!
//! Charts are laid out once into a [`Scene`]; the SVG writer and the raster
//! canvas both consume it.

use crate::color::Rgba;

/// Text anchor position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

/// A drawing primitive.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Shape {
    /// Filled rectangle, optionally outlined.
    Rect { x: f32, y: f32, width: f32, height: f32, fill: Rgba, stroke: Option<Rgba> },
    /// Straight line.
    Line { x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32 },
    /// Filled circle.
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Single line of text; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        bold: bool,
    },
}

/// A laid-out chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background color.
    pub background: Rgba,
    /// Shapes in painting order.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self { width, height, background, shapes: Vec::new() }
    }

    /// Add a filled rectangle; degenerate sizes are skipped.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgba) {
        if width > 0.0 && height > 0.0 {
            self.shapes.push(Shape::Rect { x, y, width, height, fill, stroke: None });
        }
    }

    /// Add an outlined rectangle.
    pub fn rect_outlined(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgba,
        stroke: Rgba,
    ) {
        if width > 0.0 && height > 0.0 {
            self.shapes.push(Shape::Rect { x, y, width, height, fill, stroke: Some(stroke) });
        }
    }

    /// Add a line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32) {
        self.shapes.push(Shape::Line { x1, y1, x2, y2, stroke, stroke_width });
    }

    /// Add a filled circle.
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Rgba) {
        self.shapes.push(Shape::Circle { cx, cy, r, fill });
    }

    /// Add text.
    pub fn text(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
    ) {
        if !text.is_empty() {
            self.shapes.push(Shape::Text {
                x,
                y,
                text: text.to_string(),
                font_size,
                fill,
                anchor,
                bold: false,
            });
        }
    }

    /// Add bold text.
    pub fn heading(&mut self, x: f32, y: f32, text: &str, font_size: f32, fill: Rgba) {
        if !text.is_empty() {
            self.shapes.push(Shape::Text {
                x,
                y,
                text: text.to_string(),
                font_size,
                fill,
                anchor: TextAnchor::Start,
                bold: true,
            });
        }
    }

    /// Text shapes, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
