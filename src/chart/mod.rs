//! Chart model for frequency tables.
//!
//! A [`Chart`] is a fully composed, renderer-independent description of a
//! frequency visualization: ranked bars in one or more facet panels, the
//! composite bar + dot-matrix view for high-cardinality key sets, or the
//! stacked composition view of a whole-table scan. Rendering to SVG or PNG
//! lives in [`crate::output`].

pub mod compose;
pub mod composition;
pub mod facet;
pub(crate) mod layout;
pub mod multi;
pub mod theme;

pub use compose::{compose, Bar, ComposeOptions, LabelPlacement, LabelTone, Panel, PlotSpec};
pub use composition::{compose_composition, CompositionColumn, CompositionSpec, Segment};
pub use facet::{Layout, PanelKey};
pub use multi::{compose_multi, CompositeBar, CompositeSpec, Dot, MultiOptions, TAIL_LABEL};
pub use theme::Theme;

use crate::color::Gradient;
use crate::error::Result;
use crate::output::{raster, svg};

/// Default chart title.
pub const DEFAULT_TITLE: &str = "Frequencies and Percentages";

/// Default chart width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default chart height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Visual style shared by every chart kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ChartStyle {
    /// Theme.
    pub theme: Theme,
    /// Fill gradient.
    pub gradient: Gradient,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            gradient: Gradient::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Title, subtitle lines and caption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Titles {
    /// Main title.
    pub title: String,
    /// Subtitle lines, top to bottom.
    pub subtitle: Vec<String>,
    /// Caption below the plot.
    pub caption: Option<String>,
}

impl Titles {
    /// Subtitle lines joined by newlines.
    #[must_use]
    pub fn subtitle_text(&self) -> String {
        self.subtitle.join("\n")
    }
}

/// What a chart draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// Ranked horizontal bars, optionally faceted.
    Bars(PlotSpec),
    /// Bar panel over a dot matrix of key values.
    Composite(CompositeSpec),
    /// One 100%-stacked bar per scanned column.
    Composition(CompositionSpec),
}

/// A composed frequency chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    kind: ChartKind,
    titles: Titles,
    style: ChartStyle,
}

impl Chart {
    pub(crate) fn new(kind: ChartKind, titles: Titles, style: ChartStyle) -> Self {
        Self { kind, titles, style }
    }

    pub(crate) fn retitle(mut self, title: Option<String>) -> Self {
        if let Some(title) = title {
            self.titles.title = title;
        }
        self
    }

    /// Chart content.
    #[must_use]
    pub fn kind(&self) -> &ChartKind {
        &self.kind
    }

    /// Titles.
    #[must_use]
    pub fn titles(&self) -> &Titles {
        &self.titles
    }

    /// Visual style.
    #[must_use]
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.style.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.style.height
    }

    /// Replace the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.style.theme = theme;
        self
    }

    /// Bar spec, if this is a bar chart.
    #[must_use]
    pub fn as_bars(&self) -> Option<&PlotSpec> {
        match &self.kind {
            ChartKind::Bars(spec) => Some(spec),
            _ => None,
        }
    }

    /// Composite spec, if this is the composite view.
    #[must_use]
    pub fn as_composite(&self) -> Option<&CompositeSpec> {
        match &self.kind {
            ChartKind::Composite(spec) => Some(spec),
            _ => None,
        }
    }

    /// Composition spec, if this is a scan chart.
    #[must_use]
    pub fn as_composition(&self) -> Option<&CompositionSpec> {
        match &self.kind {
            ChartKind::Composition(spec) => Some(spec),
            _ => None,
        }
    }

    /// Render as an SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        svg::SvgWriter::from_scene(&layout::scene(self)).render()
    }

    /// Rasterize and encode as PNG.
    ///
    /// Text is only drawn in vector output.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let canvas = raster::Canvas::from_scene(&layout::scene(self))?;
        crate::output::PngEncoder::to_bytes(&canvas)
    }
}

impl batuta_common::display::WithDimensions for Chart {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.style.width = width;
        self.style.height = height;
    }
}

/// Subtitle line describing the grouping variables.
pub(crate) fn variable_line(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [x] => format!("Variable: {x}"),
        [x, y] => format!("{x} grouped by {y}"),
        [x, init @ .., last] => format!("{x} grouped by {} and {last}", init.join(", ")),
    }
}
