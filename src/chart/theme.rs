//! Chart themes.
//!
//! Controls the non-data appearance of frequency charts: backgrounds, grid,
//! strip labels and the two label tones used on and beside bars.

use crate::color::Rgba;

use super::compose::LabelTone;

/// Theme specification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct Theme {
    /// Background color.
    pub background: Rgba,
    /// Panel background color.
    pub panel_background: Rgba,
    /// Grid line color.
    pub grid_color: Rgba,
    /// Title and axis text color.
    pub text_color: Rgba,
    /// Facet strip background.
    pub strip_background: Rgba,
    /// Label color on dark fills.
    pub label_light: Rgba,
    /// Label color on light fills and beside bars.
    pub label_dark: Rgba,
    /// Show vertical grid lines.
    pub show_grid: bool,
    /// Show panel border.
    pub show_panel_border: bool,
    /// Grid line width.
    pub grid_width: f32,
    /// Margin around the plot.
    pub margin: u32,
    /// Base font size in pixels.
    pub font_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::minimal()
    }
}

impl Theme {
    /// Grey panels with white grid.
    #[must_use]
    pub fn grey() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(235, 235, 235),
            grid_color: Rgba::WHITE,
            text_color: Rgba::rgb(50, 50, 50),
            strip_background: Rgba::rgb(217, 217, 217),
            label_light: Rgba::WHITE,
            label_dark: Rgba::rgb(30, 30, 30),
            show_grid: true,
            show_panel_border: false,
            grid_width: 1.0,
            margin: 40,
            font_size: 12.0,
        }
    }

    /// White background, light grid.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(225, 225, 225),
            text_color: Rgba::BLACK,
            strip_background: Rgba::rgb(242, 242, 242),
            label_light: Rgba::WHITE,
            label_dark: Rgba::rgb(30, 30, 30),
            show_grid: true,
            show_panel_border: false,
            grid_width: 0.5,
            margin: 40,
            font_size: 12.0,
        }
    }

    /// Black and white with panel borders.
    #[must_use]
    pub fn bw() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(200, 200, 200),
            text_color: Rgba::BLACK,
            strip_background: Rgba::rgb(230, 230, 230),
            label_light: Rgba::WHITE,
            label_dark: Rgba::BLACK,
            show_grid: true,
            show_panel_border: true,
            grid_width: 0.5,
            margin: 40,
            font_size: 12.0,
        }
    }

    /// Dark background.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Rgba::rgb(30, 30, 30),
            panel_background: Rgba::rgb(40, 40, 40),
            grid_color: Rgba::rgb(60, 60, 60),
            text_color: Rgba::rgb(220, 220, 220),
            strip_background: Rgba::rgb(55, 55, 55),
            label_light: Rgba::rgb(245, 245, 245),
            label_dark: Rgba::rgb(20, 20, 20),
            show_grid: true,
            show_panel_border: false,
            grid_width: 0.5,
            margin: 40,
            font_size: 12.0,
        }
    }

    /// Set background color.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Set margin.
    #[must_use]
    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable grid lines.
    #[must_use]
    pub fn grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    /// Color for a label drawn on a bar fill.
    #[must_use]
    pub fn tone_color(&self, tone: LabelTone) -> Rgba {
        match tone {
            LabelTone::Light => self.label_light,
            LabelTone::Dark => self.label_dark,
        }
    }

    /// Color for a label drawn beside a bar, on the panel background.
    #[must_use]
    pub fn outside_label_color(&self) -> Rgba {
        if self.panel_background.relative_luminance() < 0.2 {
            self.text_color
        } else {
            self.label_dark
        }
    }
}
