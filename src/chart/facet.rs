//! Panel layouts for grouped bar charts.
//!
//! Splits bars into small multiples by the second and third grouping key.

use crate::table::Value;

/// Panel arrangement of a bar chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Layout {
    /// A single panel.
    #[default]
    Single,
    /// One panel per value of `rows`, stacked vertically.
    Faceted {
        /// Facet variable.
        rows: String,
    },
    /// A grid of panels, `rows` by `cols`.
    Grid {
        /// Row variable.
        rows: String,
        /// Column variable.
        cols: String,
    },
}

impl Layout {
    /// Single panel.
    #[must_use]
    pub fn single() -> Self {
        Layout::Single
    }

    /// Facet into rows.
    #[must_use]
    pub fn faceted(rows: &str) -> Self {
        Layout::Faceted { rows: rows.to_string() }
    }

    /// Facet into a grid.
    #[must_use]
    pub fn grid(rows: &str, cols: &str) -> Self {
        Layout::Grid { rows: rows.to_string(), cols: cols.to_string() }
    }

    /// Facet variable names, row variable first.
    #[must_use]
    pub fn vars(&self) -> Vec<&str> {
        match self {
            Layout::Single => Vec::new(),
            Layout::Faceted { rows } => vec![rows.as_str()],
            Layout::Grid { rows, cols } => vec![rows.as_str(), cols.as_str()],
        }
    }
}

/// Position and strip labels of one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelKey {
    /// Row-variable value, if faceted.
    pub row: Option<Value>,
    /// Column-variable value, if gridded.
    pub col: Option<Value>,
}

impl PanelKey {
    /// The key of a single-panel chart.
    #[must_use]
    pub const fn whole() -> Self {
        Self { row: None, col: None }
    }

    /// Strip text, e.g. `y: b` or `y: b | z: 1`.
    #[must_use]
    pub fn strip(&self, layout: &Layout) -> Option<String> {
        match (layout, &self.row, &self.col) {
            (Layout::Faceted { rows }, Some(r), _) => Some(format!("{rows}: {r}")),
            (Layout::Grid { rows, cols }, Some(r), Some(c)) => {
                Some(format!("{rows}: {r} | {cols}: {c}"))
            }
            _ => None,
        }
    }
}
