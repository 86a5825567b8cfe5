//! # Trueno-Freqs
//!
//! Frequency tables and frequency charts for tabular data.
//!
//! Built on the [trueno](https://crates.io/crates/trueno) core library, trueno-freqs
//! counts (optionally weighted) combinations of grouping keys, ranks and
//! truncates them, and renders ranked bar charts, facet grids, composite
//! bar + dot-matrix views and whole-table composition scans to SVG or PNG.
//!
//! ## Features
//!
//! - **Frequency tables**: counts, percentages, cumulative percentages and rank
//! - **Top-N truncation** with an annotation describing what was left out
//! - **Whole-table scans** that drop high-cardinality and constant columns
//! - **Charts**: single, faceted and grid bar layouts, composite views for many
//!   keys, and 100%-stacked composition bars
//! - **Outputs**: SVG documents, PNG images, files and data URIs
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_freqs::prelude::*;
//!
//! let data = Table::from_series("colour", ["red", "blue", "red", "green", "red"]);
//! let report = freqs(&data, &["colour"], &FreqsOptions::new().quiet(true))?;
//! let table = report.table.expect("table is returned when no chart is rendered");
//!
//! assert_eq!(table.rows()[0].keys[0].to_string(), "red");
//! assert_eq!(table.rows()[0].p, 60.0);
//! # Ok::<(), trueno_freqs::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `config` (default): serde support and YAML configuration files

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code (Cloudflare incident 2025-11-18)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Data Modules
// ============================================================================

/// Column-oriented input tables and cell values.
pub mod table;

/// Number and percentage formatting.
pub mod format;

/// Colors and fill gradients.
pub mod color;

// ============================================================================
// Frequency Modules
// ============================================================================

/// Grouping, ranking, truncation and whole-table scans.
pub mod freqs;

/// Chart composition (bars, facets, composite and composition views).
pub mod chart;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Output encoders (SVG, PNG) and file export.
pub mod output;

/// YAML configuration files.
#[cfg(feature = "config")]
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-freqs operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_freqs::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::chart::{Chart, ChartStyle, Layout, MultiOptions, Theme};
    pub use crate::color::{Gradient, Rgba};
    pub use crate::error::{Error, Result};
    pub use crate::freqs::{
        freqs, freqs_df, freqs_plot, FreqsOptions, FreqsReport, FrequencyTable, ScanOptions,
        ScanReport, SortMode, Top,
    };
    pub use crate::output::{Exporter, ImageFormat};
    pub use crate::table::{Column, Table, Value};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;

#[cfg(feature = "config")]
pub use config::FreqsConfig;
pub use freqs::{freqs, freqs_df, freqs_plot, FreqsOptions, FreqsReport};
