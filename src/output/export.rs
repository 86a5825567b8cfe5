//! Chart export to files and data URIs.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::chart::Chart;
use crate::error::{Error, Result};

/// Image file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum ImageFormat {
    /// Scalable vector graphics.
    #[default]
    Svg,
    /// Raster PNG (shapes only).
    Png,
}

impl ImageFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(Error::InvalidOption(format!("unsupported image format '{other}'"))),
        }
    }
}

/// Writes charts under an output root.
///
/// Files are named `viz_<base>_<key1>-<key2>.<ext>` and placed in
/// `<root>/<subdirectory>` when a subdirectory is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    root: PathBuf,
    subdirectory: Option<String>,
    format: ImageFormat,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Exporter {
    /// Exporter writing SVG files under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), subdirectory: None, format: ImageFormat::Svg }
    }

    /// Write into a subdirectory of the root.
    #[must_use]
    pub fn subdirectory(mut self, subdirectory: Option<&str>) -> Self {
        self.subdirectory = subdirectory.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    /// Set the image format.
    #[must_use]
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Directory files are written to.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        match &self.subdirectory {
            Some(sub) => self.root.join(sub),
            None => self.root.clone(),
        }
    }

    /// File name for a chart of `keys` drawn from data called `base`.
    #[must_use]
    pub fn file_name(&self, base: &str, keys: &[&str]) -> String {
        let mut name = format!("viz_{}", sanitize(base));
        if !keys.is_empty() {
            let keys: Vec<String> = keys.iter().map(|k| sanitize(k)).collect();
            name.push('_');
            name.push_str(&keys.join("-"));
        }
        name.push('.');
        name.push_str(self.format.extension());
        name
    }

    /// Full output path.
    #[must_use]
    pub fn path_for(&self, base: &str, keys: &[&str]) -> PathBuf {
        self.directory().join(self.file_name(base, keys))
    }

    /// Render and write `chart`, creating directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories or the file cannot be written, or PNG
    /// encoding fails.
    pub fn export(&self, chart: &Chart, base: &str, keys: &[&str]) -> Result<PathBuf> {
        let dir = self.directory();
        fs::create_dir_all(&dir)?;
        let path = dir.join(self.file_name(base, keys));
        write_chart(chart, self.format, &path)?;
        tracing::info!(target: "trueno_freqs", path = %path.display(), "saved chart");
        Ok(path)
    }

    /// Base64 `data:` URI of the chart's SVG rendering.
    #[must_use]
    pub fn data_uri(chart: &Chart) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(chart.to_svg()))
    }
}

fn write_chart(chart: &Chart, format: ImageFormat, path: &Path) -> Result<()> {
    match format {
        ImageFormat::Svg => fs::write(path, chart.to_svg())?,
        ImageFormat::Png => fs::write(path, chart.to_png()?)?,
    }
    Ok(())
}

/// Replace characters that are unsafe in file names.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}
