//! PNG output via the `png` crate.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;

use super::raster::Canvas;

/// PNG encoder for rasterized charts.
pub struct PngEncoder;

impl PngEncoder {
    /// Write a canvas to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(canvas: &Canvas, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        let mut encoder = png::Encoder::new(writer, canvas.width(), canvas.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&canvas.to_compact_pixels())?;
        Ok(())
    }

    /// Encode a canvas to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(canvas: &Canvas) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buffer, canvas.width(), canvas.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&canvas.to_compact_pixels())?;
        }
        Ok(buffer)
    }
}
