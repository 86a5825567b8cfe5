//! Output: scene primitives, SVG and PNG encoders, file export.

pub mod export;
pub mod png_encoder;
pub mod raster;
pub mod scene;
pub mod svg;

pub use export::{Exporter, ImageFormat};
pub use png_encoder::PngEncoder;
pub use raster::Canvas;
pub use scene::{Scene, Shape, TextAnchor};
pub use svg::SvgWriter;
