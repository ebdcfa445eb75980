//! Image output: gamma correction, quantization and file encoding.
//!
//! Renderers hand linear colors to a [`PixelSink`] in row-major order. The
//! sink owns everything after that: gamma, clamping and the file format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::renderer::ImageBuffer;
use crate::Color;
use lumen_math::Interval;
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Receives finished pixels, top row first, left to right.
pub trait PixelSink {
    type Error;

    /// Called once before the first pixel.
    fn begin(&mut self, width: u32, height: u32) -> Result<(), Self::Error>;

    /// Called once per pixel with its linear color.
    fn write_pixel(&mut self, color: Color) -> Result<(), Self::Error>;

    /// Called once after the last pixel.
    fn finish(&mut self) -> Result<(), Self::Error>;
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.000, 0.999);
    let quantize = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Plain-text PPM (`P3`) writer.
pub struct PpmSink<W: Write> {
    writer: W,
}

impl<W: Write> PpmSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PixelSink for PpmSink<W> {
    type Error = std::io::Error;

    fn begin(&mut self, width: u32, height: u32) -> std::io::Result<()> {
        write!(self.writer, "P3\n{} {}\n255\n", width, height)
    }

    fn write_pixel(&mut self, color: Color) -> std::io::Result<()> {
        let [r, g, b] = color_to_rgb(color);
        writeln!(self.writer, "{} {} {}", r, g, b)
    }

    fn finish(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Output file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Ppm,
    Png,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> OutputResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "ppm" => Ok(ImageFormat::Ppm),
            "png" => Ok(ImageFormat::Png),
            _ => Err(OutputError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl ImageBuffer {
    /// Convert to gamma-corrected RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    /// Save as PPM or PNG depending on the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> OutputResult<()> {
        let path = path.as_ref();
        match ImageFormat::from_path(path)? {
            ImageFormat::Ppm => {
                let mut sink = PpmSink::new(BufWriter::new(File::create(path)?));
                self.write_to(&mut sink)?;
            }
            ImageFormat::Png => {
                let buffer = image::RgbImage::from_raw(self.width, self.height, self.to_rgb8())
                    .ok_or_else(|| {
                        OutputError::UnsupportedFormat(format!(
                            "{}x{} image with {} pixels",
                            self.width,
                            self.height,
                            self.pixels.len()
                        ))
                    })?;
                buffer.save_with_format(path, image::ImageFormat::Png)?;
            }
        }
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
