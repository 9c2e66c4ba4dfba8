//! QR decoding from uploaded images.
//!
//! Decoding is split in two steps:
//! - [`RasterImage::from_bytes`] turns an encoded upload (PNG, JPEG, ...) into
//!   an RGBA pixel buffer
//! - a [`QrDecoder`] locates and reads a QR symbol in that buffer
//!
//! The server holds the decoder as a trait object so the engine can be
//! swapped without touching request handling.

use crate::{QrifyError, Result};
use tracing::debug;

/// An in-memory RGBA raster, 4 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    /// Decode an encoded image file into raw RGBA pixels.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Wrap an existing RGBA buffer. Returns `None` if the length does not
    /// match the dimensions.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Per-pixel luminance, row-major.
    ///
    /// Translucent pixels are composited over white first, so a PNG whose
    /// light modules are transparent still reads as light.
    pub fn luminance(&self) -> Vec<u8> {
        self.rgba
            .chunks_exact(4)
            .map(|px| {
                let alpha = px[3] as f32 / 255.0;
                let over_white = |c: u8| c as f32 * alpha + 255.0 * (1.0 - alpha);
                let luma = 0.2126 * over_white(px[0])
                    + 0.7152 * over_white(px[1])
                    + 0.0722 * over_white(px[2]);
                luma.round().clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}

/// Locates a QR symbol in a raster and returns its text payload.
///
/// Implementations return [`QrifyError::QrNotFound`] when no symbol can be read.
pub trait QrDecoder: Send + Sync {
    fn decode(&self, image: &RasterImage) -> Result<String>;
}

/// [`QrDecoder`] backed by `rqrr`.
///
/// `rqrr` scans for the 1:1:3:1:1 finder patterns, fits the grid with
/// perspective correction, then applies format/version decoding and
/// Reed-Solomon correction.
#[derive(Debug, Clone)]
pub struct RqrrDecoder {
    /// Retry on the inverted image when nothing is found (light-on-dark codes).
    pub try_inverted: bool,
}

impl Default for RqrrDecoder {
    fn default() -> Self {
        Self { try_inverted: true }
    }
}

impl RqrrDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(width: usize, height: usize, luma: &[u8], invert: bool) -> Option<String> {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            let value = luma[y * width + x];
            if invert { 255 - value } else { value }
        });

        let grids = prepared.detect_grids();
        debug!(
            target: "qrify::decode",
            "Found {} candidate grid(s) (inverted: {})",
            grids.len(),
            invert
        );

        grids.iter().find_map(|grid| {
            let mut payload = Vec::new();
            match grid.decode_to(&mut payload) {
                Ok(_) => Some(payload_text(payload)),
                Err(e) => {
                    debug!(target: "qrify::decode", "Grid failed to decode: {:?}", e);
                    None
                }
            }
        })
    }
}

/// Byte-mode payloads are UTF-8 when they validate, Latin-1 otherwise.
fn payload_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().into_iter().map(char::from).collect())
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &RasterImage) -> Result<String> {
        if image.width == 0 || image.height == 0 {
            return Err(QrifyError::QrNotFound);
        }

        let (width, height) = (image.width as usize, image.height as usize);
        let luma = image.luminance();

        if let Some(text) = Self::scan(width, height, &luma, false) {
            return Ok(text);
        }
        if self.try_inverted {
            if let Some(text) = Self::scan(width, height, &luma, true) {
                return Ok(text);
            }
        }
        Err(QrifyError::QrNotFound)
    }
}
