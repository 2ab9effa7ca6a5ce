//! In-memory RGBA raster buffers.
//!
//! A `Raster` is the common currency between the capture collaborator, the
//! slicer and the document builder. Pixel data is reference-counted so
//! cloning a raster (e.g. a header reused on every page) never copies bytes.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Shared, immutable byte buffer.
pub type SharedData = Arc<Vec<u8>>;

/// Rounds a fractional strip `(offset, height)` to whole rows `[start, end)`
/// of a raster `rows` tall.
pub fn whole_rows(offset: f32, height: f32, rows: u32) -> (u32, u32) {
    let limit = rows as f32;
    let start = offset.max(0.0).round().min(limit) as u32;
    let end = (offset + height).max(0.0).round().min(limit) as u32;
    (start, end.max(start))
}

const BYTES_PER_PIXEL: usize = 4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("Pixel buffer holds {actual} bytes but a {width}x{height} RGBA raster needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Where the pixels of a raster originally came from.
///
/// Capturing a surface that embeds cross-origin content without CORS approval
/// taints the capture, mirroring how a browser canvas behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    #[default]
    Local,
    CrossOrigin { cors_approved: bool },
}

impl Provenance {
    pub fn is_untrusted(self) -> bool {
        matches!(self, Provenance::CrossOrigin { cors_approved: false })
    }
}

/// A tightly packed, row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: SharedData,
    provenance: Provenance,
}

impl Raster {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        Self::from_shared(width, height, Arc::new(pixels))
    }

    pub fn from_shared(width: u32, height: u32, pixels: SharedData) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            provenance: Provenance::Local,
        })
    }

    /// A raster of a single colour.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let px = color.to_rgba8();
        let pixels = px.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
            provenance: Provenance::Local,
        }
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn shared_pixels(&self) -> SharedData {
        Arc::clone(&self.pixels)
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn has_transparency(&self) -> bool {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .any(|px| px[3] != u8::MAX)
    }

    /// Whole-row range `[start, end)` covered by a fractional strip.
    ///
    /// Boundaries are rounded to the nearest row, so consecutive strips
    /// `(i * h, h)` tile the raster without gaps or overlap.
    pub fn row_range(&self, offset: f32, height: f32) -> (u32, u32) {
        whole_rows(offset, height, self.height)
    }

    /// Copies out the full-width horizontal strip starting at `offset` rows.
    pub fn crop_rows(&self, offset: f32, height: f32) -> Raster {
        let (start, end) = self.row_range(offset, height);
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        let bytes = &self.pixels[start as usize * row_bytes..end as usize * row_bytes];
        Raster {
            width: self.width,
            height: end - start,
            pixels: Arc::new(bytes.to_vec()),
            provenance: self.provenance,
        }
    }
}
