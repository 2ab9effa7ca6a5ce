//! Cutting one tall raster into page-height strips.

use crate::config::SliceConfig;
use crate::LayoutError;
use folio_types::{PageFormat, RasterSlice, Rect, whole_rows};

/// A retained strip and where it lands on its output page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedSlice {
    pub index: usize,
    pub slice: RasterSlice,
    /// In points, bottom-left origin. Anchored to the top edge of the page.
    pub placement: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlicePlan {
    /// Points per source pixel.
    pub scale: f32,
    pub slice_height_px: f32,
    /// Strips the raster spans, before any remainder is dropped.
    pub total_slices: usize,
    pub slices: Vec<PlacedSlice>,
}

impl SlicePlan {
    pub fn retained(&self) -> usize {
        self.slices.len()
    }

    pub fn dropped(&self) -> usize {
        self.total_slices - self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSlicer {
    format: PageFormat,
    config: SliceConfig,
}

impl RasterSlicer {
    pub fn new(format: PageFormat, config: SliceConfig) -> Result<Self, LayoutError> {
        if !format.is_valid() {
            return Err(LayoutError::InvalidFormat(format.width_points, format.height_points));
        }
        config.validate()?;
        Ok(Self { format, config })
    }

    pub fn format(&self) -> PageFormat {
        self.format
    }

    /// Computes the strips for a raster of `width_px` by `height_px`.
    ///
    /// The raster is scaled so its width fills the page. A short final strip
    /// is dropped when the leftover height is below the configured fraction
    /// of a full strip. The result depends only on the inputs.
    pub fn plan(&self, width_px: u32, height_px: u32) -> Result<SlicePlan, LayoutError> {
        if width_px == 0 {
            return Err(LayoutError::EmptyRaster(width_px, height_px));
        }

        let page_w = f64::from(self.format.width_points);
        let page_h = f64::from(self.format.height_points);
        let total_h = f64::from(height_px);
        let scale = page_w / f64::from(width_px);
        let slice_h = page_h / scale;
        let total_slices = (total_h / slice_h).ceil() as usize;
        let remainder = total_h % slice_h;
        let threshold = f64::from(self.config.remainder_threshold) * slice_h;

        let mut slices = Vec::with_capacity(total_slices);
        for i in 0..total_slices {
            let offset = i as f64 * slice_h;
            let h = slice_h.min(total_h - offset);
            if h <= 0.0 {
                continue;
            }
            let is_last = i + 1 == total_slices;
            if is_last && h < slice_h && remainder < threshold {
                log::debug!(
                    "Dropping trailing strip {} of {:.2}px (below {:.0}% of {:.2}px).",
                    i,
                    h,
                    self.config.remainder_threshold * 100.0,
                    slice_h
                );
                continue;
            }
            let slice = RasterSlice { offset_px: offset as f32, height_px: h as f32 };
            let (start, end) = whole_rows(slice.offset_px, slice.height_px, height_px);
            if end == start {
                log::debug!(
                    "Skipping strip {} of {:.3}px; it covers no whole row.",
                    i,
                    h
                );
                continue;
            }
            let placed_h = h * scale;
            slices.push(PlacedSlice {
                index: slices.len(),
                slice,
                placement: Rect::new(0.0, (page_h - placed_h) as f32, page_w as f32, placed_h as f32),
            });
        }

        log::debug!(
            "Sliced {}x{}px raster into {} of {} strip(s) at {:.2}px each.",
            width_px,
            height_px,
            slices.len(),
            total_slices,
            slice_h
        );

        Ok(SlicePlan {
            scale: scale as f32,
            slice_height_px: slice_h as f32,
            total_slices,
            slices,
        })
    }
}
