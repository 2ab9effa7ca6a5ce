//! Pagination algorithms for folio.
//!
//! Two strategies share one page budget:
//! - **Reflow**: measured blocks are bin-packed into pages by [`BlockPaginator`]
//!   and composed with a fixed header and footer by [`PageRenderer`].
//! - **Raster slicing**: one tall raster is cut into page-height strips by
//!   [`RasterSlicer`].
//!
//! Both are pure and synchronous. Measurement goes through a
//! [`MeasurementScope`], which owns the oracle's context for exactly one run.

use folio_traits::MeasureError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Measurement failed: {0}")]
    Measurement(#[from] MeasureError),
    #[error("Available page height must be finite and non-negative, got {0:.2}.")]
    InvalidBudget(f32),
    #[error("Remainder threshold must lie in [0, 1), got {0}.")]
    InvalidThreshold(f32),
    #[error("Page format {0:.2}x{1:.2} is not a valid page size.")]
    InvalidFormat(f32, f32),
    #[error("Raster of {0}x{1} pixels cannot be sliced.")]
    EmptyRaster(u32, u32),
}

pub mod algorithms;
pub mod config;
pub mod measure;
pub mod page_renderer;
pub mod paginator;
pub mod slicer;

pub use self::config::{LayoutConfig, SliceConfig};
pub use self::measure::{MeasuredDocument, MeasurementScope};
pub use self::page_renderer::PageRenderer;
pub use self::paginator::BlockPaginator;
pub use self::slicer::{PlacedSlice, RasterSlicer, SlicePlan};

#[cfg(test)]
mod test_utils;
