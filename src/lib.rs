//! folio: turns content into fixed-size PDF pages.
//!
//! Two strategies share one configuration:
//! - **Reflow** measures discrete blocks through a [`MeasurementOracle`] and
//!   bin-packs them into pages framed by a fixed header and footer.
//! - **Raster slicing** captures the content as one tall raster through a
//!   [`RasterCapture`] and cuts it into page-height strips.
//!
//! ```no_run
//! use folio::{ExportBuilder, Manifest, StackCapture};
//!
//! # async fn run() -> Result<(), folio::ExportError> {
//! let exporter = ExportBuilder::new().build()?;
//! let (document, mut oracle) = Manifest::from_path("manifest.json")?.load()?;
//! if let Some(artifact) = exporter
//!     .export(&mut oracle, &StackCapture, document)
//!     .await?
//!     .into_artifact()
//! {
//!     artifact.write_to_dir("out")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
mod error;
pub mod export;
pub mod manifest;

pub use capture::{StackCapture, StackSurface, SurfaceItem};
pub use config::{ExportBuilder, ExportConfig, PaginationStrategy};
pub use error::ExportError;
pub use export::{Artifact, ExportDocument, ExportOutcome, Exporter};
pub use manifest::{Manifest, RasterMeasurementOracle, Sizing};

pub use folio_layout::{LayoutConfig, SliceConfig};
pub use folio_traits::{
    CaptureError, CaptureOptions, CrossOriginPolicy, InMemoryMeasurementOracle, MeasureError,
    MeasurementOracle, RasterCapture, Viewport,
};
pub use folio_types::{
    BlockContent, BlockMetrics, Color, PageFormat, Provenance, Raster, SourceBlock,
};
