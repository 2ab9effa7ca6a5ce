//! RasterCapture trait for abstracting surface rasterization.
//!
//! Capturing is the one suspension point of an export: everything else is
//! synchronous and CPU-bound.

use folio_types::{Provenance, Raster};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Error type for rasterization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Surface embeds untrusted cross-origin content: {0}")]
    TaintedContent(String),

    #[error("Surface could not be rasterized: {0}")]
    Surface(String),

    #[error("Capture scale must be a positive finite number, got {0}")]
    InvalidScale(f32),
}

/// How cross-origin content embedded in a surface is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossOriginPolicy {
    /// Cross-origin content must be CORS approved; anything else fails the capture.
    #[default]
    UseCors,
    /// Untrusted cross-origin content is left blank.
    Omit,
}

/// Options for a single capture call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureOptions {
    /// Device pixels per layout pixel.
    pub scale: f32,
    pub cross_origin: CrossOriginPolicy,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            cross_origin: CrossOriginPolicy::UseCors,
        }
    }
}

impl CaptureOptions {
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(())
        } else {
            Err(CaptureError::InvalidScale(self.scale))
        }
    }
}

/// A trait for turning a rendering surface into one continuous raster.
#[allow(async_fn_in_trait)]
pub trait RasterCapture: Debug {
    /// The thing being captured.
    type Surface: ?Sized;

    /// Rasterize the whole surface at `options.scale`.
    async fn capture(
        &self,
        surface: &Self::Surface,
        options: &CaptureOptions,
    ) -> Result<Raster, CaptureError>;

    /// Returns a human-readable name for this capturer (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Treats an already rasterized image as the surface.
///
/// The raster is returned as-is; it is assumed to have been produced at the
/// requested scale. Cross-origin policy is still enforced.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryRasterCapture;

impl RasterCapture for InMemoryRasterCapture {
    type Surface = Raster;

    async fn capture(
        &self,
        surface: &Raster,
        options: &CaptureOptions,
    ) -> Result<Raster, CaptureError> {
        options.validate()?;
        if surface.is_empty() {
            return Err(CaptureError::Surface("raster has no pixels".to_string()));
        }
        if surface.provenance().is_untrusted() {
            match options.cross_origin {
                CrossOriginPolicy::UseCors => {
                    return Err(CaptureError::TaintedContent(
                        "source raster was loaded without CORS approval".to_string(),
                    ));
                }
                CrossOriginPolicy::Omit => {
                    log::warn!("Omitting untrusted cross-origin raster from capture");
                    let blank = Raster::filled(
                        surface.width(),
                        surface.height(),
                        folio_types::Color::WHITE,
                    );
                    return Ok(blank);
                }
            }
        }
        Ok(surface.clone().with_provenance(Provenance::Local))
    }

    fn name(&self) -> &'static str {
        "InMemoryRasterCapture"
    }
}
