//! MeasurementOracle trait for abstracting block measurement.
//!
//! The paginator never lays anything out itself. It asks an oracle how tall
//! each block renders at the export width, which keeps the engine free of any
//! particular rendering surface.

use folio_types::{BlockId, BlockMetrics, SourceBlock};
use std::collections::HashMap;
use std::fmt::Debug;
use thiserror::Error;

/// Error type for measurement operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("No metrics available for block '{0}'")]
    NotFound(BlockId),

    #[error("Measurement attempted outside an acquired measurement context")]
    NoContext,

    #[error("Invalid metrics for '{target}': {message}")]
    Invalid { target: String, message: String },

    #[error("Measurement failed for '{target}': {message}")]
    Failed { target: String, message: String },
}

/// The fixed rendering width blocks are measured at.
///
/// Measurements are only meaningful for the width they were taken at, so the
/// same viewport must be used for every block of one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Full canvas width in layout pixels.
    pub width: f32,
    /// Horizontal padding on each side of the content.
    pub padding: f32,
}

impl Viewport {
    pub fn new(width: f32, padding: f32) -> Self {
        Self { width, padding }
    }

    /// Width available to block content once padding is removed.
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.padding).max(0.0)
    }
}

/// A trait for measuring blocks at a fixed viewport width.
///
/// Oracles are stateful: a measurement context is acquired for one viewport,
/// used for any number of measurements, then released. Callers normally go
/// through a scope guard that pairs `acquire` with `release` on every exit
/// path rather than calling these directly.
///
/// # Implementations
///
/// - `InMemoryMeasurementOracle`: Serves pre-computed metrics (always available)
pub trait MeasurementOracle: Debug {
    /// Prepare an offscreen measurement context at `viewport`.
    fn acquire(&mut self, viewport: &Viewport) -> Result<(), MeasureError>;

    /// Measure a single block inside the acquired context.
    fn measure(&mut self, block: &SourceBlock) -> Result<BlockMetrics, MeasureError>;

    /// Measure the page header. Called once per pagination run.
    fn measure_header(&mut self) -> Result<BlockMetrics, MeasureError>;

    /// Measure the page footer. Called once per pagination run.
    fn measure_footer(&mut self) -> Result<BlockMetrics, MeasureError>;

    /// Tear down the measurement context. Must be idempotent.
    fn release(&mut self);

    /// Returns a human-readable name for this oracle (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An oracle serving metrics that were computed ahead of time.
///
/// Metrics must be registered before use. Asking for an unknown block yields
/// `MeasureError::NotFound`.
#[derive(Debug, Default)]
pub struct InMemoryMeasurementOracle {
    metrics: HashMap<BlockId, BlockMetrics>,
    header: BlockMetrics,
    footer: BlockMetrics,
    viewport: Option<Viewport>,
    acquired_count: usize,
    released_count: usize,
}

impl InMemoryMeasurementOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, header: BlockMetrics) -> Self {
        self.header = header;
        self
    }

    pub fn with_footer(mut self, footer: BlockMetrics) -> Self {
        self.footer = footer;
        self
    }

    /// Register the metrics for a block.
    pub fn insert(&mut self, id: impl Into<BlockId>, metrics: BlockMetrics) {
        self.metrics.insert(id.into(), metrics);
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Whether a measurement context is currently open.
    pub fn is_acquired(&self) -> bool {
        self.viewport.is_some()
    }

    /// Number of times a context was acquired and released, for diagnostics.
    pub fn context_counts(&self) -> (usize, usize) {
        (self.acquired_count, self.released_count)
    }
}

impl MeasurementOracle for InMemoryMeasurementOracle {
    fn acquire(&mut self, viewport: &Viewport) -> Result<(), MeasureError> {
        if !(viewport.width.is_finite() && viewport.width > 0.0) {
            return Err(MeasureError::Invalid {
                target: "viewport".to_string(),
                message: format!("width must be positive, got {}", viewport.width),
            });
        }
        self.viewport = Some(*viewport);
        self.acquired_count += 1;
        Ok(())
    }

    fn measure(&mut self, block: &SourceBlock) -> Result<BlockMetrics, MeasureError> {
        if self.viewport.is_none() {
            return Err(MeasureError::NoContext);
        }
        self.metrics
            .get(&block.id)
            .copied()
            .ok_or_else(|| MeasureError::NotFound(block.id.clone()))
    }

    fn measure_header(&mut self) -> Result<BlockMetrics, MeasureError> {
        if self.viewport.is_none() {
            return Err(MeasureError::NoContext);
        }
        Ok(self.header)
    }

    fn measure_footer(&mut self) -> Result<BlockMetrics, MeasureError> {
        if self.viewport.is_none() {
            return Err(MeasureError::NoContext);
        }
        Ok(self.footer)
    }

    fn release(&mut self) {
        if self.viewport.take().is_some() {
            self.released_count += 1;
            log::trace!("Released in-memory measurement context");
        }
    }

    fn name(&self) -> &'static str {
        "InMemoryMeasurementOracle"
    }
}
