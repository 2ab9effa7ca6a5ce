use crate::error::ExportError;
use crate::export::Exporter;
use folio_layout::config::DEFAULT_PADDING;
use folio_layout::{LayoutConfig, SliceConfig};
use folio_traits::{CaptureOptions, CrossOriginPolicy};
use folio_types::PageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The file name an artifact is delivered under unless configured otherwise.
pub const DEFAULT_FILE_NAME: &str = "multipage.pdf";

/// An enum to select how content is split into pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationStrategy {
    /// Measure discrete blocks and bin-pack them into pages. (Default)
    /// Blocks are never split, so no content is cut mid-line.
    #[default]
    Reflow,
    /// Capture the whole content as one raster and cut it into page-height
    /// strips. Content can be cut at any row.
    RasterSlice,
}

impl fmt::Display for PaginationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationStrategy::Reflow => f.write_str("reflow"),
            PaginationStrategy::RasterSlice => f.write_str("raster-slice"),
        }
    }
}

impl FromStr for PaginationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reflow" => Ok(PaginationStrategy::Reflow),
            "raster-slice" | "slice" => Ok(PaginationStrategy::RasterSlice),
            other => Err(format!(
                "Unknown strategy '{}'; expected 'reflow' or 'raster-slice'",
                other
            )),
        }
    }
}

/// Immutable settings for one [`Exporter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub strategy: PaginationStrategy,
    pub format: PageFormat,
    /// Horizontal padding in layout pixels.
    pub padding: f32,
    pub slice: SliceConfig,
    pub capture: CaptureOptions,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            strategy: PaginationStrategy::default(),
            format: PageFormat::A4,
            padding: DEFAULT_PADDING,
            slice: SliceConfig::default(),
            capture: CaptureOptions::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ExportConfig {
    /// Parses and validates a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let config: ExportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig::new(self.format, self.padding)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        self.layout().validate()?;
        self.slice.validate()?;
        self.capture.validate()?;
        let canvas_width = self.format.canvas_size().width;
        if !self.padding.is_finite() || self.padding < 0.0 || 2.0 * self.padding >= canvas_width {
            return Err(ExportError::Config(format!(
                "Padding {} leaves no room for content on a {:.1}px wide page",
                self.padding, canvas_width
            )));
        }
        if self.file_name.trim().is_empty() {
            return Err(ExportError::Config("File name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A builder for creating an [`Exporter`].
#[derive(Debug, Clone, Default)]
pub struct ExportBuilder {
    config: ExportConfig,
}

impl ExportBuilder {
    /// Creates a new `ExportBuilder` with default settings (reflow, A4).
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts from an existing configuration, e.g. one loaded from JSON.
    pub fn from_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Selects the pagination strategy.
    pub fn with_strategy(mut self, strategy: PaginationStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn with_format(mut self, format: PageFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.config.padding = padding;
        self
    }

    /// Sets the fraction of a slice below which a trailing strip is dropped.
    pub fn with_remainder_threshold(mut self, threshold: f32) -> Self {
        self.config.slice.remainder_threshold = threshold;
        self
    }

    pub fn with_capture_scale(mut self, scale: f32) -> Self {
        self.config.capture.scale = scale;
        self
    }

    pub fn with_cross_origin(mut self, policy: CrossOriginPolicy) -> Self {
        self.config.capture.cross_origin = policy;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.config.file_name = file_name.into();
        self
    }

    /// Validates the settings and creates the `Exporter`.
    pub fn build(self) -> Result<Exporter, ExportError> {
        log::info!(
            "Building exporter: {} strategy, {:.2}x{:.2}pt pages.",
            self.config.strategy,
            self.config.format.width_points,
            self.config.format.height_points
        );
        Exporter::new(self.config)
    }
}
