//! The export pipeline: one explicit call turns a document into an artifact.
//!
//! Reflow: scoped measurement, bin-packing, page composition, assembly.
//! Raster slicing: scoped measurement, stacking, capture, slicing, assembly.

use crate::capture::StackSurface;
use crate::config::{ExportConfig, PaginationStrategy};
use crate::error::ExportError;
use folio_layout::{BlockPaginator, MeasuredDocument, PageRenderer, RasterSlicer};
use folio_render_core::{assemble_pages, assemble_slices};
use folio_render_lopdf::LopdfDocumentBuilder;
use folio_traits::{MeasurementOracle, RasterCapture};
use folio_types::{BlockContent, RenderedPage, SourceBlock};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The content of one export, before measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportDocument {
    pub header: BlockContent,
    pub footer: BlockContent,
    pub blocks: Vec<SourceBlock>,
}

impl ExportDocument {
    pub fn new(blocks: Vec<SourceBlock>) -> Self {
        Self { blocks, ..Default::default() }
    }

    pub fn with_header(mut self, header: BlockContent) -> Self {
        self.header = header;
        self
    }

    pub fn with_footer(mut self, footer: BlockContent) -> Self {
        self.footer = footer;
        self
    }
}

/// A finished PDF. Delivery is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl Artifact {
    /// Writes the artifact into `dir` under its file name, creating the
    /// directory if needed.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Document(Artifact),
    /// Nothing survived pagination, so no document was produced.
    Empty,
}

impl ExportOutcome {
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            ExportOutcome::Document(artifact) => Some(artifact),
            ExportOutcome::Empty => None,
        }
    }

    pub fn into_artifact(self) -> Option<Artifact> {
        match self {
            ExportOutcome::Document(artifact) => Some(artifact),
            ExportOutcome::Empty => None,
        }
    }
}

/// Runs exports with a fixed configuration. Collaborators are passed per call.
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Performs one export with the configured strategy.
    ///
    /// The oracle is borrowed exclusively for the whole measurement phase and
    /// released before this returns, whatever the outcome.
    pub async fn export<O, C>(
        &self,
        oracle: &mut O,
        capture: &C,
        document: ExportDocument,
    ) -> Result<ExportOutcome, ExportError>
    where
        O: MeasurementOracle + ?Sized,
        C: RasterCapture<Surface = StackSurface>,
    {
        log::info!(
            "Exporting {} block(s) with the {} strategy.",
            document.blocks.len(),
            self.config.strategy
        );
        match self.config.strategy {
            PaginationStrategy::Reflow => self.export_reflow(oracle, document),
            PaginationStrategy::RasterSlice => {
                self.export_raster_slice(oracle, capture, document).await
            }
        }
    }

    /// Reflow without any capture step.
    pub fn export_reflow<O: MeasurementOracle + ?Sized>(
        &self,
        oracle: &mut O,
        document: ExportDocument,
    ) -> Result<ExportOutcome, ExportError> {
        let pages = self.reflow(oracle, document)?;
        if pages.is_empty() {
            log::info!("No blocks to export; nothing was produced.");
            return Ok(ExportOutcome::Empty);
        }
        let bytes = assemble_pages(LopdfDocumentBuilder::new(), self.config.format, &pages)?;
        Ok(self.finish(bytes, pages.len()))
    }

    async fn export_raster_slice<O, C>(
        &self,
        oracle: &mut O,
        capture: &C,
        document: ExportDocument,
    ) -> Result<ExportOutcome, ExportError>
    where
        O: MeasurementOracle + ?Sized,
        C: RasterCapture<Surface = StackSurface>,
    {
        let layout = self.config.layout();
        let measured = MeasuredDocument::measure(
            oracle,
            layout.viewport(),
            document.header,
            document.footer,
            document.blocks,
        )?;
        if measured.blocks.is_empty() {
            log::info!("No blocks to export; nothing was produced.");
            return Ok(ExportOutcome::Empty);
        }
        let surface = StackSurface::from_blocks(
            layout.canvas().width,
            layout.padding,
            &measured.header,
            &measured.blocks,
            &measured.footer,
        );
        self.capture_and_slice(capture, &surface).await
    }

    /// Reflows the document into pages, stacks the composed pages `page_gap`
    /// layout pixels apart, captures them as one raster and slices that.
    pub async fn export_pages_as_raster<O, C>(
        &self,
        oracle: &mut O,
        capture: &C,
        document: ExportDocument,
        page_gap: f32,
    ) -> Result<ExportOutcome, ExportError>
    where
        O: MeasurementOracle + ?Sized,
        C: RasterCapture<Surface = StackSurface>,
    {
        if !page_gap.is_finite() || page_gap < 0.0 {
            return Err(ExportError::Config(format!(
                "Page gap must be finite and non-negative, got {}",
                page_gap
            )));
        }
        let pages = self.reflow(oracle, document)?;
        if pages.is_empty() {
            log::info!("No blocks to export; nothing was produced.");
            return Ok(ExportOutcome::Empty);
        }
        let surface = StackSurface::from_pages(&pages, page_gap);
        self.capture_and_slice(capture, &surface).await
    }

    fn reflow<O: MeasurementOracle + ?Sized>(
        &self,
        oracle: &mut O,
        document: ExportDocument,
    ) -> Result<Vec<RenderedPage>, ExportError> {
        let layout = self.config.layout();
        let measured = MeasuredDocument::measure(
            oracle,
            layout.viewport(),
            document.header,
            document.footer,
            document.blocks,
        )?;
        if measured.blocks.is_empty() {
            return Ok(Vec::new());
        }
        let paginator = BlockPaginator::for_regions(
            layout.canvas().height,
            &measured.header,
            &measured.footer,
        )?;
        log::debug!(
            "Page budget is {:.2}px of {:.2}px.",
            paginator.available_height(),
            layout.canvas().height
        );
        let pages = paginator.paginate(measured.blocks);
        let renderer = PageRenderer::new(&layout, measured.header, measured.footer);
        Ok(renderer.render_all(&pages))
    }

    async fn capture_and_slice<C: RasterCapture<Surface = StackSurface>>(
        &self,
        capture: &C,
        surface: &StackSurface,
    ) -> Result<ExportOutcome, ExportError> {
        log::debug!("Capturing surface with {}.", capture.name());
        let raster = capture.capture(surface, &self.config.capture).await?;
        let slicer = RasterSlicer::new(self.config.format, self.config.slice)?;
        let plan = slicer.plan(raster.width(), raster.height())?;
        let bytes = assemble_slices(LopdfDocumentBuilder::new(), self.config.format, &raster, &plan)?;
        Ok(self.finish(bytes, plan.retained()))
    }

    fn finish(&self, bytes: Option<Vec<u8>>, page_count: usize) -> ExportOutcome {
        match bytes {
            Some(bytes) => {
                log::info!(
                    "Exported {} page(s) as '{}' ({} bytes).",
                    page_count,
                    self.config.file_name,
                    bytes.len()
                );
                ExportOutcome::Document(Artifact {
                    file_name: self.config.file_name.clone(),
                    bytes,
                    page_count,
                })
            }
            None => {
                log::info!("Every slice was dropped; nothing was produced.");
                ExportOutcome::Empty
            }
        }
    }
}
