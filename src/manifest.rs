//! JSON document manifests and the oracle that measures them.
//!
//! ```json
//! {
//!   "header": { "image": "header.png", "marginBottom": 40 },
//!   "footer": { "fill": "#f0f0f0", "height": 60 },
//!   "blocks": [
//!     { "id": "intro", "image": "intro.png", "marginTop": 16 },
//!     { "height": 32 }
//!   ]
//! }
//! ```
//!
//! Image blocks are scaled to the content width, keeping their aspect ratio;
//! fills and spacers have a fixed height.

use crate::error::ExportError;
use crate::export::ExportDocument;
use folio_traits::{MeasureError, MeasurementOracle, Viewport};
use folio_types::{BlockContent, BlockId, BlockMetrics, Color, Raster, SourceBlock};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BlockSource {
    Image { image: PathBuf },
    Fill { fill: Color, height: f32 },
    Spacer { height: f32 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestBlock {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub source: BlockSource,
    #[serde(default)]
    pub margin_top: f32,
    #[serde(default)]
    pub margin_bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub header: Option<ManifestBlock>,
    #[serde(default)]
    pub footer: Option<ManifestBlock>,
    #[serde(default)]
    pub blocks: Vec<ManifestBlock>,
    /// Directory image paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Manifest {
    pub fn from_json(json: &str, base_dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let mut manifest: Manifest = serde_json::from_str(json)?;
        manifest.base_dir = base_dir.into();
        Ok(manifest)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read manifest from '{}': {}", path.display(), e),
            )
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json(&json, base_dir)
    }

    /// Decodes every image and returns the document together with an oracle
    /// able to measure it.
    pub fn load(&self) -> Result<(ExportDocument, RasterMeasurementOracle), ExportError> {
        let mut oracle = RasterMeasurementOracle::new();

        let header = match &self.header {
            Some(block) => {
                let (content, sizing) = self.resolve(block)?;
                oracle.set_header(sizing);
                content
            }
            None => BlockContent::Empty,
        };
        let footer = match &self.footer {
            Some(block) => {
                let (content, sizing) = self.resolve(block)?;
                oracle.set_footer(sizing);
                content
            }
            None => BlockContent::Empty,
        };

        let mut blocks = Vec::with_capacity(self.blocks.len());
        let mut seen = HashSet::with_capacity(self.blocks.len());
        for (i, block) in self.blocks.iter().enumerate() {
            let id = block.id.clone().unwrap_or_else(|| format!("block-{}", i + 1));
            if !seen.insert(id.clone()) {
                return Err(ExportError::Config(format!(
                    "Block id '{}' appears more than once in the manifest",
                    id
                )));
            }
            let (content, sizing) = self.resolve(block)?;
            oracle.insert(id.as_str(), sizing);
            blocks.push(SourceBlock::new(id, content));
        }

        log::info!("Loaded manifest with {} block(s).", blocks.len());
        Ok((ExportDocument { header, footer, blocks }, oracle))
    }

    fn resolve(&self, block: &ManifestBlock) -> Result<(BlockContent, Sizing), ExportError> {
        let (content, height) = match &block.source {
            BlockSource::Image { image } => {
                let path = self.base_dir.join(image);
                let decoded = image::open(&path)?.to_rgba8();
                let (w, h) = decoded.dimensions();
                log::debug!("Decoded {} ({}x{})", path.display(), w, h);
                let raster = Raster::new(w, h, decoded.into_raw())
                    .map_err(|e| ExportError::Config(e.to_string()))?;
                (BlockContent::Raster(raster), None)
            }
            BlockSource::Fill { fill, height } => (BlockContent::Fill(*fill), Some(*height)),
            BlockSource::Spacer { height } => (BlockContent::Empty, Some(*height)),
        };
        let sizing = Sizing {
            fixed_height: height,
            margin_top: block.margin_top,
            margin_bottom: block.margin_bottom,
            intrinsic: match &content {
                BlockContent::Raster(r) => Some((r.width(), r.height())),
                _ => None,
            },
        };
        Ok((content, sizing))
    }
}

/// How tall a block renders, independent of any particular viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sizing {
    pub fixed_height: Option<f32>,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Pixel size of an image, scaled to the content width when measured.
    pub intrinsic: Option<(u32, u32)>,
}

impl Sizing {
    pub fn fixed(height: f32) -> Self {
        Self { fixed_height: Some(height), ..Default::default() }
    }

    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    fn metrics(&self, target: &str, viewport: &Viewport) -> Result<BlockMetrics, MeasureError> {
        let height = match (self.fixed_height, self.intrinsic) {
            (Some(h), _) => h,
            (None, Some((w, h))) if w > 0 => viewport.content_width() * h as f32 / w as f32,
            _ => {
                return Err(MeasureError::Failed {
                    target: target.to_string(),
                    message: "block has neither a fixed height nor an image".to_string(),
                });
            }
        };
        Ok(BlockMetrics::new(height, self.margin_top, self.margin_bottom))
    }
}

/// Measures blocks whose height follows from their image's aspect ratio at
/// the content width, or from a fixed height.
///
/// Blocks without a registered sizing are measured from their content when it
/// is a raster.
#[derive(Debug, Default)]
pub struct RasterMeasurementOracle {
    sizings: HashMap<BlockId, Sizing>,
    header: Sizing,
    footer: Sizing,
    header_set: bool,
    footer_set: bool,
    viewport: Option<Viewport>,
}

impl RasterMeasurementOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<BlockId>, sizing: Sizing) {
        self.sizings.insert(id.into(), sizing);
    }

    pub fn set_header(&mut self, sizing: Sizing) {
        self.header = sizing;
        self.header_set = true;
    }

    pub fn set_footer(&mut self, sizing: Sizing) {
        self.footer = sizing;
        self.footer_set = true;
    }

    fn viewport(&self) -> Result<&Viewport, MeasureError> {
        self.viewport.as_ref().ok_or(MeasureError::NoContext)
    }
}

impl MeasurementOracle for RasterMeasurementOracle {
    fn acquire(&mut self, viewport: &Viewport) -> Result<(), MeasureError> {
        if !(viewport.width.is_finite() && viewport.content_width() > 0.0) {
            return Err(MeasureError::Invalid {
                target: "viewport".to_string(),
                message: format!(
                    "width {} with padding {} leaves no content width",
                    viewport.width, viewport.padding
                ),
            });
        }
        self.viewport = Some(*viewport);
        Ok(())
    }

    fn measure(&mut self, block: &SourceBlock) -> Result<BlockMetrics, MeasureError> {
        let viewport = self.viewport()?;
        let sizing = match (self.sizings.get(&block.id), &block.content) {
            (Some(sizing), _) => *sizing,
            (None, BlockContent::Raster(raster)) => Sizing {
                intrinsic: Some((raster.width(), raster.height())),
                ..Default::default()
            },
            (None, _) => return Err(MeasureError::NotFound(block.id.clone())),
        };
        sizing.metrics(block.id.as_str(), viewport)
    }

    fn measure_header(&mut self) -> Result<BlockMetrics, MeasureError> {
        let viewport = self.viewport()?;
        if !self.header_set {
            return Ok(BlockMetrics::default());
        }
        self.header.metrics("header", viewport)
    }

    fn measure_footer(&mut self) -> Result<BlockMetrics, MeasureError> {
        let viewport = self.viewport()?;
        if !self.footer_set {
            return Ok(BlockMetrics::default());
        }
        self.footer.metrics("footer", viewport)
    }

    fn release(&mut self) {
        self.viewport = None;
    }

    fn name(&self) -> &'static str {
        "RasterMeasurementOracle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_block_kind() {
        let manifest = Manifest::from_json(
            r##"{
                "header": { "fill": "#202020", "height": 80, "marginBottom": 40 },
                "blocks": [
                    { "id": "hero", "image": "hero.png", "marginTop": 16 },
                    { "height": 32 }
                ]
            }"##,
            "assets",
        )
        .unwrap();
        assert!(matches!(
            manifest.header.as_ref().map(|h| &h.source),
            Some(BlockSource::Fill { height, .. }) if *height == 80.0
        ));
        assert_eq!(
            manifest.blocks[0].source,
            BlockSource::Image { image: PathBuf::from("hero.png") }
        );
        assert_eq!(manifest.blocks[0].margin_top, 16.0);
        assert_eq!(manifest.blocks[1].source, BlockSource::Spacer { height: 32.0 });
        assert!(manifest.footer.is_none());
        assert_eq!(manifest.base_dir, PathBuf::from("assets"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let manifest = Manifest::from_json(
            r#"{ "blocks": [
                { "id": "gap", "height": 10 },
                { "height": 20 },
                { "id": "gap", "height": 30 }
            ] }"#,
            ".",
        )
        .unwrap();
        let err = manifest.load().unwrap_err();
        assert!(matches!(err, ExportError::Config(ref msg) if msg.contains("'gap'")));
    }

    #[test]
    fn generated_ids_collide_with_explicit_ones() {
        let manifest = Manifest::from_json(
            r#"{ "blocks": [{ "id": "block-2", "height": 10 }, { "height": 20 }] }"#,
            ".",
        )
        .unwrap();
        assert!(matches!(manifest.load(), Err(ExportError::Config(_))));
    }

    #[test]
    fn images_scale_to_content_width() {
        let mut oracle = RasterMeasurementOracle::new();
        let block = SourceBlock::new("photo", BlockContent::Raster(Raster::filled(400, 300, Color::WHITE)));
        oracle.acquire(&Viewport::new(848.0, 24.0)).unwrap();
        let metrics = oracle.measure(&block).unwrap();
        assert_eq!(metrics.height, 600.0);
    }

    #[test]
    fn fixed_sizing_wins_and_keeps_margins() {
        let mut oracle = RasterMeasurementOracle::new();
        oracle.insert("gap", Sizing::fixed(32.0).with_margins(4.0, 8.0));
        oracle.acquire(&Viewport::new(800.0, 24.0)).unwrap();
        let metrics = oracle.measure(&SourceBlock::new("gap", BlockContent::Empty)).unwrap();
        assert_eq!(metrics, BlockMetrics::new(32.0, 4.0, 8.0));
        assert_eq!(oracle.measure_header().unwrap(), BlockMetrics::default());
    }

    #[test]
    fn requires_context_and_known_blocks() {
        let mut oracle = RasterMeasurementOracle::new();
        let block = SourceBlock::new("unknown", BlockContent::Empty);
        assert_eq!(oracle.measure(&block), Err(MeasureError::NoContext));
        oracle.acquire(&Viewport::new(800.0, 24.0)).unwrap();
        assert!(matches!(oracle.measure(&block), Err(MeasureError::NotFound(_))));
        oracle.release();
        assert_eq!(oracle.measure_footer(), Err(MeasureError::NoContext));
    }
}
