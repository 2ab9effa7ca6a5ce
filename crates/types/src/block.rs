use crate::color::Color;
use crate::ids::BlockId;
use crate::raster::Raster;

/// Opaque payload of a block. Pagination never looks inside it; only the
/// renderer and the document builder do.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BlockContent {
    Raster(Raster),
    Fill(Color),
    #[default]
    Empty,
}

/// A block as handed to an export, before measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBlock {
    pub id: BlockId,
    pub content: BlockContent,
}

impl SourceBlock {
    pub fn new(id: impl Into<BlockId>, content: BlockContent) -> Self {
        Self { id: id.into(), content }
    }
}

/// Vertical metrics reported by a measurement oracle, in layout pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockMetrics {
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl BlockMetrics {
    pub fn new(height: f32, margin_top: f32, margin_bottom: f32) -> Self {
        Self { height, margin_top, margin_bottom }
    }

    pub fn with_height(height: f32) -> Self {
        Self { height, ..Default::default() }
    }

    /// Height including both vertical margins.
    pub fn outer_height(&self) -> f32 {
        self.height + self.margin_top + self.margin_bottom
    }
}

/// A measured block. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub id: BlockId,
    pub order_index: usize,
    pub rendered_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub content: BlockContent,
}

impl ContentBlock {
    pub fn measured(source: SourceBlock, order_index: usize, metrics: BlockMetrics) -> Self {
        Self {
            id: source.id,
            order_index,
            rendered_height: metrics.height,
            margin_top: metrics.margin_top,
            margin_bottom: metrics.margin_bottom,
            content: source.content,
        }
    }

    pub fn metrics(&self) -> BlockMetrics {
        BlockMetrics::new(self.rendered_height, self.margin_top, self.margin_bottom)
    }

    /// The height this block consumes on a page.
    pub fn outer_height(&self) -> f32 {
        self.metrics().outer_height()
    }
}

/// A measured header or footer, reused verbatim on every page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    pub metrics: BlockMetrics,
    pub content: BlockContent,
}

impl Region {
    pub fn new(metrics: BlockMetrics, content: BlockContent) -> Self {
        Self { metrics, content }
    }

    /// A region that takes no space.
    pub fn none() -> Self {
        Self::default()
    }
}
