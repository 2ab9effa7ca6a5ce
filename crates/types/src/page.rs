use crate::block::{BlockContent, ContentBlock};
use crate::geometry::{Rect, Size};
use crate::ids::BlockId;

/// A group of blocks produced by the reflow paginator.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    pub blocks: Vec<ContentBlock>,
    pub cumulative_height: f32,
}

impl Page {
    pub fn new(index: usize) -> Self {
        Self { index, blocks: Vec::new(), cumulative_height: 0.0 }
    }

    pub fn push(&mut self, block: ContentBlock) {
        self.cumulative_height += block.outer_height();
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_ids(&self) -> impl Iterator<Item = &BlockId> {
        self.blocks.iter().map(|b| &b.id)
    }
}

/// A horizontal strip of a source raster, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSlice {
    pub offset_px: f32,
    pub height_px: f32,
}

/// What a positioned element represents on its page.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementRole {
    Header,
    Block(BlockId),
    Footer,
}

/// Content placed at an absolute position on a page, in layout pixels
/// with a top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub rect: Rect,
    pub role: ElementRole,
    pub content: BlockContent,
}

/// A composed page ready for the document builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub index: usize,
    pub size: Size,
    pub elements: Vec<PositionedElement>,
}

impl RenderedPage {
    pub fn block_ids(&self) -> impl Iterator<Item = &BlockId> {
        self.elements.iter().filter_map(|el| match &el.role {
            ElementRole::Block(id) => Some(id),
            _ => None,
        })
    }
}
