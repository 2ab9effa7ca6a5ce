use crate::config::LayoutConfig;
use folio_types::{
    BlockContent, ElementRole, Page, PositionedElement, Rect, Region, RenderedPage, Size,
};

/// Composes pages from a fixed header, a page's worth of blocks and a fixed
/// footer. Every page gets the same header and footer; nothing in them varies
/// per page.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    canvas: Size,
    padding: f32,
    header: Region,
    footer: Region,
}

impl PageRenderer {
    pub fn new(config: &LayoutConfig, header: Region, footer: Region) -> Self {
        Self {
            canvas: config.canvas(),
            padding: config.padding,
            header,
            footer,
        }
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    fn content_width(&self) -> f32 {
        (self.canvas.width - 2.0 * self.padding).max(0.0)
    }

    fn region_element(&self, region: &Region, y: f32, role: ElementRole) -> Option<PositionedElement> {
        if matches!(region.content, BlockContent::Empty) && region.metrics.height <= 0.0 {
            return None;
        }
        Some(PositionedElement {
            rect: Rect::new(self.padding, y, self.content_width(), region.metrics.height),
            role,
            content: region.content.clone(),
        })
    }

    pub fn render(&self, page: &Page) -> RenderedPage {
        let mut elements = Vec::with_capacity(page.blocks.len() + 2);

        let header = &self.header.metrics;
        elements.extend(self.region_element(&self.header, header.margin_top, ElementRole::Header));

        let mut cursor = header.outer_height();
        for block in &page.blocks {
            cursor += block.margin_top;
            elements.push(PositionedElement {
                rect: Rect::new(self.padding, cursor, self.content_width(), block.rendered_height),
                role: ElementRole::Block(block.id.clone()),
                content: block.content.clone(),
            });
            cursor += block.rendered_height + block.margin_bottom;
        }

        let footer = &self.footer.metrics;
        let footer_y = self.canvas.height - footer.margin_bottom - footer.height;
        elements.extend(self.region_element(&self.footer, footer_y, ElementRole::Footer));

        RenderedPage {
            index: page.index,
            size: self.canvas,
            elements,
        }
    }

    pub fn render_all(&self, pages: &[Page]) -> Vec<RenderedPage> {
        pages.iter().map(|p| self.render(p)).collect()
    }
}
