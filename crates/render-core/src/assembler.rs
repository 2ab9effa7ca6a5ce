//! Emits one output page per retained page or slice, in order.
//!
//! Both entry points return `Ok(None)` when there is nothing to emit; the
//! builder is dropped without ever being saved in that case.

use crate::builder::{DocumentBuilder, ImageHandle, PageHandle};
use crate::error::RenderError;
use crate::utils::to_pdf_rect;
use folio_layout::SlicePlan;
use folio_types::{BlockContent, PageFormat, Raster, RenderedPage};
use std::collections::HashMap;

/// Key identifying a raster by its shared pixel buffer, so a header or footer
/// repeated on every page is embedded once.
type RasterKey = (usize, u32, u32);

fn raster_key(raster: &Raster) -> RasterKey {
    (raster.pixels().as_ptr() as usize, raster.width(), raster.height())
}

pub fn assemble_pages<B: DocumentBuilder>(
    mut builder: B,
    format: PageFormat,
    pages: &[RenderedPage],
) -> Result<Option<Vec<u8>>, RenderError> {
    if pages.is_empty() {
        log::info!("No pages to assemble; skipping document output.");
        return Ok(None);
    }

    let mut embedded: HashMap<RasterKey, ImageHandle> = HashMap::new();

    for page in pages {
        if page.size.width <= 0.0 {
            return Err(RenderError::Pdf(format!(
                "Page {} has a non-positive width of {}",
                page.index, page.size.width
            )));
        }
        let px_to_pt = format.width_points / page.size.width;
        let handle = builder.add_page(format.width_points, format.height_points)?;

        for element in &page.elements {
            let rect = to_pdf_rect(element.rect, px_to_pt, format.height_points);
            match &element.content {
                BlockContent::Raster(raster) => {
                    let image = match embedded.get(&raster_key(raster)) {
                        Some(image) => *image,
                        None => {
                            let image = builder.embed_image(raster)?;
                            embedded.insert(raster_key(raster), image);
                            image
                        }
                    };
                    builder.draw_image(handle, image, rect)?;
                }
                BlockContent::Fill(color) => builder.fill_rect(handle, rect, *color)?,
                BlockContent::Empty => {}
            }
        }
    }

    log::info!(
        "Assembled {} page(s) with {} embedded image(s).",
        builder.page_count(),
        embedded.len()
    );
    builder.save().map(Some)
}

/// Emits each retained slice of `raster` on its own page.
pub fn assemble_slices<B: DocumentBuilder>(
    mut builder: B,
    format: PageFormat,
    raster: &Raster,
    plan: &SlicePlan,
) -> Result<Option<Vec<u8>>, RenderError> {
    if plan.is_empty() {
        log::info!("No slices retained; skipping document output.");
        return Ok(None);
    }

    let mut pages: Vec<PageHandle> = Vec::with_capacity(plan.retained());
    for placed in &plan.slices {
        let strip = raster.crop_rows(placed.slice.offset_px, placed.slice.height_px);
        if strip.is_empty() {
            return Err(RenderError::Encoding(format!(
                "Slice {} at {:.2}px lies outside the {}px raster",
                placed.index,
                placed.slice.offset_px,
                raster.height()
            )));
        }
        let page = builder.add_page(format.width_points, format.height_points)?;
        let image = builder.embed_image(&strip)?;
        builder.draw_image(page, image, placed.placement)?;
        pages.push(page);
    }

    log::info!(
        "Assembled {} slice page(s) ({} dropped).",
        pages.len(),
        plan.dropped()
    );
    builder.save().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_layout::{RasterSlicer, SliceConfig};
    use folio_types::{Color, ElementRole, PositionedElement, Rect, Size};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Page(f32, f32),
        Embed(u32, u32),
        Draw(usize, usize, Rect),
        Fill(usize, Rect),
    }

    #[derive(Default)]
    struct RecordingBuilder {
        ops: Vec<Op>,
        pages: usize,
        images: usize,
    }

    impl DocumentBuilder for &mut RecordingBuilder {
        fn add_page(&mut self, w: f32, h: f32) -> Result<PageHandle, RenderError> {
            self.ops.push(Op::Page(w, h));
            self.pages += 1;
            Ok(PageHandle(self.pages - 1))
        }

        fn embed_image(&mut self, raster: &Raster) -> Result<ImageHandle, RenderError> {
            self.ops.push(Op::Embed(raster.width(), raster.height()));
            self.images += 1;
            Ok(ImageHandle(self.images - 1))
        }

        fn draw_image(&mut self, page: PageHandle, image: ImageHandle, rect: Rect) -> Result<(), RenderError> {
            self.ops.push(Op::Draw(page.0, image.0, rect));
            Ok(())
        }

        fn fill_rect(&mut self, page: PageHandle, rect: Rect, _color: Color) -> Result<(), RenderError> {
            self.ops.push(Op::Fill(page.0, rect));
            Ok(())
        }

        fn page_count(&self) -> usize {
            self.pages
        }

        fn save(self) -> Result<Vec<u8>, RenderError> {
            Ok(format!("{} pages", self.pages).into_bytes())
        }
    }

    fn element(role: ElementRole, rect: Rect, content: BlockContent) -> PositionedElement {
        PositionedElement { rect, role, content }
    }

    #[test]
    fn zero_pages_is_nothing_to_export() {
        let mut builder = RecordingBuilder::default();
        let out = assemble_pages(&mut builder, PageFormat::A4, &[]).unwrap();
        assert!(out.is_none());
        assert!(builder.ops.is_empty());
    }

    #[test]
    fn maps_pixels_to_points_and_flips() {
        let format = PageFormat::new(500.0, 1000.0);
        let page = RenderedPage {
            index: 0,
            size: Size::new(1000.0, 2000.0),
            elements: vec![
                element(ElementRole::Header, Rect::new(0.0, 0.0, 1000.0, 200.0), BlockContent::Fill(Color::WHITE)),
                element(ElementRole::Block("spacer".into()), Rect::new(0.0, 200.0, 1000.0, 50.0), BlockContent::Empty),
            ],
        };
        let mut builder = RecordingBuilder::default();
        let out = assemble_pages(&mut builder, format, &[page]).unwrap();
        assert_eq!(out, Some(b"1 pages".to_vec()));
        assert_eq!(
            builder.ops,
            vec![Op::Page(500.0, 1000.0), Op::Fill(0, Rect::new(0.0, 900.0, 500.0, 100.0))]
        );
    }

    #[test]
    fn repeated_rasters_are_embedded_once() {
        let header = Raster::filled(10, 2, Color::gray(30));
        let pages: Vec<RenderedPage> = (0..3)
            .map(|i| RenderedPage {
                index: i,
                size: Size::new(100.0, 100.0),
                elements: vec![element(
                    ElementRole::Header,
                    Rect::new(0.0, 0.0, 100.0, 20.0),
                    BlockContent::Raster(header.clone()),
                )],
            })
            .collect();
        let mut builder = RecordingBuilder::default();
        assemble_pages(&mut builder, PageFormat::new(100.0, 100.0), &pages).unwrap();
        let embeds = builder.ops.iter().filter(|op| matches!(op, Op::Embed(..))).count();
        let draws = builder.ops.iter().filter(|op| matches!(op, Op::Draw(..))).count();
        assert_eq!((embeds, draws, builder.pages), (1, 3, 3));
    }

    #[test]
    fn slices_become_pages_in_order() {
        let raster = Raster::filled(100, 220, Color::gray(0));
        let slicer = RasterSlicer::new(PageFormat::new(100.0, 100.0), SliceConfig::default()).unwrap();
        let plan = slicer.plan(raster.width(), raster.height()).unwrap();
        let mut builder = RecordingBuilder::default();
        assemble_slices(&mut builder, slicer.format(), &raster, &plan).unwrap();
        assert_eq!(
            builder.ops,
            vec![
                Op::Page(100.0, 100.0),
                Op::Embed(100, 100),
                Op::Draw(0, 0, Rect::new(0.0, 0.0, 100.0, 100.0)),
                Op::Page(100.0, 100.0),
                Op::Embed(100, 100),
                Op::Draw(1, 1, Rect::new(0.0, 0.0, 100.0, 100.0)),
                Op::Page(100.0, 100.0),
                Op::Embed(100, 20),
                Op::Draw(2, 2, Rect::new(0.0, 80.0, 100.0, 20.0)),
            ]
        );
    }

    #[test]
    fn sub_row_tail_does_not_abort_assembly() {
        let raster = Raster::filled(1000, 2829, Color::gray(0));
        let slicer =
            RasterSlicer::new(PageFormat::A4, SliceConfig { remainder_threshold: 0.0 }).unwrap();
        let plan = slicer.plan(raster.width(), raster.height()).unwrap();
        let mut builder = RecordingBuilder::default();
        let out = assemble_slices(&mut builder, slicer.format(), &raster, &plan).unwrap();
        assert_eq!(out, Some(b"2 pages".to_vec()));
        let embedded: Vec<u32> = builder
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Embed(_, h) => Some(*h),
                _ => None,
            })
            .collect();
        assert_eq!(embedded.iter().sum::<u32>(), 2829);
    }

    #[test]
    fn fully_dropped_plan_is_nothing_to_export() {
        let raster = Raster::filled(100, 5, Color::gray(0));
        let slicer = RasterSlicer::new(PageFormat::new(100.0, 100.0), SliceConfig::default()).unwrap();
        let plan = slicer.plan(raster.width(), raster.height()).unwrap();
        let mut builder = RecordingBuilder::default();
        assert!(assemble_slices(&mut builder, slicer.format(), &raster, &plan).unwrap().is_none());
        assert!(builder.ops.is_empty());
    }
}
