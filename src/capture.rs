//! Stacked rendering surfaces and their rasterization.
//!
//! A [`StackSurface`] is the content laid out top to bottom at the canvas
//! width, in layout pixels. [`StackCapture`] composites it into one tall
//! RGBA raster with the `image` crate.

use folio_traits::{CaptureError, CaptureOptions, CrossOriginPolicy, RasterCapture};
use folio_types::{BlockContent, BlockMetrics, Color, ContentBlock, Raster, Rect, Region, RenderedPage, Size};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceItem {
    pub rect: Rect,
    pub content: BlockContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackSurface {
    size: Size,
    background: Color,
    items: Vec<SurfaceItem>,
}

impl StackSurface {
    /// An empty surface of the given width on a white background.
    pub fn new(width: f32) -> Self {
        Self {
            size: Size::new(width, 0.0),
            background: Color::WHITE,
            items: Vec::new(),
        }
    }

    /// Appends content below everything already on the surface, offset by its
    /// margins and inset horizontally by `padding`.
    pub fn push(&mut self, metrics: BlockMetrics, content: BlockContent, padding: f32) {
        let top = self.size.height + metrics.margin_top;
        if !matches!(content, BlockContent::Empty) {
            self.items.push(SurfaceItem {
                rect: Rect::new(
                    padding,
                    top,
                    (self.size.width - 2.0 * padding).max(0.0),
                    metrics.height,
                ),
                content,
            });
        }
        self.size.height += metrics.outer_height();
    }

    /// Header, every block and footer in one continuous column.
    pub fn from_blocks(
        width: f32,
        padding: f32,
        header: &Region,
        blocks: &[ContentBlock],
        footer: &Region,
    ) -> Self {
        let mut surface = Self::new(width);
        surface.push(header.metrics, header.content.clone(), padding);
        for block in blocks {
            surface.push(block.metrics(), block.content.clone(), padding);
        }
        surface.push(footer.metrics, footer.content.clone(), padding);
        surface
    }

    /// Composed pages one below the other, separated by `gap` layout pixels.
    pub fn from_pages(pages: &[RenderedPage], gap: f32) -> Self {
        let width = pages.iter().map(|p| p.size.width).fold(0.0, f32::max);
        let mut surface = Self::new(width);
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                surface.size.height += gap;
            }
            let top = surface.size.height;
            surface.items.extend(page.elements.iter().filter_map(|el| {
                if matches!(el.content, BlockContent::Empty) {
                    return None;
                }
                Some(SurfaceItem {
                    rect: Rect::new(el.rect.x, top + el.rect.y, el.rect.width, el.rect.height),
                    content: el.content.clone(),
                })
            }));
            surface.size.height += page.size.height;
        }
        surface
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn items(&self) -> &[SurfaceItem] {
        &self.items
    }
}

/// Rasterizes a [`StackSurface`] at the requested scale.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackCapture;

fn device_rect(rect: Rect, scale: f32) -> (i64, i64, u32, u32) {
    let scaled = rect.scaled(scale);
    (
        scaled.x.round() as i64,
        scaled.y.round() as i64,
        scaled.width.round().max(0.0) as u32,
        scaled.height.round().max(0.0) as u32,
    )
}

fn to_image(raster: &Raster) -> Result<RgbaImage, CaptureError> {
    RgbaImage::from_raw(raster.width(), raster.height(), raster.pixels().to_vec()).ok_or_else(|| {
        CaptureError::Surface(format!(
            "pixel buffer does not match {}x{}",
            raster.width(),
            raster.height()
        ))
    })
}

impl RasterCapture for StackCapture {
    type Surface = StackSurface;

    async fn capture(
        &self,
        surface: &StackSurface,
        options: &CaptureOptions,
    ) -> Result<Raster, CaptureError> {
        options.validate()?;
        let width = (surface.size.width * options.scale).ceil() as u32;
        let height = (surface.size.height * options.scale).ceil() as u32;
        if width == 0 || height == 0 {
            return Err(CaptureError::Surface(format!(
                "surface of {:.1}x{:.1}px has no area",
                surface.size.width, surface.size.height
            )));
        }

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(surface.background.to_rgba8()));

        for item in &surface.items {
            let (x, y, w, h) = device_rect(item.rect, options.scale);
            if w == 0 || h == 0 {
                continue;
            }
            match &item.content {
                BlockContent::Fill(color) => {
                    let fill = RgbaImage::from_pixel(w, h, Rgba(color.to_rgba8()));
                    imageops::overlay(&mut canvas, &fill, x, y);
                }
                BlockContent::Raster(raster) => {
                    if raster.provenance().is_untrusted() {
                        match options.cross_origin {
                            CrossOriginPolicy::UseCors => {
                                return Err(CaptureError::TaintedContent(format!(
                                    "{}x{} image at y={:.1} was loaded without CORS approval",
                                    raster.width(),
                                    raster.height(),
                                    item.rect.y
                                )));
                            }
                            CrossOriginPolicy::Omit => {
                                log::warn!(
                                    "Omitting untrusted cross-origin image at y={:.1} from capture",
                                    item.rect.y
                                );
                                continue;
                            }
                        }
                    }
                    if raster.is_empty() {
                        continue;
                    }
                    let source = to_image(raster)?;
                    let resized = if source.dimensions() == (w, h) {
                        source
                    } else {
                        imageops::resize(&source, w, h, FilterType::Triangle)
                    };
                    imageops::overlay(&mut canvas, &resized, x, y);
                }
                BlockContent::Empty => {}
            }
        }

        log::debug!(
            "Captured {} item(s) into a {}x{} raster at scale {}.",
            surface.items.len(),
            width,
            height,
            options.scale
        );
        Raster::new(width, height, canvas.into_raw()).map_err(|e| CaptureError::Surface(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "StackCapture"
    }
}
