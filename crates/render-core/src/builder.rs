use crate::error::RenderError;
use folio_types::{Color, Raster, Rect};

/// Identifies a page created by a [`DocumentBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle(pub usize);

/// Identifies an image embedded in a [`DocumentBuilder`]. An image can be
/// drawn any number of times, on any page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub usize);

/// A trait for document builders, abstracting the output primitives.
///
/// All rectangles are in points with a bottom-left origin.
pub trait DocumentBuilder {
    /// Appends a page. Pages appear in the output in the order they were added.
    fn add_page(&mut self, width_pt: f32, height_pt: f32) -> Result<PageHandle, RenderError>;

    fn embed_image(&mut self, raster: &Raster) -> Result<ImageHandle, RenderError>;

    fn draw_image(
        &mut self,
        page: PageHandle,
        image: ImageHandle,
        rect: Rect,
    ) -> Result<(), RenderError>;

    fn fill_rect(&mut self, page: PageHandle, rect: Rect, color: Color) -> Result<(), RenderError>;

    fn page_count(&self) -> usize;

    /// Serializes the finished document.
    fn save(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}
