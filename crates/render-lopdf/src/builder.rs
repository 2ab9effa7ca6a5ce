use flate2::write::ZlibEncoder;
use flate2::Compression;
use folio_render_core::{DocumentBuilder, ImageHandle, PageHandle, RenderError};
use folio_types::{Color, Raster, Rect};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeSet;
use std::io::Write;

struct PendingPage {
    width: f32,
    height: f32,
    operations: Vec<Operation>,
    images: BTreeSet<usize>,
}

/// An in-memory PDF builder using the `lopdf` library.
///
/// Images are written as objects as soon as they are embedded; pages are
/// written on [`DocumentBuilder::save`], once their content is complete.
pub struct LopdfDocumentBuilder {
    document: Document,
    pages_id: ObjectId,
    pages: Vec<PendingPage>,
    images: Vec<ObjectId>,
}

impl Default for LopdfDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfDocumentBuilder {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    fn page_mut(&mut self, page: PageHandle) -> Result<&mut PendingPage, RenderError> {
        self.pages
            .get_mut(page.0)
            .ok_or_else(|| RenderError::InvalidHandle(format!("page {}", page.0)))
    }

    fn image_name(index: usize) -> String {
        format!("Im{}", index + 1)
    }

    fn add_compressed_stream(&mut self, dict: Dictionary, data: &[u8]) -> Result<ObjectId, RenderError> {
        let mut dict = dict;
        dict.set("Filter", "FlateDecode");
        Ok(self.document.add_object(Stream::new(dict, deflate(data)?)))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Splits tightly packed RGBA into RGB samples and, when any pixel is not
/// fully opaque, a separate alpha channel.
fn split_alpha(raster: &Raster) -> (Vec<u8>, Option<Vec<u8>>) {
    let pixels = raster.pixels();
    let rgb: Vec<u8> = pixels
        .chunks_exact(4)
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();
    let alpha = raster
        .has_transparency()
        .then(|| pixels.chunks_exact(4).map(|p| p[3]).collect());
    (rgb, alpha)
}

impl DocumentBuilder for LopdfDocumentBuilder {
    fn add_page(&mut self, width_pt: f32, height_pt: f32) -> Result<PageHandle, RenderError> {
        if !(width_pt > 0.0 && height_pt > 0.0) {
            return Err(RenderError::Pdf(format!(
                "Invalid page size {}x{}",
                width_pt, height_pt
            )));
        }
        self.pages.push(PendingPage {
            width: width_pt,
            height: height_pt,
            operations: Vec::new(),
            images: BTreeSet::new(),
        });
        Ok(PageHandle(self.pages.len() - 1))
    }

    fn embed_image(&mut self, raster: &Raster) -> Result<ImageHandle, RenderError> {
        if raster.is_empty() {
            return Err(RenderError::Encoding(format!(
                "Cannot embed an empty {}x{} image",
                raster.width(),
                raster.height()
            )));
        }
        let (rgb, alpha) = split_alpha(raster);
        let width = raster.width() as i64;
        let height = raster.height() as i64;

        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if let Some(alpha) = alpha {
            let mask_id = self.add_compressed_stream(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                &alpha,
            )?;
            image_dict.set("SMask", mask_id);
        }
        let image_id = self.add_compressed_stream(image_dict, &rgb)?;
        self.images.push(image_id);
        log::debug!(
            "Embedded {}x{} image as {:?}",
            raster.width(),
            raster.height(),
            image_id
        );
        Ok(ImageHandle(self.images.len() - 1))
    }

    fn draw_image(
        &mut self,
        page: PageHandle,
        image: ImageHandle,
        rect: Rect,
    ) -> Result<(), RenderError> {
        if image.0 >= self.images.len() {
            return Err(RenderError::InvalidHandle(format!("image {}", image.0)));
        }
        let name = Self::image_name(image.0);
        let page = self.page_mut(page)?;
        page.images.insert(image.0);
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    rect.width.into(),
                    0.into(),
                    0.into(),
                    rect.height.into(),
                    rect.x.into(),
                    rect.y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn fill_rect(&mut self, page: PageHandle, rect: Rect, color: Color) -> Result<(), RenderError> {
        let [r, g, b] = color.to_unit_rgb();
        let page = self.page_mut(page)?;
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new(
                "re",
                vec![rect.x.into(), rect.y.into(), rect.width.into(), rect.height.into()],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(mut self) -> Result<Vec<u8>, RenderError> {
        let pages = std::mem::take(&mut self.pages);
        let mut page_ids: Vec<Object> = Vec::with_capacity(pages.len());

        for page in pages {
            let content = Content { operations: page.operations }.encode()?;
            let content_id = self.add_compressed_stream(Dictionary::new(), &content)?;

            let mut xobjects = Dictionary::new();
            for index in &page.images {
                xobjects.set(Self::image_name(*index), self.images[*index]);
            }

            let page_id = self.document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
                "Contents" => content_id,
                "Resources" => dictionary! { "XObject" => xobjects },
            });
            page_ids.push(page_id.into());
        }

        let count = page_ids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => count,
            }),
        );
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(buffer)
    }
}
