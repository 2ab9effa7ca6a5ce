#![allow(dead_code)]

use lopdf::{Document as LopdfDocument, Object, ObjectId};

/// MediaBox of every page, in page order.
pub fn media_boxes(doc: &LopdfDocument) -> Vec<[f32; 4]> {
    doc.get_pages()
        .values()
        .filter_map(|id| {
            let page = doc.get_dictionary(*id).ok()?;
            let mb = page.get(b"MediaBox").ok()?.as_array().ok()?;
            let values: Vec<f32> = mb.iter().filter_map(|o| o.as_float().ok()).collect();
            values.try_into().ok()
        })
        .collect()
}

/// Names of the image XObjects a page references.
pub fn page_images(doc: &LopdfDocument, page_id: ObjectId) -> Vec<String> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let resources = match page.get(b"Resources") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        Ok(obj) => obj.as_dict().ok(),
        Err(_) => None,
    };
    resources
        .and_then(|r| r.get(b"XObject").ok())
        .and_then(|x| x.as_dict().ok())
        .map(|x| x.iter().map(|(k, _)| String::from_utf8_lossy(k).to_string()).collect())
        .unwrap_or_default()
}

/// Pixel height of every image XObject drawn on each page, in page order.
pub fn image_heights_per_page(doc: &LopdfDocument) -> Vec<Vec<i64>> {
    doc.get_pages()
        .values()
        .map(|page_id| {
            let page = doc.get_dictionary(*page_id).ok();
            let xobjects = page
                .and_then(|p| p.get(b"Resources").ok())
                .and_then(|r| r.as_dict().ok())
                .and_then(|r| r.get(b"XObject").ok())
                .and_then(|x| x.as_dict().ok());
            xobjects
                .map(|x| {
                    x.iter()
                        .filter_map(|(_, v)| v.as_reference().ok())
                        .filter_map(|id| doc.get_object(id).ok()?.as_stream().ok())
                        .filter_map(|s| s.dict.get(b"Height").ok()?.as_i64().ok())
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect()
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert every page has the given size in points
#[macro_export]
macro_rules! assert_pdf_page_size {
    ($pdf:expr, $width:expr, $height:expr) => {
        for mb in $crate::common::pdf_assertions::media_boxes(&$pdf.doc) {
            assert!(
                (mb[2] - $width).abs() < 0.01 && (mb[3] - $height).abs() < 0.01,
                "Expected {}x{} page, got {:?}",
                $width,
                $height,
                mb
            );
        }
    };
}
