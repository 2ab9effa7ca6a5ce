use folio_types::Rect;

/// Convert layout Y coordinate to PDF Y coordinate (flip origin)
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Map a top-left origin rectangle in layout pixels to a bottom-left origin
/// rectangle in points.
pub fn to_pdf_rect(rect: Rect, px_to_pt: f32, page_height_pt: f32) -> Rect {
    let scaled = rect.scaled(px_to_pt);
    Rect::new(
        scaled.x,
        flip_y(scaled.bottom(), page_height_pt),
        scaled.width,
        scaled.height,
    )
}
