use folio_traits::InMemoryMeasurementOracle;
use folio_types::{BlockContent, BlockMetrics, ContentBlock, SourceBlock};

pub fn block_id(i: usize) -> String {
    format!("block-{}", i)
}

/// Unmeasured blocks `block-0..block-{n-1}` with empty content.
pub fn sources(n: usize) -> Vec<SourceBlock> {
    (0..n)
        .map(|i| SourceBlock::new(block_id(i), BlockContent::Empty))
        .collect()
}

/// An oracle that knows the height (no margins) of `block-i` for each entry.
pub fn oracle_with_heights(heights: &[f32]) -> InMemoryMeasurementOracle {
    let mut oracle = InMemoryMeasurementOracle::new();
    for (i, h) in heights.iter().enumerate() {
        oracle.insert(block_id(i), BlockMetrics::with_height(*h));
    }
    oracle
}

/// Already measured blocks with the given outer heights.
pub fn measured_blocks(heights: &[f32]) -> Vec<ContentBlock> {
    heights
        .iter()
        .enumerate()
        .map(|(i, h)| {
            ContentBlock::measured(
                SourceBlock::new(block_id(i), BlockContent::Empty),
                i,
                BlockMetrics::with_height(*h),
            )
        })
        .collect()
}

pub fn page_heights(pages: &[folio_types::Page]) -> Vec<Vec<f32>> {
    pages
        .iter()
        .map(|p| p.blocks.iter().map(|b| b.outer_height()).collect())
        .collect()
}
