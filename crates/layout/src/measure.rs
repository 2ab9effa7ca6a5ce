//! Scoped measurement.
//!
//! A [`MeasurementScope`] holds an exclusive borrow of the oracle for the
//! duration of one pagination run. The oracle's context is acquired when the
//! scope opens and released when it drops, whichever way the run ends.

use crate::LayoutError;
use folio_traits::{MeasureError, MeasurementOracle, Viewport};
use folio_types::{BlockContent, BlockMetrics, ContentBlock, Region, SourceBlock};

pub struct MeasurementScope<'a, O: MeasurementOracle + ?Sized> {
    oracle: &'a mut O,
    viewport: Viewport,
}

impl<'a, O: MeasurementOracle + ?Sized> MeasurementScope<'a, O> {
    pub fn open(oracle: &'a mut O, viewport: Viewport) -> Result<Self, LayoutError> {
        if let Err(e) = oracle.acquire(&viewport) {
            oracle.release();
            return Err(e.into());
        }
        log::debug!(
            "Opened measurement context on {} at width {:.1}px (padding {:.1}px)",
            oracle.name(),
            viewport.width,
            viewport.padding
        );
        Ok(Self { oracle, viewport })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Measures one block, assigning it the given position in source order.
    pub fn measure_block(
        &mut self,
        source: SourceBlock,
        order_index: usize,
    ) -> Result<ContentBlock, LayoutError> {
        let metrics = self.oracle.measure(&source)?;
        validate_metrics(source.id.as_str(), &metrics)?;
        Ok(ContentBlock::measured(source, order_index, metrics))
    }

    /// Measures every block in order. Fails on the first block that cannot be
    /// measured; no partial result is returned.
    pub fn measure_blocks(
        &mut self,
        sources: impl IntoIterator<Item = SourceBlock>,
    ) -> Result<Vec<ContentBlock>, LayoutError> {
        sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| self.measure_block(source, i))
            .collect()
    }

    pub fn measure_header(&mut self, content: BlockContent) -> Result<Region, LayoutError> {
        let metrics = self.oracle.measure_header()?;
        validate_metrics("header", &metrics)?;
        Ok(Region::new(metrics, content))
    }

    pub fn measure_footer(&mut self, content: BlockContent) -> Result<Region, LayoutError> {
        let metrics = self.oracle.measure_footer()?;
        validate_metrics("footer", &metrics)?;
        Ok(Region::new(metrics, content))
    }
}

impl<O: MeasurementOracle + ?Sized> Drop for MeasurementScope<'_, O> {
    fn drop(&mut self) {
        self.oracle.release();
        log::debug!("Released measurement context on {}", self.oracle.name());
    }
}

fn validate_metrics(target: &str, metrics: &BlockMetrics) -> Result<(), MeasureError> {
    let values = [metrics.height, metrics.margin_top, metrics.margin_bottom];
    if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
        Ok(())
    } else {
        Err(MeasureError::Invalid {
            target: target.to_string(),
            message: format!(
                "height {} / margins {} {} must be finite and non-negative",
                metrics.height, metrics.margin_top, metrics.margin_bottom
            ),
        })
    }
}

/// Everything a reflow run needs, measured in one scope.
#[derive(Debug, Clone)]
pub struct MeasuredDocument {
    pub header: Region,
    pub footer: Region,
    pub blocks: Vec<ContentBlock>,
}

impl MeasuredDocument {
    /// Measures header, footer and all blocks inside a single scope.
    pub fn measure<O: MeasurementOracle + ?Sized>(
        oracle: &mut O,
        viewport: Viewport,
        header: BlockContent,
        footer: BlockContent,
        blocks: Vec<SourceBlock>,
    ) -> Result<Self, LayoutError> {
        let mut scope = MeasurementScope::open(oracle, viewport)?;
        let header = scope.measure_header(header)?;
        let footer = scope.measure_footer(footer)?;
        let blocks = scope.measure_blocks(blocks)?;
        Ok(Self { header, footer, blocks })
    }

    /// Page height left for content once header and footer (with their
    /// margins) are taken out.
    pub fn available_height(&self, canvas_height: f32) -> f32 {
        canvas_height - self.header.metrics.outer_height() - self.footer.metrics.outer_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{oracle_with_heights, sources};
    use folio_traits::InMemoryMeasurementOracle;

    fn viewport() -> Viewport {
        Viewport::new(793.7, 24.0)
    }

    #[test]
    fn scope_releases_on_success() {
        let mut oracle = oracle_with_heights(&[100.0, 200.0]);
        {
            let mut scope = MeasurementScope::open(&mut oracle, viewport()).unwrap();
            let blocks = scope.measure_blocks(sources(2)).unwrap();
            assert_eq!(blocks.len(), 2);
            assert_eq!(blocks[1].order_index, 1);
        }
        assert!(!oracle.is_acquired());
        assert_eq!(oracle.context_counts(), (1, 1));
    }

    #[test]
    fn scope_releases_on_measurement_error() {
        let mut oracle = oracle_with_heights(&[100.0]);
        let result = MeasuredDocument::measure(
            &mut oracle,
            viewport(),
            BlockContent::Empty,
            BlockContent::Empty,
            sources(3),
        );
        assert!(matches!(
            result,
            Err(LayoutError::Measurement(MeasureError::NotFound(_)))
        ));
        assert!(!oracle.is_acquired());
        assert_eq!(oracle.context_counts(), (1, 1));
    }

    #[test]
    fn failed_acquire_is_reported() {
        let mut oracle = InMemoryMeasurementOracle::new();
        let result = MeasurementScope::open(&mut oracle, Viewport::new(-1.0, 0.0));
        assert!(matches!(result, Err(LayoutError::Measurement(MeasureError::Invalid { .. }))));
        drop(result);
        assert!(!oracle.is_acquired());
    }

    #[test]
    fn negative_metrics_are_rejected() {
        let mut oracle = oracle_with_heights(&[-5.0]);
        let mut scope = MeasurementScope::open(&mut oracle, viewport()).unwrap();
        let err = scope.measure_blocks(sources(1)).unwrap_err();
        assert!(matches!(err, LayoutError::Measurement(MeasureError::Invalid { .. })));
    }

    #[test]
    fn available_height_subtracts_regions_and_margins() {
        let mut oracle = oracle_with_heights(&[])
            .with_header(BlockMetrics::new(100.0, 0.0, 40.0))
            .with_footer(BlockMetrics::new(80.0, 8.0, 0.0));
        let doc = MeasuredDocument::measure(
            &mut oracle,
            viewport(),
            BlockContent::Empty,
            BlockContent::Empty,
            Vec::new(),
        )
        .unwrap();
        assert_eq!(doc.available_height(1122.0), 1122.0 - 140.0 - 88.0);
        assert!(doc.blocks.is_empty());
    }
}
