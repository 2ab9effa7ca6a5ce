use crate::algorithms::pagination::{check_block_fit, is_oversized};
use crate::measure::MeasurementScope;
use crate::LayoutError;
use folio_traits::MeasurementOracle;
use folio_types::{ContentBlock, Page, Region, SourceBlock};

/// Greedy, order-preserving first-fit packing of measured blocks into pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPaginator {
    available_height: f32,
}

impl BlockPaginator {
    /// A zero budget is accepted and places every block on a page of its own.
    pub fn new(available_height: f32) -> Result<Self, LayoutError> {
        if !available_height.is_finite() || available_height < 0.0 {
            return Err(LayoutError::InvalidBudget(available_height));
        }
        Ok(Self { available_height })
    }

    /// Budget left on a canvas once the header and footer, margins included,
    /// are reserved.
    ///
    /// Regions taller than the canvas leave a zero budget rather than an
    /// error.
    pub fn for_regions(
        canvas_height: f32,
        header: &Region,
        footer: &Region,
    ) -> Result<Self, LayoutError> {
        let budget =
            canvas_height - header.metrics.outer_height() - footer.metrics.outer_height();
        if budget.is_finite() && budget <= 0.0 {
            log::warn!(
                "Header and footer take {:.2}px of a {:.2}px canvas; every block gets its own page.",
                canvas_height - budget,
                canvas_height
            );
            return Self::new(0.0);
        }
        Self::new(budget)
    }

    pub fn available_height(&self) -> f32 {
        self.available_height
    }

    /// Groups blocks into pages.
    ///
    /// A block taller than the budget is placed alone on its own page; any
    /// other block goes on the open page if it fits and starts a new one
    /// otherwise.
    pub fn paginate(&self, blocks: impl IntoIterator<Item = ContentBlock>) -> Vec<Page> {
        let mut pages = Vec::new();
        let mut open = Page::new(0);

        for block in blocks {
            let height = block.outer_height();

            if self.available_height <= 0.0 || is_oversized(height, self.available_height) {
                log::warn!(
                    "Block '{}' is {:.2}px tall, exceeding the page budget of {:.2}px; placing it on its own page.",
                    block.id,
                    height,
                    self.available_height
                );
                self.flush(&mut pages, &mut open);
                open.push(block);
                self.flush(&mut pages, &mut open);
                continue;
            }

            if check_block_fit(open.cumulative_height, height, self.available_height).should_break {
                self.flush(&mut pages, &mut open);
            }
            open.push(block);
        }

        self.flush(&mut pages, &mut open);
        pages
    }

    fn flush(&self, pages: &mut Vec<Page>, open: &mut Page) {
        if open.is_empty() {
            return;
        }
        let next = Page::new(pages.len() + 1);
        let page = std::mem::replace(open, next);
        log::debug!(
            "Closed page {} with {} block(s), {:.2}px of {:.2}px used.",
            page.index + 1,
            page.blocks.len(),
            page.cumulative_height,
            self.available_height
        );
        pages.push(page);
    }

    /// Measures every block, then packs them.
    ///
    /// Packing only starts once all measurements have succeeded, so a failure
    /// never yields a partial page set.
    pub fn measure_and_paginate<O: MeasurementOracle + ?Sized>(
        &self,
        scope: &mut MeasurementScope<'_, O>,
        blocks: impl IntoIterator<Item = SourceBlock>,
    ) -> Result<Vec<Page>, LayoutError> {
        let measured = scope.measure_blocks(blocks)?;
        Ok(self.paginate(measured))
    }
}
