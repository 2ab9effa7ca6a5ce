pub struct FitAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Centralized logic to check if a block fits in the remaining space of a page.
///
/// * `used_height`: Height already consumed on the open page.
/// * `block_height`: The outer height (margins included) of the candidate block.
/// * `budget`: The available content height of a page.
///
/// A block exactly filling the remaining space fits; only strictly taller
/// blocks force a break. The comparison uses the same sum the page
/// accumulates, so a page that accepts the block never ends above `budget`.
pub fn check_block_fit(used_height: f32, block_height: f32, budget: f32) -> FitAnalysis {
    FitAnalysis {
        should_break: used_height + block_height > budget,
        remaining_height: (budget - used_height).max(0.0),
    }
}

/// Whether a block cannot fit on any page, even an empty one.
pub fn is_oversized(block_height: f32, budget: f32) -> bool {
    block_height > budget
}
