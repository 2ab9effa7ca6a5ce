use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// CSS layout pixels per PDF point (96 dpi vs 72 dpi).
pub const CSS_PX_PER_PT: f32 = 96.0 / 72.0;

/// The physical size of an output page, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFormat {
    pub width_points: f32,
    pub height_points: f32,
}

impl PageFormat {
    pub const A4: PageFormat = PageFormat { width_points: 595.28, height_points: 841.89 };
    pub const LETTER: PageFormat = PageFormat { width_points: 612.0, height_points: 792.0 };
    pub const LEGAL: PageFormat = PageFormat { width_points: 612.0, height_points: 1008.0 };

    pub fn new(width_points: f32, height_points: f32) -> Self {
        Self { width_points, height_points }
    }

    /// The page expressed in CSS layout pixels, the unit blocks are measured in.
    pub fn canvas_size(&self) -> Size {
        Size::new(
            self.width_points * CSS_PX_PER_PT,
            self.height_points * CSS_PX_PER_PT,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.width_points.is_finite()
            && self.height_points.is_finite()
            && self.width_points > 0.0
            && self.height_points > 0.0
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::A4
    }
}
