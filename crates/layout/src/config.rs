use crate::LayoutError;
use folio_traits::Viewport;
use folio_types::{PageFormat, Size};
use serde::{Deserialize, Serialize};

/// Padding applied around measured content, in layout pixels.
pub const DEFAULT_PADDING: f32 = 24.0;

/// Fraction of a slice below which a trailing remainder is dropped.
pub const DEFAULT_REMAINDER_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// The physical page every output page is sized to.
    pub format: PageFormat,
    /// Horizontal padding blocks are measured and placed with.
    ///
    /// Defaults to `24.0`.
    pub padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            format: PageFormat::A4,
            padding: DEFAULT_PADDING,
        }
    }
}

impl LayoutConfig {
    pub fn new(format: PageFormat, padding: f32) -> Self {
        Self { format, padding }
    }

    /// The page in layout pixels.
    pub fn canvas(&self) -> Size {
        self.format.canvas_size()
    }

    /// The fixed width every block is measured at.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas().width, self.padding)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.format.is_valid() {
            return Err(LayoutError::InvalidFormat(
                self.format.width_points,
                self.format.height_points,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliceConfig {
    /// A final, shorter slice is dropped when the overall remainder is below
    /// this fraction of a full slice height.
    ///
    /// Defaults to `0.1`.
    pub remainder_threshold: f32,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            remainder_threshold: DEFAULT_REMAINDER_THRESHOLD,
        }
    }
}

impl SliceConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if (0.0..1.0).contains(&self.remainder_threshold) {
            Ok(())
        } else {
            Err(LayoutError::InvalidThreshold(self.remainder_threshold))
        }
    }
}
