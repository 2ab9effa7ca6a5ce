pub mod block;
pub mod color;
pub mod format;
pub mod geometry;
pub mod ids;
pub mod page;
pub mod raster;

pub use block::{BlockContent, BlockMetrics, ContentBlock, Region, SourceBlock};
pub use color::Color;
pub use format::PageFormat;
pub use geometry::{Rect, Size};
pub use ids::BlockId;
pub use page::{ElementRole, Page, PositionedElement, RasterSlice, RenderedPage};
pub use raster::{Provenance, Raster, RasterError, SharedData, whole_rows};
