pub mod capture;
pub mod measure;

pub use capture::{CaptureError, CaptureOptions, CrossOriginPolicy, InMemoryRasterCapture, RasterCapture};
pub use measure::{InMemoryMeasurementOracle, MeasureError, MeasurementOracle, Viewport};
