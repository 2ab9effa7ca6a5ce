//! Core document assembly abstractions.
//!
//! This crate provides the pieces shared by every output backend:
//! - `DocumentBuilder` trait for abstracting the page, image and fill primitives
//! - Error types for assembly operations
//! - The assembler that turns rendered pages or raster slices into a document

pub mod assembler;
mod builder;
mod error;
pub mod utils;

pub use assembler::{assemble_pages, assemble_slices};
pub use builder::{DocumentBuilder, ImageHandle, PageHandle};
pub use error::RenderError;
