//! PDF document builder using lopdf.
//!
//! Builds the whole object graph in memory: one content stream per page,
//! images as FlateDecode XObjects with an optional soft mask for alpha.

mod builder;

pub use builder::LopdfDocumentBuilder;
