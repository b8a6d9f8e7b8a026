//! xmldoc2md - Convert XML documentation comments into Markdown
//!
//! Reads the member documentation XML emitted by compilers' doc-comment
//! extractors and renders it as Markdown, optionally merging the result
//! with Markdown already present in a documentation directory.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod parser;
pub mod render;

// Re-export main types
pub use config::{Config, RunConfig, TagPolicy};
pub use error::{Error, Result};
pub use generator::{convert, Generator, RunReport};
pub use render::render_document;
