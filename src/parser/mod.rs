// Parser module for reading XML documentation into a node tree

pub mod ast;
mod xml;

pub use ast::*;
pub use xml::parse;
