// Output handling: front matter settings and Markdown merging

pub mod front_matter;
pub mod merge;

pub use front_matter::*;
pub use merge::*;
