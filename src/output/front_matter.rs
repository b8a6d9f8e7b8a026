// Front matter detection in existing Markdown files
//
// A block delimited by `---` lines at the very top of a file can carry
// generation settings:
//
//     ---
//     MergeXmlComments: true
//     AllowedCustomTags: all
//     ---

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use walkdir::WalkDir;

const DELIMITER: &str = "---";

#[cfg(windows)]
pub(crate) const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub(crate) const LINE_ENDING: &str = "\n";

/// Outcome of looking for front matter at the top of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatter {
    /// The first line is not a delimiter
    NotFound,
    /// Delimiters with nothing between them; holds the opening line
    Empty(String),
    /// Opening delimiter plus the block's lines
    Found(String),
}

/// Which unrecognized tags are tolerated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedTags {
    All,
    None,
}

impl FromStr for AllowedTags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(AllowedTags::All),
            "none" => Ok(AllowedTags::None),
            other => Err(Error::config_validation(format!(
                "AllowedCustomTags must be All or None, got '{}'",
                other
            ))),
        }
    }
}

/// Settings recognized in front matter
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FrontMatterOptions {
    pub merge_xml_comments: bool,
    pub allowed_custom_tags: Option<String>,
}

impl FrontMatterOptions {
    /// Parsed tag policy, if the block sets one
    pub fn allowed_tags(&self) -> Result<Option<AllowedTags>> {
        self.allowed_custom_tags
            .as_deref()
            .map(AllowedTags::from_str)
            .transpose()
    }
}

/// Scan lines for a leading front matter block
pub fn scan_front_matter<I>(lines: I) -> Result<FrontMatter>
where
    I: IntoIterator<Item = std::io::Result<String>>,
{
    let mut lines = lines.into_iter();

    let opening = match lines.next() {
        Some(line) => line?,
        None => return Ok(FrontMatter::NotFound),
    };
    if !opening.starts_with(DELIMITER) {
        return Ok(FrontMatter::NotFound);
    }

    let mut block = Vec::new();
    for line in lines {
        let line = line?;
        if line.starts_with(DELIMITER) {
            break;
        }
        block.push(line);
    }

    if block.is_empty() {
        return Ok(FrontMatter::Empty(opening));
    }

    let mut content = opening;
    for line in block {
        content.push_str(LINE_ENDING);
        content.push_str(&line);
    }
    Ok(FrontMatter::Found(content))
}

/// Read the front matter of a file, stopping at the closing delimiter
pub fn read_front_matter(path: &Path) -> Result<FrontMatter> {
    let reader = BufReader::new(File::open(path)?);
    scan_front_matter(reader.lines())
}

/// Deserialize a front matter block into options
pub fn parse_options(content: &str) -> Result<FrontMatterOptions> {
    let options: Option<FrontMatterOptions> = serde_yaml::from_str(content)?;
    Ok(options.unwrap_or_default())
}

/// Find generation options in the documentation path.
///
/// A file is checked directly. A directory is searched recursively, in file
/// name order, and the first Markdown file with non-empty front matter wins.
pub fn discover(docs_path: &Path) -> Result<Option<FrontMatterOptions>> {
    if docs_path.is_file() {
        return match read_front_matter(docs_path)? {
            FrontMatter::Found(content) => parse_options(&content).map(Some),
            _ => Ok(None),
        };
    }
    if !docs_path.is_dir() {
        return Ok(None);
    }

    for entry in WalkDir::new(docs_path).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != "md") {
            continue;
        }
        if let FrontMatter::Found(content) = read_front_matter(path)? {
            debug!(path = %path.display(), "using front matter");
            return parse_options(&content).map(Some);
        }
    }

    Ok(None)
}
