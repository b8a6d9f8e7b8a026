// Combining generated and pre-existing Markdown into one file

use crate::error::Result;
use crate::output::front_matter::LINE_ENDING;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Every `*.md` file under `dir`, recursively, in file name order
pub fn discover_markdown(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == "md") {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Merge Markdown under `docs_dir` into `output`.
///
/// When the directory holds Markdown that was not generated this run, that
/// content comes first (in discovery order), followed by every generated
/// file in generation order. Otherwise only generated files are combined.
/// Each appended file is preceded by a line break. A previous merge output
/// is never counted as pre-existing content, but a generated file that is
/// also the output is still merged.
pub fn merge_files(docs_dir: &Path, generated: &[PathBuf], output: &Path) -> Result<PathBuf> {
    let generated_keys: HashSet<PathBuf> = generated.iter().map(|p| normalize(p)).collect();
    let output_key = normalize(output);

    let existing: Vec<PathBuf> = discover_markdown(docs_dir)?
        .into_iter()
        .filter(|path| {
            let key = normalize(path);
            !generated_keys.contains(&key) && key != output_key
        })
        .collect();

    let sources: Vec<&Path> = existing
        .iter()
        .chain(generated.iter())
        .map(PathBuf::as_path)
        .collect();

    info!(
        existing = existing.len(),
        generated = generated.len(),
        output = %output.display(),
        "merging markdown"
    );

    // read everything before truncating so a source can never be clobbered
    let mut contents = Vec::with_capacity(sources.len());
    for path in &sources {
        debug!(path = %path.display(), "merge source");
        contents.push(fs::read_to_string(path)?);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(output)?);
    for (idx, content) in contents.iter().enumerate() {
        if idx > 0 {
            writer.write_all(LINE_ENDING.as_bytes())?;
        }
        writer.write_all(content.as_bytes())?;
    }
    writer.flush()?;

    Ok(output.to_path_buf())
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
