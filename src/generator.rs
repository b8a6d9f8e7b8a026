// Generation run: XML files in, Markdown files out, optional merge

use crate::config::{RunConfig, TagPolicy};
use crate::error::{Error, Result};
use crate::output::{self, merge_files};
use crate::parser;
use crate::render::render_document;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Convert one XML document to Markdown in memory
pub fn convert(xml: &str) -> Result<String> {
    let doc = parser::parse(xml)?;
    render_document(&doc)
}

/// Summary of a finished run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Markdown files written, in input order
    pub generated: Vec<PathBuf>,
    /// Inputs skipped under the warn policy, with the reason
    pub skipped: Vec<(PathBuf, String)>,
    /// Merged output, if a merge ran
    pub merged: Option<PathBuf>,
}

impl RunReport {
    /// One-line description for the CLI
    pub fn summary(&self) -> String {
        let mut summary = format!("Generated {} file(s)", self.generated.len());
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", skipped {}", self.skipped.len()));
        }
        if let Some(merged) = &self.merged {
            summary.push_str(&format!(", merged into {}", merged.display()));
        }
        summary
    }
}

/// Runs one generation pass over a set of input files
pub struct Generator {
    config: RunConfig,
    verbose: bool,
}

impl Generator {
    /// Create a generator for the given run settings
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    /// Show a progress bar while generating
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute the run.
    ///
    /// The supplied settings are validated first; nothing is written if that
    /// fails. Front matter in the documentation path may then override the
    /// merge flag and tag policy. A merge enabled only by front matter is
    /// skipped when no output file is configured.
    pub fn run(mut self) -> Result<RunReport> {
        self.config.validate()?;
        if let Some(docs) = self.config.docs_path.clone() {
            if let Some(options) = output::discover(&docs)? {
                debug!(?options, "front matter overrides");
                self.config.apply_front_matter(&options)?;
            }
        }

        let docs_path = self
            .config
            .docs_path
            .clone()
            .ok_or_else(|| Error::config_validation("documentation path is required"))?;
        let docs_is_file = self.config.docs_is_file();
        if !docs_is_file {
            fs::create_dir_all(&docs_path)?;
        }

        let progress = self.progress_bar();
        let mut report = RunReport::default();

        for input in &self.config.inputs {
            if let Some(ref pb) = progress {
                let msg = input.file_name().unwrap_or_default().to_string_lossy().to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            let target = if docs_is_file {
                docs_path.clone()
            } else {
                markdown_target(&docs_path, input)
            };

            match generate_file(input, &target) {
                Ok(()) => {
                    info!(input = %input.display(), output = %target.display(), "generated");
                    report.generated.push(target);
                }
                Err(e) if e.is_unknown_tag() && self.config.tag_policy == TagPolicy::Warn => {
                    warn!(input = %input.display(), "{}", e);
                    report.skipped.push((input.clone(), e.to_string()));
                }
                Err(e) => return Err(e.in_file(input)),
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        if self.config.merge_files {
            match &self.config.output_file {
                Some(output_file) => {
                    let merge_dir = if docs_is_file {
                        docs_path
                            .parent()
                            .filter(|p| !p.as_os_str().is_empty())
                            .unwrap_or(Path::new("."))
                            .to_path_buf()
                    } else {
                        docs_path.clone()
                    };
                    report.merged =
                        Some(merge_files(&merge_dir, &report.generated, output_file)?);
                }
                None => info!("merge skipped: no output file configured"),
            }
        }

        Ok(report)
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        if !self.verbose {
            return None;
        }
        let pb = ProgressBar::new(self.config.inputs.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }
}

/// `<docs>/<input stem>.md`
pub fn markdown_target(docs_dir: &Path, input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".md");
    docs_dir.join(name)
}

/// Render one input file; nothing is written if rendering fails
fn generate_file(input: &Path, target: &Path) -> Result<()> {
    let xml = fs::read_to_string(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::PathNotFound(input.to_path_buf()),
        _ => Error::Io(e),
    })?;
    let markdown = convert(&xml)?;
    fs::write(target, markdown)?;
    Ok(())
}
