//! CLI module for xmldoc2md

mod args;

pub use args::{Args, Command};

use crate::config::{Config, RunConfig, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::generator::{convert, Generator};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(matches!(
        args.command,
        Command::Generate { verbose: true, .. }
    ));

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            inputs,
            docs,
            merge,
            output,
            allow_custom_tags,
            config,
            verbose,
        } => {
            let config_path = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let mut cfg = Config::load_or_default(&config_path)?;

            // Merge CLI arguments (CLI takes precedence)
            cfg.merge_cli(docs, merge, output, allow_custom_tags);

            let inputs = expand_inputs(&inputs)?;

            if verbose {
                println!("Inputs: {}", inputs.len());
                if let Some(docs) = &cfg.generate.docs_path {
                    println!("Docs: {}", docs.display());
                }
                println!("Merge: {}", cfg.generate.merge_files);
                println!("Unknown tags: {:?}", cfg.generate.unknown_tags);
            }

            let run_config = RunConfig::from_config(&cfg, inputs);
            let report = Generator::new(run_config).with_verbose(verbose).run()?;

            for (path, reason) in &report.skipped {
                println!("Skipped {}: {}", path.display(), reason);
            }
            println!("{}", report.summary());

            Ok(())
        }

        Command::Convert { input, output } => {
            let xml = match &input {
                Some(path) => read_input(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let markdown = convert(&xml).map_err(|e| match &input {
                Some(path) => e.in_file(path),
                None => e,
            })?;

            match output {
                Some(path) => std::fs::write(path, markdown)?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(markdown.as_bytes())?;
                    stdout.flush()?;
                }
            }

            Ok(())
        }

        Command::Version => {
            println!("xmldoc2md {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Expand glob patterns; plain paths are kept in the order given
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            files.push(PathBuf::from(pattern));
            continue;
        }

        let mut matches = Vec::new();
        for entry in glob::glob(pattern)? {
            let path = entry.map_err(|e| Error::Io(io::Error::other(e)))?;
            if path.is_file() {
                matches.push(path);
            }
        }
        if matches.is_empty() {
            return Err(Error::config_validation(format!(
                "no files match '{}'",
                pattern
            )));
        }
        files.extend(matches);
    }

    Ok(files)
}
