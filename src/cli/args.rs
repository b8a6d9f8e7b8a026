//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Convert XML documentation comments into Markdown
#[derive(Parser, Debug)]
#[command(name = "xmldoc2md")]
#[command(about = "Convert XML documentation comments into Markdown")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Markdown for one or more XML documentation files
    Generate {
        /// Input XML files (glob patterns supported)
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Documentation directory, or a single Markdown file
        #[arg(short, long)]
        docs: Option<PathBuf>,

        /// Merge all Markdown in the docs directory into the output file
        #[arg(short, long)]
        merge: bool,

        /// Output file for the merge step
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Warn about and skip files with unrecognized tags instead of failing
        #[arg(long)]
        allow_custom_tags: bool,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert a single XML document, reading stdin when no input is given
    Convert {
        /// Input XML file
        input: Option<PathBuf>,

        /// Output Markdown file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}
