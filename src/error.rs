use std::path::PathBuf;
use thiserror::Error;

/// xmldoc2md error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("XML error at line {line}, column {column}: {message}")]
    Xml {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Unknown element <{tag}> at line {line}, column {column}")]
    UnknownTag {
        tag: String,
        line: usize,
        column: usize,
    },

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

/// Result type alias for xmldoc2md operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an XML structure error
    pub fn xml(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Xml {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create an unknown tag error
    pub fn unknown_tag(tag: impl Into<String>, line: usize, column: usize) -> Self {
        Error::UnknownTag {
            tag: tag.into(),
            line,
            column,
        }
    }

    /// Attach the input file an error came from
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is an unknown tag
    pub fn is_unknown_tag(&self) -> bool {
        match self {
            Error::UnknownTag { .. } => true,
            Error::File { source, .. } => source.is_unknown_tag(),
            _ => false,
        }
    }
}
