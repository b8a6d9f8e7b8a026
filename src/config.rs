use crate::error::{Error, Result};
use crate::output::{AllowedTags, FrontMatterOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "xmldoc2md.toml";

/// File configuration (`xmldoc2md.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generate: GenerateConfig,
}

/// Generation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Documentation file or directory
    pub docs_path: Option<PathBuf>,
    /// Merge all Markdown into `output_file` after generating
    pub merge_files: bool,
    /// Target of the merge step
    pub output_file: Option<PathBuf>,
    /// What to do with tags that have no rendering rule
    pub unknown_tags: TagPolicy,
}

/// Handling of elements with no rendering rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Fail the run on the first file with an unknown tag
    #[default]
    Error,
    /// Log a warning, skip that file, and continue
    Warn,
}

impl From<AllowedTags> for TagPolicy {
    fn from(allowed: AllowedTags) -> Self {
        match allowed {
            AllowedTags::All => TagPolicy::Warn,
            AllowedTags::None => TagPolicy::Error,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config from file, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        docs_path: Option<PathBuf>,
        merge_files: bool,
        output_file: Option<PathBuf>,
        allow_custom_tags: bool,
    ) {
        if let Some(docs) = docs_path {
            self.generate.docs_path = Some(docs);
        }

        if merge_files {
            self.generate.merge_files = true;
        }

        if let Some(out) = output_file {
            self.generate.output_file = Some(out);
        }

        if allow_custom_tags {
            self.generate.unknown_tags = TagPolicy::Warn;
        }
    }
}

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub inputs: Vec<PathBuf>,
    pub docs_path: Option<PathBuf>,
    pub merge_files: bool,
    pub output_file: Option<PathBuf>,
    pub tag_policy: TagPolicy,
}

impl RunConfig {
    /// Start a run from file/CLI configuration
    pub fn from_config(config: &Config, inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            docs_path: config.generate.docs_path.clone(),
            merge_files: config.generate.merge_files,
            output_file: config.generate.output_file.clone(),
            tag_policy: config.generate.unknown_tags,
        }
    }

    /// Let front matter found in existing docs override the run settings
    pub fn apply_front_matter(&mut self, options: &FrontMatterOptions) -> Result<()> {
        self.merge_files = options.merge_xml_comments;
        if let Some(AllowedTags::All) = options.allowed_tags()? {
            self.tag_policy = TagPolicy::Warn;
        }
        Ok(())
    }

    /// Whether the documentation path names an existing single file
    pub fn docs_is_file(&self) -> bool {
        self.docs_path.as_deref().is_some_and(Path::is_file)
    }

    /// Check the settings before anything is generated
    pub fn validate(&self) -> Result<()> {
        if self.docs_path.is_none() {
            return Err(Error::config_validation("documentation path is required"));
        }

        if self.inputs.is_empty() {
            return Err(Error::config_validation("at least one input file required"));
        }

        if self.merge_files && self.output_file.is_none() {
            return Err(Error::config_validation(
                "merging requires an output file",
            ));
        }

        if self.docs_is_file() && self.inputs.len() > 1 {
            return Err(Error::config_validation(
                "documentation path is a file but more than one input was given",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn run_config() -> RunConfig {
        let mut config = Config::default();
        config.generate.docs_path = Some(PathBuf::from("docs"));
        RunConfig::from_config(&config, vec![PathBuf::from("Lib.xml")])
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.generate.docs_path.is_none());
        assert!(!config.generate.merge_files);
        assert_eq!(config.generate.unknown_tags, TagPolicy::Error);
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[generate]
docs_path = "docs"
merge_files = true
output_file = "README.md"
unknown_tags = "warn"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.generate.docs_path, Some(PathBuf::from("docs")));
        assert!(config.generate.merge_files);
        assert_eq!(config.generate.output_file, Some(PathBuf::from("README.md")));
        assert_eq!(config.generate.unknown_tags, TagPolicy::Warn);
    }

    #[test]
    fn test_load_invalid_policy() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[generate]\nunknown_tags = \"maybe\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/xmldoc2md.toml"));
        assert!(result.is_err());
        let config = Config::load_or_default(Path::new("/nonexistent/xmldoc2md.toml")).unwrap();
        assert!(config.generate.docs_path.is_none());
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = Config::default();
        config.generate.docs_path = Some(PathBuf::from("from-file"));
        config.merge_cli(Some(PathBuf::from("from-cli")), true, Some(PathBuf::from("all.md")), true);
        assert_eq!(config.generate.docs_path, Some(PathBuf::from("from-cli")));
        assert!(config.generate.merge_files);
        assert_eq!(config.generate.output_file, Some(PathBuf::from("all.md")));
        assert_eq!(config.generate.unknown_tags, TagPolicy::Warn);
    }

    #[test]
    fn test_merge_cli_keeps_file_values() {
        let mut config = Config::default();
        config.generate.merge_files = true;
        config.merge_cli(None, false, None, false);
        assert!(config.generate.merge_files);
        assert_eq!(config.generate.unknown_tags, TagPolicy::Error);
    }

    #[test]
    fn test_front_matter_overrides() {
        let mut run = run_config();
        run.merge_files = true;
        let options = FrontMatterOptions {
            merge_xml_comments: false,
            allowed_custom_tags: Some("ALL".to_string()),
        };
        run.apply_front_matter(&options).unwrap();
        assert!(!run.merge_files);
        assert_eq!(run.tag_policy, TagPolicy::Warn);
    }

    #[test]
    fn test_front_matter_none_keeps_policy() {
        let mut run = run_config();
        run.tag_policy = TagPolicy::Warn;
        let options = FrontMatterOptions {
            merge_xml_comments: true,
            allowed_custom_tags: Some("none".to_string()),
        };
        run.apply_front_matter(&options).unwrap();
        assert!(run.merge_files);
        assert_eq!(run.tag_policy, TagPolicy::Warn);
    }

    #[test]
    fn test_validation_ok() {
        assert!(run_config().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_docs_path() {
        let mut run = run_config();
        run.docs_path = None;
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_validation_no_inputs() {
        let mut run = run_config();
        run.inputs.clear();
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_validation_merge_without_output() {
        let mut run = run_config();
        run.merge_files = true;
        let err = run.validate().unwrap_err();
        assert!(err.to_string().contains("output file"));
    }

    #[test]
    fn test_validation_docs_file_with_many_inputs() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("api.md");
        std::fs::write(&docs, "").unwrap();

        let mut run = run_config();
        run.docs_path = Some(docs);
        assert!(run.validate().is_ok());
        run.inputs.push(PathBuf::from("Other.xml"));
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_allowed_tags_to_policy() {
        assert_eq!(TagPolicy::from(AllowedTags::All), TagPolicy::Warn);
        assert_eq!(TagPolicy::from(AllowedTags::None), TagPolicy::Error);
    }
}
