use markdown_folio_engine::{FailurePolicy, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    InvalidExcludePattern {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the markdown sources.
    pub source_dir: PathBuf,
    /// Directory the rendered pages are written to.
    pub output_dir: PathBuf,
    /// Directory holding `index.htm` page templates.
    pub template_dir: PathBuf,
    pub output_extension: String,
    /// Glob patterns, relative to `source_dir`, of documents to leave out.
    pub exclude: Vec<String>,
    /// Carry on past documents that fail to render.
    pub keep_going: bool,
    pub render: RenderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src/www"),
            output_dir: PathBuf::from("www"),
            template_dir: PathBuf::from("src/tmpl"),
            output_extension: markdown_folio_engine::site::DEFAULT_OUTPUT_EXTENSION.to_string(),
            exclude: vec![],
            keep_going: false,
            render: RenderOptions::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured directories
        config.expand_paths();

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }

    /// Compiles the `exclude` patterns.
    pub fn exclude_set(&self) -> Result<ExcludeSet, ConfigError> {
        let patterns = self
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| ConfigError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExcludeSet { patterns })
    }

    pub fn expand_paths(&mut self) {
        for path in [
            &mut self.source_dir,
            &mut self.output_dir,
            &mut self.template_dir,
        ] {
            if let Some(expanded) = Self::expand_path(path) {
                *path = expanded;
            }
        }
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// Compiled `exclude` patterns.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<glob::Pattern>,
}

impl ExcludeSet {
    /// Whether `path`, relative to the source directory with `/` separators,
    /// matches any pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_folio_engine::{CodePolicy, HeaderCells};
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        assert_eq!(Config::config_path(), PathBuf::from("folio.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.source_dir, PathBuf::from("src/www"));
        assert_eq!(config.output_dir, PathBuf::from("www"));
        assert_eq!(config.template_dir, PathBuf::from("src/tmpl"));
        assert_eq!(config.output_extension, "htm");
        assert!(config.exclude.is_empty());
        assert_eq!(config.failure_policy(), FailurePolicy::Abort);
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config_content = r#"
output_dir = "public"
keep_going = true

[render]
code = "omit"
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.source_dir, PathBuf::from("src/www"));
        assert_eq!(config.failure_policy(), FailurePolicy::Continue);
        assert_eq!(config.render.code, CodePolicy::Omit);
        assert_eq!(config.render.header_cells, HeaderCells::Td);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            source_dir: PathBuf::from("/tmp/site/src"),
            exclude: vec!["drafts/**".to_string()],
            render: RenderOptions {
                code: CodePolicy::Emit,
                header_cells: HeaderCells::Th,
            },
            ..Config::default()
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("FOLIO_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$FOLIO_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("FOLIO_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("folio.toml");
        std::fs::write(&config_file, "source_dir = [").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_expands_directories() {
        unsafe {
            env::set_var("FOLIO_SITE_ROOT", "/srv/site");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("folio.toml");
        std::fs::write(&config_file, "source_dir = \"$FOLIO_SITE_ROOT/src\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.source_dir, PathBuf::from("/srv/site/src"));
        assert_eq!(config.output_dir, PathBuf::from("www"));

        unsafe {
            env::remove_var("FOLIO_SITE_ROOT");
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/folio.toml");
        let test_config = Config {
            output_dir: PathBuf::from("/tmp/test-www"),
            keep_going: true,
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_exclude_set_matches_relative_paths() {
        let config = Config {
            exclude: vec!["drafts/**".to_string(), "*.tmp.md".to_string()],
            ..Config::default()
        };

        let excludes = config.exclude_set().unwrap();

        assert!(excludes.matches("drafts/wip.md"));
        assert!(excludes.matches("drafts/deep/wip.md"));
        assert!(excludes.matches("scratch.tmp.md"));
        assert!(!excludes.matches("blog/post.md"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = Config {
            exclude: vec!["[unclosed".to_string()],
            ..Config::default()
        };

        assert!(matches!(
            config.exclude_set(),
            Err(ConfigError::InvalidExcludePattern { ref pattern, .. }) if pattern == "[unclosed"
        ));
    }
}
