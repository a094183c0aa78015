use notemark_syntax::parser::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use notemark_syntax::{ParserOptions, Registry, RegistryError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

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

    #[error(
        "Invalid config file at {config_path}: parser.max_depth {max_depth} is above the limit of {}",
        MAX_DEPTH_LIMIT
    )]
    MaxDepthTooLarge {
        config_path: PathBuf,
        max_depth: usize,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Folder scanned for `.md` notes when no files are given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_path: Option<PathBuf>,

    #[serde(default)]
    pub parser: ParserSection,
}

/// The `[parser]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    pub max_depth: usize,
    /// Rule names to switch off, e.g. `["tag", "highlight"]`
    pub disabled_rules: Vec<String>,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            disabled_rules: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
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

        if config.parser.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::MaxDepthTooLarge {
                config_path: config_path.to_path_buf(),
                max_depth: config.parser.max_depth,
            });
        }

        // Expand shell variables and tilde in the notes folder
        config.notes_path = config
            .notes_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
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

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/notemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Parser options, with `max_depth` capped at [`MAX_DEPTH_LIMIT`].
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            max_depth: self.parser.max_depth.min(MAX_DEPTH_LIMIT),
        }
    }

    /// The standard registry minus `disabled_rules`.
    pub fn registry(&self) -> Result<Registry, RegistryError> {
        Registry::without(self.parser.disabled_rules.as_slice())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemark_syntax::Rule;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/notemark/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.parser.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.parser_options(), ParserOptions::default());
    }

    #[test]
    fn test_partial_parser_section() {
        let config: Config = toml::from_str("[parser]\nmax_depth = 4\n").unwrap();

        assert_eq!(config.parser.max_depth, 4);
        assert!(config.parser.disabled_rules.is_empty());
        assert!(config.notes_path.is_none());
    }

    #[test]
    fn test_disabled_rules_build_registry() {
        let config: Config =
            toml::from_str("[parser]\ndisabled_rules = [\"tag\", \"table\"]\n").unwrap();
        let registry = config.registry().unwrap();

        assert!(registry.inline_rules().iter().all(|r| r.name() != "tag"));
        assert!(registry.block_rules().iter().all(|r| r.name() != "table"));
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        let config: Config =
            toml::from_str("[parser]\ndisabled_rules = [\"footnote\"]\n").unwrap();

        let err = config.registry().unwrap_err();
        assert_eq!(err, RegistryError::UnknownRule("footnote".to_string()));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("NOTEMARK_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$NOTEMARK_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("NOTEMARK_TEST_VAR");
        }
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
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser]\nmax_depth = \"deep\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file at"));
    }

    #[test]
    fn test_load_rejects_huge_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser]\nmax_depth = 1000000\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MaxDepthTooLarge {
                max_depth: 1_000_000,
                ..
            }
        ));
        assert!(err.to_string().contains("above the limit of 128"));
    }

    #[test]
    fn test_load_accepts_max_depth_at_limit() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let content = format!("[parser]\nmax_depth = {MAX_DEPTH_LIMIT}\n");
        std::fs::write(&config_file, content).unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.parser_options().max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn test_parser_options_cap_max_depth() {
        let config = Config {
            parser: ParserSection {
                max_depth: usize::MAX,
                ..ParserSection::default()
            },
            ..Config::default()
        };

        assert_eq!(config.parser_options().max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            notes_path: Some(PathBuf::from("/tmp/test-notes")),
            parser: ParserSection {
                max_depth: 8,
                disabled_rules: vec!["highlight".to_string()],
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_notes_path_is_expanded_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "notes_path = \"~/notes\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        let notes_path = config.notes_path.unwrap();

        assert!(!notes_path.to_string_lossy().starts_with('~'));
        assert!(notes_path.ends_with("notes"));
    }
}
