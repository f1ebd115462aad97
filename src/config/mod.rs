//! User configuration for `git-branch-select`.
//!
//! The configuration file is optional and every field has a default. It is
//! looked up in this order:
//! - the path passed with `--config`
//! - `$BRANCH_SELECT_CONFIG`
//! - `<config dir>/branch-select/config.toml` (e.g. `~/.config/branch-select/config.toml`)
//!
//! A file named explicitly must exist and parse. The default file may be
//! missing; if it is invalid a warning is printed and defaults are used.
//!
//! # Example
//!
//! ```toml
//! git = "/usr/local/bin/git"
//! page-size = 15
//! vim-mode = false
//! fail-on-action-error = true
//! ```
//!
//! `$BRANCH_SELECT_GIT` overrides `git` regardless of the file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "BRANCH_SELECT_CONFIG";
pub const GIT_ENV: &str = "BRANCH_SELECT_GIT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("page-size must be at least 1")]
    InvalidPageSize,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Git binary to run
    pub git: String,

    /// Number of menu entries shown at once
    pub page_size: usize,

    /// Enable hjkl navigation in menus
    pub vim_mode: bool,

    /// Exit non-zero when checkout/delete/edit reports an error
    pub fail_on_action_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            page_size: 10,
            vim_mode: true,
            fail_on_action_error: false,
        }
    }
}

impl Config {
    /// Location of the per-user configuration file
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("branch-select").join("config.toml"))
    }

    /// Loads configuration, falling back to defaults when no file is present
    ///
    /// # Errors
    /// Returns an error if:
    /// - An explicitly named file cannot be read or parsed
    /// - Any file sets an invalid value
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let config = if let Some(path) = explicit {
            Self::load_from_path(&path)?
        } else if let Some(path) = Self::default_path().filter(|p| p.exists()) {
            match Self::load_from_path(&path) {
                Ok(config) => config,
                Err(ConfigError::Parse { path, source }) => {
                    eprintln!("Warning: Invalid TOML syntax in {}:", path.display());
                    eprintln!("  {}", source);
                    eprintln!("  Using default configuration.");
                    Self::default()
                }
                Err(e) => return Err(e),
            }
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    /// Reads and parses a configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML or
    /// contains invalid values
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ParseFailure::Toml(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Invalid(e) => e,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, ParseFailure> {
        // Handle empty/blank files
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(content).map_err(ParseFailure::Toml)?;
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(git) = std::env::var(GIT_ENV)
            && !git.trim().is_empty()
        {
            self.git = git;
        }
        self
    }
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::io::Write;

    #[test]
    fn test_blank_file_gives_defaults() {
        assert!(matches!(Config::from_toml_str("  \n"), Ok(ref c) if *c == Config::default()));
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let config = Config::from_toml_str("page-size = 20\nfail-on-action-error = true\n");
        let Ok(config) = config else {
            unreachable!("config should parse");
        };
        assert_eq!(config.page_size, 20);
        assert!(config.fail_on_action_error);
        assert_eq!(config.git, "git");
        assert!(config.vim_mode);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(matches!(
            Config::from_toml_str("colour = true\n"),
            Err(ParseFailure::Toml(_))
        ));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(matches!(
            Config::from_toml_str("page-size = 0\n"),
            Err(ParseFailure::Invalid(ConfigError::InvalidPageSize))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/branch-select.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_explicit_invalid_file_is_an_error() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "page-size = \"many\"")?;

        let result = Config::load_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        Ok(())
    }

    #[test]
    fn test_env_overrides_git_binary() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "git = \"/usr/bin/git\"")?;

        let config = temp_env::with_vars(
            [
                (CONFIG_ENV, Some(file.path().as_os_str())),
                (GIT_ENV, Some(OsStr::new("/opt/git/bin/git"))),
            ],
            || Config::load(None),
        )?;
        assert_eq!(config.git, "/opt/git/bin/git");
        Ok(())
    }

    #[test]
    fn test_config_path_from_env() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "vim-mode = false")?;

        let config = temp_env::with_vars(
            [
                (CONFIG_ENV, Some(file.path().as_os_str())),
                (GIT_ENV, None),
            ],
            || Config::load(None),
        )?;
        assert!(!config.vim_mode);
        assert_eq!(config.git, "git");
        Ok(())
    }
}
