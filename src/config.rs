//! Configuration handling
use std::{fs::read_to_string, path::PathBuf, time::Duration};

use home::home_dir;
use serde::{Deserialize, Serialize};

use crate::{cli::GhStatsCli, errors::GhStatsError, github::config::GithubConfig};

/// Largest page size accepted by the GitHub API
const MAX_PER_PAGE: u32 = 100;

/// Configuration data
#[derive(Default, Clone, Debug)]
pub struct GhStatsConfig {
    /// path to the configuration file
    pub config_path: PathBuf,

    /// actual configuration data
    pub config_data: ConfigData,

    /// CLI arguments
    pub cli_args: GhStatsCli,
}

/// Content of the configuration file
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
pub struct ConfigData {
    /// Github configuration
    pub github: Option<GithubConfig>,

    /// Fetch tuning
    pub fetch: Option<FetchConfig>,
}

/// `[fetch]` section of the configuration file
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    /// Items requested per page
    pub per_page: Option<u32>,

    /// Maximum pages followed per listing
    pub max_pages: Option<usize>,

    /// Timeout of each request, in seconds
    pub timeout_secs: Option<u64>,

    /// Repositories processed in parallel
    pub concurrency: Option<usize>,
}

/// Resolved fetch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Items requested per page (1..=100)
    pub per_page: u32,

    /// Maximum pages followed per listing
    pub max_pages: usize,

    /// Timeout of each request
    pub timeout: Duration,

    /// Repositories processed in parallel
    pub concurrency: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            per_page: MAX_PER_PAGE,
            max_pages: 100,
            timeout: Duration::from_secs(30),
            concurrency: 4,
        }
    }
}

impl GhStatsConfig {
    /// Create a new Config object from the CLI arguments
    /// # Errors
    /// Error if an explicit config file can't be read, or any config file can't be parsed
    pub fn try_new(cli_args: GhStatsCli) -> Result<Self, GhStatsError> {
        let (config_path, explicit) = match cli_args.config.clone() {
            Some(p) => (PathBuf::from(p), true),
            None => (Self::get_config_path()?, false),
        };
        let contents = if explicit || config_path.exists() {
            read_to_string(&config_path)
                .map_err(|e| GhStatsError::new_with_source("Unable to open", e))?
        } else {
            log::debug!("No config file at {}", config_path.display());
            String::new()
        };
        Self::from_toml(cli_args, config_path, &contents)
    }

    /// Build a Config object from the content of a config file
    /// # Errors
    /// Error if the content is not valid TOML for [`ConfigData`]
    pub fn from_toml(
        cli_args: GhStatsCli,
        config_path: PathBuf,
        contents: &str,
    ) -> Result<Self, GhStatsError> {
        let config_data = toml::from_str(contents)?;
        Ok(GhStatsConfig {
            config_path,
            config_data,
            cli_args,
        })
    }

    /// Get the path to the default config file
    /// # Errors
    /// Error if the home directory can't be found
    pub fn get_config_path() -> Result<PathBuf, GhStatsError> {
        let home_dir = match home_dir() {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => return Err("Unable to get your home dir! home::home_dir() isn't working".into()),
        };
        Ok(home_dir.join(".config").join(".gh-stats").join("config.toml"))
    }

    /// Fetch settings, CLI first, then config file, then defaults
    pub fn fetch_options(&self) -> FetchOptions {
        let defaults = FetchOptions::default();
        let file = self.config_data.fetch.clone().unwrap_or_default();
        let args = &self.cli_args;
        FetchOptions {
            per_page: args
                .per_page
                .or(file.per_page)
                .unwrap_or(defaults.per_page)
                .clamp(1, MAX_PER_PAGE),
            max_pages: args
                .max_pages
                .or(file.max_pages)
                .unwrap_or(defaults.max_pages)
                .max(1),
            timeout: args
                .timeout
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            concurrency: args
                .concurrency
                .or(file.concurrency)
                .unwrap_or(defaults.concurrency)
                .max(1),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config =
            GhStatsConfig::from_toml(GhStatsCli::default(), PathBuf::from("c.toml"), "").unwrap();
        assert_eq!(config.config_data, ConfigData::default());
        assert_eq!(config.fetch_options(), FetchOptions::default());
    }

    #[test]
    fn cli_overrides_file() {
        let contents = r#"
            [github]
            token = "from-file"

            [fetch]
            per_page = 500
            max_pages = 0
            timeout_secs = 5
            concurrency = 8
        "#;
        let cli_args = GhStatsCli {
            concurrency: Some(2),
            ..Default::default()
        };
        let config =
            GhStatsConfig::from_toml(cli_args, PathBuf::from("c.toml"), contents).unwrap();
        let options = config.fetch_options();
        assert_eq!(options.per_page, 100);
        assert_eq!(options.max_pages, 1);
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.concurrency, 2);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let result = GhStatsConfig::from_toml(
            GhStatsCli::default(),
            PathBuf::from("c.toml"),
            "[fetch]\nper_page = \"many\"",
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let cli_args = GhStatsCli {
            config: Some("/definitely/not/here/gh-stats.toml".to_string()),
            ..Default::default()
        };
        assert!(GhStatsConfig::try_new(cli_args).is_err());
    }
}
