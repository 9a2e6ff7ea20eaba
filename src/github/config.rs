//! Github configuration
use super::{platform::GithubPlatform, GITHUB_API_URL};
use serde::{Deserialize, Serialize};

use crate::{config::GhStatsConfig, errors::GhStatsError};

/// Github configuration
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// Github token, optional (raises the rate limit)
    pub token: Option<String>,

    /// Base URL of the REST API
    pub api_url: Option<String>,
}

impl GithubConfig {
    /// Token to send, CLI or `GITHUB_TOKEN` first, then the config file
    pub fn get_token(config: &GhStatsConfig) -> Option<String> {
        let from_file = config
            .config_data
            .github
            .as_ref()
            .and_then(|github| github.token.clone());
        config
            .cli_args
            .token
            .clone()
            .or(from_file)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }

    /// Base URL of the REST API
    pub fn get_api_url(config: &GhStatsConfig) -> String {
        config
            .config_data
            .github
            .as_ref()
            .and_then(|github| github.api_url.clone())
            .unwrap_or_else(|| GITHUB_API_URL.to_string())
    }

    /// Get the github platform
    /// # Errors
    /// Error if the HTTP client can't be built
    pub fn get_platform(config: &GhStatsConfig) -> Result<GithubPlatform, GhStatsError> {
        let token = Self::get_token(config);
        if token.is_none() {
            log::info!("No GitHub token configured, using unauthenticated rate limits");
        }
        GithubPlatform::new(token, Self::get_api_url(config), &config.fetch_options())
    }
}
