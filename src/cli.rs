//! Command line options for the gh-stats tool
use crate::{
    config::GhStatsConfig,
    errors::GhStatsError,
    github::config::GithubConfig,
    platform::StatsPlatform,
    report::{render_json, render_text},
    stats::generate_stats,
    utils::prompt_username,
    web::serve,
};
use clap::Parser;
use std::sync::Arc;

/// gh-stats - Aggregate GitHub profile and repository statistics
#[derive(Parser, Default, Clone, Debug)]
#[command(version)]
pub struct GhStatsCli {
    /// GitHub username (read from stdin when missing)
    pub username: Option<String>,

    /// GitHub token, optional
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Custom configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Show the current config path
    #[arg(long)]
    pub show_config_path: bool,

    /// Serve the web form on this address instead of printing (e.g. 127.0.0.1:5000)
    #[arg(long, value_name = "ADDR")]
    pub serve: Option<String>,

    /// Print the stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Items requested per page (max 100)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Maximum pages followed per listing
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Timeout of each request, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Repositories processed in parallel
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GhStatsCli {
    /// Log level matching the verbosity
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Run the gh-stats tool with the provided command line options
/// # Errors
/// Error if the configuration is invalid, the profile can't be retrieved or output fails
pub async fn gh_stats_main(cli_args: GhStatsCli) -> Result<(), GhStatsError> {
    let config = GhStatsConfig::try_new(cli_args)?;
    if config.cli_args.show_config_path {
        println!("{}", config.config_path.display());
        return Ok(());
    }
    let options = config.fetch_options();
    let platform: Arc<dyn StatsPlatform> = Arc::new(GithubConfig::get_platform(&config)?);
    log::debug!("Using {} with {options:?}", platform.get_api_url());

    if let Some(addr) = config.cli_args.serve.as_deref() {
        return serve(addr, platform, options.concurrency).await;
    }

    let username = match config.cli_args.username.as_deref() {
        Some(username) => username.trim().to_string(),
        None => prompt_username()?,
    };
    if username.is_empty() {
        return Err("No username given".into());
    }
    let report = generate_stats(platform, &username, options.concurrency).await?;
    if config.cli_args.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}
