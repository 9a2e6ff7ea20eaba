//! # gh-stats
//!
//! Aggregate GitHub profile and repository statistics for a user
//!
//! ## Usage
//!
//! ```txt
//! Usage: gh-stats [OPTIONS] [USERNAME]
//!
//! Arguments:
//!   [USERNAME]  GitHub username (read from stdin when missing)
//!
//! Options:
//!   -t, --token <TOKEN>              GitHub token, optional [env: GITHUB_TOKEN]
//!   -c, --config <CONFIG>            Custom configuration file path
//!       --show-config-path           Show the current config path
//!       --serve <ADDR>               Serve the web form on this address instead of printing
//!       --json                       Print the stats as JSON
//!       --per-page <PER_PAGE>        Items requested per page (max 100)
//!       --max-pages <MAX_PAGES>      Maximum pages followed per listing
//!       --timeout <TIMEOUT>          Timeout of each request, in seconds
//!       --concurrency <CONCURRENCY>  Repositories processed in parallel
//!   -v, --verbose...                 Verbose mode (-v, -vv)
//!   -h, --help                       Print help
//!   -V, --version                    Print version
//! ```
//!
//! Contribution counts come from the public events API, which only exposes
//! recent activity; the "total" is the size of that window.

#![warn(clippy::all, rust_2018_idioms)]
#![warn(missing_docs)]
#![deny(
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![warn(clippy::multiple_crate_versions)]

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod macros;
pub mod pagination;
pub mod platform;
pub mod report;
pub mod stats;
pub(crate) mod utils;
pub mod web;

mod github;

pub use cli::{gh_stats_main, GhStatsCli};
pub use config::{ConfigData, FetchConfig, FetchOptions, GhStatsConfig};
pub use errors::{GhStatsError, GhStatsErrorKind};
pub use github::{config::GithubConfig, platform::GithubPlatform, GITHUB_API_URL};
pub use utils::{parse_event_time, Event, Repository, UserProfile, PROFILE_NAME_PLACEHOLDER};
