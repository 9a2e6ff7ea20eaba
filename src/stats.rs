//! Aggregate the profile, repository and event data of a user
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::join;
use tokio::task::JoinSet;

use crate::errors::{GhStatsError, GhStatsErrorKind};
use crate::platform::{FetchOutcome, LanguageBytes, Severity, StatWarning, StatsPlatform};
use crate::utils::{Event, Repository, UserProfile};

/// Bytes of code per language, summed over repositories
pub type LanguageTally = BTreeMap<String, u64>;

/// Events counted as contributions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContributionCounts {
    /// Events in the 365 days before the computation
    pub last_year: u64,

    /// Every event returned by the events API.
    ///
    /// The API only exposes recent activity, so this is the size of that
    /// window and not a lifetime total.
    pub total: u64,
}

/// Streak values, none of which the API exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Current streak in days, `None` when unsupported
    pub current: Option<u32>,

    /// Longest streak in days, `None` when unsupported
    pub longest: Option<u32>,
}

/// Final statistics of a user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateStats {
    /// Stars over every owned repository
    pub stars: u64,

    /// Commits over every owned repository
    pub commits: u64,

    /// Pull requests (any state) over every owned repository
    pub pull_requests: u64,

    /// Issues (any state) over every owned repository
    pub issues: u64,

    /// Share of each language in the total bytes, in percent
    pub languages_percentage: BTreeMap<String, f64>,

    /// Event based contribution counts
    pub contributions: ContributionCounts,

    /// Streaks
    pub streaks: Streaks,

    /// Achievements, `None` when unsupported
    pub achievements: Option<u32>,
}

/// Everything rendered for a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    /// Requested username
    pub username: String,

    /// Profile of the user
    pub profile: UserProfile,

    /// Aggregated numbers
    pub stats: AggregateStats,

    /// Numbers not backed by a complete fetch
    pub warnings: Vec<StatWarning>,
}

/// Sums over a set of repositories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoTotals {
    /// Stars
    pub stars: u64,

    /// Commits
    pub commits: u64,

    /// Pull requests
    pub pull_requests: u64,

    /// Issues
    pub issues: u64,

    /// Language bytes
    pub languages: LanguageTally,

    /// Degraded per-repository fetches
    pub warnings: Vec<StatWarning>,
}

/// Raw results for one repository
#[derive(Debug)]
struct RepoStats {
    /// The repository
    repo: Repository,

    /// Commit count
    commits: FetchOutcome<u64>,

    /// Pull request count
    pull_requests: FetchOutcome<u64>,

    /// Issue count
    issues: FetchOutcome<u64>,

    /// Language bytes
    languages: FetchOutcome<LanguageBytes>,
}

impl RepoTotals {
    /// Add the results of one repository
    fn absorb(&mut self, stats: RepoStats) {
        let name = &stats.repo.full_name;
        self.stars += stats.repo.stars;
        let commits = self.take(stats.commits, format!("{name} commits"));
        let pull_requests = self.take(stats.pull_requests, format!("{name} pull requests"));
        let issues = self.take(stats.issues, format!("{name} issues"));
        self.commits += commits;
        self.pull_requests += pull_requests;
        self.issues += issues;
        let languages = self.take(stats.languages, format!("{name} languages"));
        for (language, bytes) in languages {
            *self.languages.entry(language).or_default() += bytes;
        }
    }

    /// Keep the value of an outcome and its warning, if any
    fn take<T: Default>(&mut self, outcome: FetchOutcome<T>, subject: String) -> T {
        let (value, warning) = outcome.split(&subject);
        self.warnings.extend(warning);
        value
    }
}

/// Partition events into last-year and total counts
///
/// The cutoff is `now - 365 days`; an event exactly at the cutoff counts as
/// last year.
pub fn calculate_contributions(events: &[Event], now: DateTime<Utc>) -> ContributionCounts {
    let one_year_ago = now - Duration::days(365);
    let mut counts = ContributionCounts::default();
    for event in events {
        if event.created_at >= one_year_ago {
            counts.last_year += 1;
        }
        counts.total += 1;
    }
    counts
}

/// Share of each language in the grand total, empty when there are no bytes
pub fn language_percentages(tally: &LanguageTally) -> BTreeMap<String, f64> {
    let total: u64 = tally.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    tally
        .iter()
        .map(|(language, bytes)| (language.clone(), (*bytes as f64 / total as f64) * 100.0))
        .collect()
}

/// Streaks of a user; the API has no such data
pub fn fetch_streaks(_username: &str) -> Streaks {
    Streaks::default()
}

/// Achievements of a user; the API has no such data
pub fn fetch_achievements(_username: &str) -> Option<u32> {
    None
}

/// Fetch the four statistics of one repository
async fn fetch_one_repo(platform: Arc<dyn StatsPlatform>, repo: Repository) -> RepoStats {
    let name = repo.full_name.as_str();
    let (commits, pull_requests, issues, languages) = join!(
        platform.commit_count(name),
        platform.pull_request_count(name),
        platform.issue_count(name),
        platform.languages(name)
    );
    RepoStats {
        repo,
        commits,
        pull_requests,
        issues,
        languages,
    }
}

/// Sum the statistics of every repository, at most `concurrency` at a time
pub async fn fetch_repo_stats(
    platform: Arc<dyn StatsPlatform>,
    repos: Vec<Repository>,
    concurrency: usize,
) -> RepoTotals {
    let limit = concurrency.max(1);
    let mut totals = RepoTotals::default();
    let mut set = JoinSet::new();
    for repo in repos {
        while set.len() >= limit {
            if let Some(joined) = set.join_next().await {
                absorb_joined(&mut totals, joined);
            }
        }
        log::debug!("Fetching stats of {}", repo.full_name);
        set.spawn(fetch_one_repo(platform.clone(), repo));
    }
    while let Some(joined) = set.join_next().await {
        absorb_joined(&mut totals, joined);
    }
    totals.warnings.sort();
    totals
}

/// Add a finished repository task to the totals
fn absorb_joined(totals: &mut RepoTotals, joined: Result<RepoStats, tokio::task::JoinError>) {
    match joined {
        Ok(stats) => totals.absorb(stats),
        Err(e) => {
            log::error!("Repository task failed: {e}");
            totals.warnings.push(StatWarning {
                subject: "repository task".to_string(),
                severity: Severity::Failed,
                reason: e.to_string(),
            });
        }
    }
}

/// Run the whole pipeline for `username`
/// # Errors
/// Error if the profile can't be retrieved; nothing else is fetched then
pub async fn generate_stats(
    platform: Arc<dyn StatsPlatform>,
    username: &str,
    concurrency: usize,
) -> Result<StatsReport, GhStatsError> {
    let username = username.trim();
    let not_found = || GhStatsError::new(GhStatsErrorKind::ProfileNotFound).with_text(username);
    if username.is_empty() {
        return Err(not_found());
    }
    let profile = platform.get_profile(username).await?.ok_or_else(not_found)?;
    log::info!("Collecting stats of {username}");

    let (repos, events) = join!(platform.list_repos(username), platform.list_events(username));
    let mut warnings = Vec::new();
    let (repos, repos_warning) = repos.split("repositories");
    let (events, events_warning) = events.split("events");
    warnings.extend(repos_warning);
    warnings.extend(events_warning);
    log::info!("Found {} repositories and {} events", repos.len(), events.len());

    let contributions = calculate_contributions(&events, Utc::now());
    let totals = fetch_repo_stats(platform.clone(), repos, concurrency).await;
    warnings.extend(totals.warnings);
    for warning in &warnings {
        log::warn!("Degraded statistic: {warning}");
    }

    Ok(StatsReport {
        username: username.to_string(),
        profile,
        stats: AggregateStats {
            stars: totals.stars,
            commits: totals.commits,
            pull_requests: totals.pull_requests,
            issues: totals.issues,
            languages_percentage: language_percentages(&totals.languages),
            contributions,
            streaks: fetch_streaks(username),
            achievements: fetch_achievements(username),
        },
        warnings,
    })
}
