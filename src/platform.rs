//! Source of the statistics and the outcome of each fetch
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::errors::GhStatsError;
use crate::utils::{Event, Repository, UserProfile};

/// Boxed future returned by [`StatsPlatform`] methods
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Bytes of code per language for one repository
pub type LanguageBytes = HashMap<String, u64>;

/// Everything the stats pipeline needs from a code hosting API
pub trait StatsPlatform: Sync + Send {
    /// Fetch the profile of `username`, `None` when the API does not return one
    fn get_profile(
        &self,
        username: &str,
    ) -> PlatformFuture<'_, Result<Option<UserProfile>, GhStatsError>>;

    /// List every repository owned by `username`
    fn list_repos(&self, username: &str) -> PlatformFuture<'_, FetchOutcome<Vec<Repository>>>;

    /// List the public events of `username`
    fn list_events(&self, username: &str) -> PlatformFuture<'_, FetchOutcome<Vec<Event>>>;

    /// Count the commits of the repository `full_name`
    fn commit_count(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<u64>>;

    /// Count the pull requests (any state) of the repository `full_name`
    fn pull_request_count(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<u64>>;

    /// Count the issues (any state) of the repository `full_name`
    fn issue_count(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<u64>>;

    /// Language byte counts of the repository `full_name`
    fn languages(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<LanguageBytes>>;

    /// Base URL of the API
    fn get_api_url(&self) -> &str;
}

/// Result of a best-effort fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Every page was fetched
    Complete(T),

    /// Some data was fetched before the fetch stopped
    Partial {
        /// Data gathered before stopping
        value: T,
        /// Why the fetch stopped
        reason: String,
    },

    /// Nothing could be fetched
    Failed {
        /// Why the fetch failed
        reason: String,
    },
}

impl<T> FetchOutcome<T> {
    /// Map the carried value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Complete(value) => FetchOutcome::Complete(f(value)),
            FetchOutcome::Partial { value, reason } => FetchOutcome::Partial {
                value: f(value),
                reason,
            },
            FetchOutcome::Failed { reason } => FetchOutcome::Failed { reason },
        }
    }

    /// Whether the fetch went through entirely
    pub fn is_complete(&self) -> bool {
        matches!(self, FetchOutcome::Complete(_))
    }

    /// Reason of a degraded outcome
    pub fn reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Complete(_) => None,
            FetchOutcome::Partial { reason, .. } | FetchOutcome::Failed { reason } => Some(reason),
        }
    }
}

impl<T: Default> FetchOutcome<T> {
    /// Split into the usable value and a warning about `subject` if degraded
    pub fn split(self, subject: &str) -> (T, Option<StatWarning>) {
        match self {
            FetchOutcome::Complete(value) => (value, None),
            FetchOutcome::Partial { value, reason } => (
                value,
                Some(StatWarning {
                    subject: subject.to_string(),
                    severity: Severity::Partial,
                    reason,
                }),
            ),
            FetchOutcome::Failed { reason } => (
                T::default(),
                Some(StatWarning {
                    subject: subject.to_string(),
                    severity: Severity::Failed,
                    reason,
                }),
            ),
        }
    }
}

/// How badly a statistic is degraded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The value is an undercount
    Partial,

    /// The value is zero because the fetch failed
    Failed,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Partial => write!(f, "partial"),
            Severity::Failed => write!(f, "failed"),
        }
    }
}

/// A statistic that is not backed by a complete fetch
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct StatWarning {
    /// What was being fetched (`repositories`, `a/b commits`, ...)
    pub subject: String,

    /// Partial or failed
    pub severity: Severity,

    /// Why
    pub reason: String,
}

impl std::fmt::Display for StatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.subject, self.severity, self.reason)
    }
}
