//! Github Platform
use super::{GITHUB_ACCEPT, GITHUB_API_HEADER, GITHUB_API_VERSION};
use crate::{
    config::FetchOptions,
    errors::{GhStatsError, GhStatsErrorKind},
    github::repo::{EventGithub, RepoGithub, UserGithub},
    macros::outcome_try,
    pagination::{next_link, PageCursor},
    platform::{FetchOutcome, LanguageBytes, PlatformFuture, StatsPlatform},
    utils::{Event, Repository, UserProfile},
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Response, StatusCode,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use url::Url;
use urlencoding::encode;

/// User agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Github Platform
#[derive(Debug, Clone)]
pub struct GithubPlatform {
    /// Base URL of the API, without trailing slash
    api_url: String,

    /// Items requested per page
    per_page: u32,

    /// Maximum pages followed per listing
    max_pages: usize,

    /// Reqwest client
    client: reqwest::Client,
}

/// One decoded page of a listing
struct Page<T> {
    /// Items of the page
    items: Vec<T>,

    /// Link to the following page
    next: Option<Url>,
}

/// Path of a repository from its `owner/repo` name
fn repo_path(full_name: &str) -> String {
    match full_name.split_once('/') {
        Some((owner, repo)) => format!("/repos/{}/{}", encode(owner), encode(repo)),
        None => format!("/repos/{}", encode(full_name)),
    }
}

/// Error for a non-success response
fn status_error(status: StatusCode) -> GhStatsError {
    GhStatsError::new(GhStatsErrorKind::Reqwest).with_text(&format!("status {status}"))
}

impl GithubPlatform {
    /// Create a new GithubPlatform
    /// # Errors
    /// Error if the token is not a valid header value or the client can't be built
    pub fn new(
        token: Option<String>,
        api_url: impl Into<String>,
        options: &FetchOptions,
    ) -> Result<Self, GhStatsError> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        let _ = headers.insert(GITHUB_API_HEADER, HeaderValue::from_static(GITHUB_API_VERSION));
        if let Some(token) = token {
            let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))?;
            auth.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth);
        }
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            per_page: options.per_page,
            max_pages: options.max_pages,
            client,
        })
    }

    /// URL of a single resource
    fn endpoint(&self, path: &str) -> Result<Url, GhStatsError> {
        Ok(Url::parse(&format!("{}{path}", self.api_url))?)
    }

    /// URL of the first page of a listing
    fn list_endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, GhStatsError> {
        let mut url = self.endpoint(path)?;
        let per_page = self.per_page.to_string();
        let _ = url
            .query_pairs_mut()
            .extend_pairs(query)
            .append_pair("per_page", &per_page);
        Ok(url)
    }

    /// Send a GET request, failing on non-success statuses
    async fn get(&self, url: &Url) -> Result<Response, GhStatsError> {
        log::debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        Ok(response)
    }

    /// Fetch and decode one page of a listing
    async fn get_page<T: DeserializeOwned>(&self, url: &Url) -> Result<Page<T>, GhStatsError> {
        let response = self.get(url).await?;
        let next = next_link(response.headers());
        let items = response.json::<Vec<T>>().await?;
        Ok(Page { items, next })
    }

    /// Follow a listing from `first` until no next page is advertised
    async fn collect_pages<T: DeserializeOwned>(&self, first: Url) -> FetchOutcome<Vec<T>> {
        let mut cursor = PageCursor::new(first, self.max_pages);
        let mut items = Vec::new();
        while let Some(url) = cursor.next_url().cloned() {
            let page = match self.get_page::<T>(&url).await {
                Ok(page) => page,
                Err(e) => {
                    log::warn!(
                        "Stopping pagination at {url} after {} pages: {e}",
                        cursor.pages_fetched()
                    );
                    let reason = e.to_string();
                    return if cursor.pages_fetched() == 0 {
                        FetchOutcome::Failed { reason }
                    } else {
                        FetchOutcome::Partial {
                            value: items,
                            reason,
                        }
                    };
                }
            };
            log::debug!("Received {} items from {url}", page.items.len());
            items.extend(page.items);
            cursor.advance(page.next);
        }
        match cursor.stop_reason() {
            Some(reason) => {
                log::warn!("Listing truncated: {reason}");
                FetchOutcome::Partial {
                    value: items,
                    reason: reason.to_string(),
                }
            }
            None => FetchOutcome::Complete(items),
        }
    }

    /// Count the items of every page of a listing
    async fn count_items(&self, path: &str, query: &[(&str, &str)]) -> FetchOutcome<u64> {
        let url = outcome_try!(self.list_endpoint(path, query), path);
        self.collect_pages::<IgnoredAny>(url)
            .await
            .map(|items| items.len() as u64)
    }
}

impl StatsPlatform for GithubPlatform {
    fn get_api_url(&self) -> &str {
        &self.api_url
    }

    fn get_profile(
        &self,
        username: &str,
    ) -> PlatformFuture<'_, Result<Option<UserProfile>, GhStatsError>> {
        let username = username.to_string();
        Box::pin(async move {
            let url = self.endpoint(&format!("/users/{}", encode(&username)))?;
            log::debug!("GET {url}");
            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                log::warn!(
                    "Profile lookup for '{username}' returned {}",
                    response.status()
                );
                return Ok(None);
            }
            let user: UserGithub = response.json().await?;
            Ok(Some(user.into()))
        })
    }

    fn list_repos(&self, username: &str) -> PlatformFuture<'_, FetchOutcome<Vec<Repository>>> {
        let path = format!("/users/{}/repos", encode(username));
        Box::pin(async move {
            let url = outcome_try!(self.list_endpoint(&path, &[]), "repositories");
            self.collect_pages::<RepoGithub>(url)
                .await
                .map(|repos| repos.into_iter().map(Repository::from).collect())
        })
    }

    fn list_events(&self, username: &str) -> PlatformFuture<'_, FetchOutcome<Vec<Event>>> {
        let path = format!("/users/{}/events", encode(username));
        Box::pin(async move {
            let url = outcome_try!(self.list_endpoint(&path, &[]), "events");
            self.collect_pages::<EventGithub>(url)
                .await
                .map(|events| events.into_iter().filter_map(EventGithub::into_event).collect())
        })
    }

    fn commit_count(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<u64>> {
        let path = format!("{}/commits", repo_path(full_name));
        Box::pin(async move { self.count_items(&path, &[]).await })
    }

    fn pull_request_count(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<u64>> {
        let path = format!("{}/pulls", repo_path(full_name));
        Box::pin(async move { self.count_items(&path, &[("state", "all")]).await })
    }

    fn issue_count(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<u64>> {
        let path = format!("{}/issues", repo_path(full_name));
        Box::pin(async move { self.count_items(&path, &[("state", "all")]).await })
    }

    fn languages(&self, full_name: &str) -> PlatformFuture<'_, FetchOutcome<LanguageBytes>> {
        let path = format!("{}/languages", repo_path(full_name));
        Box::pin(async move {
            let url = outcome_try!(self.endpoint(&path), path);
            let response = outcome_try!(self.get(&url).await, path);
            let languages = outcome_try!(response.json::<LanguageBytes>().await, path);
            FetchOutcome::Complete(languages)
        })
    }
}
