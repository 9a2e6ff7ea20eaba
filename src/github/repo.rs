//! Github wire records and conversion to the domain records
use serde::Deserialize;

use crate::utils::{parse_event_time, Event, Repository, UserProfile};

/// Github user, as returned by `/users/{username}`
#[derive(Deserialize, Default, Debug, Clone)]
pub struct UserGithub {
    /// User login
    pub login: String,

    /// Display name
    pub name: Option<String>,

    /// Followers count
    #[serde(default)]
    pub followers: u64,

    /// Following count
    #[serde(default)]
    pub following: u64,
}

impl From<UserGithub> for UserProfile {
    fn from(user: UserGithub) -> Self {
        UserProfile {
            login: user.login,
            name: user.name,
            followers: user.followers,
            following: user.following,
        }
    }
}

/// Github Repo
#[derive(Deserialize, Default, Debug, Clone)]
pub struct RepoGithub {
    /// Repository full name (`owner/repo`)
    pub full_name: String,

    /// Repository stargazers
    #[serde(default)]
    pub stargazers_count: u64,
}

impl From<RepoGithub> for Repository {
    fn from(repo: RepoGithub) -> Self {
        Repository {
            full_name: repo.full_name,
            stars: repo.stargazers_count,
        }
    }
}

/// Github event, only the creation time is read
#[derive(Deserialize, Default, Debug, Clone)]
pub struct EventGithub {
    /// Event id
    #[serde(default)]
    pub id: String,

    /// Creation time in `%Y-%m-%dT%H:%M:%SZ`
    pub created_at: String,
}

impl EventGithub {
    /// Convert to an [`Event`], `None` when the timestamp is malformed
    pub fn into_event(self) -> Option<Event> {
        match parse_event_time(&self.created_at) {
            Some(created_at) => Some(Event { created_at }),
            None => {
                log::warn!(
                    "Ignoring event {} with malformed timestamp '{}'",
                    self.id,
                    self.created_at
                );
                None
            }
        }
    }
}
