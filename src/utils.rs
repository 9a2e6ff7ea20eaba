//! Utility functions and the domain records shared by every module
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::GhStatsError;

/// Name shown when a profile has no display name
pub const PROFILE_NAME_PLACEHOLDER: &str = "N/A";

/// Wire format of event timestamps
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// User profile information
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct UserProfile {
    /// Login of the user
    pub login: String,

    /// Display name of the user, if any
    pub name: Option<String>,

    /// Number of followers
    pub followers: u64,

    /// Number of followed users
    pub following: u64,
}

impl UserProfile {
    /// Display name, or [`PROFILE_NAME_PLACEHOLDER`] when the user has none
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => PROFILE_NAME_PLACEHOLDER,
        }
    }
}

/// Repository information
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct Repository {
    /// Full name of the repository (`owner/repo`)
    pub full_name: String,

    /// Number of stargazers
    pub stars: u64,
}

/// A public activity event, only kept for its timestamp
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Event {
    /// Creation time of the event
    pub created_at: DateTime<Utc>,
}

/// Parse an event timestamp in [`EVENT_TIME_FORMAT`]
pub fn parse_event_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, EVENT_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Get input from the user
pub(crate) fn input() -> Result<String, GhStatsError> {
    use std::io::{stdin, stdout, Write};
    let mut s = String::new();
    let _ = stdout().flush();
    stdin()
        .read_line(&mut s)
        .map_err(|e| GhStatsError::new_with_source("Did not enter a correct string", e))?;
    if let Some('\n') = s.chars().next_back() {
        s.pop();
    }
    if let Some('\r') = s.chars().next_back() {
        s.pop();
    }
    Ok(s)
}

/// Ask the username on the console
pub(crate) fn prompt_username() -> Result<String, GhStatsError> {
    print!("Enter GitHub username: ");
    Ok(input()?.trim().to_string())
}
