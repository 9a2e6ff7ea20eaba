//! Error handling for the gh-stats crate.
use std::{error::Error as StdError, fmt};

/// Error type for the gh-stats crate.
#[derive(Debug)]
pub struct GhStatsError {
    /// Inner error.
    inner: Box<Inner>,
}

impl GhStatsError {
    /// Create a new error.
    pub(crate) fn new(kind: GhStatsErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                text: None,
            }),
        }
    }

    /// Create a new error of kind [`GhStatsErrorKind::Config`] wrapping a source.
    pub(crate) fn new_with_source<E>(text: &str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::new(GhStatsErrorKind::Config)
            .with_text(text)
            .with_source(source)
    }

    /// Attach a human readable context to the error.
    pub(crate) fn with_text(mut self, text: &str) -> Self {
        self.inner.text = Some(text.to_string());
        self
    }

    /// Attach a source to the error.
    pub(crate) fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.inner.source = Some(source.into());
        self
    }

    /// Kind of the error.
    pub fn kind(&self) -> &GhStatsErrorKind {
        &self.inner.kind
    }

    /// Whether the error comes from a profile that could not be retrieved.
    pub fn is_profile_not_found(&self) -> bool {
        matches!(self.inner.kind, GhStatsErrorKind::ProfileNotFound)
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the gh-stats crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: GhStatsErrorKind,

    /// Additional context.
    text: Option<String>,

    /// Source error.
    source: Option<BoxError>,
}

/// Category of a [`GhStatsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhStatsErrorKind {
    /// Error related to the configuration.
    Config,

    /// Error related to user input.
    Input,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Error related to toml parsing.
    Toml,

    /// Error related to url parsing.
    Url,

    /// Error related to io.
    Io,

    /// The user profile could not be retrieved.
    ProfileNotFound,

    /// Error related to the web server.
    Web,
}

impl fmt::Display for GhStatsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GhStatsErrorKind::Config => "Configuration error",
            GhStatsErrorKind::Input => "Invalid input",
            GhStatsErrorKind::Reqwest => "HTTP error",
            GhStatsErrorKind::Serde => "JSON error",
            GhStatsErrorKind::Toml => "TOML error",
            GhStatsErrorKind::Url => "URL error",
            GhStatsErrorKind::Io => "IO error",
            GhStatsErrorKind::ProfileNotFound => "Error: Could not retrieve user info",
            GhStatsErrorKind::Web => "Web server error",
        };
        f.write_str(text)
    }
}

impl fmt::Display for GhStatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.inner.kind, &self.inner.text) {
            (GhStatsErrorKind::ProfileNotFound, Some(username)) => {
                write!(f, "{} for {username}", self.inner.kind)?
            }
            (kind, Some(text)) => write!(f, "{kind}: {text}")?,
            (kind, None) => write!(f, "{kind}")?,
        }
        if let Some(source) = &self.inner.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl StdError for GhStatsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<reqwest::Error> for GhStatsError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(GhStatsErrorKind::Reqwest).with_source(e)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for GhStatsError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Self::new(GhStatsErrorKind::Config)
            .with_text("Invalid header value")
            .with_source(e)
    }
}

impl From<serde_json::Error> for GhStatsError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(GhStatsErrorKind::Serde).with_source(e)
    }
}

impl From<toml::de::Error> for GhStatsError {
    fn from(e: toml::de::Error) -> Self {
        Self::new(GhStatsErrorKind::Toml).with_source(e)
    }
}

impl From<url::ParseError> for GhStatsError {
    fn from(e: url::ParseError) -> Self {
        Self::new(GhStatsErrorKind::Url).with_source(e)
    }
}

impl From<std::io::Error> for GhStatsError {
    fn from(e: std::io::Error) -> Self {
        Self::new(GhStatsErrorKind::Io).with_source(e)
    }
}

impl From<&str> for GhStatsError {
    fn from(text: &str) -> Self {
        Self::new(GhStatsErrorKind::Input).with_text(text)
    }
}

impl From<String> for GhStatsError {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}
