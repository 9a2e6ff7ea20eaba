//! Web variant: a form and a stats page
use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::errors::{GhStatsError, GhStatsErrorKind};
use crate::platform::StatsPlatform;
use crate::report::{or_unsupported, sorted_languages};
use crate::stats::{generate_stats, StatsReport};

/// Body returned when the profile lookup fails
pub const PROFILE_ERROR: &str = "Error: Could not retrieve user info";

/// Form page
const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>GitHub stats</title></head>
<body>
<h1>GitHub stats</h1>
<form action="/stats" method="post">
<label for="username">GitHub username</label>
<input id="username" name="username" type="text" required>
<button type="submit">Show stats</button>
</form>
</body>
</html>
"#;

/// Shared state of the handlers
#[derive(Clone)]
struct AppState {
    /// Source of the statistics
    platform: Arc<dyn StatsPlatform>,

    /// Repositories processed in parallel
    concurrency: usize,
}

/// Submitted form
#[derive(Deserialize, Debug)]
struct StatsForm {
    /// Requested username
    username: String,
}

/// Routes of the web variant
pub fn router(platform: Arc<dyn StatsPlatform>, concurrency: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/stats", post(stats))
        .with_state(AppState {
            platform,
            concurrency,
        })
}

/// Serve the web variant on `addr` until the process stops
/// # Errors
/// Error if the address can't be bound or the server fails
pub async fn serve(
    addr: &str,
    platform: Arc<dyn StatsPlatform>,
    concurrency: usize,
) -> Result<(), GhStatsError> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(platform, concurrency))
        .await
        .map_err(|e| GhStatsError::new(GhStatsErrorKind::Web).with_source(e))
}

/// `GET /`
async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// `POST /stats`
async fn stats(State(state): State<AppState>, Form(form): Form<StatsForm>) -> Response {
    match generate_stats(state.platform, &form.username, state.concurrency).await {
        Ok(report) => Html(render_html(&report)).into_response(),
        Err(e) if e.is_profile_not_found() => {
            log::warn!("{e}");
            (StatusCode::NOT_FOUND, PROFILE_ERROR).into_response()
        }
        Err(e) => {
            log::error!("Stats of '{}' failed: {e}", form.username);
            (StatusCode::BAD_GATEWAY, format!("Error: {e}")).into_response()
        }
    }
}

/// Escape text for HTML content and attributes
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the stats page
pub fn render_html(report: &StatsReport) -> String {
    let stats = &report.stats;
    let rows = [
        ("Followers", report.profile.followers.to_string()),
        ("Following", report.profile.following.to_string()),
        ("Stars", stats.stars.to_string()),
        ("Commits", stats.commits.to_string()),
        ("Pull Requests", stats.pull_requests.to_string()),
        ("Total Issues", stats.issues.to_string()),
        (
            "Contributions in the last year",
            stats.contributions.last_year.to_string(),
        ),
        (
            "Total Contributions (recent public events only)",
            stats.contributions.total.to_string(),
        ),
        ("Current Streak", or_unsupported(stats.streaks.current)),
        ("Longest Streak", or_unsupported(stats.streaks.longest)),
        ("Achievements", or_unsupported(stats.achievements)),
    ];
    let mut out = String::new();
    let name = escape_html(report.profile.display_name());
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{name} - GitHub stats</title></head>\n<body>\n<h1>{name}</h1>\n<table>\n"
    );
    for (label, value) in rows {
        let _ = writeln!(out, "<tr><th>{label}</th><td>{}</td></tr>", escape_html(&value));
    }
    out.push_str("</table>\n<h2>Most used languages</h2>\n<ul>\n");
    for (language, percentage) in sorted_languages(&stats.languages_percentage) {
        let _ = writeln!(out, "<li>{}: {percentage:.2}%</li>", escape_html(language));
    }
    out.push_str("</ul>\n");
    if !report.warnings.is_empty() {
        out.push_str("<h2>Incomplete statistics</h2>\n<ul>\n");
        for warning in &report.warnings {
            let _ = writeln!(out, "<li>{}</li>", escape_html(&warning.to_string()));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("<p><a href=\"/\">Back</a></p>\n</body>\n</html>\n");
    out
}
