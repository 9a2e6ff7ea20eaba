//! Console and JSON rendering of a [`StatsReport`]
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::errors::GhStatsError;
use crate::stats::StatsReport;

/// Shown in place of values the API can't provide
pub const UNSUPPORTED: &str = "unsupported";

/// Languages by descending share, ties by name
pub fn sorted_languages(percentages: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut languages: Vec<(&str, f64)> = percentages
        .iter()
        .map(|(language, percentage)| (language.as_str(), *percentage))
        .collect();
    languages.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    languages
}

/// Value or [`UNSUPPORTED`]
pub fn or_unsupported(value: Option<u32>) -> String {
    value.map_or_else(|| UNSUPPORTED.to_string(), |v| v.to_string())
}

/// Render the report as line-oriented text
pub fn render_text(report: &StatsReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Profile name: {}", report.profile.display_name());
    let _ = writeln!(out, "Followers: {}", report.profile.followers);
    let _ = writeln!(out, "Following: {}", report.profile.following);
    let _ = writeln!(out, "Stars: {}", stats.stars);
    let _ = writeln!(out, "Commits: {}", stats.commits);
    let _ = writeln!(out, "Pull Requests: {}", stats.pull_requests);
    let _ = writeln!(out, "Total Issues: {}", stats.issues);
    let _ = writeln!(
        out,
        "Contributions in the last year: {}",
        stats.contributions.last_year
    );
    let _ = writeln!(
        out,
        "Total Contributions: {} (recent public events only)",
        stats.contributions.total
    );
    let _ = writeln!(out, "Current Streak: {}", or_unsupported(stats.streaks.current));
    let _ = writeln!(out, "Longest Streak: {}", or_unsupported(stats.streaks.longest));
    let _ = writeln!(out, "Achievements: {}", or_unsupported(stats.achievements));
    let _ = writeln!(out, "Most used languages:");
    for (language, percentage) in sorted_languages(&stats.languages_percentage) {
        let _ = writeln!(out, "{language}: {percentage:.2}%");
    }
    if !report.warnings.is_empty() {
        let _ = writeln!(out, "Incomplete statistics:");
        for warning in &report.warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }
    out
}

/// Render the report as pretty JSON
/// # Errors
/// Error if serialization fails
pub fn render_json(report: &StatsReport) -> Result<String, GhStatsError> {
    Ok(serde_json::to_string_pretty(report)?)
}
