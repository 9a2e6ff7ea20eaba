//! Integration tests for the GitHub platform and the stats pipeline using wiremock
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gh_stats::platform::{FetchOutcome, StatsPlatform};
use gh_stats::stats::generate_stats;
use gh_stats::{FetchOptions, GithubPlatform, Repository};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options() -> FetchOptions {
    FetchOptions {
        timeout: Duration::from_secs(5),
        ..FetchOptions::default()
    }
}

fn platform(server: &MockServer) -> GithubPlatform {
    GithubPlatform::new(None, server.uri(), &options()).unwrap()
}

fn next_link(server: &MockServer, path: &str, page: u32) -> String {
    format!(
        "<{}{path}?per_page=100&page={page}>; rel=\"next\", <{}{path}?per_page=100&page=9>; rel=\"last\"",
        server.uri(),
        server.uri()
    )
}

fn repo(full_name: &str, stars: u64) -> Repository {
    Repository {
        full_name: full_name.to_string(),
        stars,
    }
}

async fn mount_repo_pages(server: &MockServer, second_page: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {"full_name": "octo/a", "stargazers_count": 1},
                    {"full_name": "octo/b", "stargazers_count": 2}
                ]))
                .insert_header("link", next_link(server, "/users/octo/repos", 2).as_str()),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(query_param("page", "2"))
        .respond_with(second_page)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn repositories_follow_next_links() {
    let server = MockServer::start().await;
    mount_repo_pages(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!([{"full_name": "octo/c", "stargazers_count": 3}])),
    )
    .await;

    let repos = platform(&server).list_repos("octo").await;
    assert_eq!(
        repos,
        FetchOutcome::Complete(vec![repo("octo/a", 1), repo("octo/b", 2), repo("octo/c", 3)])
    );
}

#[tokio::test]
async fn failing_page_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_repo_pages(&server, ResponseTemplate::new(502)).await;

    let repos = platform(&server).list_repos("octo").await;
    match repos {
        FetchOutcome::Partial { value, reason } => {
            assert_eq!(value, vec![repo("octo/a", 1), repo("octo/b", 2)]);
            assert!(reason.contains("502"), "{reason}");
        }
        other => panic!("expected a partial listing, got {other:?}"),
    }
}

#[tokio::test]
async fn failing_first_page_is_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo/events"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let events = platform(&server).list_events("octo").await;
    assert!(matches!(events, FetchOutcome::Failed { .. }));
}

#[tokio::test]
async fn page_budget_truncates_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/a/commits"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"sha": "1"}, {"sha": "2"}]))
                .insert_header("link", next_link(&server, "/repos/octo/a/commits", 2).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = FetchOptions {
        max_pages: 1,
        ..options()
    };
    let github = GithubPlatform::new(None, server.uri(), &options).unwrap();
    let commits = github.commit_count("octo/a").await;
    assert_eq!(
        commits,
        FetchOutcome::Partial {
            value: 2,
            reason: "stopped after 1 pages".to_string()
        }
    );
}

#[tokio::test]
async fn commits_are_counted_over_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/a/commits"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"sha": "1"}, {"sha": "2"}, {"sha": "3"}]))
                .insert_header("link", next_link(&server, "/repos/octo/a/commits", 2).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/a/commits"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"sha": "4"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/a/pulls"))
        .and(query_param("state", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"number": 1}])))
        .mount(&server)
        .await;

    let github = platform(&server);
    assert_eq!(github.commit_count("octo/a").await, FetchOutcome::Complete(4));
    assert_eq!(
        github.pull_request_count("octo/a").await,
        FetchOutcome::Complete(1)
    );
}

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo"))
        .and(header("authorization", "Bearer secret"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octo", "name": "Octo", "followers": 3, "following": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let github = GithubPlatform::new(Some("secret".to_string()), server.uri(), &options()).unwrap();
    let profile = github.get_profile("octo").await.unwrap().unwrap();
    assert_eq!(profile.display_name(), "Octo");
    assert_eq!(profile.followers, 3);
    assert_eq!(profile.following, 4);
}

#[tokio::test]
async fn single_repository_pipeline() {
    let server = MockServer::start().await;
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let routes = [
        (
            "/users/a",
            json!({"login": "a", "name": null, "followers": 1, "following": 0}),
        ),
        (
            "/users/a/repos",
            json!([{"full_name": "a/b", "stargazers_count": 5}]),
        ),
        (
            "/users/a/events",
            json!([
                {"id": "1", "type": "PushEvent", "created_at": "2023-01-01T00:00:00Z"},
                {"id": "2", "type": "PushEvent", "created_at": now}
            ]),
        ),
        (
            "/repos/a/b/commits",
            json!([{"sha": "1"}, {"sha": "2"}, {"sha": "3"}]),
        ),
        ("/repos/a/b/pulls", json!([])),
        ("/repos/a/b/issues", json!([{"number": 7}])),
        ("/repos/a/b/languages", json!({"Go": 100})),
    ];
    for (route, body) in routes {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let report = generate_stats(Arc::new(platform(&server)), "a", 4)
        .await
        .unwrap();
    assert_eq!(report.profile.display_name(), "N/A");
    assert_eq!(report.stats.stars, 5);
    assert_eq!(report.stats.commits, 3);
    assert_eq!(report.stats.pull_requests, 0);
    assert_eq!(report.stats.issues, 1);
    assert_eq!(report.stats.languages_percentage.get("Go"), Some(&100.0));
    assert_eq!(report.stats.contributions.last_year, 1);
    assert_eq!(report.stats.contributions.total, 2);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[tokio::test]
async fn empty_repository_commits_degrade_to_warning() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "a"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/a/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"full_name": "a/empty", "stargazers_count": 0}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/a/empty/commits"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;
    for route in ["/users/a/events", "/repos/a/empty/pulls", "/repos/a/empty/issues"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/repos/a/empty/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let report = generate_stats(Arc::new(platform(&server)), "a", 1)
        .await
        .unwrap();
    assert_eq!(report.stats.commits, 0);
    assert!(report.stats.languages_percentage.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].subject, "a/empty commits");
}

#[tokio::test]
async fn missing_profile_fetches_nothing_else() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    for route in ["/users/ghost/repos", "/users/ghost/events"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
    }

    let err = generate_stats(Arc::new(platform(&server)), "ghost", 4)
        .await
        .unwrap_err();
    assert!(err.is_profile_not_found());
    assert_eq!(
        err.to_string(),
        "Error: Could not retrieve user info for ghost"
    );
}
