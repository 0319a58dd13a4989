//! Integration tests for forum pagination.

use forum_order_tracker::config::Config;
use forum_order_tracker::forum::PostFetcher;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOPIC_PATH: &str = "/discuss/topic/838820/";

/// Matches requests that identify as a browser.
struct BrowserUserAgent;

impl wiremock::Match for BrowserUserAgent {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ua| ua.starts_with("Mozilla/5.0"))
    }
}

/// Render a forum page with one `.postbody` element per post.
fn forum_page(posts: &[&str]) -> String {
    let bodies: String = posts
        .iter()
        .map(|p| {
            format!(
                r#"<div class="blockpost"><div class="box"><div class="postleft">user</div><div class="postright"><div class="postmsg"><div class="postbody"><div class="post_body_html">{p}</div></div></div></div></div></div>"#
            )
        })
        .collect();
    format!(r#"<!DOCTYPE html><html><body><div id="djangobbindex">{bodies}</div></body></html>"#)
}

async fn mount_page(server: &MockServer, page: u32, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("page", page.to_string()))
        .and(BrowserUserAgent)
        .respond_with(template)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn fetcher_for(server: &MockServer) -> PostFetcher {
    let config = Config {
        topic_url: format!("{}{TOPIC_PATH}", server.uri()),
        ..Config::for_testing()
    };
    PostFetcher::new(&config).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetch_concatenates_pages_and_skips_leading_posts() {
    let server = MockServer::start().await;
    mount_page(&server, 1, html(forum_page(&["rules", "prices", "staff", "p1"]))).await;
    mount_page(&server, 2, html(forum_page(&["p2", "p3"]))).await;
    mount_page(&server, 3, html(forum_page(&[]))).await;

    let posts = fetcher_for(&server)
        .fetch_all_posts()
        .await
        .expect("fetch failed");

    assert_eq!(posts, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn test_fetch_stops_on_failure_status() {
    let server = MockServer::start().await;
    mount_page(&server, 1, html(forum_page(&["a", "b", "c", "d"]))).await;
    mount_page(&server, 2, ResponseTemplate::new(500)).await;
    Mock::given(method("GET"))
        .and(query_param("page", "3"))
        .respond_with(html(forum_page(&["never"])))
        .expect(0)
        .mount(&server)
        .await;

    let posts = fetcher_for(&server)
        .fetch_all_posts()
        .await
        .expect("fetch failed");

    assert_eq!(posts, vec!["d"]);
}

#[tokio::test]
async fn test_fetch_first_page_failure_is_empty() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(503)).await;

    let posts = fetcher_for(&server)
        .fetch_all_posts()
        .await
        .expect("a failure status is not an error");

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_fetch_short_thread_is_empty() {
    let server = MockServer::start().await;
    mount_page(&server, 1, html(forum_page(&["rules", "prices"]))).await;
    mount_page(&server, 2, html(forum_page(&[]))).await;

    let posts = fetcher_for(&server)
        .fetch_all_posts()
        .await
        .expect("fetch failed");

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_fetch_keeps_multiline_post_text() {
    let server = MockServer::start().await;
    let form = "Username: alice\nService Required: banner";
    mount_page(&server, 1, html(forum_page(&["a", "b", "c", form]))).await;
    mount_page(&server, 2, html(forum_page(&[]))).await;

    let posts = fetcher_for(&server)
        .fetch_all_posts()
        .await
        .expect("fetch failed");

    assert_eq!(posts, vec![form]);
}

#[tokio::test]
async fn test_fetch_connection_error_is_an_error() {
    let config = Config {
        topic_url: "http://127.0.0.1:1/discuss/topic/1/".to_string(),
        ..Config::for_testing()
    };
    let fetcher = PostFetcher::new(&config).unwrap();

    let result = fetcher.fetch_all_posts().await;

    let err = result.expect_err("connection refused should fail");
    assert!(format!("{err:#}").contains("Failed to fetch forum page 1"));
}
