// Repository client tests against a mock GitHub API
// Author: kelexine (https://github.com/kelexine)

use ghcms::cache::{ContentCache, FileContent, MemoryStore};
use ghcms::config::ApiConfig;
use ghcms::dispatch::{Api, BackoffPolicy};
use ghcms::error::ApiError;
use ghcms::github::RepoClient;
use ghcms::preview::PreviewState;
use mockito::{Matcher, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

const BLOB_SHA: &str = "3b18e512dba79e4c8300dd08aeb37f8e728b8dad";

fn client_for(server: &ServerGuard) -> RepoClient {
    let config = ApiConfig {
        api_root: server.url(),
        token: Some("ghp_testtoken".to_string()),
        ..ApiConfig::default()
    };
    let api = Api::builder(&config)
        .policy(BackoffPolicy {
            max_attempts: 5,
            cooldown_unit: Duration::from_millis(1),
        })
        .build()
        .unwrap();
    RepoClient::new(api, ContentCache::new(Arc::new(MemoryStore::new())), "octo/site")
}

fn contents_body() -> String {
    serde_json::json!({
        "name": "hello.md",
        "path": "content/hello.md",
        "sha": BLOB_SHA,
        "size": 12,
        "type": "file"
    })
    .to_string()
}

#[tokio::test]
async fn test_read_file_downloads_blob_once() {
    let mut server = Server::new_async().await;
    let contents = server
        .mock("GET", "/repos/octo/site/contents/content/hello.md")
        .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
        .match_header("authorization", "token ghp_testtoken")
        .with_status(200)
        .with_body(contents_body())
        .expect(2)
        .create_async()
        .await;
    let blob = server
        .mock("GET", format!("/repos/octo/site/git/blobs/{}", BLOB_SHA).as_str())
        .with_status(200)
        .with_body(
            serde_json::json!({
                "sha": BLOB_SHA,
                "content": "IyBIZWxs\nbyB3b3Js\nZAo=\n",
                "encoding": "base64"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let first = client.read_file("content/hello.md", "main", true).await.unwrap();
    let second = client.read_file("content/hello.md", "main", true).await.unwrap();

    assert_eq!(first, FileContent::Text("# Hello world\n".to_string()));
    assert_eq!(second, first);
    contents.assert_async().await;
    blob.assert_async().await;

    let stats = client.cache().get_stats().await;
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_read_file_metadata_from_latest_commit() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo/site/contents/content/hello.md")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(contents_body())
        .create_async()
        .await;
    let commits = server
        .mock("GET", "/repos/octo/site/commits")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("path".into(), "content/hello.md".into()),
            Matcher::UrlEncoded("sha".into(), "main".into()),
            Matcher::UrlEncoded("per_page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            serde_json::json!([{
                "sha": "c0ffee",
                "commit": {"author": {"name": "Octo Cat", "date": "2024-05-01T12:00:00Z"}},
                "author": {"login": "octocat"}
            }])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let metadata = client.read_file_metadata("content/hello.md", "main").await.unwrap();
    let again = client.read_file_metadata("content/hello.md", "main").await.unwrap();

    assert_eq!(metadata.author, "octocat");
    assert_eq!(metadata.updated_on.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    assert_eq!(again, metadata);
    commits.assert_async().await;
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mut server = Server::new_async().await;
    let missing = server
        .mock("GET", "/repos/octo/site/contents/missing.md")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client.read_file("missing.md", "main", true).await.unwrap_err();

    assert!(matches!(error, ApiError::Fetch(ref message) if message.contains("404")));
    assert_eq!(client.api().cooldown().installs(), 0);
    missing.assert_async().await;
}

#[tokio::test]
async fn test_persistent_throttling_gives_up_after_six_attempts() {
    let mut server = Server::new_async().await;
    let throttled = server
        .mock("GET", "/repos/octo/site/contents/busy.md")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("slow down")
        .expect(6)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client.file_info("busy.md", "main").await.unwrap_err();

    assert!(matches!(error, ApiError::Throttled { .. }));
    assert_eq!(error.to_string(), "slow down");
    assert_eq!(client.api().cooldown().installs(), 5);
    throttled.assert_async().await;
}

#[tokio::test]
async fn test_preview_status_lookup() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octo/site/commits/cms/posts/hello/statuses")
        .with_status(200)
        .with_body(
            serde_json::json!([
                {"context": "ci/tests", "target_url": null, "state": "success"},
                {"context": "deploy/netlify", "target_url": "https://preview.example.com", "state": "success"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let status = client
        .preview_status("cms/posts/hello", "deploy/netlify")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(status.state, PreviewState::Success);
    assert_eq!(status.target_url.as_deref(), Some("https://preview.example.com"));
    assert!(client
        .preview_status("cms/posts/hello", "deploy/vercel")
        .await
        .unwrap()
        .is_none());
}
