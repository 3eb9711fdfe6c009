//! Baseline loading against a local HTTP server and the filesystem.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use baseline_client::{BaselineError, BaselineSource, FileBaseline, HttpBaseline};
use url::Url;

const STORIES: &str = r#"[
    {"id": 1, "title": "Harbor lights", "location": "Duluth", "latitude": 46.7867,
     "longitude": -92.1005, "content": "Dusk on the lake.", "tags": ["lake"],
     "author": "Ada", "date": "2024-01-01"}
]"#;

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route("/stories.json", get(|| async { STORIES }))
        .route(
            "/missing.json",
            get(|| async { (StatusCode::NOT_FOUND, "not found") }),
        )
        .route("/garbage.json", get(|| async { "<html>oops</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn url(addr: SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{addr}{path}")).unwrap()
}

#[tokio::test]
async fn http_baseline_loads_stories() {
    let addr = serve().await;
    let stories = HttpBaseline::new(url(addr, "/stories.json")).load().await;

    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].title.as_deref(), Some("Harbor lights"));
    assert_eq!(stories[0].tags, vec!["lake"]);
}

#[tokio::test]
async fn non_success_status_is_reported_by_fetch() {
    let addr = serve().await;
    let err = HttpBaseline::new(url(addr, "/missing.json"))
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, BaselineError::Http { status: 404, .. }));
}

#[tokio::test]
async fn non_success_status_loads_empty() {
    let addr = serve().await;
    assert!(HttpBaseline::new(url(addr, "/missing.json")).load().await.is_empty());
}

#[tokio::test]
async fn unparseable_body_loads_empty() {
    let addr = serve().await;
    assert!(HttpBaseline::new(url(addr, "/garbage.json")).load().await.is_empty());
}

#[tokio::test]
async fn unreachable_host_loads_empty() {
    // Bind then drop to get a port nobody is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    assert!(HttpBaseline::new(url(addr, "/stories.json")).load().await.is_empty());
}

#[tokio::test]
async fn file_baseline_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stories.json");
    std::fs::write(&path, STORIES).unwrap();

    let stories = FileBaseline::new(&path).load().await;
    assert_eq!(stories.len(), 1);
}

#[tokio::test]
async fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(FileBaseline::new(dir.path().join("nope.json")).load().await.is_empty());
}
