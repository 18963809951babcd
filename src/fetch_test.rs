use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;

use super::*;

// =========================================================================
// Helpers
// =========================================================================

fn png_bytes() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::new(2, 2).write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Answers each URL after `delay_ms`, failing those listed in `failing`.
struct MockFetcher {
    failing: Vec<&'static str>,
    delays_ms: HashMap<&'static str, u64>,
}

impl MockFetcher {
    fn new(failing: Vec<&'static str>) -> Self {
        Self { failing, delays_ms: HashMap::new() }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<RawImage, FetchError> {
        if let Some(ms) = self.delays_ms.get(url) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.failing.contains(&url) {
            return Err(FetchError::Status { url: url.to_owned(), status: 502 });
        }
        Ok(RawImage::new("image/png", url.as_bytes().to_vec()))
    }
}

struct PanickingFetcher;

#[async_trait::async_trait]
impl ImageFetcher for PanickingFetcher {
    async fn fetch(&self, url: &str) -> Result<RawImage, FetchError> {
        panic!("fetcher blew up on {url}");
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| (*u).to_owned()).collect()
}

// =========================================================================
// fetch_all
// =========================================================================

#[tokio::test]
async fn one_failure_keeps_its_slot_and_the_rest() {
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(MockFetcher::new(vec!["b"]));
    let results = fetch_all(fetcher, urls(&["a", "b", "c"])).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(results[1], Err(FetchError::Status { url: "b".into(), status: 502 }));
    let ok: Vec<Vec<u8>> = canvas::ingest::surviving(results).into_iter().map(|r| r.bytes).collect();
    assert_eq!(ok, vec![b"a".to_vec(), b"c".to_vec()]);
}

#[tokio::test]
async fn results_follow_input_order_not_completion_order() {
    let mut mock = MockFetcher::new(vec![]);
    mock.delays_ms.insert("slow", 40);
    mock.delays_ms.insert("medium", 20);
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(mock);

    let results = fetch_all(fetcher, urls(&["slow", "medium", "fast"])).await.unwrap();
    let order: Vec<Vec<u8>> = results.into_iter().map(|r| r.unwrap().bytes).collect();
    assert_eq!(order, vec![b"slow".to_vec(), b"medium".to_vec(), b"fast".to_vec()]);
}

#[tokio::test]
async fn empty_batch_is_empty() {
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(MockFetcher::new(vec![]));
    assert!(fetch_all(fetcher, Vec::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn panicking_task_aborts_batch() {
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(PanickingFetcher);
    let err = fetch_all(fetcher, urls(&["a"])).await.unwrap_err();
    assert!(matches!(err, BatchFetchError::Aborted(_)));
    assert!(err.retryable());
}

// =========================================================================
// ProxyFetcher
// =========================================================================

async fn proxy(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Vec<u8>) {
    match params.get("url").map(String::as_str) {
        Some("https://img.test/a.png") => (StatusCode::OK, png_bytes()),
        Some("https://img.test/page.html") => (StatusCode::OK, b"<html></html>".to_vec()),
        _ => (StatusCode::NOT_FOUND, Vec::new()),
    }
}

async fn spawn_proxy() -> ProxyFetcher {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().route("/fetch-image", get(proxy))).await.unwrap();
    });
    ProxyFetcher::with_client(reqwest::Client::new(), format!("http://{addr}/fetch-image"))
}

#[tokio::test]
async fn proxy_returns_sniffed_image() {
    let fetcher = spawn_proxy().await;
    let raw = fetcher.fetch("https://img.test/a.png").await.unwrap();
    assert_eq!(raw.mime, "image/png");
    assert_eq!(raw.bytes, png_bytes());
}

#[tokio::test]
async fn proxy_error_status_is_fetch_failure() {
    let fetcher = spawn_proxy().await;
    let err = fetcher.fetch("https://img.test/missing.png").await.unwrap_err();
    assert_eq!(err, FetchError::Status { url: "https://img.test/missing.png".into(), status: 404 });
    assert!(!err.retryable());
}

#[tokio::test]
async fn non_image_body_is_fetch_failure() {
    let fetcher = spawn_proxy().await;
    let err = fetcher.fetch("https://img.test/page.html").await.unwrap_err();
    assert_eq!(err, FetchError::NotAnImage { url: "https://img.test/page.html".into() });
}

#[test]
fn sniff_recognizes_png_and_rejects_text() {
    assert_eq!(sniff_mime(&png_bytes()), Some("image/png"));
    assert_eq!(sniff_mime(b"hello"), None);
}
