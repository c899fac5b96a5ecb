//! Fetch and fan-out behavior against local TCP servers
use std::sync::Arc;
use std::time::{Duration, Instant};

use rovat_core::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

/// Serves `connections` requests with a fixed status and body.
async fn serve(status: &'static str, body: String, connections: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for _ in 0..connections {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{addr}")
}

/// Accepts connections and never answers.
async fn serve_silently() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    format!("http://{addr}")
}

fn http_extractor(timeout: u64) -> Extractor {
    let config = ExtractorConfig::builder().timeout(timeout).build();
    let fetcher = HttpFetcher::new(&config.fetch).unwrap();
    Extractor::with_parts(config, Arc::new(fetcher), Arc::new(JunkClassifier::default()), Arc::new(SiteRules::new()))
}

#[tokio::test]
async fn test_http_fetcher_returns_status_and_body() {
    let base = serve("200 OK", "<html><body><p>Szia</p></body></html>".to_string(), 1).await;
    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();

    let response = fetcher.fetch(&format!("{base}/cikk")).await.unwrap();

    assert!(response.is_success());
    assert!(response.body.contains("Szia"));
}

#[tokio::test]
async fn test_http_fetcher_times_out() {
    let base = serve_silently().await;
    let fetcher = HttpFetcher::new(&FetchConfig { timeout: 1, ..FetchConfig::default() }).unwrap();

    let started = Instant::now();
    let result = fetcher.fetch(&format!("{base}/lassu")).await;

    assert!(matches!(result, Err(RovatError::Timeout { timeout: 1 })));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_extract_over_http() {
    let base = serve("200 OK", read_fixture("article_with_ad.html"), 1).await;

    let article = http_extractor(5).extract(&format!("{base}/gazdasag/alapkamat")).await;

    assert_eq!(article.title, "A jegybank változatlanul hagyta az alapkamatot");
    assert_eq!(article.paragraphs.len(), 4);
    assert_eq!(article.source_host(), "127.0.0.1");
}

#[tokio::test]
async fn test_extract_timeout_yields_empty_article() {
    let base = serve_silently().await;
    let url = format!("{base}/lassu");

    let article = http_extractor(1).extract(&url).await;

    assert_eq!(article, Article::empty(url));
}

#[tokio::test]
async fn test_extract_error_status_yields_empty_article() {
    let base = serve("404 Not Found", read_fixture("article_with_ad.html"), 1).await;
    let url = format!("{base}/nincs");

    let article = http_extractor(5).extract(&url).await;

    assert!(article.is_empty());
    assert_eq!(article.title, "");
}

#[tokio::test]
async fn test_extract_invalid_url_yields_empty_article() {
    let article = http_extractor(5).extract("nem-url").await;
    assert_eq!(article, Article::empty("nem-url"));
}

#[tokio::test]
async fn test_extract_all_mixed_batch() {
    let base = serve("200 OK", read_fixture("article_with_ad.html"), 2).await;
    let silent = serve_silently().await;
    let urls = vec![
        format!("{base}/egy"),
        format!("{silent}/lassu"),
        "ftp://pelda.hu/fajl".to_string(),
        format!("{base}/ketto"),
    ];

    let articles = http_extractor(1).extract_all(&urls).await;

    assert_eq!(articles.len(), 4);
    for (article, url) in articles.iter().zip(&urls) {
        assert_eq!(&article.url, url);
    }
    assert_eq!(articles[0].paragraphs.len(), 4);
    assert!(articles[1].is_empty());
    assert!(articles[2].is_empty());
    assert_eq!(articles[3].paragraphs.len(), 4);
}
