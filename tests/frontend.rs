mod common;

use axum::http::{header, StatusCode};
use common::{memory_store, TestApp};

fn content_type(headers: &axum::http::HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_index_page_is_served() {
    let app = TestApp::new(memory_store(&[]), None);

    let (status, headers, body) = app.get_text("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type(&headers).starts_with("text/html"));
    assert!(body.contains(r#"<script src="/static/js/main.js"></script>"#));
    assert!(body.contains(r#"href="/static/css/style.css""#));
    assert!(body.contains(r#"id="chat-input""#));
}

#[tokio::test]
async fn test_index_page_fits_content_security_policy() {
    let app = TestApp::new(memory_store(&[]), None);

    let (_, headers, body) = app.get_text("/").await;

    let csp = headers[header::CONTENT_SECURITY_POLICY].to_str().unwrap();
    assert!(csp.contains("default-src 'self'"));
    // Only same-origin scripts and no inline script blocks.
    assert!(!body.contains("<script>"));
    assert!(!body.contains("http://") && !body.contains("https://"));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let app = TestApp::new(memory_store(&[]), None);

    let (status, headers, script) = app.get_text("/static/js/main.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type(&headers).contains("javascript"));
    for endpoint in ["'/api/events'", "/api/search?keyword=", "'/chat'"] {
        assert!(script.contains(endpoint), "main.js should call {}", endpoint);
    }
    // Errors arrive in the {"error": {"code", "message"}} envelope.
    assert!(script.contains("body.error.message"));
    assert!(!script.contains("data.detail"));

    let (status, headers, _) = app.get_text("/static/css/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type(&headers).starts_with("text/css"));
}

#[tokio::test]
async fn test_missing_static_asset_is_not_found() {
    let app = TestApp::new(memory_store(&[]), None);

    let (status, _, _) = app.get_text("/static/js/missing.js").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
