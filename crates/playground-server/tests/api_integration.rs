//! Server API Integration Tests
//!
//! Spins up a real Axum server on an ephemeral port and tests with reqwest over HTTP.
//! Exercises the full middleware stack (tracing, timeout, concurrency limit).

use playground_server::{build_router, AppState, PathResolver};
use tempfile::TempDir;

/// Lay out a small public directory with a secret sitting next to it.
fn make_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let public = tmp.path().join("public");
    std::fs::create_dir_all(public.join("data")).unwrap();
    std::fs::write(public.join("index.html"), "<!doctype html><title>Agent Playground</title>").unwrap();
    std::fs::write(public.join("styles.css"), "body { margin: 0; }").unwrap();
    std::fs::write(public.join("app.js"), "console.log('ready');").unwrap();
    std::fs::write(
        public.join("data/agents.json"),
        r##"[{"id":"a1","name":"Planner","role":"Strategy","color":"#4f7cff","suggestion":"Plan."}]"##,
    )
    .unwrap();
    std::fs::write(tmp.path().join("secret.txt"), "top secret").unwrap();
    tmp
}

/// Start an Axum server on an ephemeral port and return the base URL.
async fn start_server(tmp: &TempDir) -> String {
    let resolver = PathResolver::new(tmp.path().join("public"), "index.html").unwrap();
    let app = build_router(AppState::new(resolver));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

/// Send a raw request line so the path reaches the server unnormalized.
async fn raw_get(base: &str, path: &str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let addr = base.trim_start_matches("http://");
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_health_endpoint() {
    let tmp = make_site();
    let base = start_server(&tmp).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

    let resp = client.get(format!("{}/health/live", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_serves_index_at_root() {
    let tmp = make_site();
    let base = start_server(&tmp).await;

    let resp = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "text/html; charset=utf-8"
    );
    assert!(resp.text().await.unwrap().contains("Agent Playground"));
}

#[tokio::test]
async fn test_content_types() {
    let tmp = make_site();
    let base = start_server(&tmp).await;
    let client = reqwest::Client::new();

    for (path, expected) in [
        ("/styles.css?v=2", "text/css; charset=utf-8"),
        ("/app.js", "application/javascript; charset=utf-8"),
        ("/data/agents.json", "application/json; charset=utf-8"),
    ] {
        let resp = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "{}", path);
        assert_eq!(resp.headers()["content-type"].to_str().unwrap(), expected);
    }
}

#[tokio::test]
async fn test_agents_json_round_trip() {
    let tmp = make_site();
    let base = start_server(&tmp).await;

    let resp = reqwest::get(format!("{}/data/agents.json", base)).await.unwrap();
    let agents: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(agents[0]["id"], "a1");
}

#[tokio::test]
async fn test_missing_file_404() {
    let tmp = make_site();
    let base = start_server(&tmp).await;

    let resp = reqwest::get(format!("{}/assets/missing.png", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(resp.text().await.unwrap(), "404 Not Found");
}

#[tokio::test]
async fn test_encoded_traversal_403() {
    // The client would collapse a bare `%2e%2e` segment, so keep the slash encoded too.
    let tmp = make_site();
    let base = start_server(&tmp).await;

    let resp = reqwest::get(format!("{}/%2e%2e%2fsecret.txt", base)).await.unwrap();
    assert_eq!(resp.status(), 403);
    let body = resp.text().await.unwrap();
    assert_eq!(body, "403 Forbidden");
}

#[tokio::test]
async fn test_raw_traversal_never_leaks() {
    let tmp = make_site();
    let base = start_server(&tmp).await;

    for path in ["/../secret.txt", "/../../etc/passwd", "/data/../../secret.txt"] {
        let response = raw_get(&base, path).await;
        assert!(response.starts_with("HTTP/1.1 403"), "{}: {}", path, response);
        assert!(!response.contains("top secret"));
    }
}

#[tokio::test]
async fn test_head_requests() {
    let tmp = make_site();
    let base = start_server(&tmp).await;
    let client = reqwest::Client::new();

    let resp = client.head(format!("{}/", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "text/html; charset=utf-8"
    );
    assert!(resp.bytes().await.unwrap().is_empty());

    let resp = client
        .head(format!("{}/%2e%2e%2fsecret.txt", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_get_405() {
    let tmp = make_site();
    let base = start_server(&tmp).await;
    let client = reqwest::Client::new();

    let resp = client.post(format!("{}/index.html", base)).send().await.unwrap();
    assert_eq!(resp.status(), 405);
    let resp = client.delete(format!("{}/", base)).send().await.unwrap();
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn test_concurrent_requests() {
    let tmp = make_site();
    let base = start_server(&tmp).await;
    let client = reqwest::Client::new();

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = if i % 2 == 0 {
            format!("{}/styles.css", base)
        } else {
            format!("{}/%2e%2e%2fsecret.txt", base)
        };
        handles.push(tokio::spawn(async move {
            client.get(url).send().await.unwrap().status().as_u16()
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        let status = handle.await.unwrap();
        assert_eq!(status, if i % 2 == 0 { 200 } else { 403 });
    }
}
