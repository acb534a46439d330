//! Request classification, static serving and lifecycle over a real socket.

use std::fs;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_preflight_never_reaches_upstream() {
    let bundle = common::spa_bundle();
    let (upstream, mut requests) =
        common::start_recording_backend(common::raw_response("200 OK", &[], b"")).await;
    let proxy = common::start_proxy(common::proxy_config(upstream, bundle.path())).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, proxy.url("/api/login"))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers().clone();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization, X-Session-Id, X-Username"
    );
    assert_eq!(headers["access-control-max-age"], "86400");
    assert!(res.bytes().await.unwrap().is_empty());

    let forwarded = tokio::time::timeout(Duration::from_millis(200), requests.recv()).await;
    assert!(forwarded.is_err(), "Preflight must be answered locally");
}

#[tokio::test]
async fn test_health_any_method() {
    let bundle = common::spa_bundle();
    let proxy = common::start_proxy(common::proxy_config(
        common::unused_addr().await,
        bundle.path(),
    ))
    .await;
    let client = common::client();

    for res in [
        client.get(proxy.url("/health")).send().await.unwrap(),
        client.post(proxy.url("/health")).send().await.unwrap(),
    ] {
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["proxy"], "running");
        assert!(body["timestamp"].as_u64().unwrap() > 0);
    }
}

#[tokio::test]
async fn test_root_matches_index() {
    let bundle = common::spa_bundle();
    let proxy = common::start_proxy(common::proxy_config(
        common::unused_addr().await,
        bundle.path(),
    ))
    .await;
    let client = common::client();

    let root = client.get(proxy.url("/")).send().await.unwrap();
    assert_eq!(root.headers()["content-type"], "text/html");
    assert_eq!(root.headers()["cache-control"], "no-cache");
    let root = root.text().await.unwrap();

    let index = client.get(proxy.url("/index.html")).send().await.unwrap();
    assert_eq!(index.text().await.unwrap(), root);
}

#[tokio::test]
async fn test_assets_and_deep_links() {
    let bundle = common::spa_bundle();
    let proxy = common::start_proxy(common::proxy_config(
        common::unused_addr().await,
        bundle.path(),
    ))
    .await;
    let client = common::client();

    let js = client.get(proxy.url("/app.js")).send().await.unwrap();
    assert_eq!(js.status(), StatusCode::OK);
    assert_eq!(js.headers()["content-type"], "application/javascript");
    assert_eq!(
        js.headers()["cache-control"],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(js.text().await.unwrap(), common::APP_JS);

    let deep = client
        .get(proxy.url("/some/unknown/deep-link"))
        .send()
        .await
        .unwrap();
    assert_eq!(deep.status(), StatusCode::OK);
    assert_eq!(deep.headers()["cache-control"], "no-cache");
    assert_eq!(deep.text().await.unwrap(), common::INDEX_HTML);

    let head = client.head(proxy.url("/app.js")).send().await.unwrap();
    assert_eq!(head.status(), StatusCode::OK);
    assert_eq!(head.headers()["content-type"], "application/javascript");
    assert!(head.bytes().await.unwrap().is_empty());

    let put = client.put(proxy.url("/app.js")).send().await.unwrap();
    assert_eq!(put.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(put.headers()["allow"], "GET, HEAD");
}

#[tokio::test]
async fn test_missing_index_is_404() {
    let bundle = tempfile::tempdir().unwrap();
    fs::write(bundle.path().join("app.js"), common::APP_JS).unwrap();
    let proxy = common::start_proxy(common::proxy_config(
        common::unused_addr().await,
        bundle.path(),
    ))
    .await;

    let res = common::client()
        .get(proxy.url("/missing.png"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_debug_endpoint_is_opt_in() {
    let bundle = common::spa_bundle();
    let upstream = common::unused_addr().await;

    let hidden = common::start_proxy(common::proxy_config(upstream, bundle.path())).await;
    let res = common::client().get(hidden.url("/debug")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), common::INDEX_HTML);

    let mut config = common::proxy_config(upstream, bundle.path());
    config.debug.enabled = true;
    let visible = common::start_proxy(config).await;
    let res = common::client().get(visible.url("/debug")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["upstream_url"], format!("http://{upstream}"));
    assert_eq!(body["api_prefix"], "/api/");
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let bundle = common::spa_bundle();
    let proxy = common::start_proxy(common::proxy_config(
        common::unused_addr().await,
        bundle.path(),
    ))
    .await;

    let res = common::client().get(proxy.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(proxy.shutdown.trigger(), 1);
    let result = tokio::time::timeout(Duration::from_secs(5), proxy.handle)
        .await
        .expect("Server should stop after shutdown")
        .unwrap();
    assert!(result.is_ok());
}
