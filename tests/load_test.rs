//! Load testing for the gateway.

use std::time::{Duration, Instant};

mod common;

#[tokio::test]
async fn test_load_performance() {
    // 1. Setup mock upstream and bundle
    let upstream = common::start_json_backend(r#"{"sessions":[]}"#).await;
    let bundle = common::spa_bundle();

    // 2. Start gateway
    let proxy = common::start_proxy(common::proxy_config(upstream, bundle.path())).await;

    // 3. Run mixed API / static / health load
    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();
    let mut handles = Vec::with_capacity(concurrency);

    for task in 0..concurrency {
        let client = client.clone();
        let urls = [
            proxy.url("/api/sessions"),
            proxy.url("/app.js"),
            proxy.url(&format!("/chat/{task}")),
            proxy.url("/health"),
        ];
        handles.push(tokio::spawn(async move {
            let mut ok = 0;
            for i in 0..requests_per_task {
                let url = &urls[i % urls.len()];
                if let Ok(res) = client.get(url).send().await {
                    if res.status().is_success() && res.bytes().await.is_ok() {
                        ok += 1;
                    }
                }
            }
            ok
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        succeeded += handle.await.unwrap();
    }
    let elapsed = start.elapsed();

    println!(
        "{total_requests} requests in {:?} ({:.0} req/s)",
        elapsed,
        total_requests as f64 / elapsed.as_secs_f64()
    );

    assert_eq!(succeeded, total_requests, "All requests should succeed");
    assert!(elapsed < Duration::from_secs(30));
}
