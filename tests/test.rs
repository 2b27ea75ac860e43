use axum::http::{
    header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
    StatusCode,
};
use visitor_counter::prelude::*;

mod example_app;
use example_app::app;

#[tokio::test]
async fn test() -> anyhow::Result<()> {
    let server = app(Arc::new(MemoryStore::new())).as_test_server();
    assert_eq!("", server.get("/status/liveness").await.text());
    let script = server.get("/counter.js").await;
    assert!(script.text().contains("/counts/increment"));
    assert!(script.headers()[CONTENT_TYPE]
        .to_str()?
        .contains("javascript"));
    assert!(server
        .get("/index.html")
        .await
        .text()
        .contains("id=\"visits\""));
    Ok(())
}

#[tokio::test]
async fn test_two_apps_in_one_process() -> anyhow::Result<()> {
    let first = app(Arc::new(MemoryStore::new())).as_test_server();
    let second = app(Arc::new(MemoryStore::with("count", "5"))).as_test_server();
    assert_eq!(first.get("/counts/get").await.json::<Count>().count, 0);
    assert_eq!(second.get("/counts/get").await.json::<Count>().count, 5);
    assert_eq!(
        first.get("/metrics/prometheus").await.status_code(),
        StatusCode::OK
    );
    Ok(())
}

#[tokio::test]
async fn test_counter_metrics() -> anyhow::Result<()> {
    let server = app(Arc::new(MemoryStore::new())).as_test_server();
    server.get("/counts/get").await;
    server.post("/counts/increment").await;
    let metrics = server.get("/metrics/prometheus").await.text();
    assert!(metrics.contains("counter_increments"));
    assert!(metrics.contains("counter_value"));
    assert!(metrics
        .lines()
        .any(|line| line.starts_with("axum_http_requests") && line.contains("/counts/increment")));
    assert!(metrics
        .lines()
        .any(|line| line.starts_with("axum_http_requests") && line.contains("/counts/get")));
    Ok(())
}

#[tokio::test]
async fn test_custom_routes_get_cors() -> anyhow::Result<()> {
    let server = App::new()
        .route("/", get(|| async { "OK" }))
        .as_test_server();
    let response = server.get("/").await;
    assert_eq!("OK", response.text());
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    Ok(())
}

#[tokio::test]
async fn test_custom_route_errors_are_json() -> anyhow::Result<()> {
    async fn broken() -> Result<&'static str, AppError> {
        Err(anyhow::anyhow!("connection refused by 10.0.0.7").into())
    }

    let server = App::new().route("/broken", get(broken)).as_test_server();
    let response = server.get("/broken").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), r#"{"error":"Internal Server Error"}"#);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    Ok(())
}
