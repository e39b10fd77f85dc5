use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockConfig};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- success ---

#[tokio::test]
async fn latest_returns_requested_rate() {
    let resp = app()
        .oneshot(get("/v1/latest?apikey=test-key&base_currency=CAD&currencies=USD"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "data": { "USD": 0.74 } }));
}

#[tokio::test]
async fn latest_accepts_comma_separated_currencies() {
    let resp = app()
        .oneshot(get("/v1/latest?apikey=test-key&base_currency=USD&currencies=EUR,CAD"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["EUR"], 0.92);
    assert_eq!(body["data"]["CAD"], 1.35);
    assert_eq!(body["data"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn latest_without_currencies_returns_whole_row() {
    let resp = app()
        .oneshot(get("/v1/latest?apikey=test-key&base_currency=EUR"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["data"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_quoted_currency_is_left_out() {
    let resp = app()
        .oneshot(get("/v1/latest?apikey=test-key&base_currency=CAD&currencies=XYZ"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "data": {} }));
}

// --- failures ---

#[tokio::test]
async fn missing_api_key_returns_401() {
    let resp = app()
        .oneshot(get("/v1/latest?base_currency=CAD&currencies=USD"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_api_key_returns_401() {
    let resp = app()
        .oneshot(get("/v1/latest?apikey=nope&base_currency=CAD&currencies=USD"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_base_returns_422() {
    let resp = app()
        .oneshot(get("/v1/latest?apikey=test-key&base_currency=XYZ&currencies=USD"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn quota_exhaustion_returns_429() {
    let app = app_with(MockConfig {
        quota: Some(1),
        ..MockConfig::default()
    });
    let uri = "/v1/latest?apikey=test-key&base_currency=CAD&currencies=USD";

    let first = app.clone().oneshot(get(uri)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(get(uri)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn outage_returns_500() {
    let app = app_with(MockConfig {
        outage: true,
        ..MockConfig::default()
    });

    let resp = app
        .oneshot(get("/v1/latest?apikey=test-key&base_currency=CAD&currencies=USD"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/v2/latest")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}
