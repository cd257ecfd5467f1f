use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use nobel_hands::services::{http, spawn_services};
use nobel_hands::settings::Settings;

async fn app() -> Router {
    let settings = Settings::default_settings().unwrap();
    let state = spawn_services(&settings).await.unwrap();
    http::router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_check() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn content_lists_enabled_methods_and_presets() {
    let app = app().await;

    let (status, content) = send_json(&app, Method::GET, "/api/content", None).await;
    assert_eq!(status, StatusCode::OK);
    let presets: Vec<u64> = content["presets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|preset| preset["amount"].as_u64().unwrap())
        .collect();
    assert_eq!(presets, vec![2, 50, 100, 500]);
    assert_eq!(content["payment_methods"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_amount_is_rejected() {
    let app = app().await;

    let (status, error) = send_json(
        &app,
        Method::POST,
        "/api/donations",
        Some(json!({ "custom_amount": "0.5", "payment_method": "qr" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["title"], "Invalid Amount");
    assert_eq!(error["description"], "Please enter a valid donation amount");
}

#[tokio::test]
async fn non_positive_amounts_get_the_validation_alert() {
    let app = app().await;

    for body in [
        json!({ "preset_amount": -5 }),
        json!({ "preset_amount": 0 }),
        json!({ "custom_amount": -5 }),
        json!({ "custom_amount": "-5" }),
    ] {
        let (status, error) =
            send_json(&app, Method::POST, "/api/donations", Some(body.clone())).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body}");
        assert_eq!(error["title"], "Invalid Amount", "body {body}");
        assert_eq!(
            error["description"], "Please enter a valid donation amount",
            "body {body}"
        );
    }
}

#[tokio::test]
async fn malformed_donation_body_gets_an_error_body() {
    let app = app().await;

    let (status, error) = send_json(
        &app,
        Method::POST,
        "/api/donations",
        Some(json!({ "preset_amount": 100, "payment_method": "bitcoin" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["title"], "Invalid Request");
    assert!(error["description"].as_str().unwrap().contains("payment_method"));
}

#[tokio::test(start_paused = true)]
async fn recommended_amount_can_be_donated() {
    let app = app().await;

    let (_, profile) = send_json(&app, Method::GET, "/api/recommendation", None).await;
    let recommended = profile["recommended_amount"].as_u64().unwrap();

    for amount in [recommended, 250] {
        let (status, payment) = send_json(
            &app,
            Method::POST,
            "/api/donations",
            Some(json!({ "preset_amount": amount })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payment["amount"], amount as f64);
    }
}

#[tokio::test(start_paused = true)]
async fn qr_donation_runs_to_completion() {
    let app = app().await;

    let (status, payment) = send_json(
        &app,
        Method::POST,
        "/api/donations",
        Some(json!({ "preset_amount": 500, "donor_name": "Asha", "payment_method": "qr" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["step"], "form");
    assert_eq!(payment["amount"], 500.0);
    assert_eq!(payment["can_submit"], true);
    assert!(payment["payment_intent"]["link"]
        .as_str()
        .unwrap()
        .starts_with("upi://pay?pa=nobelhands@upi"));

    let id = payment["id"].as_str().unwrap().to_string();

    let (status, svg) = send(&app, Method::GET, &format!("/api/payments/{id}/qr"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(svg).unwrap().contains("<svg"));

    let (status, _) = send_json(&app, Method::GET, &format!("/api/payments/{id}/summary"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, payment) =
        send_json(&app, Method::POST, &format!("/api/payments/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(payment["step"], "processing");

    tokio::time::sleep(Duration::from_millis(2_600)).await;

    let (_, payment) = send_json(&app, Method::GET, &format!("/api/payments/{id}"), None).await;
    assert_eq!(payment["step"], "success");
    assert!(payment["transaction"]["id"].as_str().unwrap().starts_with("NH"));

    let (status, summary) =
        send_json(&app, Method::GET, &format!("/api/payments/{id}/summary"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["tier"], "family");
    assert_eq!(summary["people_helped"], 5);

    tokio::time::sleep(Duration::from_millis(3_000)).await;

    let (_, payment) = send_json(&app, Method::GET, &format!("/api/payments/{id}"), None).await;
    assert_eq!(payment["step"], "closed");
}

#[tokio::test]
async fn upi_payment_waits_for_an_id() {
    let app = app().await;

    let (_, payment) = send_json(
        &app,
        Method::POST,
        "/api/donations",
        Some(json!({ "preset_amount": 100, "payment_method": "upi" })),
    )
    .await;
    let id = payment["id"].as_str().unwrap().to_string();
    assert_eq!(payment["can_submit"], false);

    let (status, error) =
        send_json(&app, Method::POST, &format!("/api/payments/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["title"], "Payment Not Ready");

    let (status, payment) = send_json(
        &app,
        Method::PUT,
        &format!("/api/payments/{id}/details"),
        Some(json!({ "upi_id": "asha@okbank" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["can_submit"], true);
}

#[tokio::test]
async fn unknown_bank_is_rejected() {
    let app = app().await;

    let (_, payment) = send_json(
        &app,
        Method::POST,
        "/api/donations",
        Some(json!({ "preset_amount": 50, "payment_method": "netbanking" })),
    )
    .await;
    let id = payment["id"].as_str().unwrap().to_string();

    let (status, error) = send_json(
        &app,
        Method::PUT,
        &format!("/api/payments/{id}/details"),
        Some(json!({ "bank": "XYZ" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["title"], "Invalid Payment Details");
}

#[tokio::test]
async fn discarded_payment_is_gone() {
    let app = app().await;

    let (_, payment) = send_json(
        &app,
        Method::POST,
        "/api/donations",
        Some(json!({ "preset_amount": 2 })),
    )
    .await;
    let id = payment["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::DELETE, &format!("/api/payments/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) = send_json(&app, Method::GET, &format!("/api/payments/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["title"], "Not Found");
}

#[tokio::test(start_paused = true)]
async fn chat_keeps_a_transcript() {
    let app = app().await;

    let (status, exchange) = send_json(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({ "text": "Namaste!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exchange["message"]["sender"], "user");
    assert_eq!(exchange["reply"]["sender"], "ai");

    let conversation_id = exchange["conversation_id"].as_str().unwrap().to_string();
    let (status, transcript) =
        send_json(&app, Method::GET, &format!("/api/chat/{conversation_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transcript["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn blank_chat_message_is_rejected() {
    let app = app().await;

    let (status, error) =
        send_json(&app, Method::POST, "/api/chat", Some(json!({ "text": "  " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["title"], "Empty Message");
}

#[tokio::test(start_paused = true)]
async fn recommendation_is_one_of_the_profiles() {
    let app = app().await;

    let (status, profile) = send_json(&app, Method::GET, "/api/recommendation", None).await;
    assert_eq!(status, StatusCode::OK);
    let amount = profile["recommended_amount"].as_u64().unwrap();
    assert!([100, 50, 250, 500].contains(&amount));
}
