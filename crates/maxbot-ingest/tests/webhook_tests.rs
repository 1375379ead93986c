// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook handler status codes and queue effects.

use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use maxbot_core::{Attachment, UpdateDecoder, UpdateType};
use maxbot_ingest::{UpdateStream, WebhookState, delivery_queue, serve_webhook, webhook_router};
use maxbot_test_utils::fixtures::{
    bot_started, message_created, photo_without_caption, unknown_update,
};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn router(capacity: usize) -> (axum::Router, UpdateStream) {
    let (sender, stream) = delivery_queue(capacity);
    (webhook_router(WebhookState::new(UpdateDecoder::default(), sender)), stream)
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn error_text(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn valid_update_is_enqueued_on_any_path() {
    let (app, mut stream) = router(4);
    for uri in ["/", "/bot/hook/42"] {
        let response = app
            .clone()
            .oneshot(post(uri, message_created(7, "pushed").to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let update = stream.recv().await.unwrap();
    assert_eq!(update.chat_id(), Some(7));
    assert_eq!(update.message().unwrap().body.text, "pushed");
    assert!(stream.recv().await.is_some());
}

#[tokio::test]
async fn captionless_photo_with_nulls_is_enqueued() {
    let (app, mut stream) = router(4);
    let response = app
        .oneshot(post("/", photo_without_caption(-70).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let update = stream.recv().await.unwrap();
    assert_eq!(update.chat_id(), Some(-70));
    let message = update.message().unwrap();
    assert_eq!(message.body.text, "");
    assert_eq!(message.sender.as_ref().unwrap().first_name, "Ann");
    assert!(matches!(&message.body.attachments[..], [Attachment::Image(_)]));
}

#[tokio::test]
async fn non_post_is_method_not_allowed() {
    let (app, mut stream) = router(4);
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST");
    assert!(stream.try_recv().is_none());
}

#[tokio::test]
async fn malformed_body_is_bad_request_and_not_enqueued() {
    let (app, mut stream) = router(4);
    let response = app.oneshot(post("/", "{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_text(response).await.contains("failed to decode update"));
    assert!(stream.try_recv().is_none());
}

#[tokio::test]
async fn unknown_update_type_is_bad_request() {
    let (app, mut stream) = router(4);
    let response = app
        .oneshot(post("/", unknown_update("dialog_cleared").to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        error_text(response)
            .await
            .contains("unknown update type: dialog_cleared")
    );
    assert!(stream.try_recv().is_none());
}

#[tokio::test]
async fn oversized_body_is_bad_request() {
    let (sender, mut stream) = delivery_queue(4);
    let app = webhook_router(
        WebhookState::new(UpdateDecoder::default(), sender).with_max_body_bytes(64),
    );
    let body = message_created(1, &"x".repeat(256)).to_string();
    let response = app.oneshot(post("/", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_text(response).await.contains("failed to read request body"));
    assert!(stream.try_recv().is_none());
}

#[tokio::test]
async fn full_queue_is_service_unavailable_without_blocking() {
    let (app, mut stream) = router(1);
    let first = app
        .clone()
        .oneshot(post("/", bot_started(1, 1).to_string()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = tokio::time::timeout(
        Duration::from_secs(1),
        app.oneshot(post("/", bot_started(2, 2).to_string())),
    )
    .await
    .expect("handler must not wait for capacity")
    .unwrap();
    assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(error_text(second).await.contains("full"));

    assert_eq!(stream.recv().await.unwrap().chat_id(), Some(1));
    assert!(stream.try_recv().is_none());
}

#[tokio::test]
async fn closed_queue_is_service_unavailable() {
    let (app, stream) = router(1);
    drop(stream);
    let response = app
        .oneshot(post("/", bot_started(1, 1).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(error_text(response).await.contains("closed"));
}

#[tokio::test]
async fn debug_decoder_keeps_raw_payload() {
    let (sender, mut stream) = delivery_queue(1);
    let app = webhook_router(WebhookState::new(UpdateDecoder::new(true), sender));
    let payload = bot_started(5, 6).to_string();
    let response = app.oneshot(post("/", payload.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let update = stream.recv().await.unwrap();
    assert_eq!(update.debug_raw.as_deref(), Some(payload.as_str()));
}

#[tokio::test]
async fn served_over_tcp_until_cancelled() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (sender, mut stream) = delivery_queue(4);
    let cancel = CancellationToken::new();
    let server = tokio::spawn(serve_webhook(
        listener,
        WebhookState::new(UpdateDecoder::default(), sender),
        cancel.clone(),
    ));

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/webhook"))
        .header("content-type", "application/json")
        .body(bot_started(9, 9).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    drop(response);
    assert_eq!(stream.recv().await.unwrap().update_type(), UpdateType::BotStarted);

    cancel.cancel();
    server.await.unwrap().unwrap();
    assert!(stream.recv().await.is_none());
}
