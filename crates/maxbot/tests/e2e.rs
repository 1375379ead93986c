// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests over real HTTP: the client polls a mock Bot API and the
//! webhook endpoint is served on a loopback socket.

use std::time::Duration;

use maxbot_client::MaxApi;
use maxbot_config::MaxbotConfig;
use maxbot_core::{Attachment, UpdateType};
use maxbot_ingest::{bind_webhook_listener, delivery_queue, serve_webhook};
use maxbot_test_utils::fixtures::{
    bot_started, image_attachment, message_created, message_created_with, unknown_update,
    update_list,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> MaxbotConfig {
    let mut config = MaxbotConfig::default();
    config.api.token = Some("e2e-token".into());
    config.api.base_url = server.uri();
    config.api.timeout_secs = 5;
    config.polling.pause_ms = 20;
    config
}

// ---- Long polling ----

#[tokio::test]
async fn test_polling_delivers_decoded_updates_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/updates"))
        .and(query_param("access_token", "e2e-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(update_list(
            vec![
                message_created_with(1, "photo", vec![image_attachment(42)]),
                unknown_update("dialog_muted"),
                bot_started(2, 3),
            ],
            Some(17),
        )))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/updates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(update_list(vec![], None)))
        .mount(&server)
        .await;

    let api = MaxApi::from_config(&config_for(&server)).unwrap();
    let cancel = CancellationToken::new();
    let (poller, mut stream) = api.start_polling(cancel.clone());

    let first = stream.recv().await.unwrap();
    assert_eq!(first.update_type(), UpdateType::MessageCreated);
    let message = first.message().unwrap();
    assert_eq!(message.body.text, "photo");
    assert!(matches!(
        &message.body.attachments[..],
        [Attachment::Image(image)] if image.payload.photo_id == 42
    ));

    // The unknown update is skipped; the next one keeps its position.
    let second = stream.recv().await.unwrap();
    assert_eq!(second.update_type(), UpdateType::BotStarted);

    cancel.cancel();
    poller.await.unwrap();
    assert!(stream.recv().await.is_none());

    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() >= 2);
    assert!(requests[0].url.query_pairs().all(|(k, _)| k != "marker"));
    assert!(
        requests[1]
            .url
            .query_pairs()
            .any(|(k, v)| k == "marker" && v == "17")
    );
    assert!(requests[0].url.query_pairs().any(|(k, v)| k == "v" && v == "1.2.5"));
}

#[tokio::test]
async fn test_polling_survives_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/updates"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/updates"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(update_list(vec![message_created(5, "after retry")], Some(2))),
        )
        .up_to_n_times(1)
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/updates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(update_list(vec![], None)))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.polling.initial_backoff_ms = 10;
    let api = MaxApi::from_config(&config).unwrap();
    let cancel = CancellationToken::new();
    let (poller, mut stream) = api.start_polling(cancel.clone());

    let update = tokio::time::timeout(Duration::from_secs(5), stream.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(update.message().unwrap().body.text, "after retry");

    cancel.cancel();
    poller.await.unwrap();
}

// ---- Webhook ----

#[tokio::test]
async fn test_webhook_with_debug_forwarding() {
    let api_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(query_param("chat_id", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&api_server)
        .await;

    let mut config = config_for(&api_server);
    config.debug.enabled = true;
    config.debug.chat_id = Some(77);
    config.webhook.bind_address = "127.0.0.1".into();
    config.webhook.port = 0;
    let api = MaxApi::from_config(&config).unwrap();

    let (sender, mut stream) = delivery_queue(api.queue_capacity());
    let listener = bind_webhook_listener(&config.webhook).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();
    let server = tokio::spawn(serve_webhook(
        listener,
        api.webhook_state(sender),
        cancel.clone(),
    ));

    let payload = message_created(8, "pushed").to_string();
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/"))
        .header("content-type", "application/json")
        .body(payload.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    drop(response);

    let update = stream.recv().await.unwrap();
    assert_eq!(update.debug_raw.as_deref(), Some(payload.as_str()));
    api.debugs().unwrap().send_update(&update).await.unwrap();

    cancel.cancel();
    server.await.unwrap().unwrap();
    assert!(stream.recv().await.is_none());
}

// ---- Subscriptions ----

#[tokio::test]
async fn test_subscription_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "subscriptions": [{"url": "https://bot.example/hook", "time": 3}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/subscriptions"))
        .and(query_param("url", "https://bot.example/hook"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .mount(&server)
        .await;

    let subscriptions = MaxApi::from_config(&config_for(&server))
        .unwrap()
        .subscriptions();
    assert!(subscriptions.subscribe("https://bot.example/hook", &[]).await.unwrap().success);
    let listed = subscriptions.list().await.unwrap();
    assert_eq!(listed[0].url, "https://bot.example/hook");
    assert!(subscriptions.unsubscribe("https://bot.example/hook").await.unwrap().success);
}
