#[path = "../support/mod.rs"]
mod support;

use actix_web::{web, App, HttpResponse};
use std::time::Duration;

use support::{split_every, sse, start_relay, start_silent_server, Reply};
use support_relay::entities::{Message, Role};
use support_relay::middleware::{error_handler, Cors};
use support_relay::routes::configure;
use support_relay::service::client::{ClientError, SupportChatClient, TurnEvent};
use support_relay::service::relay::{GatewayClient, SYSTEM_PROMPT};
use support_relay::utils::config::RelayConfig;

#[derive(Debug, PartialEq)]
enum Observed {
    Opened,
    Delta(String, String),
}

async fn run_turn(
    client: &SupportChatClient,
    history: Vec<Message>,
) -> (Result<String, ClientError>, Vec<Observed>) {
    let mut events = Vec::new();
    let result = client
        .stream_turn(history, |event| match event {
            TurnEvent::Opened => events.push(Observed::Opened),
            TurnEvent::Delta { fragment, content } => {
                events.push(Observed::Delta(fragment.to_string(), content.to_string()))
            }
        })
        .await;
    (result, events)
}

#[actix_web::test]
async fn test_stream_turn_reassembles_split_chunks() {
    let body = sse(&["Hel", "lo ", "wör", "ld 🚀"]);
    let relay = start_relay(vec![Reply::Stream(split_every(&body, 5))]);
    let client = SupportChatClient::new(relay.url()).unwrap();

    let (result, events) = run_turn(&client, vec![Message::user("hi")]).await;

    assert_eq!(result.unwrap(), "Hello wörld 🚀");
    assert_eq!(
        events,
        vec![
            Observed::Opened,
            Observed::Delta("Hel".into(), "Hel".into()),
            Observed::Delta("lo ".into(), "Hello ".into()),
            Observed::Delta("wör".into(), "Hello wör".into()),
            Observed::Delta("ld 🚀".into(), "Hello wörld 🚀".into()),
        ]
    );
}

#[actix_web::test]
async fn test_stream_turn_sends_history_and_token() {
    let relay = start_relay(vec![Reply::Stream(vec![sse(&["ok"])])]);
    let client = SupportChatClient::new(relay.url()).unwrap().with_access_token("session-token");

    let history = vec![
        Message::user("Foot switch not working"),
        Message::assistant("Reconnect it and enable it in settings."),
        Message::user("Still nothing"),
    ];
    let (result, _) = run_turn(&client, history.clone()).await;
    assert_eq!(result.unwrap(), "ok");

    let (auth, request) = relay.seen.request(0);
    assert_eq!(auth.as_deref(), Some("Bearer session-token"));
    assert_eq!(request.messages, history);
    assert!(request.messages.iter().all(|m| m.role != Role::System));
}

#[actix_web::test]
async fn test_rate_limit_never_reaches_stream_parsing() {
    let relay = start_relay(vec![Reply::Status(
        429,
        "{\"error\":\"Rate limits exceeded, please try again later.\"}",
    )]);
    let client = SupportChatClient::new(relay.url()).unwrap();

    let (result, events) = run_turn(&client, vec![Message::user("hi")]).await;

    assert!(matches!(result, Err(ClientError::RateLimited)));
    assert!(events.is_empty());
}

#[actix_web::test]
async fn test_payment_required_never_reaches_stream_parsing() {
    let relay = start_relay(vec![Reply::Status(402, "{\"error\":\"Payment required\"}")]);
    let client = SupportChatClient::new(relay.url()).unwrap();

    let (result, events) = run_turn(&client, vec![Message::user("hi")]).await;

    assert!(matches!(result, Err(ClientError::QuotaExhausted)));
    assert!(events.is_empty());
}

#[actix_web::test]
async fn test_other_status_is_reported() {
    let relay = start_relay(vec![Reply::Status(500, "{\"error\":\"AI gateway error\"}")]);
    let client = SupportChatClient::new(relay.url()).unwrap();

    let (result, events) = run_turn(&client, vec![Message::user("hi")]).await;

    assert!(matches!(result, Err(ClientError::Status(500))));
    assert!(events.is_empty());
}

#[actix_web::test]
async fn test_idle_stream_times_out() {
    let relay = start_relay(vec![Reply::StreamThenHang(vec![
        b"data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n\n".to_vec(),
    ])]);
    let client = SupportChatClient::new(relay.url())
        .unwrap()
        .with_idle_timeout(Duration::from_millis(300));

    let (result, events) = run_turn(&client, vec![Message::user("hi")]).await;

    assert!(matches!(result, Err(ClientError::Timeout(_))));
    assert_eq!(events.last(), Some(&Observed::Delta("partial".into(), "partial".into())));
}

#[actix_web::test]
async fn test_client_through_relay_to_gateway() {
    let upstream = actix_test::start(|| {
        App::new().route(
            "/v1/chat/completions",
            web::post().to(|| async {
                HttpResponse::Ok().content_type("text/event-stream").body(
                    "data: {\"choices\":[{\"delta\":{\"content\":\"Turn off until \"}}]}\n\n\
                     data: {\"choices\":[{\"delta\":{\"content\":\"it reaches 30°C.\"}}]}\n\n\
                     data: [DONE]\n\n",
                )
            }),
        )
    });
    let config = RelayConfig {
        gateway_url: upstream.url("/v1/chat/completions"),
        ..RelayConfig::default()
    };
    let gateway = web::Data::new(
        GatewayClient::new(&config, Some("test-key".to_string()), SYSTEM_PROMPT.to_string())
            .unwrap(),
    );
    let relay_path = config.path.clone();
    let relay = actix_test::start(move || {
        let relay_path = relay_path.clone();
        App::new()
            .app_data(gateway.clone())
            .wrap(error_handler())
            .wrap(Cors::permissive())
            .configure(|cfg| configure(cfg, &relay_path))
    });

    let client = SupportChatClient::new(relay.url(&config.path)).unwrap();
    let (result, events) = run_turn(&client, vec![Message::user("Temperature too high")]).await;

    assert_eq!(result.unwrap(), "Turn off until it reaches 30°C.");
    assert_eq!(events.first(), Some(&Observed::Opened));
    assert_eq!(events.len(), 3);
}

#[actix_web::test]
async fn test_status_checks_use_status_code_only() {
    // a 429 with an event-stream body must still be treated as a rate limit
    let relay = start_relay(vec![Reply::Status(429, "data: [DONE]\n\n")]);
    let client = SupportChatClient::new(relay.url()).unwrap();

    let (result, _) = run_turn(&client, vec![Message::user("hi")]).await;
    assert!(matches!(result, Err(ClientError::RateLimited)));
}

#[actix_web::test]
async fn test_silent_relay_times_out_waiting_for_headers() {
    let base = start_silent_server().await;
    let client = SupportChatClient::new(format!("{}/functions/v1/support-chat", base))
        .unwrap()
        .with_idle_timeout(Duration::from_millis(300));

    let (result, events) = tokio::time::timeout(
        Duration::from_secs(5),
        run_turn(&client, vec![Message::user("hi")]),
    )
    .await
    .expect("stream_turn kept waiting past the idle timeout");

    assert!(matches!(result, Err(ClientError::Timeout(_))));
    assert!(events.is_empty());
}
