//! Pull/push scenarios against an in-process dashboard server.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use exchange_dashboard_state::{
    DashboardState, PriceSample, ScheduleAggregate, ScheduleInterval, SequentialIdGenerator,
    SyncClient, SyncConfig,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Received {
    body: Arc<Mutex<Option<Value>>>,
    content_type: Arc<Mutex<Option<String>>>,
}

fn server_state() -> Value {
    json!({
        "dollar_model": {
            "current_price": { "price": 100, "timestamp": 5 },
            "historic_prices": [
                { "price": 90, "timestamp": 3 },
                { "price": 95, "timestamp": 9 }
            ]
        },
        "bot_model": {
            "disabled": false,
            "onTime": true,
            "onChange": false,
            "interval": { "unit": "Min", "value": 2 }
        },
        "currency_model": {
            "selected_currencies": ["TRY", "EUR"],
            "currency_rates": [
                { "currencyCode": "TRY", "alias_name": "t", "rate": 19, "has_manual_rate": false, "manual_rate": 0, "adjustment": 0 },
                { "currencyCode": "EUR", "alias_name": "e", "rate": 1, "has_manual_rate": false, "manual_rate": 0, "adjustment": 0 }
            ]
        }
    })
}

async fn send_state(
    State(received): State<Received>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    *received.content_type.lock().unwrap() = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    *received.body.lock().unwrap() = Some(body);
    StatusCode::OK
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn unused_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> SyncClient {
    let state = Arc::new(DashboardState::with_id_generator(Arc::new(
        SequentialIdGenerator::new("rate"),
    )));
    state.start_updating_app_state();
    SyncClient::new(&SyncConfig::new(base_url), state).unwrap()
}

#[tokio::test]
async fn pull_adapts_and_replaces_all_stores() {
    let router = Router::new().route("/api/get_state", get(|| async { Json(server_state()) }));
    let client = client_for(&spawn_server(router).await);

    let raw = client.reload_state_from_server().await.unwrap();

    assert_eq!(raw, server_state());
    let state = client.state();
    assert_eq!(
        state.dollar_store().current().historic_prices,
        vec![
            PriceSample::new(dec!(95), 9),
            PriceSample::new(dec!(90), 3)
        ]
    );
    let codes: Vec<String> = state
        .currency_store()
        .current()
        .currency_rates
        .iter()
        .map(|rate| rate.currency_code.clone())
        .collect();
    assert_eq!(codes, vec!["EUR", "TRY"]);
    assert!(state.bot_store().current().on_time);
}

#[tokio::test]
async fn pull_with_error_status_still_applies_body() {
    let router = Router::new().route(
        "/api/get_state",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(server_state())) }),
    );
    let client = client_for(&spawn_server(router).await);

    let raw = client.reload_state_from_server().await.unwrap();

    assert_eq!(raw, server_state());
    assert_eq!(
        client.state().dollar_store().current().current_price,
        PriceSample::new(dec!(100), 5)
    );
}

#[tokio::test]
async fn pull_with_non_json_body_fails_and_leaves_stores() {
    let router = Router::new().route(
        "/api/get_state",
        get(|| async { "<html>maintenance</html>".into_response() }),
    );
    let client = client_for(&spawn_server(router).await);
    let state = client.state();
    let dollar_before = state.dollar_store().current();
    let currency_before = state.currency_store().current();
    let bot_before = state.bot_store().current();

    let err = client.reload_state_from_server().await.unwrap_err();

    assert!(err.is_decode());
    assert!(Arc::ptr_eq(&dollar_before, &state.dollar_store().current()));
    assert!(Arc::ptr_eq(&currency_before, &state.currency_store().current()));
    assert!(Arc::ptr_eq(&bot_before, &state.bot_store().current()));
}

#[tokio::test]
async fn pull_with_wrong_shape_fails_and_leaves_stores() {
    let router = Router::new().route(
        "/api/get_state",
        get(|| async { Json(json!({ "dollar_model": null })) }),
    );
    let client = client_for(&spawn_server(router).await);
    let dollar_before = client.state().dollar_store().current();

    let err = client.reload_state_from_server().await.unwrap_err();

    assert!(err.is_decode());
    assert!(Arc::ptr_eq(
        &dollar_before,
        &client.state().dollar_store().current()
    ));
}

#[tokio::test]
async fn pull_transport_failure_is_returned() {
    let client = client_for(&unused_address().await);

    let err = client.reload_state_from_server().await.unwrap_err();

    assert!(!err.is_decode());
}

#[tokio::test]
async fn push_sends_mirrored_state_after_schedule_change() {
    let received = Received::default();
    let router = Router::new()
        .route("/api/send_state", post(send_state))
        .with_state(received.clone());
    let client = client_for(&spawn_server(router).await);
    let state = client.state();
    let dollar_before = serde_json::to_value(&*state.dollar_store().current()).unwrap();
    let currency_before = serde_json::to_value(&*state.currency_store().current()).unwrap();

    state.bot_store().replace(ScheduleAggregate {
        disabled: true,
        on_time: false,
        on_change: true,
        interval: ScheduleInterval::new("Hour", dec!(3)),
    });
    client.send_state_to_server().await;

    let body = received.body.lock().unwrap().clone().unwrap();
    assert_eq!(
        body["bot_model"],
        json!({
            "disabled": true,
            "onTime": false,
            "onChange": true,
            "interval": { "unit": "Hour", "value": 3.0 }
        })
    );
    assert_eq!(body["dollar_model"], dollar_before);
    assert_eq!(body["currency_model"], currency_before);
    assert_eq!(
        received.content_type.lock().unwrap().as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn push_round_trips_through_pull_shape() {
    let received = Received::default();
    let router = Router::new()
        .route("/api/get_state", get(|| async { Json(server_state()) }))
        .route("/api/send_state", post(send_state))
        .with_state(received.clone());
    let client = client_for(&spawn_server(router).await);

    client.reload_state_from_server().await.unwrap();
    client.send_state_to_server().await;

    let body = received.body.lock().unwrap().clone().unwrap();
    let rates = body["currency_model"]["currency_rates"].as_array().unwrap();
    assert_eq!(rates[0]["currencyCode"], "EUR");
    assert_eq!(rates[0]["alias_name"], "e");
    assert!(rates[0]["uid"].is_string());
    assert_eq!(
        body["currency_model"]["selected_currencies"],
        json!(["TRY", "EUR"])
    );
    assert_eq!(body["dollar_model"]["historic_prices"][0]["timestamp"], 9);
}

#[tokio::test]
async fn push_failure_is_swallowed() {
    let client = client_for(&unused_address().await);

    client.send_state_to_server().await;
}
