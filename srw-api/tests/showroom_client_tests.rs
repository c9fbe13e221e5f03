//! Upstream client tests against an in-process fake SHOWROOM server
//!
//! The fake binds to `127.0.0.1:0` and records the cookie header it receives.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use srw_api::services::waves::with_deadline;
use srw_api::services::{HttpImageEncoder, ShowroomClient};
use srw_api::types::{FetchError, ImageEncoder, PaidLiveHistorySource, RoomProfileSource};
use srw_common::config::UpstreamConfig;
use srw_common::RoomId;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Recorded {
    cookies: Arc<Mutex<Vec<String>>>,
}

#[derive(Deserialize)]
struct ProfileQuery {
    room_id: String,
}

async fn profile(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Query(query): Query<ProfileQuery>,
) -> impl IntoResponse {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    recorded.cookies.lock().unwrap().push(cookie);

    match query.room_id.as_str() {
        "404" => (StatusCode::NOT_FOUND, Json(json!({ "errors": [] }))).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({})).into_response()
        }
        "garbled" => "not json".into_response(),
        id => Json(json!({
            "room_id": id.parse::<u64>().unwrap_or(0),
            "image": "https://img.example/room.jpeg",
            "visit_count": 321,
            "follower_num": 9000,
        }))
        .into_response(),
    }
}

async fn history(State(recorded): State<Recorded>, headers: HeaderMap) -> impl IntoResponse {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    recorded.cookies.lock().unwrap().push(cookie.clone());

    if cookie.is_empty() {
        return (StatusCode::FORBIDDEN, "login required").into_response();
    }
    "<html><body><p class=\"pc-header-mypage-name\">Fan</p></body></html>".into_response()
}

async fn avatar() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G'])
}

async fn missing_image() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

/// Start the fake upstream, returning its base URL and the request recorder
async fn spawn_upstream() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/room/profile", get(profile))
        .route("/paid_live/hist", get(history))
        .route("/img/avatar.png", get(avatar))
        .route("/img/missing.png", get(missing_image))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorded)
}

fn upstream_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        base_url: base_url.to_string(),
        ..UpstreamConfig::default()
    }
}

#[tokio::test]
async fn test_profile_fetch_forwards_cookie() {
    let (base_url, recorded) = spawn_upstream().await;
    let client = ShowroomClient::new(&upstream_config(&base_url)).unwrap();

    let profile = client
        .fetch_profile(&RoomId::from("317727"), "sr_id=abc; f=1")
        .await
        .unwrap();

    assert_eq!(profile.room_id, Some(RoomId::from("317727")));
    assert_eq!(profile.visit_count, Some(321));
    assert_eq!(profile.image.as_deref(), Some("https://img.example/room.jpeg"));
    assert_eq!(*recorded.cookies.lock().unwrap(), vec!["sr_id=abc; f=1".to_string()]);
}

#[tokio::test]
async fn test_profile_error_status() {
    let (base_url, _) = spawn_upstream().await;
    let client = ShowroomClient::new(&upstream_config(&base_url)).unwrap();

    let result = client.fetch_profile(&RoomId::from("404"), "").await;

    assert!(matches!(result, Err(FetchError::Status(404))));
}

#[tokio::test]
async fn test_profile_garbled_body() {
    let (base_url, _) = spawn_upstream().await;
    let client = ShowroomClient::new(&upstream_config(&base_url)).unwrap();

    let result = client.fetch_profile(&RoomId::from("garbled"), "").await;

    assert!(matches!(result, Err(FetchError::Parse(_))));
}

#[tokio::test]
async fn test_profile_deadline() {
    let (base_url, _) = spawn_upstream().await;
    let client = ShowroomClient::new(&upstream_config(&base_url)).unwrap();
    let room = RoomId::from("slow");

    let result = with_deadline(
        Duration::from_millis(200),
        client.fetch_profile(&room, "sr_id=abc"),
    )
    .await;

    assert!(matches!(result, Err(FetchError::Timeout(_))));
}

#[tokio::test]
async fn test_history_page() {
    let (base_url, recorded) = spawn_upstream().await;
    let client = ShowroomClient::new(&upstream_config(&base_url)).unwrap();

    let html = client.fetch_history_page("sr_id=abc").await.unwrap();
    assert!(html.contains("pc-header-mypage-name"));

    let denied = client.fetch_history_page("").await;
    assert!(matches!(denied, Err(FetchError::Status(403))));

    assert_eq!(recorded.cookies.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_image_encoder_data_uri() {
    let (base_url, _) = spawn_upstream().await;
    let encoder = HttpImageEncoder::new(&upstream_config(&base_url)).unwrap();

    let uri = encoder
        .encode(&format!("{}/img/avatar.png", base_url))
        .await
        .unwrap();
    assert_eq!(uri, "data:image/png;base64,iVBORw==");

    let missing = encoder.encode(&format!("{}/img/missing.png", base_url)).await;
    assert!(matches!(missing, Err(FetchError::Image(_))));
}
