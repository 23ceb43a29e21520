use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use math_core::time::fixed_clock;
use serde_json::{Value, json};
use storage::repository::InMemoryStore;
use tower::ServiceExt;

use server::{AppState, SessionLayer, build_app};

fn cookie_app() -> Router {
    build_app(AppState {
        sessions: SessionLayer::cookie(fixed_clock()),
        key: Key::derive_from(b"an integration test signing secret!!"),
    })
}

fn store_app() -> Router {
    build_app(AppState {
        sessions: SessionLayer::store(fixed_clock(), Arc::new(InMemoryStore::new())),
        key: Key::derive_from(b"an integration test signing secret!!"),
    })
}

/// Sends one request; returns status, the first `Set-Cookie` name=value pair
/// (attributes stripped), and the parsed JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_owned);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, set_cookie, json)
}

#[tokio::test]
async fn fresh_state_returns_defaults() {
    let app = cookie_app();
    let (status, _, body) = send(&app, "GET", "/api/state", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["state"]["totalStars"], json!(0));
    assert_eq!(body["state"]["numberPlaces"]["questionsAttempted"], json!(0));
    assert_eq!(body["state"]["practice"]["bestScore"], json!(0));
}

#[tokio::test]
async fn practice_record_round_trips_through_the_cookie() {
    let app = cookie_app();

    let (status, cookie, body) = send(
        &app,
        "POST",
        "/api/practice/record",
        None,
        Some(json!({"correct": 9, "total": 10, "type": "mixed"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["practice"]["totalSessions"], json!(1));
    assert_eq!(body["practice"]["totalProblems"], json!(10));
    assert_eq!(body["practice"]["totalCorrect"], json!(9));
    assert_eq!(body["practice"]["bestScore"], json!(90));
    assert_eq!(body["starsEarned"], json!(5));
    assert_eq!(body["totalStars"], json!(5));

    let cookie = cookie.expect("practice write should set the session cookie");
    let (_, _, body) = send(&app, "GET", "/api/state", Some(&cookie), None).await;
    assert_eq!(body["state"]["totalStars"], json!(5));
    assert_eq!(body["state"]["practice"]["bestScore"], json!(90));
}

#[tokio::test]
async fn module_progress_merges_and_returns_the_record() {
    let app = cookie_app();

    let (status, cookie, body) = send(
        &app,
        "POST",
        "/api/progress/multiplication",
        None,
        Some(json!({
            "questionsAttempted": 5,
            "questionsCorrect": 9,
            "tablesCompleted": [3, 3, 5]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["questionsAttempted"], json!(5));
    // correct is clamped to attempted, and the set drops the duplicate
    assert_eq!(body["data"]["questionsCorrect"], json!(5));
    assert_eq!(body["data"]["tablesCompleted"], json!([3, 5]));

    let cookie = cookie.unwrap();
    let (_, _, body) = send(&app, "GET", "/api/state", Some(&cookie), None).await;
    assert_eq!(body["state"]["multiplication"]["tablesCompleted"], json!([3, 5]));
}

#[tokio::test]
async fn unknown_module_is_rejected() {
    let app = cookie_app();
    let (status, _, body) = send(
        &app,
        "POST",
        "/api/progress/confetti",
        None,
        Some(json!({"questionsAttempted": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn state_merge_is_shallow_and_keeps_stars() {
    let app = cookie_app();

    let (_, cookie, _) = send(
        &app,
        "POST",
        "/api/practice/record",
        None,
        Some(json!({"correct": 10, "total": 10})),
    )
    .await;
    let cookie = cookie.unwrap();

    let (_, cookie2, body) = send(
        &app,
        "POST",
        "/api/state",
        Some(&cookie),
        Some(json!({"userName": "Kae", "totalStars": 1})),
    )
    .await;

    assert_eq!(body["state"]["userName"], json!("Kae"));
    // a client cannot merge its star total downwards
    assert_eq!(body["state"]["totalStars"], json!(5));

    let (_, _, body) = send(&app, "GET", "/api/state", cookie2.as_deref(), None).await;
    assert_eq!(body["state"]["userName"], json!("Kae"));
}

#[tokio::test]
async fn lesson_visits_accumulate() {
    let app = cookie_app();

    let (_, cookie, body) = send(
        &app,
        "POST",
        "/api/lesson/visit",
        None,
        Some(json!({"lesson": "division"})),
    )
    .await;
    assert_eq!(body["success"], json!(true));

    let cookie = cookie.unwrap();
    let (_, cookie, _) = send(
        &app,
        "POST",
        "/api/lesson/visit",
        Some(&cookie),
        Some(json!({"lesson": "division"})),
    )
    .await;

    let (_, _, body) = send(&app, "GET", "/api/state", cookie.as_deref(), None).await;
    assert_eq!(body["state"]["lessons"]["division"]["visits"], json!(2));
}

#[tokio::test]
async fn reset_restores_defaults() {
    let app = cookie_app();

    let (_, cookie, _) = send(
        &app,
        "POST",
        "/api/practice/record",
        None,
        Some(json!({"correct": 8, "total": 10})),
    )
    .await;
    let cookie = cookie.unwrap();

    let (status, _, body) = send(&app, "POST", "/api/reset", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["totalStars"], json!(0));
    assert_eq!(body["state"]["practice"]["totalSessions"], json!(0));
}

#[tokio::test]
async fn tampered_cookie_degrades_to_defaults() {
    let app = cookie_app();

    let (_, cookie, _) = send(
        &app,
        "POST",
        "/api/practice/record",
        None,
        Some(json!({"correct": 10, "total": 10})),
    )
    .await;
    let cookie = cookie.unwrap();

    // Flip the tail of the signed value; the signature no longer verifies.
    let mut tampered = cookie.clone();
    tampered.truncate(tampered.len().saturating_sub(4));
    tampered.push_str("AAAA");

    let (status, _, body) = send(&app, "GET", "/api/state", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["totalStars"], json!(0));
}

#[tokio::test]
async fn store_mode_keeps_the_document_server_side() {
    let app = store_app();

    let (_, cookie, body) = send(
        &app,
        "POST",
        "/api/practice/record",
        None,
        Some(json!({"correct": 6, "total": 10, "type": "division"})),
    )
    .await;
    assert_eq!(body["totalStars"], json!(3));

    let cookie = cookie.expect("store mode should issue a learner cookie");
    let (_, _, body) = send(&app, "GET", "/api/state", Some(&cookie), None).await;
    assert_eq!(body["state"]["totalStars"], json!(3));
    assert_eq!(body["state"]["practice"]["bestScore"], json!(60));
}

#[tokio::test]
async fn store_mode_rolls_the_expiry_on_every_write() {
    let app = store_app();

    let (_, cookie, _) = send(
        &app,
        "POST",
        "/api/practice/record",
        None,
        Some(json!({"correct": 5, "total": 10})),
    )
    .await;
    let cookie = cookie.unwrap();

    // The second write must re-issue the learner cookie so the 30-day
    // Max-Age counts from the latest activity, not the first visit.
    let request = Request::builder()
        .method("POST")
        .uri("/api/practice/record")
        .header(header::COOKIE, cookie.as_str())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"correct": 7, "total": 10}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("repeat write should re-issue the learner cookie");
    assert!(set_cookie.starts_with("math-adventure-learner="));
    assert!(set_cookie.contains("Max-Age=2592000"));

    // And it keeps pointing at the same server-side document.
    let (_, _, body) = send(&app, "GET", "/api/state", Some(&cookie), None).await;
    assert_eq!(body["state"]["practice"]["totalSessions"], json!(2));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = cookie_app();
    let (status, _, _) = send(
        &app,
        "POST",
        "/api/progress/division",
        None,
        Some(json!({"questionsAttempted": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
