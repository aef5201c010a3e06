use std::str::FromStr;

use api::{AppState, JwtKeys, app_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use revconnect_core::{PostgresRepositories, create_repositories, run_migrations};
use serde_json::{Value, json};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tower::util::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-test-secret-long-enough";

/// A router whose pool never connects; enough for requests that fail before touching the database.
fn offline_router() -> Router {
    let pool = PgPoolOptions::new().connect_lazy_with(PgConnectOptions::new());
    let state = AppState::from_repositories(
        PostgresRepositories::from_pool(pool),
        JwtKeys::new(SECRET, 3600),
    );
    app_router(state)
}

async fn online_router() -> Option<Router> {
    let url = std::env::var("DATABASE_TEST_URL").unwrap_or_default();
    if url.is_empty() {
        eprintln!("Skipping API integration test because DATABASE_TEST_URL is not set");
        return None;
    }

    let options = PgConnectOptions::from_str(&url).expect("parse database url");
    let repositories = create_repositories(options).await.expect("connect");
    run_migrations(&repositories).await.expect("migrate");
    Some(app_router(AppState::from_repositories(
        repositories,
        JwtKeys::new(SECRET, 3600),
    )))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("router oneshot");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let router = offline_router();

    let (status, body) = send(&router, get("/users/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "E_UNAUTHORIZED");

    let (status, _) = send(&router, get("/feed", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = JwtKeys::new("some-other-secret-entirely", 3600)
        .issue(&Uuid::new_v4().into())
        .expect("issue");
    let (status, _) = send(&router, get("/notifications", Some(&foreign.access_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn scalar_ui_is_served() {
    let router = offline_router();
    let response = router
        .oneshot(get("/scalar", None))
        .await
        .expect("router oneshot");
    assert_eq!(response.status(), StatusCode::OK);
}

async fn register_and_login(router: &Router, prefix: &str) -> (String, String) {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let username = format!("{prefix}_{suffix}");

    let (status, user) = send(
        router,
        json_request(
            "POST",
            "/auth/register",
            None,
            json!({
                "email": format!("{username}@revconnect.test"),
                "username": username,
                "password": "Sup3rSecret",
                "user_type": "creator",
                "profile": { "name": username }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register: {user}");
    assert!(user.get("password_hash").is_none());

    let (status, login) = send(
        router,
        json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "identifier": username, "password": "Sup3rSecret" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login: {login}");

    let token = login["token"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();
    let id = user["id"].as_str().expect("user id").to_string();
    (token, id)
}

#[tokio::test]
async fn http_social_flow() {
    let Some(router) = online_router().await else {
        return;
    };

    let (alice, _alice_id) = register_and_login(&router, "alice").await;
    let (bob, bob_id) = register_and_login(&router, "bob").await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "identifier": "nobody_here", "password": "Sup3rSecret" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "E_AUTHENTICATION");

    // alice follows bob, bob posts, alice sees it in her feed
    let (status, _) = send(
        &router,
        json_request("POST", &format!("/follows/{bob_id}"), Some(&alice), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, post) = send(
        &router,
        json_request(
            "POST",
            "/posts",
            Some(&bob),
            json!({ "content": "Launching today #rust", "post_type": "announcement" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create post: {post}");
    let post_id = post["id"].as_str().expect("post id").to_string();

    let (status, feed) = send(&router, get("/feed", Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        feed["data"]
            .as_array()
            .expect("feed data")
            .iter()
            .any(|p| p["id"] == post_id.as_str())
    );

    let (status, _) = send(
        &router,
        json_request("POST", &format!("/posts/{post_id}/likes"), Some(&alice), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, count) = send(&router, get("/notifications/unread-count", Some(&bob))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["count"], 2, "a follower and a like");

    // validation errors surface as 400 with the message intact
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/messages",
            Some(&bob),
            json!({ "receiver_id": bob_id, "text": "hi me" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot send message to yourself");

    let (status, _) = send(&router, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
}
