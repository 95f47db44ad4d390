use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use studyhub::config::Config;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@studyhub.local";
const ADMIN_PASSWORD: &str = "password";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = studyhub::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    studyhub::api::router(state)
}

fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({"email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> i64 {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({"name": name, "email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_i64().unwrap()
}

async fn create_group(app: &Router, admin_token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/groups",
            Some(admin_token),
            Some(serde_json::json!({"name": name})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_single_membership_invariant() {
    let app = spawn_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let group_a = create_group(&app, &admin_token, "Group A").await;
    let group_b = create_group(&app, &admin_token, "Group B").await;

    let alice_id = register(&app, "Alice", "alice@example.com", "alices-pass").await;
    let token = login(&app, "alice@example.com", "alices-pass").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_a})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"].as_i64().unwrap(), alice_id);
    assert_eq!(body["data"]["group_id"].as_i64().unwrap(), group_a);

    // A second join conflicts whether it targets another group or the same
    // one.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_b})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_a})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Leaving frees the user to join elsewhere.
    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/groups/leave-group/{alice_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/groups/leave-group/{alice_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_b})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_membership_requires_self_or_admin() {
    let app = spawn_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let group_id = create_group(&app, &admin_token, "Group A").await;
    let alice_id = register(&app, "Alice", "alice@example.com", "alices-pass").await;
    register(&app, "Bob", "bob@example.com", "bobs-pass").await;
    let bob_token = login(&app, "bob@example.com", "bobs-pass").await;

    // No token at all.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            None,
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Bob may not move Alice.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&bob_token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/groups/leave-group/{alice_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An admin may.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&admin_token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/groups/leave-group/{alice_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_join_unknown_user_or_group() {
    let app = spawn_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let group_id = create_group(&app, &admin_token, "Group A").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&admin_token),
            Some(serde_json::json!({"user_id": 9999, "group_id": group_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let alice_id = register(&app, "Alice", "alice@example.com", "alices-pass").await;
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&admin_token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": 9999})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_group_delete_cascades() {
    let app = spawn_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let group_id = create_group(&app, &admin_token, "Group A").await;
    let alice_id = register(&app, "Alice", "alice@example.com", "alices-pass").await;
    let token = login(&app, "alice@example.com", "alices-pass").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/sessions",
            Some(&admin_token),
            Some(serde_json::json!({"group_id": group_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/resources",
            None,
            Some(serde_json::json!({
                "group_id": group_id,
                "title": "Notes",
                "url": "https://example.com/notes"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let resource_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/groups/{group_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No orphaned children remain.
    let (status, _) = send(
        &app,
        request("GET", &format!("/sessions/{session_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request("GET", &format!("/resources/{resource_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The membership row went with the group, so the user can join again.
    let group_b = create_group(&app, &admin_token, "Group B").await;
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_b})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_delete_cascades_membership() {
    let app = spawn_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let group_id = create_group(&app, &admin_token, "Group A").await;
    let alice_id = register(&app, "Alice", "alice@example.com", "alices-pass").await;
    let token = login(&app, "alice@example.com", "alices-pass").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/groups/join-group",
            Some(&token),
            Some(serde_json::json!({"user_id": alice_id, "group_id": group_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/users/{alice_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The deleted user's token no longer resolves.
    let (status, _) = send(
        &app,
        request("GET", &format!("/users/{alice_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The group survives; only the membership row was removed.
    let (status, _) = send(
        &app,
        request("GET", &format!("/groups/{group_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request("DELETE", "/users/9999", Some(&admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
