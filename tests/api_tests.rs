//! End-to-end tests for the HTTP surface.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cookbook::config::Config;
use cookbook::models::user::NewUser;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Arc<cookbook::api::AppState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("cookbook-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.secret_key = "api-test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = cookbook::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    let router = cookbook::api::router(state.clone());
    (state, router)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", mime::APPLICATION_JSON.as_ref());
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn registration(username: &str) -> Value {
    json!({
        "username": username,
        "password": "password1",
        "firstName": "First",
        "lastName": "Last",
        "email": format!("{username}@user.com"),
    })
}

async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        json_request("POST", "/auth/register", None, &registration(username)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

async fn admin_token(state: &cookbook::api::AppState, app: &Router) -> String {
    state
        .users()
        .register(NewUser {
            username: "admin".to_string(),
            password: "adminpass".to_string(),
            first_name: "Ad".to_string(),
            last_name: "Min".to_string(),
            email: "admin@user.com".to_string(),
            is_admin: true,
        })
        .await
        .unwrap();

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/token",
            None,
            &json!({"username": "admin", "password": "adminpass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_then_get_self() {
    let (_state, app) = spawn_app().await;
    let token = register(&app, "new").await;

    let (status, body) = send(&app, empty_request("GET", "/users/new", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "new");
    assert_eq!(body["user"]["firstName"], "First");
    assert_eq!(body["user"]["isAdmin"], false);
    assert_eq!(body["user"]["favorites"], json!([]));
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_is_bad_request() {
    let (_state, app) = spawn_app().await;
    register(&app, "u1").await;

    let (status, body) = send(
        &app,
        json_request("POST", "/auth/register", None, &registration("u1")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Duplicate username: u1");
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn test_register_rejects_invalid_body() {
    let (_state, app) = spawn_app().await;

    let mut body = registration("u1");
    body["email"] = json!("not-an-email");
    let (status, _) = send(&app, json_request("POST", "/auth/register", None, &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = registration("u2");
    body["isAdmin"] = json!(true);
    let (status, _) = send(&app, json_request("POST", "/auth/register", None, &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login() {
    let (_state, app) = spawn_app().await;
    register(&app, "u1").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/token",
            None,
            &json!({"username": "u1", "password": "password1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/token",
            None,
            &json!({"username": "u1", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid username/password");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/token",
            None,
            &json!({"username": "nope", "password": "password1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid username/password");

    let (status, _) = send(
        &app,
        json_request("POST", "/auth/token", None, &json!({"username": "u1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let (_state, app) = spawn_app().await;
    register(&app, "u1").await;

    let (status, _) = send(&app, empty_request("GET", "/users/u1", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, empty_request("GET", "/users/u1", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_user_is_unauthorized() {
    let (_state, app) = spawn_app().await;
    register(&app, "u1").await;
    let u2_token = register(&app, "u2").await;

    let (status, _) = send(&app, empty_request("GET", "/users/u1", Some(&u2_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/users/u1",
            Some(&u2_token),
            &json!({"firstName": "Mallory"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, empty_request("DELETE", "/users/u1", Some(&u2_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_requires_admin() {
    let (state, app) = spawn_app().await;
    let token = register(&app, "u1").await;

    let (status, _) = send(&app, empty_request("GET", "/users", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = admin_token(&state, &app).await;
    let (status, body) = send(&app, empty_request("GET", "/users", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["admin", "u1"]);
}

#[tokio::test]
async fn test_admin_creates_admin() {
    let (state, app) = spawn_app().await;
    let admin = admin_token(&state, &app).await;

    let mut body = registration("boss");
    body["isAdmin"] = json!(true);
    let (status, body) = send(&app, json_request("POST", "/users", Some(&admin), &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["isAdmin"], true);
    assert!(body["token"].as_str().is_some());

    let user_token = register(&app, "u1").await;
    let (status, _) = send(
        &app,
        json_request("POST", "/users", Some(&user_token), &registration("u2")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user() {
    let (_state, app) = spawn_app().await;
    let token = register(&app, "u1").await;

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            "/users/u1",
            Some(&token),
            &json!({"firstName": "New", "email": "new@user.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["firstName"], "New");
    assert_eq!(body["user"]["lastName"], "Last");
    assert_eq!(body["user"]["email"], "new@user.com");
}

#[tokio::test]
async fn test_update_rejects_empty_and_unknown_fields() {
    let (_state, app) = spawn_app().await;
    let token = register(&app, "u1").await;

    let (status, body) = send(
        &app,
        json_request("PATCH", "/users/u1", Some(&token), &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No data.");

    let (status, _) = send(
        &app,
        json_request("PATCH", "/users/u1", Some(&token), &json!({"username": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_admin_cannot_grant_admin() {
    let (state, app) = spawn_app().await;
    let token = register(&app, "u1").await;

    let (status, _) = send(
        &app,
        json_request("PATCH", "/users/u1", Some(&token), &json!({"isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = admin_token(&state, &app).await;
    let (status, body) = send(
        &app,
        json_request("PATCH", "/users/u1", Some(&admin), &json!({"isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isAdmin"], true);
}

#[tokio::test]
async fn test_password_rotation_over_http() {
    let (_state, app) = spawn_app().await;
    let token = register(&app, "u1").await;

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/users/u1",
            Some(&token),
            &json!({"password": "rotated1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let login = |password: &str| {
        json_request(
            "POST",
            "/auth/token",
            None,
            &json!({"username": "u1", "password": password}),
        )
    };

    let (status, _) = send(&app, login("password1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, login("rotated1")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_acting_on_missing_user_is_not_found() {
    let (state, app) = spawn_app().await;
    let admin = admin_token(&state, &app).await;

    let (status, body) = send(&app, empty_request("GET", "/users/nah", Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No user: nah");

    let (status, _) = send(
        &app,
        json_request("PATCH", "/users/nah", Some(&admin), &json!({"firstName": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request("DELETE", "/users/nah", Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        empty_request("POST", "/users/nah/recipes/r1", Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No username: nah");
}

#[tokio::test]
async fn test_favorites_flow() {
    let (_state, app) = spawn_app().await;
    let token = register(&app, "u1").await;

    for id in ["r1", "r2"] {
        let (status, body) = send(
            &app,
            empty_request("POST", &format!("/users/u1/recipes/{id}"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["favorited"], id);
    }

    let (status, body) = send(
        &app,
        empty_request("GET", "/users/u1/recipes/favorites", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["favorites"],
        json!([
            {"username": "u1", "recipeId": "r1"},
            {"username": "u1", "recipeId": "r2"},
        ])
    );

    let (_, body) = send(&app, empty_request("GET", "/users/u1", Some(&token))).await;
    assert_eq!(body["user"]["favorites"], json!(["r1", "r2"]));

    let (status, body) = send(
        &app,
        empty_request("DELETE", "/users/u1/recipes/r1", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], "r1");

    let (status, body) = send(
        &app,
        empty_request("DELETE", "/users/u1/recipes/never", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No recipe: never");
}

#[tokio::test]
async fn test_delete_self_then_token_targets_nothing() {
    let (_state, app) = spawn_app().await;
    let token = register(&app, "u1").await;

    send(
        &app,
        empty_request("POST", "/users/u1/recipes/r1", Some(&token)),
    )
    .await;

    let (status, body) = send(&app, empty_request("DELETE", "/users/u1", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], "u1");

    let (status, _) = send(&app, empty_request("GET", "/users/u1", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        empty_request("GET", "/users/u1/recipes/favorites", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorites"], json!([]));
}

#[tokio::test]
async fn test_recipe_search_requires_query() {
    let (_state, app) = spawn_app().await;

    let (status, _) = send(&app, empty_request("GET", "/recipes", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, empty_request("GET", "/recipes?q=%20%20", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let (_state, app) = spawn_app().await;

    let (status, body) = send(&app, empty_request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_state, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/nope", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
