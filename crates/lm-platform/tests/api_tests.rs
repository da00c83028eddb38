//! HTTP API Integration Tests
//!
//! Drive the full router against a seeded in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use lm_platform::{build_router, DataSeeder, Repositories};

async fn seeded_app() -> Router {
    let repos = Repositories::in_memory();
    DataSeeder::new(repos.roles.clone(), repos.users.clone())
        .seed()
        .await
        .unwrap();
    build_router(&repos, &["http://localhost:4200".to_string()])
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_success() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], "demo-token-admin");
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "admin");
        assert_eq!(body["user"]["roles"], json!(["ADMIN"]));
        assert!(body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let app = seeded_app().await;

        let (wrong_pw, wrong_body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "wrong"})),
        )
        .await;
        let (unknown, unknown_body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "nosuch", "password": "x"})),
        )
        .await;

        assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "ada", "email": "ada@library.com", "password": "engine"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["token"], "demo-token-ada");
        assert_eq!(body["user"]["roles"], json!(["USER"]));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "ada", "password": "engine"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_and_invalid() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "admin", "email": "x@library.com", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "DUPLICATE");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "bob", "email": "not-an-email", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "  ", "email": "bob@library.com", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "admin"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("password"));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": 7})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_me() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/auth/me", Some("demo-token-user"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "user@library.com");

        let (status, _) = send(&app, Method::GET, "/api/auth/me", Some("demo-token-nobody"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/api/auth/me", Some("token-user"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_validate_is_format_only() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/auth/validate", Some("demo-token-ghost"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"valid": true, "username": "ghost"}));

        let (_, body) = send(&app, Method::GET, "/api/auth/validate", Some("bogus"), None).await;
        assert_eq!(body, json!({"valid": false}));

        let (_, body) = send(&app, Method::GET, "/api/auth/validate", None, None).await;
        assert_eq!(body, json!({"valid": false}));
    }
}

mod member_tests {
    use super::*;

    const TOKEN: Option<&str> = Some("demo-token-admin");

    #[tokio::test]
    async fn test_member_crud() {
        let app = seeded_app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/members",
            TOKEN,
            Some(json!({"name": "Ada", "email": "ada@library.com", "roles": ["USER"]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["roles"][0]["name"], "USER");
        assert_eq!(created["roles"][0]["description"], "Regular User");

        let (status, fetched) = send(&app, Method::GET, &format!("/api/members/{}", id), TOKEN, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["email"], "ada@library.com");

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/members/{}", id),
            TOKEN,
            Some(json!({"name": "Ada Lovelace", "email": "ada@library.com", "roles": ["LIBRARIAN", "USER"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Ada Lovelace");
        assert_eq!(updated["roles"][0]["name"], "LIBRARIAN");
        assert_eq!(updated["roles"][1]["name"], "USER");

        let (status, list) = send(&app, Method::GET, "/api/members", TOKEN, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/members/{}", id), TOKEN, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/api/members/{}", id), TOKEN, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/members/{}", id), TOKEN, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_member_validation() {
        let app = seeded_app().await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/members",
            TOKEN,
            Some(json!({"name": "", "email": "ada@library.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/members",
            TOKEN,
            Some(json!({"name": "Ada", "email": "ada@library.com", "roles": ["GHOST"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/members/999",
            TOKEN,
            Some(json!({"name": "Ada", "email": "ada@library.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_unknown_member_is_not_found_before_validation() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/members/999",
            TOKEN,
            Some(json!({"name": "Ada", "email": "ada@library.com", "roles": ["GHOST"]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/members",
            TOKEN,
            Some(json!({"name": "Ada"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = seeded_app().await;

        for uri in ["/api/members", "/api/roles"] {
            let (status, body) = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["error"], "UNAUTHORIZED");

            let (status, _) = send(&app, Method::GET, uri, Some("not-a-demo-token"), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }
}

mod platform_tests {
    use super::*;

    #[tokio::test]
    async fn test_roles_listing() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/api/roles", Some("demo-token-user"), None).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["ADMIN", "USER", "LIBRARIAN"]);
    }

    #[tokio::test]
    async fn test_health() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/q/openapi", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Library Platform API");
        assert!(body["paths"].get("/api/auth/login").is_some());
        assert!(body["paths"].get("/api/members/{id}").is_some());
    }
}
