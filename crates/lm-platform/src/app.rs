//! HTTP Application
//!
//! Assembles the API routers, the health endpoint and the OpenAPI document
//! into one axum `Router`.

use axum::{http::HeaderValue, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::auth::{auth_router, AuthService, AuthState};
use crate::member::{members_router, MembersState};
use crate::role::{roles_router, RolesState};
use crate::shared::api_common::HealthResponse;
use crate::shared::middleware::AuthLayer;
use crate::store::Repositories;

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    operation_id = "getHealth",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::up())
}

/// CORS for the given origins; `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Routers and OpenAPI document, before middleware is applied.
pub fn api_parts(repos: &Repositories, auth_service: Arc<AuthService>) -> (Router, OpenApi) {
    let auth_state = AuthState {
        auth_service,
        user_repo: repos.users.clone(),
        role_repo: repos.roles.clone(),
    };
    let roles_state = RolesState {
        role_repo: repos.roles.clone(),
    };
    let members_state = MembersState {
        member_repo: repos.members.clone(),
        role_repo: repos.roles.clone(),
    };

    let (router, mut openapi) = OpenApiRouter::new()
        .routes(utoipa_axum::routes!(health))
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api/roles", roles_router(roles_state))
        .nest("/api/members", members_router(members_state))
        .split_for_parts();

    openapi.info.title = "Library Platform API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description = Some("Members, roles and demo authentication".to_string());

    (router, openapi)
}

/// Full application router: APIs, `/q/openapi`, auth injection, tracing and CORS.
pub fn build_router(repos: &Repositories, cors_origins: &[String]) -> Router {
    let auth_service = Arc::new(AuthService::new(repos.users.clone()));
    let (router, openapi) = api_parts(repos, auth_service.clone());
    let openapi = Arc::new(openapi);

    router
        .route(
            "/q/openapi",
            get(move || {
                let openapi = openapi.clone();
                async move { Json(openapi.as_ref().clone()) }
            }),
        )
        .layer(AuthLayer::new(auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}
