//! Roles API
//!
//! Read-only listing; roles are only created at bootstrap.

use axum::{extract::State, Json};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::role::entity::Role;
use crate::role::repository::RoleRepository;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;

/// Roles service state
#[derive(Clone)]
pub struct RolesState {
    pub role_repo: Arc<dyn RoleRepository>,
}

/// List roles
#[utoipa::path(
    get,
    path = "",
    tag = "roles",
    operation_id = "getRoles",
    responses(
        (status = 200, description = "All roles ordered by id", body = Vec<Role>),
        (status = 401, description = "Missing or invalid token", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn list_roles(
    State(state): State<RolesState>,
    _auth: Authenticated,
) -> Result<Json<Vec<Role>>, PlatformError> {
    Ok(Json(state.role_repo.find_all().await?))
}

/// Create the roles router
pub fn roles_router(state: RolesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_roles))
        .with_state(state)
}
