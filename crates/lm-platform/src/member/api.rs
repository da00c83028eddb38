//! Members API
//!
//! CRUD for library members. Roles are referenced by name and must exist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::member::entity::Member;
use crate::member::repository::MemberRepository;
use crate::role::entity::Role;
use crate::role::repository::RoleRepository;
use crate::shared::api_common::{require_email, require_non_blank, ApiJson};
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;

/// Create / update member request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    pub name: String,
    pub email: String,

    /// Role names
    #[serde(default)]
    pub roles: Vec<String>,
}

impl MemberRequest {
    fn validate(&self) -> crate::Result<()> {
        require_non_blank("name", &self.name)?;
        require_email(&self.email)
    }
}

/// Member response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    /// Sorted by name
    pub roles: Vec<Role>,
}

impl From<Member> for MemberResponse {
    fn from(m: Member) -> Self {
        let mut roles: Vec<Role> = m.roles.into_iter().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            roles,
        }
    }
}

/// Members service state
#[derive(Clone)]
pub struct MembersState {
    pub member_repo: Arc<dyn MemberRepository>,
    pub role_repo: Arc<dyn RoleRepository>,
}

impl MembersState {
    /// Resolve role names, rejecting unknown ones as a validation error.
    async fn resolve_roles(&self, names: &[String]) -> crate::Result<HashSet<Role>> {
        let mut roles = HashSet::with_capacity(names.len());
        for name in names {
            let role = self
                .role_repo
                .find_by_name(name)
                .await?
                .ok_or_else(|| PlatformError::validation(format!("Unknown role: {}", name)))?;
            roles.insert(role);
        }
        Ok(roles)
    }
}

/// List members
#[utoipa::path(
    get,
    path = "",
    tag = "members",
    operation_id = "getMembers",
    responses(
        (status = 200, description = "All members ordered by id", body = Vec<MemberResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn list_members(
    State(state): State<MembersState>,
    _auth: Authenticated,
) -> Result<Json<Vec<MemberResponse>>, PlatformError> {
    let members = state.member_repo.find_all().await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

/// Get member by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "members",
    operation_id = "getMember",
    params(("id" = i64, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member found", body = MemberResponse),
        (status = 404, description = "Member not found", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn get_member(
    State(state): State<MembersState>,
    _auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<MemberResponse>, PlatformError> {
    let member = state
        .member_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Member", id.to_string()))?;

    Ok(Json(member.into()))
}

/// Create a member
#[utoipa::path(
    post,
    path = "",
    tag = "members",
    operation_id = "postMember",
    request_body = MemberRequest,
    responses(
        (status = 201, description = "Member created", body = MemberResponse),
        (status = 400, description = "Validation error", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn create_member(
    State(state): State<MembersState>,
    auth: Authenticated,
    ApiJson(req): ApiJson<MemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), PlatformError> {
    req.validate()?;
    let roles = state.resolve_roles(&req.roles).await?;

    let member = Member::new(req.name, req.email).with_roles(roles);
    let member = state.member_repo.save(member).await?;

    info!(member_id = ?member.id, by = %auth.username, "Created member");
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// Update a member
///
/// Replaces name, email and the full role set.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "members",
    operation_id = "putMember",
    params(("id" = i64, Path, description = "Member ID")),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 400, description = "Validation error", body = crate::shared::api_common::ApiError),
        (status = 404, description = "Member not found", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn update_member(
    State(state): State<MembersState>,
    auth: Authenticated,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<MemberRequest>,
) -> Result<Json<MemberResponse>, PlatformError> {
    let mut member = state
        .member_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Member", id.to_string()))?;

    req.validate()?;
    let roles = state.resolve_roles(&req.roles).await?;

    member.name = req.name;
    member.email = req.email;
    member.roles = roles;
    let member = state.member_repo.save(member).await?;

    info!(member_id = id, by = %auth.username, "Updated member");
    Ok(Json(member.into()))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "members",
    operation_id = "deleteMember",
    params(("id" = i64, Path, description = "Member ID")),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "Member not found", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn delete_member(
    State(state): State<MembersState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<StatusCode, PlatformError> {
    if !state.member_repo.delete(id).await? {
        return Err(PlatformError::not_found("Member", id.to_string()));
    }

    info!(member_id = id, by = %auth.username, "Deleted member");
    Ok(StatusCode::NO_CONTENT)
}

/// Create the members router
pub fn members_router(state: MembersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_members, create_member))
        .routes(routes!(get_member, update_member, delete_member))
        .with_state(state)
}
