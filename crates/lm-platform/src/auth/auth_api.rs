//! Auth API Endpoints
//!
//! - POST /api/auth/login - Username/password login, returns a demo token
//! - POST /api/auth/register - Create an account with the USER role
//! - GET /api/auth/me - Account named by the bearer token
//! - GET /api/auth/validate - Format check of the bearer token

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::auth_service::AuthService;
use crate::role::entity::{names, sorted_names};
use crate::role::RoleRepository;
use crate::shared::api_common::{require_email, require_non_blank, ApiJson};
use crate::shared::error::PlatformError;
use crate::shared::middleware::{bearer_token, Authenticated};
use crate::user::{User, UserRepository};

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> crate::Result<()> {
        require_non_blank("username", &self.username)?;
        require_non_blank("password", &self.password)?;
        require_email(&self.email)
    }
}

/// Public view of an account. Never carries the password.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    /// Role names, sorted
    pub roles: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            roles: sorted_names(&u.roles),
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

/// Login / registration response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
    pub success: bool,
}

/// Token check result
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub user_repo: Arc<dyn UserRepository>,
    pub role_repo: Arc<dyn RoleRepository>,
}

fn invalid_credentials() -> PlatformError {
    PlatformError::unauthorized("Invalid username or password")
}

/// Login with username and password
///
/// Returns a demo token on success. Unknown users and wrong passwords get the
/// same 401.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    operation_id = "postAuthLogin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, PlatformError> {
    let user = state
        .auth_service
        .authenticate(&req.username, &req.password)
        .await?
        .ok_or_else(invalid_credentials)?;

    info!(username = %user.username, "Login successful");

    Ok(Json(AuthResponse {
        token: state.auth_service.issue_token(&user.username),
        user: user.into(),
        success: true,
    }))
}

/// Register a new account
///
/// The account gets the USER role when that role exists.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    operation_id = "postAuthRegister",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error", body = crate::shared::api_common::ApiError),
        (status = 409, description = "Username taken", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), PlatformError> {
    req.validate()?;

    let user_role = state.role_repo.find_by_name(names::USER).await?;
    if user_role.is_none() {
        warn!(username = %req.username, "USER role missing, registering without roles");
    }

    let user = User::new(req.username, req.password, req.email).with_optional_role(user_role);
    let user = state.user_repo.save(user).await?;

    info!(username = %user.username, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: state.auth_service.issue_token(&user.username),
            user: user.into(),
            success: true,
        }),
    ))
}

/// Get current user
///
/// Resolves the bearer token to a stored account.
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    operation_id = "getAuthMe",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or unknown token", body = crate::shared::api_common::ApiError)
    )
)]
pub async fn get_current_user(
    State(state): State<AuthState>,
    auth: Authenticated,
) -> Result<Json<UserResponse>, PlatformError> {
    let user = state
        .auth_service
        .user_for_token(&auth.token)
        .await?
        .ok_or_else(|| PlatformError::unauthorized("Token does not name an existing user"))?;

    Ok(Json(user.into()))
}

/// Validate a token
///
/// Format check only; does not consult the user store.
#[utoipa::path(
    get,
    path = "/validate",
    tag = "auth",
    operation_id = "getAuthValidate",
    responses(
        (status = 200, description = "Validation result", body = TokenValidationResponse)
    )
)]
pub async fn validate_token(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Json<TokenValidationResponse> {
    let token = bearer_token(&headers);
    let valid = state.auth_service.is_valid_token(token);
    let username = state
        .auth_service
        .extract_username_from_token(token)
        .map(String::from);

    Json(TokenValidationResponse { valid, username })
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(register))
        .routes(routes!(get_current_user))
        .routes(routes!(validate_token))
        .with_state(state)
}
