//! API Middleware
//!
//! Bearer token authentication for Axum. `AuthLayer` puts the shared
//! `AuthService` into request extensions so the `Authenticated` extractor can
//! check the `Authorization` header of protected routes.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::auth::auth_service::{extract_bearer_token, AuthService};
use crate::shared::api_common::ApiError;

/// Bearer token of the request, if any
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
}

/// Caller identified by a well-formed demo token.
///
/// Only the token format is checked; the named user need not exist.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub username: String,
    pub token: String,
}

/// Error response for authentication failures
pub struct AuthError {
    pub status: StatusCode,
    pub message: String,
}

impl AuthError {
    fn unauthorized(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiError {
            error: "UNAUTHORIZED".to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = parts.extensions.get::<Arc<AuthService>>().ok_or_else(|| AuthError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Auth service not configured".to_string(),
        })?;

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AuthError::unauthorized("Missing authentication token"))?;

        if !auth_service.is_valid_token(Some(token)) {
            return Err(AuthError::unauthorized("Invalid authentication token"));
        }

        let username = auth_service
            .extract_username_from_token(Some(token))
            .unwrap_or_default()
            .to_string();

        Ok(Authenticated {
            username,
            token: token.to_string(),
        })
    }
}

/// Middleware layer that injects the auth service into request extensions
#[derive(Clone)]
pub struct AuthLayer {
    auth_service: Arc<AuthService>,
}

impl AuthLayer {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            auth_service: self.auth_service.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    auth_service: Arc<AuthService>,
}

impl<S, B> Service<axum::http::Request<B>> for AuthMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.auth_service.clone());
        Box::pin(self.inner.call(req))
    }
}
