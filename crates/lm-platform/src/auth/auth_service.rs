//! Authentication Service
//!
//! Credential check against stored plaintext passwords plus the demo token
//! operations. Stateless apart from the user store.

use std::sync::Arc;
use tracing::debug;

use crate::auth::token;
use crate::user::{User, UserRepository};
use crate::shared::error::Result;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Look up `username` (case-sensitive) and compare passwords exactly.
    ///
    /// `Ok(None)` covers unknown users, wrong passwords and accounts with no
    /// stored password. Store failures are returned as errors.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = self.user_repo.find_by_username(username).await?;

        match user {
            Some(user) if user.password_matches(password) => Ok(Some(user)),
            Some(_) => {
                debug!(username = %username, "Password mismatch");
                Ok(None)
            }
            None => {
                debug!(username = %username, "Unknown user");
                Ok(None)
            }
        }
    }

    pub fn issue_token(&self, username: &str) -> String {
        token::issue_token(username)
    }

    pub fn is_valid_token(&self, token: Option<&str>) -> bool {
        token::is_valid_token(token)
    }

    pub fn extract_username_from_token<'a>(&self, token: Option<&'a str>) -> Option<&'a str> {
        token::extract_username_from_token(token)
    }

    /// The stored user a token names, if the token is well formed and the
    /// user exists.
    pub async fn user_for_token(&self, token: &str) -> Result<Option<User>> {
        match self.extract_username_from_token(Some(token)) {
            Some(username) => self.user_repo.find_by_username(username).await,
            None => Ok(None),
        }
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::failing::FailingStore;
    use crate::store::InMemoryStore;
    use crate::PlatformError;

    async fn service_with(users: Vec<User>) -> AuthService {
        let store = Arc::new(InMemoryStore::new());
        for user in users {
            UserRepository::save(store.as_ref(), user).await.unwrap();
        }
        AuthService::new(store)
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = service_with(vec![User::new("admin", "admin123", "admin@library.com")]).await;

        let user = service.authenticate("admin", "admin123").await.unwrap();
        assert_eq!(user.map(|u| u.username), Some("admin".to_string()));

        assert!(service.authenticate("admin", "wrong").await.unwrap().is_none());
        assert!(service.authenticate("Admin", "admin123").await.unwrap().is_none());
        assert!(service.authenticate("nosuch", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unset_password_never_authenticates() {
        let mut ghost = User::new("ghost", "", "ghost@library.com");
        ghost.password = None;
        let service = service_with(vec![ghost]).await;

        assert!(service.authenticate("ghost", "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_for_token() {
        let service = service_with(vec![User::new("user", "user123", "user@library.com")]).await;

        let token = service.issue_token("user");
        let user = service.user_for_token(&token).await.unwrap();
        assert_eq!(user.map(|u| u.email), Some("user@library.com".to_string()));

        assert!(service.user_for_token("demo-token-nobody").await.unwrap().is_none());
        assert!(service.user_for_token("user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_not_a_failed_login() {
        let service = AuthService::new(Arc::new(FailingStore));

        let result = service.authenticate("admin", "admin123").await;
        assert!(matches!(result, Err(PlatformError::Internal { .. })));

        let result = service.user_for_token("demo-token-admin").await;
        assert!(matches!(result, Err(PlatformError::Internal { .. })));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }
}
