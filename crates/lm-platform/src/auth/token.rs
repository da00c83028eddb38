//! Demo Session Tokens
//!
//! Tokens are the literal prefix `demo-token-` followed by a username. There
//! is no signature, expiry or server-side state: anyone can mint a token for
//! any name, and validity is a format check only. This is a placeholder
//! scheme and offers no security.

pub const TOKEN_PREFIX: &str = "demo-token-";

/// Token for `username`.
pub fn issue_token(username: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, username)
}

/// True iff a token is present and starts with the prefix.
pub fn is_valid_token(token: Option<&str>) -> bool {
    token.is_some_and(|t| t.starts_with(TOKEN_PREFIX))
}

/// Everything after the prefix, verbatim. May be empty.
pub fn extract_username_from_token(token: Option<&str>) -> Option<&str> {
    token.and_then(|t| t.strip_prefix(TOKEN_PREFIX))
}
