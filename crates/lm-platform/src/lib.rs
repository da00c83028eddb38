//! Library Platform
//!
//! Backend for a small library-management demo:
//! - Role, user and member aggregates
//! - SQLite and in-memory stores behind repository traits
//! - Bootstrap seeding of default roles and demo accounts
//! - Plaintext-password login with `demo-token-<username>` tokens
//! - REST APIs with an OpenAPI document
//!
//! The authentication scheme is a placeholder: passwords are stored in
//! plaintext and tokens are unsigned. Do not expose it beyond a demo.
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access contract
//! - `api` - REST endpoints (where applicable)

// Aggregates
pub mod role;
pub mod user;
pub mod member;

// Authentication
pub mod auth;

// Infrastructure
pub mod shared;
pub mod store;
pub mod seed;
pub mod app;

pub use shared::error::{PlatformError, Result};

pub use role::{Role, RoleRepository};
pub use user::{User, UserRepository};
pub use member::{Member, MemberRepository};

pub use auth::AuthService;
pub use seed::{DataSeeder, SeedReport};
pub use store::{InMemoryStore, Repositories, SqliteStore};
pub use app::build_router;
