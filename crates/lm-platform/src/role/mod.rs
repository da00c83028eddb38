//! Role Aggregate

pub mod entity;
pub mod repository;
pub mod api;

pub use entity::Role;
pub use repository::RoleRepository;
pub use api::{RolesState, roles_router};
