//! Member Aggregate
//!
//! Member management: entity, persistence contract and REST endpoints.

pub mod entity;
pub mod repository;
pub mod api;

pub use entity::Member;
pub use repository::MemberRepository;
pub use api::{MembersState, members_router};
