//! Shared Infrastructure

pub mod api_common;
pub mod error;
pub mod middleware;
