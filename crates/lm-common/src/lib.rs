//! Shared plumbing for the Library Platform crates and binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat};
