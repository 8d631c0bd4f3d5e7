// src/exec/mod.rs

//! Process supervision layer.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the
//!   `tokio::process` based `TokioProcessBackend` used in production; tests
//!   replace it with a fake.
//! - [`supervisor`] owns the supervised child and implements launch,
//!   graceful restart and stop on top of a backend.

pub mod backend;
pub mod supervisor;

pub use backend::{LaunchSpec, ProcessBackend, TokioProcessBackend};
pub use supervisor::{ProcessHandle, ProcessState, Supervisor};
