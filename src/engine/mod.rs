// src/engine/mod.rs

//! Orchestration engine.
//!
//! The pure decision state lives in [`core`]; the async loop that reacts to
//! fingerprints and shutdown requests and drives the supervisor lives in
//! [`runtime`].

pub mod core;
pub mod runtime;

pub use self::core::{ChangeTracker, Decision};
pub use runtime::Orchestrator;
