//! Orchestrator: agent selection, concurrent dispatch with per-key memoization,
//! failure isolation and response merging.

pub mod handlers;
pub mod service;

pub use service::Orchestrator;
