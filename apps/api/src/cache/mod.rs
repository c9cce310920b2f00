//! Similarity cache: generated content reused across profiles that are close enough.
//!
//! `SimilarityCache` owns the content maps, the pairwise similarity memo and the
//! hit/miss statistics. `spawn_sweeper` evicts expired entries on a fixed interval.

pub mod handlers;
pub mod models;
pub mod store;
pub mod sweeper;

use thiserror::Error;
use uuid::Uuid;

pub use models::CacheKind;
pub use store::SimilarityCache;
pub use sweeper::spawn_sweeper;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Profile {0} not found")]
    ProfileNotFound(Uuid),
}
