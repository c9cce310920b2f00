// Profile similarity: the weighted scorer plus the term tables it matches against.
// Shared by the similarity cache (fuzzy lookups) and the pairwise similarity endpoint.

pub mod scorer;
pub mod vocabulary;

pub use scorer::{score, SimilarityScore};
