//! Core domain types and shared logic for the Dramshelf collection server.
//!
//! This crate defines the pieces consumed across the other crates:
//! - Idempotency key validation and the cached-response record
//! - The in-memory fuzzy name-search index
//! - Configuration types

pub mod config;
pub mod error;
pub mod idempotency;
pub mod name_index;

pub use error::{Error, Result};
pub use idempotency::{CachedResponse, IdempotencyKey};
pub use name_index::{
    DEFAULT_SCORE_CUTOFF, MIN_QUERY_LEN, NameEntry, NameScorer, NameSearchIndex, NameSource,
    NormalizedLevenshtein,
};
