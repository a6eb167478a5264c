//! HTTP API server for the Dramshelf whisky collection.
//!
//! This crate provides the HTTP control plane:
//! - CRUD endpoints for distilleries, bottles, brands and geography
//! - Fuzzy name search backed by the in-memory index
//! - Idempotency replay filtering on all mutating routes

pub mod error;
pub mod handlers;
pub mod idempotency;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use idempotency::{
    IDEMPOTENCY_KEY_HEADER, MemoryReplayStore, ReplayCache, ReplayStore, ValidationProblem,
};
pub use routes::create_router;
pub use state::AppState;
