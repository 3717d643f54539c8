//! Roster Server — reference backend for the users collection: an
//! in-memory store behind an axum HTTP API with a managed lifecycle.

pub mod network;
pub mod storage;

pub use network::{HttpModule, ServerConfig};
pub use storage::{MemoryStore, StoreError, UserStore};
