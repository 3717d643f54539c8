//! Storage for the users collection.
//!
//! [`UserStore`] is the contract the HTTP handlers operate against;
//! [`MemoryStore`] is the in-process implementation backing the reference
//! server and its tests.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::{StoreError, UserStore};
