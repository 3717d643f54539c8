//! Roster Client — the client-side CRUD synchronization core.
//!
//! Keeps a local snapshot of a remote users collection consistent across
//! concurrent, independently-completing asynchronous operations. The state
//! container lives in [`state`], the four flows (refresh, create, edit,
//! delete) in [`controller`], and the HTTP transport for the
//! [`roster_core::UserCollection`] contract in [`http`].

pub mod controller;
pub mod http;
pub mod state;

pub use controller::UsersController;
pub use http::HttpCollection;
pub use state::{EditBuffer, UsersState};

#[cfg(test)]
pub(crate) mod testing;
