//! Domain types shared by the client core and the reference backend.
//!
//! [`User`] and [`UserDraft`] double as the JSON wire DTOs -- the HTTP
//! protocol carries them verbatim, so there is no separate request/response
//! struct layer for the collection operations.

use serde::{Deserialize, Serialize};

/// Server-assigned key of a user record.
///
/// Opaque to the client apart from its ordering: listings are returned
/// ascending by id, and ids are never reused within a backend process.
pub type UserId = i64;

/// One user record as owned by the remote collection.
///
/// Name and email are nullable in the backing store; rows created through
/// the current API always carry both, but older rows may not, so consumers
/// must tolerate absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id, immutable once created.
    pub id: UserId,
    /// Display name, if set.
    pub name: Option<String>,
    /// Contact email, if set.
    pub email: Option<String>,
}

/// Proposed field values for a user, prior to insert or update.
///
/// This is both the creation form buffer's value type and the request body
/// for `insert` and `update-by-id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    /// Candidate display name.
    pub name: String,
    /// Candidate contact email.
    pub email: String,
}

impl UserDraft {
    /// Creates a draft from the given field values.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns `true` when both fields are non-empty after trimming
    /// surrounding whitespace.
    ///
    /// This is the only input validation in the system: the client uses it
    /// as a silent submit gate, the server as a 422 precondition. The raw
    /// (untrimmed) values are what get persisted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }

    /// Returns `true` when both fields are empty (an untouched form).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}
