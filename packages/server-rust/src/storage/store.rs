//! The user store contract.

use roster_core::{User, UserDraft, UserId};

/// Errors returned by store mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record matches the requested id.
    #[error("user {id} not found")]
    NotFound {
        /// The id that matched no record.
        id: UserId,
    },
}

/// A collection of user records with server-assigned ids.
///
/// Ids are assigned ascending and never reused within a process, so a
/// listing ordered by id is also ordered by creation.
///
/// Used as `Arc<dyn UserStore>`.
pub trait UserStore: Send + Sync {
    /// Returns all records, ordered ascending by id.
    fn list(&self) -> Vec<User>;

    /// Inserts a new record and returns it with its assigned id.
    fn insert(&self, draft: &UserDraft) -> User;

    /// Replaces the name and email of the record matching `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record matches.
    fn update(&self, id: UserId, draft: &UserDraft) -> Result<User, StoreError>;

    /// Removes the record matching `id`, returning whether one existed.
    fn remove(&self, id: UserId) -> bool;

    /// Number of records in the store.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool;
}
