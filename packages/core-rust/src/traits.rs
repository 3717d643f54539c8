//! The remote-collection contract consumed by the client core.

use async_trait::async_trait;

use crate::types::{User, UserDraft, UserId};

/// A remote "users" collection offering the four CRUD operations.
///
/// Every method resolves to either a payload or an error description; the
/// client core never distinguishes failure kinds beyond the rendered
/// message, so implementations are free to chain whatever context they
/// have (transport failure, HTTP status, decode error) onto the returned
/// `anyhow::Error`.
///
/// Used as `Arc<dyn UserCollection>`.
#[async_trait]
pub trait UserCollection: Send + Sync {
    /// Lists all records, ordered ascending by id.
    async fn list(&self) -> anyhow::Result<Vec<User>>;

    /// Inserts a new record with a server-assigned id.
    ///
    /// Returns the inserted record. Callers that re-fetch after every
    /// mutation may discard it.
    async fn insert(&self, draft: &UserDraft) -> anyhow::Result<User>;

    /// Replaces the name and email of the record matching `id`.
    ///
    /// # Errors
    ///
    /// Fails when no record matches `id`.
    async fn update_by_id(&self, id: UserId, draft: &UserDraft) -> anyhow::Result<User>;

    /// Deletes the record matching `id`, if any.
    ///
    /// Deleting an id with no matching record is not an error -- the
    /// operation is idempotent, matching the delete-by-filter semantics of
    /// the managed backends this contract fronts.
    async fn delete_by_id(&self, id: UserId) -> anyhow::Result<()>;
}
