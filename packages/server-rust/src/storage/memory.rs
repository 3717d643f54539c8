//! In-memory [`UserStore`] implementation backed by [`DashMap`].
//!
//! Suitable for development, testing, and demo deployments where the
//! collection fits in memory and need not survive a restart.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use roster_core::{User, UserDraft, UserId};

use super::store::{StoreError, UserStore};

/// Concurrent in-memory user store with an atomic ascending id counter.
pub struct MemoryStore {
    rows: DashMap<UserId, User>,
    next_id: AtomicI64,
}

impl MemoryStore {
    /// Creates an empty store whose first assigned id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemoryStore {
    fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.rows.iter().map(|row| row.value().clone()).collect();
        // DashMap iteration order is shard order, not key order.
        users.sort_by_key(|user| user.id);
        users
    }

    fn insert(&self, draft: &UserDraft) -> User {
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: Some(draft.name.clone()),
            email: Some(draft.email.clone()),
        };
        self.rows.insert(user.id, user.clone());
        user
    }

    fn update(&self, id: UserId, draft: &UserDraft) -> Result<User, StoreError> {
        let mut row = self.rows.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        let user = row.value_mut();
        user.name = Some(draft.name.clone());
        user.email = Some(draft.email.clone());
        Ok(user.clone())
    }

    fn remove(&self, id: UserId) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
