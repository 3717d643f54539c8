//! Scripted in-memory [`UserCollection`] double for controller tests.
//!
//! Beyond plain CRUD it supports per-operation failure injection, a call
//! log for "no network call" assertions, and one-shot completion gates for
//! observing in-flight state. Listings snapshot the rows at request time
//! while mutations apply at response time, so a gated listing returns data
//! as of its dispatch -- the shape needed to reproduce the stale-refresh
//! race.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use roster_core::{User, UserCollection, UserDraft, UserId};

pub(crate) struct ScriptedCollection {
    rows: Mutex<BTreeMap<UserId, User>>,
    next_id: AtomicI64,
    fail: Mutex<HashMap<&'static str, String>>,
    calls: Mutex<Vec<&'static str>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

impl ScriptedCollection {
    pub(crate) fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            fail: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Inserts rows as-is and moves the id counter past the highest id.
    pub(crate) fn seed(&self, users: impl IntoIterator<Item = User>) {
        let mut rows = self.rows.lock();
        for user in users {
            self.next_id.fetch_max(user.id + 1, Ordering::SeqCst);
            rows.insert(user.id, user);
        }
    }

    /// Makes every subsequent call of `op` fail with `message` until
    /// [`Self::clear_failure`] is called.
    pub(crate) fn fail_with(&self, op: &'static str, message: &str) {
        self.fail.lock().insert(op, message.to_string());
    }

    pub(crate) fn clear_failure(&self, op: &'static str) {
        self.fail.lock().remove(op);
    }

    /// Parks the next call of `op` until the returned handle is notified.
    pub(crate) fn gate_next(&self, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert(op, Arc::clone(&gate));
        gate
    }

    pub(crate) fn call_count(&self, op: &'static str) -> usize {
        self.calls.lock().iter().filter(|name| **name == op).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    fn begin(&self, op: &'static str) -> anyhow::Result<()> {
        self.calls.lock().push(op);
        if let Some(message) = self.fail.lock().get(op).cloned() {
            anyhow::bail!(message);
        }
        Ok(())
    }

    async fn pass_gate(&self, op: &'static str) {
        let gate = self.gates.lock().remove(op);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl UserCollection for ScriptedCollection {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        self.begin("list")?;
        let snapshot: Vec<User> = self.rows.lock().values().cloned().collect();
        self.pass_gate("list").await;
        Ok(snapshot)
    }

    async fn insert(&self, draft: &UserDraft) -> anyhow::Result<User> {
        self.begin("insert")?;
        self.pass_gate("insert").await;
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: Some(draft.name.clone()),
            email: Some(draft.email.clone()),
        };
        self.rows.lock().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_by_id(&self, id: UserId, draft: &UserDraft) -> anyhow::Result<User> {
        self.begin("update")?;
        self.pass_gate("update").await;
        let mut rows = self.rows.lock();
        let user = rows
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("user {id} not found"))?;
        user.name = Some(draft.name.clone());
        user.email = Some(draft.email.clone());
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: UserId) -> anyhow::Result<()> {
        self.begin("delete")?;
        self.pass_gate("delete").await;
        self.rows.lock().remove(&id);
        Ok(())
    }
}
