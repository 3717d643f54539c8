//! The four synchronization flows over the shared state container.
//!
//! [`UsersController`] owns a [`UsersState`] behind a mutex and a handle to
//! the remote [`UserCollection`]. Each flow brackets its network call with
//! its in-flight flag, surfaces failures through the shared error slot, and
//! re-fetches the collection after every successful mutation. The lock is
//! never held across an await, so completions from overlapping flows apply
//! in arrival order.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use roster_core::{User, UserCollection, UserDraft, UserId};

use crate::state::{EditBuffer, UsersState};

/// Client-side view of a remote users collection.
///
/// All methods take `&self`; shared ownership via `Arc` lets a rendering
/// layer invoke flows from wherever its events fire.
pub struct UsersController {
    collection: Arc<dyn UserCollection>,
    state: Mutex<UsersState>,
}

impl UsersController {
    /// Creates a controller with an empty snapshot.
    ///
    /// Nothing is fetched here; the embedding view calls [`Self::refresh`]
    /// once on mount.
    #[must_use]
    pub fn new(collection: Arc<dyn UserCollection>) -> Self {
        Self {
            collection,
            state: Mutex::new(UsersState::default()),
        }
    }

    /// Returns a copy of the current state for rendering or inspection.
    #[must_use]
    pub fn state(&self) -> UsersState {
        self.state.lock().clone()
    }

    // -----------------------------------------------------------------------
    // Collection store
    // -----------------------------------------------------------------------

    /// Re-fetches the collection snapshot.
    ///
    /// On success the snapshot is replaced wholesale and the error slot is
    /// cleared; on failure the snapshot is left untouched and the error
    /// slot holds the failure description. `loading` transitions
    /// true -> false across the call regardless of outcome.
    ///
    /// Overlapping refreshes are neither deduplicated nor cancelled: each
    /// completion applies in arrival order, so a slow listing dispatched
    /// earlier can overwrite a newer one's results (last completion wins).
    pub async fn refresh(&self) {
        self.state.lock().loading = true;
        let outcome = self.collection.list().await;
        let mut state = self.state.lock();
        match outcome {
            Ok(users) => {
                debug!("listed {} users", users.len());
                state.users = users;
                state.error = None;
            }
            Err(err) => {
                warn!("users listing failed: {err:#}");
                state.error = Some(format!("{err:#}"));
            }
        }
        state.loading = false;
    }

    // -----------------------------------------------------------------------
    // Creation flow
    // -----------------------------------------------------------------------

    /// Updates the creation form's name field. Ignored while an insert is
    /// in flight (the form is locked).
    pub fn set_form_name(&self, value: impl Into<String>) {
        let mut state = self.state.lock();
        if state.create_locked() {
            return;
        }
        state.form.name = value.into();
    }

    /// Updates the creation form's email field. Ignored while an insert is
    /// in flight.
    pub fn set_form_email(&self, value: impl Into<String>) {
        let mut state = self.state.lock();
        if state.create_locked() {
            return;
        }
        state.form.email = value.into();
    }

    /// Submits the creation form as a new record.
    ///
    /// A silent no-op when either field is blank after trimming (no
    /// network call, no flag change, error slot untouched) and while a
    /// previous submit is still in flight. On success the form is cleared
    /// and the collection re-fetched; on failure the form is preserved for
    /// retry and the error slot holds the description.
    pub async fn submit_create(&self) {
        let draft = {
            let mut state = self.state.lock();
            if state.create_locked() || !state.form.is_complete() {
                return;
            }
            state.creating = true;
            state.form.clone()
        };

        let outcome = self.collection.insert(&draft).await;
        let created = {
            let mut state = self.state.lock();
            state.creating = false;
            match outcome {
                Ok(_) => {
                    state.form = UserDraft::default();
                    true
                }
                Err(err) => {
                    warn!("user insert failed: {err:#}");
                    state.error = Some(format!("{err:#}"));
                    false
                }
            }
        };
        if created {
            self.refresh().await;
        }
    }

    // -----------------------------------------------------------------------
    // Edit flow
    // -----------------------------------------------------------------------

    /// Opens an edit session for `user`, seeding the buffer with its
    /// current field values.
    ///
    /// Returns `false` without side effects when a session is already open
    /// -- at most one edit buffer exists at any time.
    pub fn start_edit(&self, user: &User) -> bool {
        let mut state = self.state.lock();
        if !state.can_start_edit() {
            return false;
        }
        state.edit = Some(EditBuffer::seeded(user));
        true
    }

    /// Discards the edit buffer and returns to idle. No network call.
    /// Ignored while a save is in flight (the cancel control is locked).
    pub fn cancel_edit(&self) {
        let mut state = self.state.lock();
        if state.edit_locked() {
            return;
        }
        state.edit = None;
    }

    /// Updates the edit buffer's name field. Ignored when no session is
    /// open or while a save is in flight.
    pub fn set_edit_name(&self, value: impl Into<String>) {
        let mut state = self.state.lock();
        if state.edit_locked() {
            return;
        }
        if let Some(buffer) = state.edit.as_mut() {
            buffer.name = value.into();
        }
    }

    /// Updates the edit buffer's email field. Ignored when no session is
    /// open or while a save is in flight.
    pub fn set_edit_email(&self, value: impl Into<String>) {
        let mut state = self.state.lock();
        if state.edit_locked() {
            return;
        }
        if let Some(buffer) = state.edit.as_mut() {
            buffer.email = value.into();
        }
    }

    /// Commits the edit buffer for its own target id.
    ///
    /// A no-op when no session is open, when `id` is not the buffer's
    /// target, when a save is already in flight, or when either buffer
    /// field is blank after trimming (the session stays open). On success
    /// the buffer is discarded and the collection re-fetched; on failure
    /// the buffer and the open session are preserved so the user can retry
    /// or cancel.
    pub async fn commit_edit(&self, id: UserId) {
        let draft = {
            let mut state = self.state.lock();
            if state.edit_locked() {
                return;
            }
            let Some(buffer) = state.edit.as_ref() else {
                return;
            };
            if buffer.id != id {
                return;
            }
            let draft = buffer.draft();
            if !draft.is_complete() {
                return;
            }
            state.updating = true;
            draft
        };

        let outcome = self.collection.update_by_id(id, &draft).await;
        let committed = {
            let mut state = self.state.lock();
            state.updating = false;
            match outcome {
                Ok(_) => {
                    state.edit = None;
                    true
                }
                Err(err) => {
                    warn!("user update failed: {err:#}");
                    state.error = Some(format!("{err:#}"));
                    false
                }
            }
        };
        if committed {
            self.refresh().await;
        }
    }

    // -----------------------------------------------------------------------
    // Delete flow
    // -----------------------------------------------------------------------

    /// Deletes the row with the given id.
    ///
    /// A no-op while another delete is in flight -- the single `deleting`
    /// slot always names the row actually mid-deletion. The flag is
    /// cleared when the call completes regardless of outcome. On success
    /// the collection is re-fetched; on failure the snapshot is left as-is
    /// and the error slot holds the description.
    pub async fn delete_row(&self, id: UserId) {
        {
            let mut state = self.state.lock();
            if state.deleting.is_some() {
                return;
            }
            state.deleting = Some(id);
        }

        let outcome = self.collection.delete_by_id(id).await;
        let deleted = {
            let mut state = self.state.lock();
            state.deleting = None;
            match outcome {
                Ok(()) => true,
                Err(err) => {
                    warn!("user delete failed: {err:#}");
                    state.error = Some(format!("{err:#}"));
                    false
                }
            }
        };
        if deleted {
            self.refresh().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedCollection;

    fn user(id: UserId, name: &str, email: &str) -> User {
        User {
            id,
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        }
    }

    fn fixture() -> (Arc<ScriptedCollection>, Arc<UsersController>) {
        let mock = Arc::new(ScriptedCollection::new());
        let controller =
            UsersController::new(Arc::clone(&mock) as Arc<dyn UserCollection>);
        (mock, Arc::new(controller))
    }

    async fn wait_for_calls(mock: &ScriptedCollection, op: &'static str, count: usize) {
        while mock.call_count(op) < count {
            tokio::task::yield_now().await;
        }
    }

    // --- Collection store ---

    #[tokio::test]
    async fn refresh_replaces_snapshot_and_clears_error() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);

        mock.fail_with("delete", "boom");
        controller.delete_row(1).await;
        assert_eq!(controller.state().error.as_deref(), Some("boom"));

        controller.refresh().await;
        let state = controller.state();
        assert_eq!(state.users, vec![user(1, "Bob", "b@x.com")]);
        assert_eq!(state.error, None);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn refresh_twice_yields_identical_snapshots() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com"), user(2, "Ann", "a@x.com")]);

        controller.refresh().await;
        let first = controller.state();
        controller.refresh().await;
        let second = controller.state();

        assert_eq!(first.users, second.users);
        assert!(!first.loading);
        assert!(!second.loading);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_snapshot_and_sets_error() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;

        mock.fail_with("list", "backend unavailable");
        controller.refresh().await;

        let state = controller.state();
        assert_eq!(state.users, vec![user(1, "Bob", "b@x.com")]);
        assert_eq!(state.error.as_deref(), Some("backend unavailable"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn stale_listing_completion_overwrites_newer_results() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;

        // Dispatch a listing that will sit on the wire while a create (and
        // its own refresh) completes, then let it arrive last.
        let gate = mock.gate_next("list");
        let stale = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.refresh().await })
        };
        wait_for_calls(&mock, "list", 2).await;

        controller.set_form_name("Cara");
        controller.set_form_email("c@x.com");
        controller.submit_create().await;
        assert_eq!(controller.state().users.len(), 2);

        gate.notify_one();
        stale.await.unwrap();

        // Last completion wins: the late listing reinstates its older view.
        assert_eq!(controller.state().users, vec![user(1, "Bob", "b@x.com")]);
    }

    // --- Creation flow ---

    #[tokio::test]
    async fn create_round_trip_assigns_server_id_and_clears_form() {
        let (mock, controller) = fixture();

        controller.set_form_name("Ann");
        controller.set_form_email("a@x.com");
        controller.submit_create().await;

        let state = controller.state();
        assert_eq!(state.users, vec![user(1, "Ann", "a@x.com")]);
        assert!(state.form.is_empty());
        assert!(!state.creating);
        assert_eq!(state.error, None);
        assert_eq!(mock.call_count("insert"), 1);
        assert_eq!(mock.call_count("list"), 1);
    }

    #[tokio::test]
    async fn blank_fields_short_circuit_without_network_or_error_change() {
        let (mock, controller) = fixture();

        mock.fail_with("delete", "boom");
        controller.delete_row(1).await;
        mock.clear_failure("delete");
        let baseline = mock.total_calls();

        controller.set_form_name("");
        controller.set_form_email("a@x.com");
        controller.submit_create().await;

        controller.set_form_name("Ann");
        controller.set_form_email("  ");
        controller.submit_create().await;

        let state = controller.state();
        assert_eq!(mock.total_calls(), baseline);
        assert!(!state.creating);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn failed_create_preserves_form_and_skips_refresh() {
        let (mock, controller) = fixture();
        mock.fail_with("insert", "duplicate email");

        controller.set_form_name("Ann");
        controller.set_form_email("a@x.com");
        controller.submit_create().await;

        let state = controller.state();
        assert_eq!(state.form, UserDraft::new("Ann", "a@x.com"));
        assert!(!state.creating);
        assert_eq!(state.error.as_deref(), Some("duplicate email"));
        assert_eq!(mock.call_count("list"), 0);
    }

    #[tokio::test]
    async fn form_is_locked_while_insert_is_in_flight() {
        let (mock, controller) = fixture();
        controller.set_form_name("Cara");
        controller.set_form_email("c@x.com");

        let gate = mock.gate_next("insert");
        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit_create().await })
        };
        wait_for_calls(&mock, "insert", 1).await;

        assert!(controller.state().creating);
        controller.set_form_name("Mallory");
        controller.set_form_email("m@x.com");
        assert_eq!(controller.state().form, UserDraft::new("Cara", "c@x.com"));

        // A second submit while locked must not dispatch another insert.
        controller.submit_create().await;
        assert_eq!(mock.call_count("insert"), 1);

        gate.notify_one();
        pending.await.unwrap();
        assert!(controller.state().form.is_empty());
        assert!(!controller.state().creating);
    }

    // --- Edit flow ---

    #[tokio::test]
    async fn second_start_edit_is_rejected_while_session_open() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com"), user(2, "Ann", "a@x.com")]);
        controller.refresh().await;

        assert!(controller.start_edit(&user(1, "Bob", "b@x.com")));
        assert!(!controller.start_edit(&user(2, "Ann", "a@x.com")));
        assert_eq!(controller.state().editing_id(), Some(1));

        controller.cancel_edit();
        assert!(controller.start_edit(&user(2, "Ann", "a@x.com")));
    }

    #[tokio::test]
    async fn cancel_edit_is_pure() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;
        let baseline = mock.total_calls();
        let before = controller.state().users.clone();

        controller.start_edit(&user(1, "Bob", "b@x.com"));
        controller.set_edit_name("Robert");
        controller.cancel_edit();

        let state = controller.state();
        assert_eq!(state.editing_id(), None);
        assert_eq!(state.users, before);
        assert_eq!(mock.total_calls(), baseline);
    }

    #[tokio::test]
    async fn commit_edit_updates_row_and_closes_session() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;

        controller.start_edit(&user(1, "Bob", "b@x.com"));
        controller.set_edit_name("Robert");
        controller.commit_edit(1).await;

        let state = controller.state();
        assert_eq!(state.users, vec![user(1, "Robert", "b@x.com")]);
        assert_eq!(state.editing_id(), None);
        assert!(!state.updating);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn commit_with_blank_field_keeps_session_open() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;
        let baseline = mock.total_calls();

        controller.start_edit(&user(1, "Bob", "b@x.com"));
        controller.set_edit_name("   ");
        controller.commit_edit(1).await;

        let state = controller.state();
        assert_eq!(state.editing_id(), Some(1));
        assert!(!state.updating);
        assert_eq!(mock.total_calls(), baseline);
    }

    #[tokio::test]
    async fn commit_for_a_different_id_is_a_noop() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;
        let baseline = mock.total_calls();

        controller.start_edit(&user(1, "Bob", "b@x.com"));
        controller.commit_edit(2).await;

        assert_eq!(controller.state().editing_id(), Some(1));
        assert_eq!(mock.total_calls(), baseline);
    }

    #[tokio::test]
    async fn failed_update_preserves_buffer_for_retry() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;

        controller.start_edit(&user(1, "Bob", "b@x.com"));
        controller.set_edit_name("Robert");
        mock.fail_with("update", "row is locked");
        controller.commit_edit(1).await;

        let state = controller.state();
        let buffer = state.edit.expect("session should stay open");
        assert_eq!(buffer.name, "Robert");
        assert_eq!(buffer.email, "b@x.com");
        assert!(!state.updating);
        assert_eq!(state.error.as_deref(), Some("row is locked"));

        // Retry succeeds once the backend recovers.
        mock.clear_failure("update");
        controller.commit_edit(1).await;
        assert_eq!(controller.state().users, vec![user(1, "Robert", "b@x.com")]);
    }

    // --- Delete flow ---

    #[tokio::test]
    async fn delete_flag_names_the_row_while_in_flight() {
        let (mock, controller) = fixture();
        mock.seed([user(7, "Bob", "b@x.com"), user(8, "Ann", "a@x.com")]);
        controller.refresh().await;

        let gate = mock.gate_next("delete");
        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.delete_row(7).await })
        };
        wait_for_calls(&mock, "delete", 1).await;

        let state = controller.state();
        assert!(state.is_deleting(7));
        assert!(!state.is_deleting(8));

        gate.notify_one();
        pending.await.unwrap();

        let state = controller.state();
        assert_eq!(state.deleting, None);
        assert_eq!(state.users, vec![user(8, "Ann", "a@x.com")]);
    }

    #[tokio::test]
    async fn second_delete_while_one_is_in_flight_is_a_noop() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com"), user(2, "Ann", "a@x.com")]);
        controller.refresh().await;

        let gate = mock.gate_next("delete");
        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.delete_row(1).await })
        };
        wait_for_calls(&mock, "delete", 1).await;

        controller.delete_row(2).await;
        assert_eq!(mock.call_count("delete"), 1);
        assert!(controller.state().is_deleting(1));

        gate.notify_one();
        pending.await.unwrap();
        assert_eq!(controller.state().users, vec![user(2, "Ann", "a@x.com")]);
    }

    #[tokio::test]
    async fn failed_delete_clears_flag_and_skips_refresh() {
        let (mock, controller) = fixture();
        mock.seed([user(1, "Bob", "b@x.com")]);
        controller.refresh().await;

        mock.fail_with("delete", "foreign key violation");
        controller.delete_row(1).await;

        let state = controller.state();
        assert_eq!(state.deleting, None);
        assert_eq!(state.users, vec![user(1, "Bob", "b@x.com")]);
        assert_eq!(state.error.as_deref(), Some("foreign key violation"));
        assert_eq!(mock.call_count("list"), 1);
    }
}
