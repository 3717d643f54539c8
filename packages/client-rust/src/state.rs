//! The shared state container behind the users view.
//!
//! One [`UsersState`] instance backs all four flows. Each flow writes only
//! the slots it owns; the guard predicates re-express the view's "disable
//! competing controls" rules as logic, so the invariants hold even when no
//! rendering layer is attached.

use roster_core::{User, UserDraft, UserId};

/// Staging area for one row's proposed new values, prior to commit.
///
/// At most one instance exists at a time (one edit session across the
/// whole view). Created by `start_edit`, destroyed on save-success or
/// explicit cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    /// Id of the row being edited.
    pub id: UserId,
    /// Proposed display name.
    pub name: String,
    /// Proposed contact email.
    pub email: String,
}

impl EditBuffer {
    /// Creates a buffer seeded with the record's current field values,
    /// substituting the empty string for absent ones.
    #[must_use]
    pub fn seeded(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
        }
    }

    /// The buffer's current field values as an update payload.
    #[must_use]
    pub fn draft(&self) -> UserDraft {
        UserDraft::new(self.name.clone(), self.email.clone())
    }
}

/// All state slots of the users view.
///
/// - `users`, `loading`, `error` belong to the collection store
/// - `form`, `creating` to the creation flow
/// - `edit`, `updating` to the edit flow
/// - `deleting` to the delete flow
///
/// `error` is the single latest-error slot shared by all flows: the most
/// recent failing operation overwrites it, and the next successful listing
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct UsersState {
    /// Cached snapshot of the remote collection, ascending by id.
    /// Replaced wholesale by each completed listing, never patched.
    pub users: Vec<User>,
    /// A listing is in flight.
    pub loading: bool,
    /// Description of the most recent failure, if any.
    pub error: Option<String>,
    /// The creation form buffer.
    pub form: UserDraft,
    /// An insert is in flight.
    pub creating: bool,
    /// The single edit session, if one is open.
    pub edit: Option<EditBuffer>,
    /// An update is in flight.
    pub updating: bool,
    /// Id of the row whose delete is in flight, if any.
    pub deleting: Option<UserId>,
}

impl UsersState {
    /// A new edit session may open only when none exists.
    #[must_use]
    pub fn can_start_edit(&self) -> bool {
        self.edit.is_none()
    }

    /// Id of the row currently being edited, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<UserId> {
        self.edit.as_ref().map(|buffer| buffer.id)
    }

    /// The creation form and its submit control are locked while an
    /// insert is in flight.
    #[must_use]
    pub fn create_locked(&self) -> bool {
        self.creating
    }

    /// The edit buffer fields and save/cancel controls are locked while
    /// an update is in flight.
    #[must_use]
    pub fn edit_locked(&self) -> bool {
        self.updating
    }

    /// Whether the given row's delete is in flight.
    #[must_use]
    pub fn is_deleting(&self, id: UserId) -> bool {
        self.deleting == Some(id)
    }
}
