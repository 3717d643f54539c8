//! Roster Core — user records, drafts, and the remote-collection contract.

pub mod messages;
pub mod traits;
pub mod types;

pub use messages::ErrorBody;
pub use traits::UserCollection;
pub use types::{User, UserDraft, UserId};
