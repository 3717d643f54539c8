//! Wire envelopes shared between the HTTP transport and the server.
//!
//! The collection payloads themselves are the domain types in
//! [`crate::types`]; this module only holds the error envelope.

use serde::{Deserialize, Serialize};

/// JSON body carried by every non-2xx response from the reference server.
///
/// The `message` is the human-readable failure description that ends up in
/// the client's error slot verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error envelope from any displayable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
