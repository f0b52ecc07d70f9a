use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated identity attached to a request or realtime connection.
///
/// Ephemeral: carried by the session token, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub username: String,
}

impl SessionIdentity {
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}
