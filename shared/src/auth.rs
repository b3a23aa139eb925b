//! Auth context resolved by the external auth collaborator
//!
//! Token verification happens outside the core. The API layer resolves the
//! actor and hands the outcome to the gateway, which must check it before
//! touching persistence.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "state", content = "message")]
pub enum AuthState {
    Ok,
    /// Upstream verification failed; message is what the resolver reported
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i64,
    #[serde(flatten)]
    pub state: AuthState,
}

impl AuthContext {
    pub fn ok(user_id: i64) -> Self {
        Self {
            user_id,
            state: AuthState::Ok,
        }
    }

    pub fn failed(user_id: i64, message: impl Into<String>) -> Self {
        Self {
            user_id,
            state: AuthState::Failed(message.into()),
        }
    }

    /// Upstream failure message, if any
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            AuthState::Ok => None,
            AuthState::Failed(msg) => Some(msg.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_surfaces() {
        assert_eq!(AuthContext::ok(1).failure(), None);
        let ctx = AuthContext::failed(1, "token expired");
        assert_eq!(ctx.failure(), Some("token expired"));
    }
}
