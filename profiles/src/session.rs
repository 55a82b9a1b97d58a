//! Session context shared between the account manager and the editor.
//!
//! The session is an explicit, constructed object handed to every
//! environment that needs it, not a hidden global. It is written only by
//! account-reducer effects and read synchronously by the editor's save
//! precondition.

use crate::state::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated user
    pub user_id: UserId,
    /// Account email
    pub email: String,
    /// Account display name
    pub display_name: String,
    /// When the session was established
    pub signed_in_at: DateTime<Utc>,
}

/// Process-wide holder of the current session.
///
/// Cheap to clone; all clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionContext {
    /// Create an empty (signed-out) context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthSession> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current session.
    pub fn set(&self, session: Option<AuthSession>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Sign out: drop the current session.
    pub fn clear(&self) {
        self.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AuthSession {
        AuthSession {
            user_id: UserId::new(),
            email: "ana@mail.com".into(),
            display_name: "Ana".into(),
            signed_in_at: Utc::now(),
        }
    }

    #[test]
    fn clones_share_the_same_slot() {
        let ctx = SessionContext::new();
        let other = ctx.clone();

        assert!(ctx.current_user().is_none());
        other.set(Some(session()));
        assert!(ctx.current_user().is_some());

        ctx.clear();
        assert!(other.current_user().is_none());
    }
}
