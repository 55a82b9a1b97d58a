//! In-memory auth provider.

use crate::error::ProfileError;
use crate::providers::AuthProvider;
use crate::session::AuthSession;
use crate::state::UserId;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

struct Account {
    user_id: UserId,
    password: String,
    display_name: String,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    session: Option<AuthSession>,
}

/// In-memory implementation of [`AuthProvider`].
#[derive(Clone, Default)]
pub struct MemoryAuthProvider {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryAuthProvider {
    /// Create a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without signing in, returning its user id.
    pub fn seed_account(&self, email: &str, password: &str, display_name: &str) -> UserId {
        let user_id = UserId::new();
        self.lock().accounts.insert(
            email.to_string(),
            Account {
                user_id,
                password: password.to_string(),
                display_name: display_name.to_string(),
            },
        );
        user_id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthProvider for MemoryAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthSession, ProfileError> {
        let mut inner = self.lock();

        if inner.accounts.contains_key(email) {
            return Err(ProfileError::validation("email is already registered"));
        }

        let user_id = UserId::new();
        inner.accounts.insert(
            email.to_string(),
            Account {
                user_id,
                password: password.to_string(),
                display_name: display_name.to_string(),
            },
        );

        let session = AuthSession {
            user_id,
            email: email.to_string(),
            display_name: display_name.to_string(),
            signed_in_at: Utc::now(),
        };
        inner.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProfileError> {
        let mut inner = self.lock();

        let account = inner
            .accounts
            .get(email)
            .filter(|a| a.password == password)
            .ok_or(ProfileError::Unauthenticated)?;

        let session = AuthSession {
            user_id: account.user_id,
            email: email.to_string(),
            display_name: account.display_name.clone(),
            signed_in_at: Utc::now(),
        };
        inner.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ProfileError> {
        self.lock().session = None;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, ProfileError> {
        Ok(self.lock().session.clone())
    }
}
