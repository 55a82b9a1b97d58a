//! Authentication provider trait.

use crate::error::ProfileError;
use crate::session::AuthSession;
use std::future::Future;

/// Account operations against the auth backend.
pub trait AuthProvider: Send + Sync {
    /// Register a new account and establish a session.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> impl Future<Output = Result<AuthSession, ProfileError>> + Send;

    /// Authenticate and establish a session.
    ///
    /// Fails with [`ProfileError::Unauthenticated`] on bad credentials.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthSession, ProfileError>> + Send;

    /// End the current session.
    fn sign_out(&self) -> impl Future<Output = Result<(), ProfileError>> + Send;

    /// The session the backend currently considers active, if any.
    fn current_session(
        &self,
    ) -> impl Future<Output = Result<Option<AuthSession>, ProfileError>> + Send;
}
