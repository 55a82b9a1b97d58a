//! Account reducer: authentication and the owned-profile list.
//!
//! Login, registration, and logout all go through the auth backend; on
//! success the shared [`SessionContext`] is updated so the editor's save
//! precondition sees the same session. A successful login or registration
//! chains straight into fetching the user's profiles.

use crate::actions::AccountAction;
use crate::environment::AccountEnvironment;
use crate::providers::{AuthProvider, DataStore};
use crate::state::AccountState;
use linkfolio_core::effect::Effect;
use linkfolio_core::reducer::Reducer;
use linkfolio_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Account reducer.
pub struct AccountReducer<A, D> {
    _phantom: std::marker::PhantomData<(A, D)>,
}

// Manual impls: the provider type parameters carry no data
impl<A, D> Clone for AccountReducer<A, D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A, D> std::fmt::Debug for AccountReducer<A, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccountReducer")
    }
}

impl<A, D> AccountReducer<A, D> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A, D> Default for AccountReducer<A, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, D> Reducer for AccountReducer<A, D>
where
    A: AuthProvider + 'static,
    D: DataStore + 'static,
{
    type State = AccountState;
    type Action = AccountAction;
    type Environment = AccountEnvironment<A, D>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AccountAction::Login { email, password } => {
                state.busy = true;
                state.error = None;

                let auth = Arc::clone(&env.auth);
                smallvec![Effect::future(async move {
                    Some(match auth.sign_in(&email, &password).await {
                        Ok(session) => AccountAction::LoggedIn { session },
                        Err(error) => AccountAction::AccountFailed {
                            message: error.to_string(),
                        },
                    })
                })]
            }

            AccountAction::Register {
                email,
                password,
                display_name,
            } => {
                state.busy = true;
                state.error = None;

                let auth = Arc::clone(&env.auth);
                smallvec![Effect::future(async move {
                    Some(
                        match auth.sign_up(&email, &password, &display_name).await {
                            Ok(session) => AccountAction::Registered { session },
                            Err(error) => AccountAction::AccountFailed {
                                message: error.to_string(),
                            },
                        },
                    )
                })]
            }

            AccountAction::LoggedIn { session } | AccountAction::Registered { session } => {
                metrics::counter!("account.sign_ins").increment(1);
                tracing::info!(user = %session.user_id, "signed in");

                state.busy = false;
                state.error = None;
                env.session.set(Some(session.clone()));
                let user_id = session.user_id;
                state.session = Some(session);

                let data = Arc::clone(&env.data);
                smallvec![Effect::future(async move {
                    Some(match data.profiles_for_user(user_id).await {
                        Ok(profiles) => AccountAction::ProfilesLoaded { profiles },
                        Err(error) => AccountAction::AccountFailed {
                            message: error.to_string(),
                        },
                    })
                })]
            }

            AccountAction::Logout => {
                state.busy = true;
                state.error = None;

                let auth = Arc::clone(&env.auth);
                smallvec![Effect::future(async move {
                    Some(match auth.sign_out().await {
                        Ok(()) => AccountAction::LoggedOut,
                        Err(error) => AccountAction::AccountFailed {
                            message: error.to_string(),
                        },
                    })
                })]
            }

            AccountAction::LoggedOut => {
                tracing::info!("signed out");
                state.busy = false;
                state.session = None;
                state.profiles.clear();
                env.session.clear();
                smallvec![Effect::None]
            }

            AccountAction::RefreshSession => {
                let auth = Arc::clone(&env.auth);
                smallvec![Effect::future(async move {
                    Some(match auth.current_session().await {
                        Ok(session) => AccountAction::SessionRefreshed { session },
                        Err(error) => AccountAction::AccountFailed {
                            message: error.to_string(),
                        },
                    })
                })]
            }

            AccountAction::SessionRefreshed { session } => {
                env.session.set(session.clone());
                state.session = session;
                if state.session.is_none() {
                    state.profiles.clear();
                }
                smallvec![Effect::None]
            }

            AccountAction::FetchProfiles => {
                let Some(session) = &state.session else {
                    state.error = Some("not authenticated".to_string());
                    return smallvec![Effect::None];
                };

                let user_id = session.user_id;
                let data = Arc::clone(&env.data);
                smallvec![Effect::future(async move {
                    Some(match data.profiles_for_user(user_id).await {
                        Ok(profiles) => AccountAction::ProfilesLoaded { profiles },
                        Err(error) => AccountAction::AccountFailed {
                            message: error.to_string(),
                        },
                    })
                })]
            }

            AccountAction::ProfilesLoaded { profiles } => {
                state.busy = false;
                state.profiles = profiles;
                smallvec![Effect::None]
            }

            AccountAction::AccountFailed { message } => {
                metrics::counter!("account.failures").increment(1);
                tracing::warn!(%message, "account operation failed");

                state.busy = false;
                state.error = Some(message);
                smallvec![Effect::None]
            }
        }
    }
}
