//! End-to-end account flows through the store runtime.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use linkfolio_profiles::mocks::{MemoryAuthProvider, MemoryDataStore};
use linkfolio_profiles::providers::{AuthProvider, DataStore};
use linkfolio_profiles::state::{AccountState, NewProfile};
use linkfolio_profiles::{AccountAction, AccountEnvironment, AccountReducer, SessionContext};
use linkfolio_runtime::Store;

type AccountStore = Store<
    AccountState,
    AccountAction,
    AccountEnvironment<MemoryAuthProvider, MemoryDataStore>,
    AccountReducer<MemoryAuthProvider, MemoryDataStore>,
>;

struct Harness {
    store: AccountStore,
    auth: MemoryAuthProvider,
    data: MemoryDataStore,
    session: SessionContext,
}

fn harness() -> Harness {
    let auth = MemoryAuthProvider::new();
    let data = MemoryDataStore::new();
    let session = SessionContext::new();
    let env = AccountEnvironment::new(
        Arc::new(auth.clone()),
        Arc::new(data.clone()),
        session.clone(),
    );
    Harness {
        store: Store::new(AccountState::default(), AccountReducer::new(), env),
        auth,
        data,
        session,
    }
}

async fn send_and_wait(store: &AccountStore, action: AccountAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait().await;
}

#[tokio::test]
async fn registration_signs_in_and_loads_profiles() {
    let h = harness();

    send_and_wait(
        &h.store,
        AccountAction::Register {
            email: "ana@mail.com".into(),
            password: "hunter2".into(),
            display_name: "Ana".into(),
        },
    )
    .await;

    h.store
        .state(|state| {
            assert!(!state.busy);
            assert!(state.error.is_none());
            let session = state.session.as_ref().unwrap();
            assert_eq!(session.email, "ana@mail.com");
            assert!(state.profiles.is_empty());
        })
        .await;

    assert!(h.session.current_user().is_some());
}

#[tokio::test]
async fn login_loads_the_owned_profiles() {
    let h = harness();
    let user_id = h.auth.seed_account("ana@mail.com", "hunter2", "Ana");
    h.data
        .create_profile(NewProfile {
            user_id,
            display_name: "Ana".into(),
            tagline: String::new(),
            description: String::new(),
            slug: "ana".into(),
            active: true,
        })
        .await
        .unwrap();

    send_and_wait(
        &h.store,
        AccountAction::Login {
            email: "ana@mail.com".into(),
            password: "hunter2".into(),
        },
    )
    .await;

    h.store
        .state(|state| {
            assert_eq!(state.profiles.len(), 1);
            assert_eq!(state.profiles[0].slug, "ana");
        })
        .await;
}

#[tokio::test]
async fn bad_credentials_fail_without_a_session() {
    let h = harness();
    h.auth.seed_account("ana@mail.com", "hunter2", "Ana");

    send_and_wait(
        &h.store,
        AccountAction::Login {
            email: "ana@mail.com".into(),
            password: "wrong".into(),
        },
    )
    .await;

    h.store
        .state(|state| {
            assert!(!state.busy);
            assert!(state.session.is_none());
            assert_eq!(state.error.as_deref(), Some("not authenticated"));
        })
        .await;
    assert!(h.session.current_user().is_none());
}

#[tokio::test]
async fn logout_clears_the_shared_session() {
    let h = harness();
    h.auth.seed_account("ana@mail.com", "hunter2", "Ana");

    send_and_wait(
        &h.store,
        AccountAction::Login {
            email: "ana@mail.com".into(),
            password: "hunter2".into(),
        },
    )
    .await;
    assert!(h.session.current_user().is_some());

    send_and_wait(&h.store, AccountAction::Logout).await;

    h.store
        .state(|state| {
            assert!(state.session.is_none());
            assert!(state.profiles.is_empty());
        })
        .await;
    assert!(h.session.current_user().is_none());
}

#[tokio::test]
async fn refresh_adopts_the_backend_session() {
    let h = harness();
    h.auth.seed_account("ana@mail.com", "hunter2", "Ana");

    // The backend has a session this store never saw (another surface
    // signed in)
    h.auth.sign_in("ana@mail.com", "hunter2").await.unwrap();

    send_and_wait(&h.store, AccountAction::RefreshSession).await;

    h.store
        .state(|state| {
            assert_eq!(
                state.session.as_ref().map(|s| s.email.as_str()),
                Some("ana@mail.com")
            );
        })
        .await;
    assert!(h.session.current_user().is_some());
}
