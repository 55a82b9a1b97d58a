//! End-to-end editor flows through the store runtime.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use linkfolio_profiles::config::EditorConfig;
use linkfolio_profiles::links::LinkKind;
use linkfolio_profiles::mocks::MemoryDataStore;
use linkfolio_profiles::providers::DataStore;
use linkfolio_profiles::state::{EditorPhase, EditorState, NewProfile, SlugCheck, UserId};
use linkfolio_profiles::{
    AuthSession, EditorAction, EditorEnvironment, EditorReducer, SessionContext,
};
use linkfolio_runtime::Store;
use linkfolio_testing::SequentialIds;

type EditorStore = Store<
    EditorState,
    EditorAction,
    EditorEnvironment<MemoryDataStore>,
    EditorReducer<MemoryDataStore>,
>;

fn signed_in_context(user_id: UserId) -> SessionContext {
    let session = SessionContext::new();
    session.set(Some(AuthSession {
        user_id,
        email: "ana@mail.com".into(),
        display_name: "Ana".into(),
        signed_in_at: Utc::now(),
    }));
    session
}

fn editor_store(data: MemoryDataStore, session: SessionContext) -> EditorStore {
    let env = EditorEnvironment::new(Arc::new(data), session, Arc::new(SequentialIds::new()))
        .with_config(EditorConfig::default().with_slug_check_debounce(Duration::from_millis(50)));
    Store::new(EditorState::default(), EditorReducer::new(), env)
}

async fn send_and_wait(store: &EditorStore, action: EditorAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait().await;
}

#[tokio::test]
async fn creating_a_profile_persists_slug_and_formatted_links() {
    let data = MemoryDataStore::new();
    let store = editor_store(data.clone(), signed_in_context(UserId::new()));

    send_and_wait(
        &store,
        EditorAction::SetDisplayName {
            value: "Ana Pérez".into(),
        },
    )
    .await;
    send_and_wait(
        &store,
        EditorAction::AddLink {
            kind: LinkKind::Instagram,
        },
    )
    .await;
    send_and_wait(
        &store,
        EditorAction::SetLinkUrl {
            index: 0,
            value: "instagram.com/ana.perez".into(),
        },
    )
    .await;
    send_and_wait(&store, EditorAction::Save).await;

    store
        .state(|state| {
            assert_eq!(state.phase, EditorPhase::Saved);
            assert!(state.profile_id.is_some());
            assert_eq!(state.saved_slug.as_deref(), Some("ana-perez"));
        })
        .await;

    let (profile, links) = data.profile_with_links_by_slug("ana-perez").await.unwrap();
    assert_eq!(profile.display_name, "Ana Pérez");
    assert!(profile.active);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "https://instagram.com/ana.perez");
    assert_eq!(links[0].position, 0);
}

#[tokio::test]
async fn removing_a_saved_link_deletes_its_row_on_the_next_save() {
    let data = MemoryDataStore::new();
    let store = editor_store(data.clone(), signed_in_context(UserId::new()));

    send_and_wait(&store, EditorAction::SetDisplayName { value: "Ana".into() }).await;
    send_and_wait(&store, EditorAction::AddLink { kind: LinkKind::Email }).await;
    send_and_wait(
        &store,
        EditorAction::SetLinkUrl {
            index: 0,
            value: "ana@mail.com".into(),
        },
    )
    .await;
    send_and_wait(&store, EditorAction::AddLink { kind: LinkKind::Whatsapp }).await;
    send_and_wait(
        &store,
        EditorAction::SetLinkUrl {
            index: 1,
            value: "+34 600 111 222".into(),
        },
    )
    .await;
    send_and_wait(&store, EditorAction::Save).await;
    assert_eq!(data.link_count(), 2);

    // Both links are persisted now, so the remove is a tombstone
    send_and_wait(&store, EditorAction::RemoveLink { index: 0 }).await;
    send_and_wait(&store, EditorAction::Save).await;

    store
        .state(|state| {
            assert_eq!(state.phase, EditorPhase::Saved);
            assert_eq!(state.links.len(), 1, "the tombstone is gone after the save");
        })
        .await;

    assert_eq!(data.link_count(), 1);
    let profile = data.profile_by_slug("ana").await.unwrap();
    let links = data.links_for_profile(profile.id).await.unwrap();
    assert_eq!(links[0].url, "https://wa.me/34600111222");
    assert_eq!(links[0].position, 0);
}

#[tokio::test]
async fn update_keeps_the_saved_slug_when_the_display_name_changes() {
    let data = MemoryDataStore::new();
    let store = editor_store(data.clone(), signed_in_context(UserId::new()));

    send_and_wait(&store, EditorAction::SetDisplayName { value: "Ana".into() }).await;
    send_and_wait(&store, EditorAction::Save).await;

    send_and_wait(
        &store,
        EditorAction::SetDisplayName {
            value: "Ana Pérez".into(),
        },
    )
    .await;
    send_and_wait(&store, EditorAction::Save).await;

    // The slug stays what was persisted; only an explicit custom slug moves it
    let profile = data.profile_by_slug("ana").await.unwrap();
    assert_eq!(profile.display_name, "Ana Pérez");
    assert_eq!(data.profile_count(), 1);
}

#[tokio::test]
async fn slug_conflict_on_create_fails_the_save_and_keeps_edits() {
    let data = MemoryDataStore::new();
    data.create_profile(NewProfile {
        user_id: UserId::new(),
        display_name: "First Ana".into(),
        tagline: String::new(),
        description: String::new(),
        slug: "ana".into(),
        active: true,
    })
    .await
    .unwrap();

    let store = editor_store(data.clone(), signed_in_context(UserId::new()));
    send_and_wait(&store, EditorAction::SetDisplayName { value: "Ana".into() }).await;
    send_and_wait(&store, EditorAction::Save).await;

    store
        .state(|state| {
            assert_eq!(state.phase, EditorPhase::Failed);
            assert_eq!(
                state.error.as_deref(),
                Some("the public name 'ana' is already in use")
            );
            assert_eq!(state.display_name, "Ana", "edits survive the failure");
            assert!(state.profile_id.is_none());
        })
        .await;

    assert_eq!(data.profile_count(), 1);
}

#[tokio::test]
async fn failed_link_insert_after_profile_create_is_a_partial_write() {
    let data = MemoryDataStore::new();
    let store = editor_store(data.clone(), signed_in_context(UserId::new()));

    send_and_wait(&store, EditorAction::SetDisplayName { value: "Ana".into() }).await;
    send_and_wait(&store, EditorAction::AddLink { kind: LinkKind::Email }).await;
    send_and_wait(
        &store,
        EditorAction::SetLinkUrl {
            index: 0,
            value: "ana@mail.com".into(),
        },
    )
    .await;

    // Create path: the profile row lands, the link insert fails
    data.fail_next_link_insert();
    send_and_wait(&store, EditorAction::Save).await;

    store
        .state(|state| {
            assert_eq!(state.phase, EditorPhase::Failed);
            let error = state.error.as_deref().unwrap();
            assert!(error.contains("partial write"), "got: {error}");
        })
        .await;

    assert_eq!(data.profile_count(), 1);
    assert_eq!(data.link_count(), 0);
}

#[tokio::test]
async fn failed_link_replacement_surfaces_as_a_partial_write() {
    let data = MemoryDataStore::new();
    let store = editor_store(data.clone(), signed_in_context(UserId::new()));

    send_and_wait(&store, EditorAction::SetDisplayName { value: "Ana".into() }).await;
    send_and_wait(&store, EditorAction::AddLink { kind: LinkKind::Email }).await;
    send_and_wait(
        &store,
        EditorAction::SetLinkUrl {
            index: 0,
            value: "ana@mail.com".into(),
        },
    )
    .await;
    send_and_wait(&store, EditorAction::Save).await;
    assert_eq!(data.link_count(), 1);

    // Update path: the delete succeeds, the re-insert fails
    data.fail_next_link_insert();
    send_and_wait(&store, EditorAction::Save).await;

    store
        .state(|state| {
            assert_eq!(state.phase, EditorPhase::Failed);
            let error = state.error.as_deref().unwrap();
            assert!(error.contains("partial write"), "got: {error}");
        })
        .await;

    // The store really is in the partial state the error describes
    assert_eq!(data.link_count(), 0);
    assert_eq!(data.profile_count(), 1);
}

#[tokio::test]
async fn save_after_logout_is_rejected() {
    let session = signed_in_context(UserId::new());
    let store = editor_store(MemoryDataStore::new(), session.clone());

    send_and_wait(&store, EditorAction::SetDisplayName { value: "Ana".into() }).await;
    session.clear();
    send_and_wait(&store, EditorAction::Save).await;

    store
        .state(|state| {
            assert_eq!(state.phase, EditorPhase::Failed);
            assert_eq!(
                state.error.as_deref(),
                Some("You must be logged in to save a profile")
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn debounced_slug_check_reports_a_taken_slug() {
    let data = MemoryDataStore::new();
    data.create_profile(NewProfile {
        user_id: UserId::new(),
        display_name: "Taken".into(),
        tagline: String::new(),
        description: String::new(),
        slug: "taken".into(),
        active: true,
    })
    .await
    .unwrap();

    let store = editor_store(data, signed_in_context(UserId::new()));

    send_and_wait(
        &store,
        EditorAction::SlugInput {
            candidate: "taken".into(),
        },
    )
    .await;

    store
        .state(|state| {
            assert_eq!(state.slug_check, SlugCheck::Unavailable);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn newer_slug_input_supersedes_the_pending_check() {
    let data = MemoryDataStore::new();
    data.create_profile(NewProfile {
        user_id: UserId::new(),
        display_name: "Taken".into(),
        tagline: String::new(),
        description: String::new(),
        slug: "taken".into(),
        active: true,
    })
    .await
    .unwrap();

    let store = editor_store(data, signed_in_context(UserId::new()));

    // Two inputs inside one debounce window: only the second check runs
    let first = store
        .send(EditorAction::SlugInput {
            candidate: "taken".into(),
        })
        .await
        .unwrap();
    let mut second = store
        .send(EditorAction::SlugInput {
            candidate: "free-name".into(),
        })
        .await
        .unwrap();
    second.wait().await;
    drop(first);

    store
        .state(|state| {
            assert_eq!(state.custom_slug.as_deref(), Some("free-name"));
            assert_eq!(state.slug_check, SlugCheck::Available);
        })
        .await;
}

#[tokio::test]
async fn load_by_slug_round_trips_through_the_editor() {
    let data = MemoryDataStore::new();
    let user_id = UserId::new();
    let store = editor_store(data.clone(), signed_in_context(user_id));

    send_and_wait(&store, EditorAction::SetDisplayName { value: "Ana".into() }).await;
    send_and_wait(&store, EditorAction::AddLink { kind: LinkKind::Website }).await;
    send_and_wait(
        &store,
        EditorAction::SetLinkTitle {
            index: 0,
            value: "My site".into(),
        },
    )
    .await;
    send_and_wait(
        &store,
        EditorAction::SetLinkUrl {
            index: 0,
            value: "example.com".into(),
        },
    )
    .await;
    send_and_wait(&store, EditorAction::Save).await;

    // A fresh editor session loads the same profile by slug
    let other = editor_store(data, signed_in_context(user_id));
    send_and_wait(
        &other,
        EditorAction::Load {
            id: None,
            slug: Some("ana".into()),
        },
    )
    .await;

    other
        .state(|state| {
            assert_eq!(state.phase, EditorPhase::Ready);
            assert_eq!(state.display_name, "Ana");
            assert_eq!(state.saved_slug.as_deref(), Some("ana"));
            assert_eq!(state.links.len(), 1);
            assert_eq!(state.links[0].url, "https://example.com");
            assert!(state.links[0].id.is_some());
            assert!(state.links[0].needs_name);
        })
        .await;
}
