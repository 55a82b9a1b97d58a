//! Linkfolio demo binary
//!
//! Runs the whole profile engine against the in-memory providers: register
//! an account, build a profile in the editor, save it, and export its QR
//! code.

use std::sync::Arc;
use std::time::Duration;

use linkfolio_core::environment::RandomIds;
use linkfolio_profiles::links::LinkKind;
use linkfolio_profiles::mocks::{MemoryAuthProvider, MemoryDataStore, MockQrRenderer};
use linkfolio_profiles::providers::DataStore;
use linkfolio_profiles::qr::{QrFormat, export_profile_qr};
use linkfolio_profiles::{
    AccountAction, AccountEnvironment, AccountReducer, AccountState, EditorAction,
    EditorEnvironment, EditorReducer, EditorState, SessionContext,
};
use linkfolio_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkfolio_demo=debug,linkfolio_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Linkfolio: link-in-bio profile engine ===\n");

    // Shared infrastructure: one data store, one auth backend, one session
    // slot shared by the account and editor stores
    let data = MemoryDataStore::new();
    let auth = MemoryAuthProvider::new();
    let session = SessionContext::new();

    let account_store = Store::new(
        AccountState::default(),
        AccountReducer::new(),
        AccountEnvironment::new(Arc::new(auth), Arc::new(data.clone()), session.clone()),
    );

    println!(">>> Registering ana@mail.com");
    send(&account_store, AccountAction::Register {
        email: "ana@mail.com".into(),
        password: "hunter2".into(),
        display_name: "Ana".into(),
    })
    .await;
    let signed_in = account_store.state(|s| s.session.is_some()).await;
    println!("Signed in: {signed_in}");

    let editor_store = Store::new(
        EditorState::default(),
        EditorReducer::new(),
        EditorEnvironment::new(Arc::new(data.clone()), session, Arc::new(RandomIds)),
    );

    println!("\n>>> Building a profile in the editor");
    send(&editor_store, EditorAction::SetDisplayName {
        value: "Ana Pérez".into(),
    })
    .await;
    send(&editor_store, EditorAction::SetTagline {
        value: "Ceramics and small-batch coffee".into(),
    })
    .await;
    send(&editor_store, EditorAction::AddLink {
        kind: LinkKind::Instagram,
    })
    .await;
    send(&editor_store, EditorAction::SetLinkUrl {
        index: 0,
        value: "instagram.com/ana.perez".into(),
    })
    .await;
    send(&editor_store, EditorAction::AddLink {
        kind: LinkKind::Whatsapp,
    })
    .await;
    send(&editor_store, EditorAction::SetLinkUrl {
        index: 1,
        value: "+54 11 1234-5678".into(),
    })
    .await;

    println!("\n>>> Saving");
    send(&editor_store, EditorAction::Save).await;

    let (phase, url) = editor_store
        .state(|s| (s.phase, s.public_url("https://linkfol.io")))
        .await;
    println!("Save finished in phase {phase:?}");
    println!("Public page: {url}");

    let links = data
        .profile_with_links_by_slug("ana-perez")
        .await
        .map(|(_, links)| links)
        .unwrap_or_default();
    for link in &links {
        println!("  [{}] {} -> {}", link.position, link.title, link.url);
    }

    println!("\n>>> Exporting the QR code");
    let renderer = MockQrRenderer::new();
    match export_profile_qr(&renderer, "https://linkfol.io", "ana-perez", QrFormat::Png).await {
        Ok(download) => println!("Wrote {} ({} bytes)", download.filename, download.image.bytes.len()),
        Err(error) => println!("QR export failed: {error}"),
    }

    println!("\n>>> Shutting down");
    match editor_store.shutdown(Duration::from_secs(5)).await {
        Ok(()) => println!("All effects drained."),
        Err(error) => println!("Shutdown error: {error}"),
    }
}

async fn send<S, A, E, R>(store: &Store<S, A, E, R>, action: A)
where
    R: linkfolio_core::reducer::Reducer<State = S, Action = A, Environment = E>
        + Clone
        + Send
        + Sync
        + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    if let Ok(mut handle) = store.send(action).await {
        handle.wait().await;
    }
}
