//! # Linkfolio Profiles
//!
//! The Linkfolio application: a link-in-bio profile engine built on the
//! reducer architecture of `linkfolio-core` and `linkfolio-runtime`.
//!
//! ## Features
//!
//! - **Profile editor workflow**: load, edit, and save a profile with its
//!   ordered list of typed links (create and update paths)
//! - **Slug utility**: URL-safe identifier generation and validation, with a
//!   debounced availability check against the data store
//! - **Link formatter and type registry**: canonical URL normalization per
//!   link kind, plus a static catalogue of known link types
//! - **Account manager**: sign-up, sign-in, sign-out and the process-wide
//!   session context consulted by the editor's save preconditions
//! - **QR export**: profile page QR codes through an injected renderer
//!
//! All I/O lives behind provider traits ([`providers::DataStore`],
//! [`providers::AuthProvider`], [`providers::QrRenderer`]) with in-memory
//! implementations in [`mocks`] for tests.

/// Action types for the editor and account reducers
pub mod actions;

/// Configuration for the editor workflow
pub mod config;

/// Environment types with injected dependencies
pub mod environment;

/// Error types
pub mod error;

/// Link formatter and link type registry
pub mod links;

/// In-memory provider implementations for tests
pub mod mocks;

/// Provider traits (data store, auth, QR renderer)
pub mod providers;

/// QR code export
pub mod qr;

/// Editor and account reducers
pub mod reducers;

/// Session context shared between account and editor
pub mod session;

/// Slug generation and validation
pub mod slug;

/// Domain state: records, ids, editor and account state
pub mod state;

pub use actions::{AccountAction, EditorAction};
pub use config::EditorConfig;
pub use environment::{AccountEnvironment, EditorEnvironment};
pub use error::ProfileError;
pub use reducers::{AccountReducer, EditorReducer};
pub use session::{AuthSession, SessionContext};
pub use state::{AccountState, EditorState};
