//! Action types for the editor and account reducers.
//!
//! Actions are both the commands the UI dispatches and the result events
//! that effects feed back into the reducers.

use crate::error::EditorField;
use crate::links::LinkKind;
use crate::session::AuthSession;
use crate::state::{LinkRecord, ProfileId, ProfileRecord};
use serde::{Deserialize, Serialize};

/// Inputs to the profile editor reducer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditorAction {
    /// Load an existing profile by id or by slug (exactly one must be set).
    Load {
        /// Profile id to load
        id: Option<ProfileId>,
        /// Slug to load
        slug: Option<String>,
    },
    /// Result event: the profile and its links were fetched.
    Loaded {
        /// The fetched profile
        profile: ProfileRecord,
        /// Its links, ordered by position
        links: Vec<LinkRecord>,
    },
    /// Result event: the load failed.
    LoadFailed {
        /// Human-readable reason
        message: String,
    },

    /// Edit the display name.
    SetDisplayName {
        /// New value
        value: String,
    },
    /// Edit the tagline.
    SetTagline {
        /// New value
        value: String,
    },
    /// Edit the description.
    SetDescription {
        /// New value
        value: String,
    },

    /// Append a link of the given kind to the working set.
    AddLink {
        /// The link kind
        kind: LinkKind,
    },
    /// Remove the link at the given raw index (tombstones included).
    RemoveLink {
        /// Index into the working set
        index: usize,
    },
    /// Edit the title of the link at the given raw index.
    SetLinkTitle {
        /// Index into the working set
        index: usize,
        /// New title
        value: String,
    },
    /// Edit the URL of the link at the given raw index.
    SetLinkUrl {
        /// Index into the working set
        index: usize,
        /// New raw URL input
        value: String,
    },

    /// The user typed in the custom slug field.
    SlugInput {
        /// Current field content
        candidate: String,
    },
    /// Internal: the debounce window elapsed, run the availability check.
    CheckSlug {
        /// The candidate the timer was armed for
        candidate: String,
    },
    /// Result event: the availability check finished.
    SlugChecked {
        /// The checked candidate
        candidate: String,
        /// Whether it was free at check time
        available: bool,
    },

    /// Persist the working set (create or update).
    Save,
    /// Result event: the save landed.
    SaveCompleted {
        /// The persisted profile row
        profile: ProfileRecord,
        /// The persisted link rows, ordered by position
        links: Vec<LinkRecord>,
    },
    /// Result event: the save failed.
    SaveFailed {
        /// Human-readable reason
        message: String,
        /// Field to focus, when the failure maps to one
        field: Option<EditorField>,
    },
}

/// Inputs to the account reducer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AccountAction {
    /// Sign in with credentials.
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Register a new account.
    Register {
        /// Account email
        email: String,
        /// Account password
        password: String,
        /// Public display name
        display_name: String,
    },
    /// Sign out.
    Logout,
    /// Ask the backend which session it considers active.
    RefreshSession,
    /// Fetch the authenticated user's profiles.
    FetchProfiles,

    /// Result event: signed in.
    LoggedIn {
        /// The established session
        session: AuthSession,
    },
    /// Result event: registered and signed in.
    Registered {
        /// The established session
        session: AuthSession,
    },
    /// Result event: signed out.
    LoggedOut,
    /// Result event: backend session state.
    SessionRefreshed {
        /// The active session, if any
        session: Option<AuthSession>,
    },
    /// Result event: owned profiles fetched.
    ProfilesLoaded {
        /// The profiles, ordered by creation time
        profiles: Vec<ProfileRecord>,
    },
    /// Result event: an account operation failed.
    AccountFailed {
        /// Human-readable reason
        message: String,
    },
}
