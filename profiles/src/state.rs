//! Domain state: typed ids, persisted records, and the editor and account
//! working state.

use crate::error::EditorField;
use crate::links::{self, LinkKind};
use crate::session::AuthSession;
use crate::slug::generate_slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    /// Generate a new random profile ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a persisted link row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId(pub Uuid);

impl LinkId {
    /// Generate a new random link ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-generated stable list key for an editor link.
///
/// Assigned when a link enters the working set and never persisted; keeps
/// list identity stable across reorders and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkKey(pub Uuid);

impl std::fmt::Display for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Row id
    pub id: ProfileId,
    /// Owning user
    pub user_id: UserId,
    /// Public display name
    pub display_name: String,
    /// Short tagline
    pub tagline: String,
    /// Longer description
    pub description: String,
    /// URL-safe public identifier, unique store-wide
    pub slug: String,
    /// Whether the public page is live
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    /// Owning user
    pub user_id: UserId,
    /// Public display name
    pub display_name: String,
    /// Short tagline
    pub tagline: String,
    /// Longer description
    pub description: String,
    /// URL-safe public identifier
    pub slug: String,
    /// Whether the public page is live
    pub active: bool,
}

/// Editable fields for updating a profile row.
///
/// `slug` is `None` when unchanged, in which case no availability check is
/// needed (its own row would be excluded anyway).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    /// Public display name
    pub display_name: String,
    /// Short tagline
    pub tagline: String,
    /// Longer description
    pub description: String,
    /// New slug, only when it changed
    pub slug: Option<String>,
}

/// A persisted link row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Row id
    pub id: LinkId,
    /// Owning profile
    pub profile_id: ProfileId,
    /// Link kind
    pub kind: LinkKind,
    /// Display title
    pub title: String,
    /// Canonical URL
    pub url: String,
    /// Zero-based position within the profile
    pub position: u32,
}

/// Fields for inserting a link row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLink {
    /// Owning profile
    pub profile_id: ProfileId,
    /// Link kind
    pub kind: LinkKind,
    /// Display title
    pub title: String,
    /// Canonical URL
    pub url: String,
    /// Zero-based position within the profile
    pub position: u32,
}

/// One entry of the editor's in-memory link working set.
///
/// Never persisted as such; tombstoned entries (`deleted`) stay in the list
/// until the next save deletes their rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorLink {
    /// Stable list key, assigned on add
    pub key: LinkKey,
    /// Persisted row id; `None` until saved
    pub id: Option<LinkId>,
    /// Link kind
    pub kind: LinkKind,
    /// Display title (may be empty until the user fills it in)
    pub title: String,
    /// Raw URL input (canonicalized at save)
    pub url: String,
    /// Zero-based position among surviving links
    pub position: u32,
    /// Registry hint: the UI must ask for a title
    pub needs_name: bool,
    /// Validation flag for UI highlighting
    pub invalid: bool,
    /// Tombstone: queued for server-side delete on next save
    pub deleted: bool,
}

/// Editor lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditorPhase {
    /// Fresh session, nothing loaded (creating a new profile)
    #[default]
    Empty,
    /// Fetching an existing profile
    Loading,
    /// Loaded or fresh, accepting edits
    Ready,
    /// A save is in flight
    Saving,
    /// The last save succeeded
    Saved,
    /// Load or save failed; edits stay in memory and can be retried
    Failed,
}

/// Result of the debounced slug availability check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlugCheck {
    /// No custom slug, or not yet checked
    #[default]
    Unset,
    /// A check is pending or in flight
    Checking,
    /// The candidate was available at check time (advisory only)
    Available,
    /// The candidate was taken at check time
    Unavailable,
}

/// In-memory state of one profile editing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorState {
    /// Lifecycle phase
    pub phase: EditorPhase,
    /// Persisted profile id; `None` while creating
    pub profile_id: Option<ProfileId>,
    /// Public display name input
    pub display_name: String,
    /// Tagline input
    pub tagline: String,
    /// Description input
    pub description: String,
    /// User-chosen slug override; `None` means derive from the display name
    pub custom_slug: Option<String>,
    /// The slug as persisted, for change detection on update
    pub saved_slug: Option<String>,
    /// Link working set, tombstones included
    pub links: Vec<EditorLink>,
    /// Debounced availability check status for the custom slug
    pub slug_check: SlugCheck,
    /// Last error message, if any
    pub error: Option<String>,
    /// Field the error relates to, for UI focus
    pub error_field: Option<EditorField>,
}

impl EditorState {
    /// The slug derived from the display name.
    #[must_use]
    pub fn generated_slug(&self) -> String {
        generate_slug(&self.display_name)
    }

    /// The slug a save would use: the custom override when set, otherwise
    /// the generated one.
    #[must_use]
    pub fn resolved_slug(&self) -> String {
        self.custom_slug
            .clone()
            .unwrap_or_else(|| self.generated_slug())
    }

    /// Non-tombstoned links, in array order.
    pub fn surviving_links(&self) -> impl Iterator<Item = &EditorLink> {
        self.links.iter().filter(|l| !l.deleted)
    }

    /// The public page URL for this profile under `origin`.
    #[must_use]
    pub fn public_url(&self, origin: &str) -> String {
        format!("{origin}/p/{}", self.resolved_slug())
    }

    /// Renumber surviving links to a dense `0..n-1` sequence in array order.
    pub(crate) fn renumber_links(&mut self) {
        let mut position: u32 = 0;
        for link in self.links.iter_mut().filter(|l| !l.deleted) {
            link.position = position;
            position += 1;
        }
    }

    /// Populate the working set from persisted rows.
    ///
    /// Annotates each link with the registry `needs_name` hint and clears
    /// stale validation flags.
    pub(crate) fn adopt_links(
        &mut self,
        records: Vec<LinkRecord>,
        mut next_key: impl FnMut() -> LinkKey,
    ) {
        self.links = records
            .into_iter()
            .map(|record| EditorLink {
                key: next_key(),
                id: Some(record.id),
                needs_name: links::link_type(record.kind).needs_name,
                kind: record.kind,
                title: record.title,
                url: record.url,
                position: record.position,
                invalid: false,
                deleted: false,
            })
            .collect();
    }
}

/// In-memory state of the account manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountState {
    /// The authenticated session, if any
    pub session: Option<AuthSession>,
    /// Profiles owned by the authenticated user
    pub profiles: Vec<ProfileRecord>,
    /// An auth operation is in flight
    pub busy: bool,
    /// Last error message, if any
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_slug_prefers_the_custom_one() {
        let mut state = EditorState {
            display_name: "Ana Pérez".into(),
            ..EditorState::default()
        };
        assert_eq!(state.resolved_slug(), "ana-perez");

        state.custom_slug = Some("anita".into());
        assert_eq!(state.resolved_slug(), "anita");
    }

    #[test]
    fn public_url_uses_the_resolved_slug() {
        let state = EditorState {
            display_name: "Ana Pérez".into(),
            ..EditorState::default()
        };
        assert_eq!(state.public_url("https://linkfol.io"), "https://linkfol.io/p/ana-perez");
    }
}
