//! Data store provider trait.

use crate::error::ProfileError;
use crate::state::{
    LinkRecord, NewLink, NewProfile, ProfileChanges, ProfileId, ProfileRecord, UserId,
};
use std::future::Future;

/// Row-oriented access to the `profiles` and `links` tables.
///
/// The reference implementation of this contract is
/// [`crate::mocks::MemoryDataStore`]; a hosted backend client would
/// implement the same trait.
///
/// # Errors
///
/// Every method returns `Result<_, ProfileError>`: `NotFound` for missing
/// rows, `SlugConflict` for slug uniqueness violations, `Backend` for
/// anything else.
pub trait DataStore: Send + Sync {
    /// Fetch a profile by id.
    fn profile_by_id(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<ProfileRecord, ProfileError>> + Send;

    /// Fetch a profile by slug.
    fn profile_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<ProfileRecord, ProfileError>> + Send;

    /// All profiles owned by a user, ordered by creation time.
    fn profiles_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<ProfileRecord>, ProfileError>> + Send;

    /// One page of profiles (1-based page number) plus the exact total count.
    fn profiles_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> impl Future<Output = Result<(Vec<ProfileRecord>, u64), ProfileError>> + Send;

    /// Insert a profile row.
    ///
    /// Rejects a duplicate slug with `SlugConflict`.
    fn create_profile(
        &self,
        profile: NewProfile,
    ) -> impl Future<Output = Result<ProfileRecord, ProfileError>> + Send;

    /// Update the editable fields of a profile row.
    fn update_profile(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
    ) -> impl Future<Output = Result<ProfileRecord, ProfileError>> + Send;

    /// Delete a profile row and its links (referential constraint: links
    /// go first).
    fn delete_profile(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<(), ProfileError>> + Send;

    /// All links of a profile, ordered by position.
    fn links_for_profile(
        &self,
        profile_id: ProfileId,
    ) -> impl Future<Output = Result<Vec<LinkRecord>, ProfileError>> + Send;

    /// Batch-insert link rows, returning them in input order.
    fn create_links(
        &self,
        links: Vec<NewLink>,
    ) -> impl Future<Output = Result<Vec<LinkRecord>, ProfileError>> + Send;

    /// Insert-or-replace link rows by id.
    fn upsert_links(
        &self,
        links: Vec<LinkRecord>,
    ) -> impl Future<Output = Result<Vec<LinkRecord>, ProfileError>> + Send;

    /// Delete all links of a profile.
    fn delete_profile_links(
        &self,
        profile_id: ProfileId,
    ) -> impl Future<Output = Result<(), ProfileError>> + Send;

    /// Whether a slug is free, optionally excluding one profile (its own
    /// row, on update).
    fn is_slug_available(
        &self,
        slug: &str,
        exclude: Option<ProfileId>,
    ) -> impl Future<Output = Result<bool, ProfileError>> + Send;

    /// Fetch a public page in one call: the profile and its ordered links.
    ///
    /// A link fetch failure degrades to an empty link list rather than
    /// failing the page.
    fn profile_with_links_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<(ProfileRecord, Vec<LinkRecord>), ProfileError>> + Send;
}
