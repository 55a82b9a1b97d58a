//! In-memory data store.

use crate::error::ProfileError;
use crate::providers::DataStore;
use crate::state::{
    LinkId, LinkRecord, NewLink, NewProfile, ProfileChanges, ProfileId, ProfileRecord, UserId,
};
use linkfolio_core::environment::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct Tables {
    profiles: HashMap<ProfileId, ProfileRecord>,
    links: HashMap<LinkId, LinkRecord>,
}

/// In-memory implementation of [`DataStore`].
///
/// Enforces slug uniqueness and referential deletes like the real backend.
/// Failure injection flags make the non-atomic save paths testable: the
/// next matching call fails once, then the flag resets.
#[derive(Clone)]
pub struct MemoryDataStore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
    fail_next_link_insert: Arc<AtomicBool>,
    fail_next_link_delete: Arc<AtomicBool>,
}

impl Default for MemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDataStore {
    /// Create an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store stamping rows with the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
            fail_next_link_insert: Arc::new(AtomicBool::new(false)),
            fail_next_link_delete: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make the next `create_links` call fail.
    pub fn fail_next_link_insert(&self) {
        self.fail_next_link_insert.store(true, Ordering::SeqCst);
    }

    /// Make the next `delete_profile_links` call fail.
    pub fn fail_next_link_delete(&self) {
        self.fail_next_link_delete.store(true, Ordering::SeqCst);
    }

    /// Number of stored link rows, across all profiles.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.lock().links.len()
    }

    /// Number of stored profile rows.
    #[must_use]
    pub fn profile_count(&self) -> usize {
        self.lock().profiles.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slug_taken(tables: &Tables, slug: &str, exclude: Option<ProfileId>) -> bool {
        tables
            .profiles
            .values()
            .any(|p| p.slug == slug && Some(p.id) != exclude)
    }
}

impl DataStore for MemoryDataStore {
    async fn profile_by_id(&self, id: ProfileId) -> Result<ProfileRecord, ProfileError> {
        self.lock()
            .profiles
            .get(&id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                what: "profile".into(),
            })
    }

    async fn profile_by_slug(&self, slug: &str) -> Result<ProfileRecord, ProfileError> {
        self.lock()
            .profiles
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                what: "profile".into(),
            })
    }

    async fn profiles_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ProfileRecord>, ProfileError> {
        let mut profiles: Vec<_> = self
            .lock()
            .profiles
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles)
    }

    async fn profiles_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<(Vec<ProfileRecord>, u64), ProfileError> {
        if page == 0 || page_size == 0 {
            return Err(ProfileError::backend("page and page_size must be positive"));
        }

        let mut profiles: Vec<_> = self.lock().profiles.values().cloned().collect();
        profiles.sort_by_key(|p| p.created_at);

        let total = u64::try_from(profiles.len()).unwrap_or(u64::MAX);
        let page_rows = profiles
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        Ok((page_rows, total))
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<ProfileRecord, ProfileError> {
        let mut tables = self.lock();

        if Self::slug_taken(&tables, &profile.slug, None) {
            return Err(ProfileError::SlugConflict {
                slug: profile.slug,
            });
        }

        let record = ProfileRecord {
            id: ProfileId::new(),
            user_id: profile.user_id,
            display_name: profile.display_name,
            tagline: profile.tagline,
            description: profile.description,
            slug: profile.slug,
            active: profile.active,
            created_at: self.clock.now(),
        };
        tables.profiles.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_profile(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
    ) -> Result<ProfileRecord, ProfileError> {
        let mut tables = self.lock();

        if let Some(slug) = &changes.slug {
            if Self::slug_taken(&tables, slug, Some(id)) {
                return Err(ProfileError::SlugConflict { slug: slug.clone() });
            }
        }

        let record = tables
            .profiles
            .get_mut(&id)
            .ok_or_else(|| ProfileError::NotFound {
                what: "profile".into(),
            })?;

        record.display_name = changes.display_name;
        record.tagline = changes.tagline;
        record.description = changes.description;
        if let Some(slug) = changes.slug {
            record.slug = slug;
        }

        Ok(record.clone())
    }

    async fn delete_profile(&self, id: ProfileId) -> Result<(), ProfileError> {
        let mut tables = self.lock();

        if !tables.profiles.contains_key(&id) {
            return Err(ProfileError::NotFound {
                what: "profile".into(),
            });
        }

        // Links first: referential constraint
        tables.links.retain(|_, link| link.profile_id != id);
        tables.profiles.remove(&id);
        Ok(())
    }

    async fn links_for_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<LinkRecord>, ProfileError> {
        let mut links: Vec<_> = self
            .lock()
            .links
            .values()
            .filter(|l| l.profile_id == profile_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| l.position);
        Ok(links)
    }

    async fn create_links(&self, links: Vec<NewLink>) -> Result<Vec<LinkRecord>, ProfileError> {
        if self.fail_next_link_insert.swap(false, Ordering::SeqCst) {
            return Err(ProfileError::backend("injected link insert failure"));
        }

        let mut tables = self.lock();
        let mut created = Vec::with_capacity(links.len());

        for link in links {
            let record = LinkRecord {
                id: LinkId::new(),
                profile_id: link.profile_id,
                kind: link.kind,
                title: link.title,
                url: link.url,
                position: link.position,
            };
            tables.links.insert(record.id, record.clone());
            created.push(record);
        }

        Ok(created)
    }

    async fn upsert_links(
        &self,
        links: Vec<LinkRecord>,
    ) -> Result<Vec<LinkRecord>, ProfileError> {
        let mut tables = self.lock();
        for link in &links {
            tables.links.insert(link.id, link.clone());
        }
        Ok(links)
    }

    async fn delete_profile_links(&self, profile_id: ProfileId) -> Result<(), ProfileError> {
        if self.fail_next_link_delete.swap(false, Ordering::SeqCst) {
            return Err(ProfileError::backend("injected link delete failure"));
        }

        self.lock()
            .links
            .retain(|_, link| link.profile_id != profile_id);
        Ok(())
    }

    async fn is_slug_available(
        &self,
        slug: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool, ProfileError> {
        Ok(!Self::slug_taken(&self.lock(), slug, exclude))
    }

    async fn profile_with_links_by_slug(
        &self,
        slug: &str,
    ) -> Result<(ProfileRecord, Vec<LinkRecord>), ProfileError> {
        let profile = self.profile_by_slug(slug).await?;
        // Link fetch failure degrades to an empty page, not an error
        let links = self
            .links_for_profile(profile.id)
            .await
            .unwrap_or_default();
        Ok((profile, links))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::links::LinkKind;

    fn new_profile(slug: &str) -> NewProfile {
        NewProfile {
            user_id: UserId::new(),
            display_name: "Ana".into(),
            tagline: String::new(),
            description: String::new(),
            slug: slug.into(),
            active: true,
        }
    }

    fn new_link(profile_id: ProfileId, position: u32) -> NewLink {
        NewLink {
            profile_id,
            kind: LinkKind::Website,
            title: "Site".into(),
            url: "https://example.com".into(),
            position,
        }
    }

    #[tokio::test]
    async fn enforces_slug_uniqueness() {
        let store = MemoryDataStore::new();
        store.create_profile(new_profile("ana")).await.unwrap();

        let err = store.create_profile(new_profile("ana")).await.unwrap_err();
        assert!(matches!(err, ProfileError::SlugConflict { slug } if slug == "ana"));

        assert!(!store.is_slug_available("ana", None).await.unwrap());
        assert!(store.is_slug_available("ana-2", None).await.unwrap());
    }

    #[tokio::test]
    async fn slug_check_can_exclude_own_profile() {
        let store = MemoryDataStore::new();
        let profile = store.create_profile(new_profile("ana")).await.unwrap();

        assert!(store.is_slug_available("ana", Some(profile.id)).await.unwrap());
    }

    #[tokio::test]
    async fn pagination_returns_rows_and_total() {
        let store = MemoryDataStore::new();
        for i in 0..5 {
            store.create_profile(new_profile(&format!("slug-{i}"))).await.unwrap();
        }

        let (page, total) = store.profiles_page(2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(total, 5);

        let (last, _) = store.profiles_page(3, 2).await.unwrap();
        assert_eq!(last.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_profile_cascades_to_links() {
        let store = MemoryDataStore::new();
        let profile = store.create_profile(new_profile("ana")).await.unwrap();
        store
            .create_links(vec![new_link(profile.id, 0), new_link(profile.id, 1)])
            .await
            .unwrap();

        store.delete_profile(profile.id).await.unwrap();

        assert_eq!(store.link_count(), 0);
        assert!(matches!(
            store.profile_by_id(profile.id).await,
            Err(ProfileError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn links_come_back_ordered_by_position() {
        let store = MemoryDataStore::new();
        let profile = store.create_profile(new_profile("ana")).await.unwrap();
        store
            .create_links(vec![new_link(profile.id, 1), new_link(profile.id, 0)])
            .await
            .unwrap();

        let links = store.links_for_profile(profile.id).await.unwrap();
        assert_eq!(links[0].position, 0);
        assert_eq!(links[1].position, 1);
    }

    #[tokio::test]
    async fn rows_are_stamped_by_the_injected_clock() {
        let clock = linkfolio_testing::FixedClock::default();
        let store = MemoryDataStore::with_clock(Arc::new(clock));

        let profile = store.create_profile(new_profile("ana")).await.unwrap();
        assert_eq!(profile.created_at, clock.now());
    }

    #[tokio::test]
    async fn upsert_replaces_rows_by_id() {
        let store = MemoryDataStore::new();
        let profile = store.create_profile(new_profile("ana")).await.unwrap();
        let created = store
            .create_links(vec![new_link(profile.id, 0)])
            .await
            .unwrap();

        let mut changed = created[0].clone();
        changed.title = "Portfolio".into();
        store.upsert_links(vec![changed]).await.unwrap();

        let links = store.links_for_profile(profile.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Portfolio");
    }

    #[tokio::test]
    async fn failure_injection_fires_once() {
        let store = MemoryDataStore::new();
        let profile = store.create_profile(new_profile("ana")).await.unwrap();

        store.fail_next_link_insert();
        assert!(store.create_links(vec![new_link(profile.id, 0)]).await.is_err());
        assert!(store.create_links(vec![new_link(profile.id, 0)]).await.is_ok());
    }
}
