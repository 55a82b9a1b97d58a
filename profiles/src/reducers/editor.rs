//! Profile editor reducer.
//!
//! One editing session for one profile: load it (or start empty), edit the
//! fields and the link working set, then save. The save path is the core of
//! the engine:
//!
//! 1. Preconditions, in order, each a hard stop leaving edits intact:
//!    authenticated user, non-empty display name, valid custom slug, valid
//!    links (offenders flagged and named in an aggregate message)
//! 2. Create path: resolve slug, authoritative availability check, insert
//!    the profile row, insert the link rows
//! 3. Update path: availability check only when the slug changed, update
//!    the row, then replace the links wholesale (delete all, insert
//!    survivors — no diffing)
//!
//! Neither path is atomic; a failure after the first write surfaces as
//! `PartialWrite`. A save while one is in flight is rejected.
//!
//! The custom slug input drives a debounced, cancellable availability check
//! (advisory only; the save re-checks authoritatively).

use crate::actions::EditorAction;
use crate::environment::EditorEnvironment;
use crate::error::{EditorField, ProfileError};
use crate::links::{LinkKind, format_url, link_type};
use crate::providers::DataStore;
use crate::session::AuthSession;
use crate::slug::validate_slug;
use crate::state::{
    EditorLink, EditorPhase, EditorState, LinkKey, NewLink, NewProfile, ProfileChanges,
    ProfileId, ProfileRecord, SlugCheck, LinkRecord,
};
use linkfolio_core::effect::{Effect, EffectId};
use linkfolio_core::reducer::Reducer;
use linkfolio_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Cancellation id of the debounced slug availability check.
///
/// At most one check is pending per editor session; each new slug input
/// supersedes it.
pub const SLUG_CHECK_EFFECT: EffectId = EffectId("editor.slug-check");

/// A validated, trimmed, formatted link ready for persistence.
#[derive(Debug, Clone)]
struct PreparedLink {
    kind: LinkKind,
    title: String,
    url: String,
    position: u32,
}

/// Profile editor reducer.
pub struct EditorReducer<D> {
    _phantom: std::marker::PhantomData<D>,
}

// Manual impls: the provider type parameter carries no data
impl<D> Clone for EditorReducer<D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for EditorReducer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EditorReducer")
    }
}

impl<D> EditorReducer<D> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<D> Default for EditorReducer<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Reducer for EditorReducer<D>
where
    D: DataStore + 'static,
{
    type State = EditorState;
    type Action = EditorAction;
    type Environment = EditorEnvironment<D>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Load: fetch an existing profile and its links
            // ═══════════════════════════════════════════════════════════════
            EditorAction::Load { id, slug } => {
                if state.phase == EditorPhase::Loading {
                    tracing::warn!("Load ignored: a load is already in flight");
                    return smallvec![Effect::None];
                }

                let exactly_one = id.is_some() != slug.is_some();
                if !exactly_one {
                    state.phase = EditorPhase::Failed;
                    state.error = Some("a profile id or a slug is required to load".to_string());
                    state.error_field = None;
                    return smallvec![Effect::None];
                }

                state.phase = EditorPhase::Loading;
                state.error = None;
                state.error_field = None;

                let data = Arc::clone(&env.data);
                smallvec![Effect::future(async move {
                    let profile = match (id, slug) {
                        (Some(id), _) => data.profile_by_id(id).await,
                        (_, Some(slug)) => data.profile_by_slug(&slug).await,
                        _ => Err(ProfileError::validation(
                            "a profile id or a slug is required to load",
                        )),
                    };

                    Some(match profile {
                        Ok(profile) => match data.links_for_profile(profile.id).await {
                            Ok(links) => EditorAction::Loaded { profile, links },
                            Err(error) => EditorAction::LoadFailed {
                                message: error.to_string(),
                            },
                        },
                        Err(error) => EditorAction::LoadFailed {
                            message: error.to_string(),
                        },
                    })
                })]
            }

            EditorAction::Loaded { profile, links } => {
                state.profile_id = Some(profile.id);
                state.display_name = profile.display_name;
                state.tagline = profile.tagline;
                state.description = profile.description;
                state.saved_slug = Some(profile.slug);
                state.custom_slug = None;
                state.slug_check = SlugCheck::Unset;
                state.adopt_links(links, || LinkKey(env.ids.new_id()));
                state.phase = EditorPhase::Ready;
                state.error = None;
                state.error_field = None;
                smallvec![Effect::None]
            }

            EditorAction::LoadFailed { message } => {
                tracing::warn!(%message, "profile load failed");
                state.phase = EditorPhase::Failed;
                state.error = Some(message);
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Field edits
            // ═══════════════════════════════════════════════════════════════
            EditorAction::SetDisplayName { value } => {
                state.display_name = value;
                smallvec![Effect::None]
            }
            EditorAction::SetTagline { value } => {
                state.tagline = value;
                smallvec![Effect::None]
            }
            EditorAction::SetDescription { value } => {
                state.description = value;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Link working set
            // ═══════════════════════════════════════════════════════════════
            EditorAction::AddLink { kind } => {
                let entry = link_type(kind);
                let position = u32::try_from(state.surviving_links().count()).unwrap_or(u32::MAX);

                state.links.push(EditorLink {
                    key: LinkKey(env.ids.new_id()),
                    id: None,
                    kind,
                    title: if entry.needs_name {
                        String::new()
                    } else {
                        entry.label.to_string()
                    },
                    url: String::new(),
                    position,
                    needs_name: entry.needs_name,
                    invalid: false,
                    deleted: false,
                });
                smallvec![Effect::None]
            }

            EditorAction::RemoveLink { index } => {
                let Some(link) = state.links.get_mut(index) else {
                    tracing::warn!(index, "RemoveLink ignored: index out of range");
                    return smallvec![Effect::None];
                };

                if link.id.is_some() {
                    // Persisted: tombstone so the save deletes the row
                    link.deleted = true;
                } else {
                    // Never persisted: drop it outright
                    state.links.remove(index);
                }

                state.renumber_links();
                smallvec![Effect::None]
            }

            EditorAction::SetLinkTitle { index, value } => {
                if let Some(link) = state.links.get_mut(index) {
                    link.title = value;
                    link.invalid = false;
                } else {
                    tracing::warn!(index, "SetLinkTitle ignored: index out of range");
                }
                smallvec![Effect::None]
            }

            EditorAction::SetLinkUrl { index, value } => {
                if let Some(link) = state.links.get_mut(index) {
                    link.url = value;
                    link.invalid = false;
                } else {
                    tracing::warn!(index, "SetLinkUrl ignored: index out of range");
                }
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Debounced slug availability check
            // ═══════════════════════════════════════════════════════════════
            EditorAction::SlugInput { candidate } => {
                let candidate = candidate.trim().to_string();

                if candidate.is_empty() {
                    state.custom_slug = None;
                    state.slug_check = SlugCheck::Unset;
                    return smallvec![Effect::Cancel(SLUG_CHECK_EFFECT)];
                }

                if !validate_slug(&candidate) {
                    // Keep the text so the user can finish typing; the save
                    // precondition reports the syntax error
                    state.custom_slug = Some(candidate);
                    state.slug_check = SlugCheck::Unset;
                    return smallvec![Effect::Cancel(SLUG_CHECK_EFFECT)];
                }

                state.custom_slug = Some(candidate.clone());
                state.slug_check = SlugCheck::Checking;

                smallvec![Effect::debounce(
                    SLUG_CHECK_EFFECT,
                    env.config.slug_check_debounce,
                    EditorAction::CheckSlug { candidate },
                )]
            }

            EditorAction::CheckSlug { candidate } => {
                if state.custom_slug.as_deref() != Some(candidate.as_str()) {
                    tracing::debug!(%candidate, "slug check skipped: candidate superseded");
                    return smallvec![Effect::None];
                }

                let data = Arc::clone(&env.data);
                let exclude = state.profile_id;
                smallvec![Effect::future(async move {
                    let available = match data.is_slug_available(&candidate, exclude).await {
                        Ok(available) => available,
                        Err(error) => {
                            tracing::warn!(%error, "slug availability check failed");
                            false
                        }
                    };
                    Some(EditorAction::SlugChecked {
                        candidate,
                        available,
                    })
                })]
            }

            EditorAction::SlugChecked {
                candidate,
                available,
            } => {
                if state.custom_slug.as_deref() == Some(candidate.as_str()) {
                    state.slug_check = if available {
                        SlugCheck::Available
                    } else {
                        SlugCheck::Unavailable
                    };
                } else {
                    tracing::debug!(%candidate, "stale slug check result dropped");
                }
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Save: preconditions, then the create or update path
            // ═══════════════════════════════════════════════════════════════
            EditorAction::Save => self.save(state, env),

            EditorAction::SaveCompleted { profile, links } => {
                metrics::counter!("editor.saves.completed").increment(1);
                tracing::info!(slug = %profile.slug, links = links.len(), "profile saved");

                state.profile_id = Some(profile.id);
                state.display_name = profile.display_name;
                state.tagline = profile.tagline;
                state.description = profile.description;
                state.saved_slug = Some(profile.slug);
                state.custom_slug = None;
                state.slug_check = SlugCheck::Unset;
                state.adopt_links(links, || LinkKey(env.ids.new_id()));
                state.phase = EditorPhase::Saved;
                state.error = None;
                state.error_field = None;
                smallvec![Effect::None]
            }

            EditorAction::SaveFailed { message, field } => {
                metrics::counter!("editor.saves.failed").increment(1);
                tracing::warn!(%message, "profile save failed");

                state.phase = EditorPhase::Failed;
                state.error = Some(message);
                state.error_field = field;
                smallvec![Effect::None]
            }
        }
    }
}

impl<D> EditorReducer<D>
where
    D: DataStore + 'static,
{
    fn save(
        &self,
        state: &mut EditorState,
        env: &EditorEnvironment<D>,
    ) -> SmallVec<[Effect<EditorAction>; 4]> {
        // Single-flight guard
        if state.phase == EditorPhase::Saving {
            tracing::warn!("Save rejected: a save is already in progress");
            state.error = Some("A save is already in progress".to_string());
            return smallvec![Effect::None];
        }

        metrics::counter!("editor.saves.started").increment(1);

        // (1) Authenticated user
        let Some(AuthSession { user_id, .. }) = env.session.current_user() else {
            state.phase = EditorPhase::Failed;
            state.error = Some("You must be logged in to save a profile".to_string());
            state.error_field = None;
            return smallvec![Effect::None];
        };

        // (2) Display name
        let display_name = state.display_name.trim().to_string();
        if display_name.is_empty() {
            state.phase = EditorPhase::Failed;
            state.error = Some("Display name is required".to_string());
            state.error_field = Some(EditorField::DisplayName);
            return smallvec![Effect::None];
        }

        // (3) Custom slug syntax
        if let Some(custom) = &state.custom_slug {
            if !validate_slug(custom) {
                state.phase = EditorPhase::Failed;
                state.error = Some(
                    "Slug must be at least 3 characters: lowercase letters, numbers, and hyphens"
                        .to_string(),
                );
                state.error_field = Some(EditorField::Slug);
                return smallvec![Effect::None];
            }
        }

        // (5) Links: flag every offender, abort with an aggregate message
        for link in &mut state.links {
            link.invalid = false;
        }
        let mut offenders: Vec<String> = Vec::new();
        for link in state.links.iter_mut().filter(|l| !l.deleted) {
            let title_ok = !link.needs_name || !link.title.trim().is_empty();
            let formatted = format_url(link.url.trim(), Some(link.kind));
            let url_ok = !formatted.is_empty();

            if url_ok {
                link.url = formatted;
            }

            if !(title_ok && url_ok) {
                link.invalid = true;
                let name = link.title.trim();
                offenders.push(if name.is_empty() {
                    "untitled".to_string()
                } else {
                    name.to_string()
                });
            }
        }
        if !offenders.is_empty() {
            state.phase = EditorPhase::Failed;
            state.error = Some(format!("Invalid links: {}", offenders.join(", ")));
            state.error_field = Some(EditorField::Links);
            return smallvec![Effect::None];
        }

        // Preconditions passed: normalize, then run the async path.
        // (4) The authoritative slug availability check happens inside it.
        state.renumber_links();

        let slug = state
            .custom_slug
            .clone()
            .or_else(|| state.saved_slug.clone())
            .unwrap_or_else(|| state.generated_slug());

        let links: Vec<PreparedLink> = state
            .surviving_links()
            .map(|l| PreparedLink {
                kind: l.kind,
                title: l.title.trim().to_string(),
                url: l.url.clone(),
                position: l.position,
            })
            .collect();

        state.phase = EditorPhase::Saving;
        state.error = None;
        state.error_field = None;

        let data = Arc::clone(&env.data);
        let profile_id = state.profile_id;
        let saved_slug = state.saved_slug.clone();
        let tagline = state.tagline.trim().to_string();
        let description = state.description.trim().to_string();

        smallvec![Effect::future(async move {
            let result = match profile_id {
                None => {
                    create_flow(
                        &*data,
                        user_id,
                        slug,
                        display_name,
                        tagline,
                        description,
                        links,
                    )
                    .await
                }
                Some(id) => {
                    update_flow(
                        &*data,
                        id,
                        saved_slug,
                        slug,
                        display_name,
                        tagline,
                        description,
                        links,
                    )
                    .await
                }
            };

            Some(match result {
                Ok((profile, links)) => EditorAction::SaveCompleted { profile, links },
                Err(error) => {
                    let field = match &error {
                        ProfileError::SlugConflict { .. } => Some(EditorField::Slug),
                        ProfileError::Validation { field, .. } => *field,
                        _ => None,
                    };
                    EditorAction::SaveFailed {
                        message: error.to_string(),
                        field,
                    }
                }
            })
        })]
    }
}

/// Create path: availability check, profile row, link rows.
async fn create_flow<D: DataStore>(
    data: &D,
    user_id: crate::state::UserId,
    slug: String,
    display_name: String,
    tagline: String,
    description: String,
    links: Vec<PreparedLink>,
) -> Result<(ProfileRecord, Vec<LinkRecord>), ProfileError> {
    if !validate_slug(&slug) {
        return Err(ProfileError::Validation {
            field: Some(EditorField::Slug),
            message: format!("'{slug}' is not a usable public name; pick a custom slug"),
        });
    }

    if !data.is_slug_available(&slug, None).await? {
        return Err(ProfileError::SlugConflict { slug });
    }

    let profile = data
        .create_profile(NewProfile {
            user_id,
            display_name,
            tagline,
            description,
            slug,
            active: true,
        })
        .await?;

    let rows = link_rows(profile.id, links);
    let created = data.create_links(rows).await.map_err(|error| {
        ProfileError::PartialWrite {
            message: format!(
                "profile '{}' was created but its links were not: {error}",
                profile.slug
            ),
        }
    })?;

    Ok((profile, created))
}

/// Update path: check the slug only when it changed, update the row, then
/// replace the links wholesale.
#[allow(clippy::too_many_arguments)]
async fn update_flow<D: DataStore>(
    data: &D,
    id: ProfileId,
    saved_slug: Option<String>,
    slug: String,
    display_name: String,
    tagline: String,
    description: String,
    links: Vec<PreparedLink>,
) -> Result<(ProfileRecord, Vec<LinkRecord>), ProfileError> {
    let slug_changed = saved_slug.as_deref() != Some(slug.as_str());

    if slug_changed && !data.is_slug_available(&slug, Some(id)).await? {
        return Err(ProfileError::SlugConflict { slug });
    }

    let profile = data
        .update_profile(
            id,
            ProfileChanges {
                display_name,
                tagline,
                description,
                slug: slug_changed.then_some(slug),
            },
        )
        .await?;

    data.delete_profile_links(id).await?;

    let rows = link_rows(id, links);
    let created = data.create_links(rows).await.map_err(|error| {
        ProfileError::PartialWrite {
            message: format!("links were deleted but replacements failed to insert: {error}"),
        }
    })?;

    Ok((profile, created))
}

fn link_rows(profile_id: ProfileId, links: Vec<PreparedLink>) -> Vec<NewLink> {
    links
        .into_iter()
        .map(|l| NewLink {
            profile_id,
            kind: l.kind,
            title: l.title,
            url: l.url,
            position: l.position,
        })
        .collect()
}
