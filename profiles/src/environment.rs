//! Environment types with injected dependencies.
//!
//! Each reducer receives exactly the dependencies it needs, behind `Arc`s
//! so effects can move clones into spawned tasks.

use crate::config::EditorConfig;
use crate::providers::{AuthProvider, DataStore};
use crate::session::SessionContext;
use linkfolio_core::environment::IdGenerator;
use std::sync::Arc;

/// Dependencies of the profile editor reducer.
pub struct EditorEnvironment<D> {
    /// The data store
    pub data: Arc<D>,
    /// The shared session context (read by the save precondition)
    pub session: SessionContext,
    /// Id source for stable link keys
    pub ids: Arc<dyn IdGenerator>,
    /// Editor settings
    pub config: EditorConfig,
}

impl<D: DataStore> EditorEnvironment<D> {
    /// Assemble an editor environment with default configuration.
    #[must_use]
    pub fn new(data: Arc<D>, session: SessionContext, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            data,
            session,
            ids,
            config: EditorConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }
}

impl<D> Clone for EditorEnvironment<D> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            session: self.session.clone(),
            ids: Arc::clone(&self.ids),
            config: self.config.clone(),
        }
    }
}

/// Dependencies of the account reducer.
pub struct AccountEnvironment<A, D> {
    /// The auth backend
    pub auth: Arc<A>,
    /// The data store (owned-profile fetches)
    pub data: Arc<D>,
    /// The shared session context (written on login/logout)
    pub session: SessionContext,
}

impl<A: AuthProvider, D: DataStore> AccountEnvironment<A, D> {
    /// Assemble an account environment.
    #[must_use]
    pub fn new(auth: Arc<A>, data: Arc<D>, session: SessionContext) -> Self {
        Self {
            auth,
            data,
            session,
        }
    }
}

impl<A, D> Clone for AccountEnvironment<A, D> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            data: Arc::clone(&self.data),
            session: self.session.clone(),
        }
    }
}
