//! # Linkfolio Runtime
//!
//! Runtime implementation for the Linkfolio reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation Registry**: Tracks in-flight cancellable effects (debounce support)
//!
//! ## Example
//!
//! ```ignore
//! use linkfolio_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait for its effects (including cascaded ones)
//! let mut handle = store.send(Action::DoSomething).await?;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```

use linkfolio_core::effect::{Effect, EffectId};
use linkfolio_core::reducer::Reducer;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effects to complete
        ///
        /// Returned by [`crate::EffectHandle::wait_with_timeout`] when the
        /// timeout expires before all effects finish.
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`store::Store::send()`] to allow waiting for effects to
/// complete. Completion is transitive: when an effect feeds an action back
/// into the store, the handle also covers the effects that action produces.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All effects from Action::Start (and its follow-up actions) are done
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle together with its internal tracking half.
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that is already complete
    ///
    /// Useful as the initial value in loops that keep the last handle around.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects to complete
    ///
    /// Blocks until the effect counter reaches zero.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is always decremented, even when the task holding
/// it is aborted by the cancellation registry.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn register(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
///
/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        AbortHandle, Arc, AtomicBool, AtomicUsize, DecrementGuard, Duration, Effect, EffectHandle,
        EffectId, EffectTracking, Future, HashMap, Mutex, Ordering, PendingGuard, Pin,
        PoisonError, Reducer, RwLock, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(
    ///     EditorState::default(),
    ///     EditorReducer::new(),
    ///     production_environment(),
    /// );
    ///
    /// store.send(EditorAction::Load { slug: Some("jane".into()), profile_id: None }).await?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// In-flight cancellable effects, keyed by [`EffectId`].
        ///
        /// Starting a new cancellable effect under an id already present
        /// aborts the previous task. Aborting an already-finished task is a
        /// no-op, so stale entries are harmless; the map is bounded by the
        /// number of distinct effect ids (static strings).
        cancellations: Arc<Mutex<HashMap<EffectId, AbortHandle>>>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellations: Arc::clone(&self.cancellations),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellations: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        /// Read state through a closure
        ///
        /// Acquires a read lock for the duration of the closure.
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// The returned [`EffectHandle`] completes once all effects spawned by
        /// this action (transitively, through fed-back actions) are done.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions").increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                effects
            };

            let (handle, tracking) = EffectHandle::new();
            for effect in effects {
                self.dispatch(effect, &tracking);
            }

            Ok(handle)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for
        /// pending effects to complete.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
        /// before all pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(100);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Route an effect either to the cancellation registry or to a
        /// plain tracked task.
        fn dispatch(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {}
                Effect::Cancel(id) => self.cancel(id),
                Effect::Cancellable { id, effect } => {
                    let task = self.spawn_tracked(*effect, tracking);
                    self.register(id, task.abort_handle());
                }
                other => {
                    self.spawn_tracked(other, tracking);
                }
            }
        }

        /// Spawn a task performing `effect`, wired into both the handle
        /// counter and the shutdown counter.
        fn spawn_tracked(
            &self,
            effect: Effect<A>,
            tracking: &EffectTracking,
        ) -> tokio::task::JoinHandle<()> {
            tracking.increment();
            let pending = PendingGuard::register(&self.pending_effects);
            metrics::counter!("store.effects.spawned").increment(1);

            let store = self.clone();
            let tracking = tracking.clone();
            tokio::spawn(async move {
                let _pending = pending;
                let _guard = DecrementGuard(tracking.clone());
                store.perform(effect, tracking).await;
            })
        }

        /// Perform an effect to completion.
        ///
        /// Recursive through `Sequential`/`Parallel`, so boxed.
        fn perform(
            &self,
            effect: Effect<A>,
            tracking: EffectTracking,
        ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
            Box::pin(async move {
                match effect {
                    Effect::None => {}
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        self.feedback(*action).await;
                    }
                    Effect::Future(fut) => {
                        if let Some(action) = fut.await {
                            self.feedback(action).await;
                        }
                    }
                    Effect::Sequential(effects) => {
                        for effect in effects {
                            self.perform(effect, tracking.clone()).await;
                        }
                    }
                    Effect::Parallel(effects) => {
                        let tasks: Vec<_> = effects
                            .into_iter()
                            .map(|effect| self.spawn_tracked(effect, &tracking))
                            .collect();
                        for task in tasks {
                            let _ = task.await;
                        }
                    }
                    Effect::Cancellable { id, effect } => {
                        let task = self.spawn_tracked(*effect, &tracking);
                        self.register(id, task.abort_handle());
                    }
                    Effect::Cancel(id) => self.cancel(id),
                }
            })
        }

        /// Feed an action produced by an effect back into the reducer,
        /// waiting for the effects it spawns in turn.
        async fn feedback(&self, action: A) {
            match self.send(action).await {
                Ok(mut handle) => handle.wait().await,
                Err(error) => {
                    tracing::warn!(%error, "dropping effect action during shutdown");
                }
            }
        }

        /// Register an in-flight cancellable effect, aborting any previous
        /// effect under the same id.
        fn register(&self, id: EffectId, handle: AbortHandle) {
            let mut registry = self
                .cancellations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if let Some(previous) = registry.insert(id, handle) {
                previous.abort();
                metrics::counter!("store.effects.superseded").increment(1);
                tracing::debug!(effect_id = %id, "superseded in-flight cancellable effect");
            }
        }

        /// Abort the in-flight effect registered under `id`, if any.
        fn cancel(&self, id: EffectId) {
            let removed = self
                .cancellations
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);

            if let Some(handle) = removed {
                handle.abort();
                metrics::counter!("store.effects.cancelled").increment(1);
                tracing::debug!(effect_id = %id, "cancelled in-flight effect");
            }
        }
    }
}

pub use store::Store;
