//! # Linkfolio Core
//!
//! Core traits and types for the Linkfolio reducer architecture.
//!
//! The profile engine is built as a set of small state machines following the
//! unidirectional-data-flow pattern:
//!
//! - **State**: in-memory domain state for a feature (editor session, account)
//! - **Action**: all possible inputs to a reducer (commands and result events)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect *descriptions* (backend calls, timers), not execution
//! - **Environment**: injected dependencies behind traits
//!
//! Reducers are synchronous and deterministic; all I/O lives in effects that
//! the runtime store executes, feeding resulting actions back into the reducer.
//!
//! ## Example
//!
//! ```ignore
//! use linkfolio_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for EditorReducer {
//!     type State = EditorState;
//!     type Action = EditorAction;
//!     type Environment = EditorEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut EditorState,
//!         action: EditorAction,
//!         env: &EditorEnvironment,
//!     ) -> SmallVec<[Effect<EditorAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic.
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects.
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime store.
/// They are values, not execution; the store interprets them, and a
/// cancellable effect can be superseded or aborted by id.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier for a cancellable effect.
    ///
    /// Starting a new [`Effect::Cancellable`] with the same id replaces
    /// (cancels) any in-flight effect registered under that id. This is the
    /// building block for debounced work: schedule a delayed action under a
    /// fixed id and each new keystroke supersedes the previous timer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectId(pub &'static str);

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    /// Effect type - describes a side effect to be executed.
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for debounce timers, timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// A cancellable effect.
        ///
        /// Registers the inner effect under `id`; a later `Cancellable` with
        /// the same id, or an explicit [`Effect::Cancel`], aborts it if it has
        /// not yet completed.
        Cancellable {
            /// Registration key; one in-flight effect per id.
            id: EffectId,
            /// The effect to run under that key.
            effect: Box<Effect<Action>>,
        },

        /// Cancel the in-flight effect registered under the given id, if any.
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                }
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                }
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation as an effect.
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Dispatch `action` after `duration`, cancellable under `id`.
        ///
        /// Convenience constructor for debounced work.
        #[must_use]
        pub fn debounce(id: EffectId, duration: Duration, action: Action) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(Effect::Delay {
                    duration,
                    action: Box::new(action),
                }),
            }
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter of each reducer.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator trait - abstracts id creation so reducers stay
    /// deterministic under test.
    pub trait IdGenerator: Send + Sync {
        /// Generate a fresh unique id.
        fn new_id(&self) -> uuid::Uuid;
    }

    /// Production id generator producing random v4 UUIDs.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIds;

    impl IdGenerator for RandomIds {
        fn new_id(&self) -> uuid::Uuid {
            uuid::Uuid::new_v4()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Ping,
    }

    #[test]
    fn debounce_wraps_a_delay_under_the_given_id() {
        let effect = Effect::debounce(
            EffectId("check"),
            Duration::from_millis(500),
            TestAction::Ping,
        );

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, EffectId("check"));
                assert!(matches!(
                    *effect,
                    Effect::Delay { duration, .. } if duration == Duration::from_millis(500)
                ));
            }
            other => panic!("expected Cancellable, got {other:?}"),
        }
    }

    #[test]
    fn effect_ids_compare_by_name() {
        assert_eq!(EffectId("a"), EffectId("a"));
        assert_ne!(EffectId("a"), EffectId("b"));
        assert_eq!(EffectId("slug-check").to_string(), "slug-check");
    }
}
