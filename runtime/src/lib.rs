//! # Booking Runtime
//!
//! Runtime implementation for the conference booking architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, serializes reducer calls and spawns effects
//! - **`CompletionBarrier`**: Counts in-flight effects so callers can wait for them
//! - **`EffectHandle`**: Per-action view of the barrier returned by [`Store::send`]
//!
//! ## Example
//!
//! ```ignore
//! use booking_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action; effects start in the background
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//!
//! // Block until every spawned effect has finished
//! store.wait_for_effects().await;
//! ```

use booking_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for the effects of a single action
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Counting completion barrier
///
/// Incremented before an effect is spawned and decremented when the effect
/// finishes. [`CompletionBarrier::wait`] returns once nothing is outstanding.
#[derive(Debug)]
pub struct CompletionBarrier {
    outstanding: AtomicUsize,
    notifier: watch::Sender<()>,
}

impl CompletionBarrier {
    /// Create a barrier with no outstanding work
    #[must_use]
    pub fn new() -> Self {
        let (notifier, _) = watch::channel(());
        Self {
            outstanding: AtomicUsize::new(0),
            notifier,
        }
    }

    /// Number of units of work that have not completed yet
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Register one unit of outstanding work
    ///
    /// The work is complete when the returned guard is dropped.
    fn register(self: &Arc<Self>) -> BarrierGuard {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        BarrierGuard(Arc::clone(self))
    }

    fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            self.notifier.send_replace(());
        }
    }

    /// Wait until no work is outstanding
    pub async fn wait(&self) {
        // Subscribe before reading the counter so a completion between the
        // load and the await is still observed.
        let mut completion = self.notifier.subscribe();
        while self.outstanding() > 0 {
            if completion.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard that completes one unit of barrier work on drop
///
/// Ensures the counter is always decremented, even if the effect panics.
struct BarrierGuard(Arc<CompletionBarrier>);

impl Drop for BarrierGuard {
    fn drop(&mut self) {
        self.0.complete();
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects spawned by
/// that action. Only direct effects are tracked; effects produced by
/// feedback actions are covered by [`Store::wait_for_effects`].
#[derive(Clone, Debug)]
pub struct EffectHandle {
    barrier: Arc<CompletionBarrier>,
}

impl EffectHandle {
    fn new() -> Self {
        Self {
            barrier: Arc::new(CompletionBarrier::new()),
        }
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        Self::new()
    }

    /// Number of effects from this action still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.barrier.outstanding()
    }

    /// Wait for all effects to complete
    pub async fn wait(&self) {
        self.barrier.wait().await;
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, CompletionBarrier, Duration, Effect, EffectHandle, Ordering, Reducer,
        RwLock, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; the reducer is the only writer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and completion tracking)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<CompletionBarrier>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(CompletionBarrier::new()),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Registers each returned effect with the completion barrier
        /// 4. Spawns the effects and returns without waiting for them
        ///
        /// Concurrent `send()` calls serialize at the reducer level, so state
        /// never sees two writers.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejecting action, store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            Ok(self.reduce_and_execute(action).await)
        }

        /// Read a projection of the current state
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.outstanding()
        }

        /// Wait until every spawned effect, including effects produced by
        /// feedback actions, has finished
        pub async fn wait_for_effects(&self) {
            self.pending_effects.wait().await;
        }

        /// Gracefully shut down the store
        ///
        /// New actions are rejected immediately. Effects already in flight
        /// keep running and their feedback actions are still reduced. With
        /// `timeout = None` the wait is unbounded.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
        /// all pending effects complete.
        pub async fn shutdown(&self, timeout: Option<Duration>) -> Result<(), StoreError> {
            tracing::info!(
                pending_effects = self.pending_effects(),
                "Initiating graceful shutdown"
            );
            self.shutdown.store(true, Ordering::Release);

            if let Some(timeout) = timeout {
                if tokio::time::timeout(timeout, self.wait_for_effects())
                    .await
                    .is_err()
                {
                    let pending = self.pending_effects();
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    return Err(StoreError::ShutdownTimeout(pending));
                }
            } else {
                self.wait_for_effects().await;
            }

            tracing::info!("All effects completed, shutdown successful");
            Ok(())
        }

        async fn reduce_and_execute(&self, action: A) -> EffectHandle
        where
            R: Clone,
            E: Clone,
        {
            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };

            let handle = EffectHandle::new();
            for effect in effects {
                self.execute_effect(effect, &handle);
            }
            handle
        }

        /// Execute an effect with tracking
        ///
        /// Both the action's handle and the store-wide barrier are registered
        /// before the task is spawned, and released by guards when the task
        /// ends. An action produced by the effect is reduced while the guards
        /// are still held, so its own effects are registered first.
        fn execute_effect(&self, effect: Effect<A>, handle: &EffectHandle)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    let handle_guard = handle.barrier.register();
                    let pending_guard = self.pending_effects.register();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _handle_guard = handle_guard;
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, feeding back");
                            store.reduce_and_execute(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
            }
        }
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
            }
        }
    }
}

pub use store::Store;
