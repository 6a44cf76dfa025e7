//! Integration tests for Store effect tracking
//!
//! Covers the completion barrier that lets a caller wait for background
//! effects, the feedback loop, and graceful shutdown.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use booking_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use booking_runtime::{Store, StoreError};
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start slow background work
    Start { delay_ms: u64 },
    /// Fed back by the background work
    Finished,
    /// Start work that feeds back another slow step
    StartChain,
    /// Plain state change
    Increment,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    counter: u32,
    finished: u32,
}

#[derive(Clone)]
struct TestEnvironment;

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Start { delay_ms } => smallvec![Effect::future(async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Some(TestAction::Finished)
            })],
            TestAction::StartChain => smallvec![Effect::future(async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Some(TestAction::Start { delay_ms: 40 })
            })],
            TestAction::Finished => {
                state.finished += 1;
                smallvec![Effect::None]
            },
            TestAction::Increment => {
                state.counter += 1;
                smallvec![Effect::None]
            },
        }
    }
}

fn test_store() -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(TestState::default(), TestReducer, TestEnvironment)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_send_returns_before_effect_completes() {
    let store = test_store();

    let handle = store.send(TestAction::Start { delay_ms: 50 }).await.unwrap();

    assert_eq!(handle.pending(), 1);
    assert_eq!(store.pending_effects(), 1);
    assert_eq!(store.state(|s| s.finished).await, 0);
}

#[tokio::test]
async fn test_wait_for_effects_includes_feedback() {
    let store = test_store();

    store.send(TestAction::Start { delay_ms: 30 }).await.unwrap();
    store.wait_for_effects().await;

    assert_eq!(store.pending_effects(), 0);
    assert_eq!(store.state(|s| s.finished).await, 1);
}

#[tokio::test]
async fn test_handle_waits_for_its_own_effects() {
    let store = test_store();

    let handle = store.send(TestAction::Start { delay_ms: 20 }).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(handle.pending(), 0);
}

#[tokio::test]
async fn test_handle_timeout() {
    let store = test_store();

    let handle = store.send(TestAction::Start { delay_ms: 500 }).await.unwrap();
    let result = handle.wait_with_timeout(Duration::from_millis(10)).await;

    assert_eq!(result, Err(StoreError::Timeout));
}

#[tokio::test]
async fn test_cascading_effects_hold_the_store_barrier() {
    let store = test_store();

    store.send(TestAction::StartChain).await.unwrap();
    store.wait_for_effects().await;

    // The second step was spawned by a feedback action and still counted
    assert_eq!(store.state(|s| s.finished).await, 1);
}

#[tokio::test]
async fn test_effect_free_action_leaves_nothing_pending() {
    let store = test_store();

    let handle = store.send(TestAction::Increment).await.unwrap();

    assert_eq!(handle.pending(), 0);
    assert_eq!(store.pending_effects(), 0);
    assert_eq!(store.state(|s| s.counter).await, 1);
}

#[tokio::test]
async fn test_concurrent_sends_serialize() {
    let store = test_store();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let _ = store.send(TestAction::Increment).await;
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.state(|s| s.counter).await, 10);
}

#[tokio::test]
async fn test_shutdown_waits_then_rejects_new_actions() {
    let store = test_store();

    store.send(TestAction::Start { delay_ms: 30 }).await.unwrap();
    store.shutdown(None).await.unwrap();

    // Feedback from the in-flight effect was still reduced while draining
    assert_eq!(store.state(|s| s.finished).await, 1);

    let result = store.send(TestAction::Increment).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
}

#[tokio::test]
async fn test_shutdown_timeout() {
    let store = test_store();

    store.send(TestAction::Start { delay_ms: 500 }).await.unwrap();
    let result = store.shutdown(Some(Duration::from_millis(10))).await;

    assert_eq!(result, Err(StoreError::ShutdownTimeout(1)));
}
