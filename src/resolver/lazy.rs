// ABOUTME: Async compute-once wrapper with single-flight semantics.
// ABOUTME: All callers share one execution and one outcome, success or failure.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

enum State<T, E> {
    Pending(BoxFuture<'static, Result<T, E>>),
    Ready(Result<T, Arc<E>>),
}

/// Wraps an expensive idempotent operation so it runs at most once.
///
/// The first `get` drives the wrapped future; concurrent callers wait on the
/// same execution and every caller observes the identical outcome. Failures
/// are cached just like successes: the wrapped operation may have mutated
/// shared caches and is not safely re-entrant, so a failed instance stays
/// failed.
pub struct Lazy<T, E> {
    state: Mutex<State<T, E>>,
}

impl<T, E> Lazy<T, E>
where
    T: Clone,
{
    pub fn new<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            state: Mutex::new(State::Pending(Box::pin(operation))),
        }
    }

    /// Resolve the wrapped operation, or wait for an in-flight resolution.
    ///
    /// Holding the state lock across the await is what makes this
    /// single-flight: late callers block on the lock until the first caller
    /// has recorded the outcome.
    pub async fn get(&self) -> Result<T, Arc<E>> {
        let mut state = self.state.lock().await;
        match &mut *state {
            State::Ready(result) => result.clone(),
            State::Pending(operation) => {
                let result = operation.await.map_err(Arc::new);
                *state = State::Ready(result.clone());
                result
            }
        }
    }

    /// Whether a resolution outcome has been recorded. Returns false while a
    /// resolution is in flight.
    pub fn is_resolved(&self) -> bool {
        match self.state.try_lock() {
            Ok(state) => matches!(*state, State::Ready(_)),
            Err(_) => false,
        }
    }
}
