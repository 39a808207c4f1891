//! Deferred success/failure values
//!
//! [`AsyncOutcome`] wraps an in-flight computation that will settle to an
//! [`Outcome`], and re-exposes the combinator vocabulary across the async
//! boundary: each combinator describes a continuation chained onto the prior
//! stage without the caller awaiting in between. The wrapper implements
//! [`Future`], so `.await` yields the settled `Outcome` directly; a modeled
//! `Err` never surfaces as an unwind.
//!
//! Stages of one chain run strictly in order, each exactly once, with at most
//! one stage in flight: the whole chain is a single future driven by a single
//! poll path. `Send + 'static` bounds follow from the boxed future; the
//! intended host is a multi-threaded runtime.
//!
//! # Example
//!
//! ```
//! use undertow::{ok, ok_async};
//!
//! tokio::runtime::Builder::new_current_thread()
//!     .build()
//!     .unwrap()
//!     .block_on(async {
//!         let doubled = ok_async::<i32, String>(21)
//!             .map(|n| n * 2)
//!             .await;
//!         assert_eq!(doubled, ok(42));
//!     });
//! ```

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::diag::{self, PanicPayload};
use crate::outcome::Outcome;

/// A deferred [`Outcome`]
///
/// Not itself a variant: it represents a computation that will produce one.
/// Awaiting it consumes the wrapper, so it settles at most once.
pub struct AsyncOutcome<T, E> {
    inner: BoxFuture<'static, Outcome<T, E>>,
}

/// Construct an already-settled `Ok` wrapper
pub fn ok_async<T, E>(value: T) -> AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    AsyncOutcome::new(future::ready(Outcome::Ok(value)))
}

/// Construct an already-settled `Err` wrapper
pub fn err_async<T, E>(error: E) -> AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    AsyncOutcome::new(future::ready(Outcome::Err(error)))
}

impl<T, E> AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wrap a computation that settles to an [`Outcome`]
    pub fn new<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Outcome<T, E>> + Send + 'static,
    {
        Self { inner: fut.boxed() }
    }

    // ==================== Boundary adapters ====================

    /// Wrap a computation that cannot fail
    ///
    /// The settled value is always `Ok`. A panic inside `fut` is a
    /// programming-contract violation, not a modeled error, and is not
    /// caught: it unwinds through the awaiting caller.
    pub fn from_future<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::new(async move { Outcome::Ok(fut.await) })
    }

    /// Wrap a fallible computation, mapping its failure into the error channel
    ///
    /// The `Err` arm of `fut` is the transport failure; it is converted
    /// through `error_fn` into a modeled `Err`.
    pub fn from_try_future<Fut, X, M>(fut: Fut, error_fn: M) -> Self
    where
        Fut: Future<Output = Result<T, X>> + Send + 'static,
        M: FnOnce(X) -> E + Send + 'static,
    {
        Self::new(async move {
            match fut.await {
                Ok(value) => Outcome::Ok(value),
                Err(transport) => Outcome::Err(error_fn(transport)),
            }
        })
    }

    // ==================== Combinators ====================

    /// Apply `f` to the settled success value, leaving an `Err` untouched
    pub fn map<U, F>(self, f: F) -> AsyncOutcome<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        AsyncOutcome::new(async move { self.inner.await.map(f) })
    }

    /// Apply `f` to the settled failure value, leaving an `Ok` untouched
    pub fn map_err<U, F>(self, f: F) -> AsyncOutcome<T, U>
    where
        U: Send + 'static,
        F: FnOnce(E) -> U + Send + 'static,
    {
        AsyncOutcome::new(async move { self.inner.await.map_err(f) })
    }

    /// Chain a computation that can itself fail, sync or deferred
    ///
    /// `f` may return an [`Outcome`], an [`AsyncOutcome`], or a std
    /// `Result`; anything implementing [`IntoAsyncOutcome`] is lifted into
    /// the deferred form. The continuation runs only once the prior stage
    /// has settled, and only on the `Ok` branch.
    pub fn and_then<U, R, F>(self, f: F) -> AsyncOutcome<U, E>
    where
        U: Send + 'static,
        R: IntoAsyncOutcome<U, E>,
        F: FnOnce(T) -> R + Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.inner.await {
                Outcome::Ok(value) => f(value).into_async_outcome().await,
                Outcome::Err(error) => Outcome::Err(error),
            }
        })
    }

    /// Attempt recovery once the chain has settled to an `Err`
    pub fn or_else<F2, R, F>(self, f: F) -> AsyncOutcome<T, F2>
    where
        F2: Send + 'static,
        R: IntoAsyncOutcome<T, F2>,
        F: FnOnce(E) -> R + Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.inner.await {
                Outcome::Ok(value) => Outcome::Ok(value),
                Outcome::Err(error) => f(error).into_async_outcome().await,
            }
        })
    }

    // ==================== Terminal observations ====================

    /// Fold both branches into a single deferred plain value
    pub async fn match_with<A, FOk, FErr>(self, on_ok: FOk, on_err: FErr) -> A
    where
        FOk: FnOnce(T) -> A,
        FErr: FnOnce(E) -> A,
    {
        self.inner.await.match_with(on_ok, on_err)
    }

    /// Resolve to the settled success value, or `default` for an `Err`
    pub async fn unwrap_or(self, default: T) -> T {
        self.inner.await.unwrap_or(default)
    }
}

impl<T> AsyncOutcome<T, PanicPayload>
where
    T: Send + 'static,
{
    /// Wrap a computation, converting a panic during it into an `Err`
    ///
    /// Counterpart of [`Outcome::catching`] for deferred work.
    pub fn catching<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        AsyncOutcome::new(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(value) => Outcome::Ok(value),
                Err(payload) => {
                    tracing::debug!(panic = %diag::panic_message(&payload), "panic converted to Err");
                    Outcome::Err(payload)
                }
            }
        })
    }
}

impl<T, E> Future for AsyncOutcome<T, E> {
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl<T, E> fmt::Debug for AsyncOutcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOutcome").finish_non_exhaustive()
    }
}

/// Capability of settling to an [`Outcome`]
///
/// The single lifting seam shared by the synchronous and deferred types:
/// combinator callbacks may return any implementor, and the deferred
/// combinator logic normalizes to [`AsyncOutcome`] internally.
pub trait IntoAsyncOutcome<T, E> {
    /// Lift into the deferred form
    fn into_async_outcome(self) -> AsyncOutcome<T, E>;
}

impl<T, E> IntoAsyncOutcome<T, E> for AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_async_outcome(self) -> AsyncOutcome<T, E> {
        self
    }
}

impl<T, E> IntoAsyncOutcome<T, E> for Outcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_async_outcome(self) -> AsyncOutcome<T, E> {
        AsyncOutcome::new(future::ready(self))
    }
}

impl<T, E> IntoAsyncOutcome<T, E> for Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_async_outcome(self) -> AsyncOutcome<T, E> {
        AsyncOutcome::new(future::ready(Outcome::from(self)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::outcome::{err, ok};

    #[tokio::test]
    async fn test_map_applies_on_ok_only() {
        assert_eq!(ok_async::<i32, String>(3).map(|n| n + 1).await, ok(4));
        assert_eq!(
            err_async::<i32, String>("e".into()).map(|n| n + 1).await,
            err("e".to_string())
        );
    }

    #[tokio::test]
    async fn test_map_err_applies_on_err_only() {
        assert_eq!(ok_async::<i32, i32>(3).map_err(|e| e + 1).await, ok(3));
        assert_eq!(err_async::<i32, i32>(3).map_err(|e| e + 1).await, err(4));
    }

    #[tokio::test]
    async fn test_and_then_lifts_all_return_shapes() {
        let from_sync = ok_async::<i32, String>(1)
            .and_then(|n| ok::<i32, String>(n + 1))
            .await;
        assert_eq!(from_sync, ok(2));

        let from_deferred = ok_async::<i32, String>(1)
            .and_then(|n| ok_async::<i32, String>(n + 10))
            .await;
        assert_eq!(from_deferred, ok(11));

        let from_std = ok_async::<i32, String>(1)
            .and_then(|n| Ok::<i32, String>(n + 100))
            .await;
        assert_eq!(from_std, ok(101));
    }

    #[tokio::test]
    async fn test_and_then_short_circuits_on_err() {
        let touched = Arc::new(Mutex::new(false));
        let flag = touched.clone();
        let settled = err_async::<i32, String>("upstream".into())
            .and_then(move |n| {
                *flag.lock().unwrap() = true;
                ok::<i32, String>(n)
            })
            .await;
        assert_eq!(settled, err("upstream".to_string()));
        assert!(!*touched.lock().unwrap());
    }

    #[tokio::test]
    async fn test_or_else_recovers() {
        let recovered = err_async::<i32, String>("gone".into())
            .or_else(|_| ok::<i32, i32>(0))
            .await;
        assert_eq!(recovered, ok(0));

        let untouched = ok_async::<i32, String>(5)
            .or_else(|_| ok::<i32, i32>(0))
            .await;
        assert_eq!(untouched, ok(5));
    }

    #[tokio::test]
    async fn test_match_with_and_unwrap_or_fold_to_plain_values() {
        let rendered = ok_async::<i32, String>(2)
            .match_with(|v| format!("value {v}"), |e| e)
            .await;
        assert_eq!(rendered, "value 2");

        let fallback = err_async::<i32, String>("lost".into()).unwrap_or(0).await;
        assert_eq!(fallback, 0);
    }

    #[tokio::test]
    async fn test_from_try_future_maps_transport_failure() {
        async fn fetch(fail: bool) -> Result<u32, &'static str> {
            if fail { Err("offline") } else { Ok(7) }
        }

        let fulfilled =
            AsyncOutcome::from_try_future(fetch(false), |e| format!("transport: {e}")).await;
        assert_eq!(fulfilled, ok(7));

        let rejected =
            AsyncOutcome::from_try_future(fetch(true), |e| format!("transport: {e}")).await;
        assert_eq!(rejected, err("transport: offline".to_string()));
    }

    #[tokio::test]
    async fn test_from_future_always_settles_ok() {
        let settled = AsyncOutcome::<_, String>::from_future(async { 9 }).await;
        assert_eq!(settled, ok(9));
    }

    #[tokio::test]
    async fn test_catching_converts_panic() {
        let caught = AsyncOutcome::<i32, _>::catching(async { panic!("exploded") }).await;
        let payload = caught.err().unwrap();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"exploded"));

        let fine = AsyncOutcome::catching(async { 1 }).await;
        assert_eq!(fine.ok(), Some(1));
    }

    #[tokio::test]
    async fn test_stages_run_in_chain_order_exactly_once() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let start = log.clone();
        let mapped = log.clone();
        let chained = log.clone();
        let settled = AsyncOutcome::from_future(async move {
            start.lock().unwrap().push("fetch");
            1
        })
        .map(move |n| {
            mapped.lock().unwrap().push("map");
            n + 1
        })
        .and_then(move |n| {
            chained.lock().unwrap().push("chain");
            ok::<i32, String>(n)
        })
        .await;

        assert_eq!(settled, ok(2));
        assert_eq!(*log.lock().unwrap(), vec!["fetch", "map", "chain"]);
    }
}
