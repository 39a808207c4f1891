//! Synchronous success/failure values
//!
//! [`Outcome`] is a closed two-variant sum type: `Ok` holds a success value,
//! `Err` holds a failure value. Every transformation method leaves the other
//! branch untouched, so failure paths stay visible in signatures instead of
//! unwinding through callers. The type is named `Outcome` rather than
//! `Result` so consumers keep the std prelude intact.
//!
//! # Example
//!
//! ```
//! use undertow::{ok, err, Outcome};
//!
//! fn parse_port(raw: &str) -> Outcome<u16, String> {
//!     match raw.parse::<u16>() {
//!         Ok(port) => ok(port),
//!         Err(e) => err(format!("invalid port `{raw}`: {e}")),
//!     }
//! }
//!
//! let next = parse_port("8080").map(|p| p + 1);
//! assert_eq!(next, ok(8081));
//!
//! let fallback = parse_port("eighty").map(|p| p + 1).unwrap_or(0);
//! assert_eq!(fallback, 0);
//! ```

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use crate::async_outcome::{AsyncOutcome, err_async};
use crate::diag::{self, PanicPayload};

/// A value that is either a success (`Ok`) or a failure (`Err`)
///
/// Exactly one variant is live; the held value is immutable once constructed.
/// Combinators never convert between variants implicitly: an `Err` bypasses
/// every success-side stage and an `Ok` bypasses every error-side stage until
/// a terminal operation ([`match_with`](Outcome::match_with),
/// [`unwrap_or`](Outcome::unwrap_or), or the panicking `unwrap` family)
/// consumes the value.
#[must_use = "this `Outcome` may be an `Err` variant, which should be handled"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T, E> {
    /// Holds the success value
    Ok(T),
    /// Holds the failure value
    Err(E),
}

/// Construct an `Ok` outcome
pub fn ok<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Ok(value)
}

/// Construct an `Err` outcome
pub fn err<T, E>(error: E) -> Outcome<T, E> {
    Outcome::Err(error)
}

impl<T, E> Outcome<T, E> {
    // ==================== Discriminant ====================

    /// Returns `true` if this is an `Ok` value
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns `true` if this is an `Err` value
    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    // ==================== Transformations ====================

    /// Apply `f` to a held success value, leaving an `Err` untouched
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Apply `f` to a held failure value, leaving an `Ok` untouched
    pub fn map_err<U, F>(self, f: F) -> Outcome<T, U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(f(error)),
        }
    }

    /// Chain a computation that can itself fail
    ///
    /// Flattens one level: if `f` returns an `Err`, that becomes the result.
    /// An `Err` input bypasses `f` entirely.
    pub fn and_then<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        match self {
            Outcome::Ok(value) => f(value),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Attempt recovery from a failure
    ///
    /// `f` receives the held error and produces a new outcome, which becomes
    /// the result. An `Ok` input bypasses `f` entirely.
    pub fn or_else<F2, F>(self, f: F) -> Outcome<T, F2>
    where
        F: FnOnce(E) -> Outcome<T, F2>,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => f(error),
        }
    }

    // ==================== Async lifts ====================

    /// Lift into an [`AsyncOutcome`] by applying an async success transform
    ///
    /// An `Err` input is carried across the async boundary untouched.
    pub fn async_map<U, Fut, F>(self, f: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U> + Send + 'static,
        U: Send + 'static,
        E: Send + 'static,
    {
        match self {
            Outcome::Ok(value) => {
                let fut = f(value);
                AsyncOutcome::new(async move { Outcome::Ok(fut.await) })
            }
            Outcome::Err(error) => err_async(error),
        }
    }

    /// Chain into a deferred computation that can itself fail
    ///
    /// An `Err` input produces an already-settled [`AsyncOutcome`] wrapping
    /// the existing error.
    pub fn async_and_then<U, F>(self, f: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> AsyncOutcome<U, E>,
        U: Send + 'static,
        E: Send + 'static,
    {
        match self {
            Outcome::Ok(value) => f(value),
            Outcome::Err(error) => err_async(error),
        }
    }

    // ==================== Terminal operations ====================

    /// Return the held success value, or `default` for an `Err`
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(_) => default,
        }
    }

    /// Fold both branches into a single value
    ///
    /// Exactly one of the two callbacks runs; both must return the same type.
    pub fn match_with<A, FOk, FErr>(self, on_ok: FOk, on_err: FErr) -> A
    where
        FOk: FnOnce(T) -> A,
        FErr: FnOnce(E) -> A,
    {
        match self {
            Outcome::Ok(value) => on_ok(value),
            Outcome::Err(error) => on_err(error),
        }
    }

    /// Convert to `Option<T>`, discarding any error
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    /// Convert to `Option<E>`, discarding any success value
    pub fn err(self) -> Option<E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(error) => Some(error),
        }
    }

    /// Borrow the held value as `Outcome<&T, &E>`
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    // ==================== Panicking extractors (test assertions) ====================

    /// Return the held success value, panicking on an `Err`
    ///
    /// Fatal by design: panics with an [`UnwrapFailed`](crate::UnwrapFailed)
    /// payload carrying the offending error. Intended for test assertions,
    /// never production control flow.
    pub fn unwrap(self) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => {
                diag::unwrap_failed("called `Outcome::unwrap()` on an `Err` value", &error)
            }
        }
    }

    /// Like [`unwrap`](Outcome::unwrap) with a caller-supplied message
    pub fn expect(self, msg: &str) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => diag::unwrap_failed(msg, &error),
        }
    }

    /// Return the held failure value, panicking on an `Ok`
    pub fn unwrap_err(self) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Outcome::Ok(value) => {
                diag::unwrap_failed("called `Outcome::unwrap_err()` on an `Ok` value", &value)
            }
            Outcome::Err(error) => error,
        }
    }

    /// Like [`unwrap_err`](Outcome::unwrap_err) with a caller-supplied message
    pub fn expect_err(self, msg: &str) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Outcome::Ok(value) => diag::unwrap_failed(msg, &value),
            Outcome::Err(error) => error,
        }
    }

    // ==================== Panic-catching adapter ====================

    /// Run `f`, converting a panic into an `Err` mapped through `error_fn`
    ///
    /// The payload-preserving form is [`Outcome::catching`]. Callers close
    /// over their arguments:
    ///
    /// ```
    /// use undertow::Outcome;
    ///
    /// let raw = "not a number";
    /// let parsed: Outcome<i64, String> = Outcome::catching_map(
    ///     || raw.parse::<i64>().unwrap(),
    ///     |_| format!("could not parse `{raw}`"),
    /// );
    /// assert!(parsed.is_err());
    /// ```
    pub fn catching_map<F, M>(f: F, error_fn: M) -> Self
    where
        F: FnOnce() -> T,
        M: FnOnce(PanicPayload) -> E,
    {
        Outcome::catching(f).map_err(error_fn)
    }
}

impl<T> Outcome<T, PanicPayload> {
    /// Run `f`, converting a panic into an `Err` holding the raw payload
    pub fn catching<F>(f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Outcome::Ok(value),
            Err(payload) => {
                tracing::debug!(panic = %diag::panic_message(&payload), "panic converted to Err");
                Outcome::Err(payload)
            }
        }
    }
}

// ==================== std interop ====================

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Err(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }
}
