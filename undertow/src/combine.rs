//! Aggregation over sequences of outcomes
//!
//! Two fold disciplines over an ordered sequence:
//!
//! - [`combine`]: short-circuits on the first `Err`, which becomes the
//!   aggregate.
//! - [`combine_with_all_errors`]: folds the whole sequence and reports every
//!   error in encounter order.
//!
//! The async forms settle every element concurrently first (aggregation must
//! not serialize independent computations), then apply the same fold. The
//! aggregate always preserves original list order, never settle order.

use futures::future::join_all;

use crate::async_outcome::AsyncOutcome;
use crate::outcome::Outcome;

/// Fold a sequence of outcomes into one, short-circuiting on the first `Err`
///
/// All `Ok` → `Ok` of every success value in original order.
///
/// ```
/// use undertow::{ok, err, combine};
///
/// let all = combine(vec![ok::<_, String>(1), ok(2), ok(3)]);
/// assert_eq!(all, ok(vec![1, 2, 3]));
///
/// let first_failure = combine(vec![ok(1), err("a"), ok(3), err("b")]);
/// assert_eq!(first_failure, err("a"));
/// ```
pub fn combine<I, T, E>(outcomes: I) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    let iter = outcomes.into_iter();
    let mut values = Vec::with_capacity(iter.size_hint().0);
    for outcome in iter {
        match outcome {
            Outcome::Ok(value) => values.push(value),
            Outcome::Err(error) => return Outcome::Err(error),
        }
    }
    Outcome::Ok(values)
}

/// Fold a sequence of outcomes, reporting every error
///
/// Never short-circuits: one or more `Err` elements → `Err` of every error
/// value in encounter order (successes among them are discarded); all `Ok` →
/// `Ok` of every success value in order.
pub fn combine_with_all_errors<I, T, E>(outcomes: I) -> Outcome<Vec<T>, Vec<E>>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    let mut values = Vec::new();
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Ok(value) => values.push(value),
            Outcome::Err(error) => errors.push(error),
        }
    }
    if errors.is_empty() {
        Outcome::Ok(values)
    } else {
        Outcome::Err(errors)
    }
}

/// Async form of [`combine`]
///
/// Every element is polled concurrently; only the fold over the settled
/// values short-circuits, not the scheduling.
pub fn combine_async<I, T, E>(outcomes: I) -> AsyncOutcome<Vec<T>, E>
where
    I: IntoIterator<Item = AsyncOutcome<T, E>>,
    T: Send + 'static,
    E: Send + 'static,
{
    let pending: Vec<AsyncOutcome<T, E>> = outcomes.into_iter().collect();
    AsyncOutcome::new(async move { combine(join_all(pending).await) })
}

/// Async form of [`combine_with_all_errors`]
pub fn combine_with_all_errors_async<I, T, E>(outcomes: I) -> AsyncOutcome<Vec<T>, Vec<E>>
where
    I: IntoIterator<Item = AsyncOutcome<T, E>>,
    T: Send + 'static,
    E: Send + 'static,
{
    let pending: Vec<AsyncOutcome<T, E>> = outcomes.into_iter().collect();
    AsyncOutcome::new(async move { combine_with_all_errors(join_all(pending).await) })
}

/// `collect()` support with [`combine`] semantics.
impl<T, E> FromIterator<Outcome<T, E>> for Outcome<Vec<T>, E> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Outcome<T, E>>,
    {
        combine(iter)
    }
}
