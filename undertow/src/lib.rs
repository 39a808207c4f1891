//! Typed success/failure values for explicit error propagation
//!
//! Replaces unwinding-based control flow with plain, composable values so
//! failure paths are visible in signatures and must be handled or
//! deliberately deferred. The crate provides:
//!
//! - [`Outcome`]: the synchronous sum type (`Ok`/`Err`) and its
//!   transformation methods
//! - [`AsyncOutcome`]: a deferred `Outcome` with the same combinator
//!   vocabulary across the async boundary
//! - [`combine`]/[`combine_with_all_errors`] and their async forms:
//!   aggregate a sequence of outcomes into one
//! - Boundary adapters for panicking code ([`Outcome::catching`]) and
//!   fallible futures ([`AsyncOutcome::from_try_future`])
//!
//! # Example
//!
//! ```
//! use undertow::{ok, err, combine, Outcome};
//!
//! fn parse_port(raw: &str) -> Outcome<u16, String> {
//!     match raw.parse::<u16>() {
//!         Ok(port) => ok(port),
//!         Err(e) => err(format!("invalid port `{raw}`: {e}")),
//!     }
//! }
//!
//! let ports = combine(vec![parse_port("80"), parse_port("443")]);
//! assert_eq!(ports, ok(vec![80, 443]));
//!
//! let recovered = parse_port("eighty").or_else(|_| ok::<_, String>(8080));
//! assert_eq!(recovered, ok(8080));
//! ```

pub mod async_outcome;
pub mod combine;
pub mod diag;
pub mod outcome;

// Re-exports
pub use async_outcome::{AsyncOutcome, IntoAsyncOutcome, err_async, ok_async};
pub use combine::{combine, combine_async, combine_with_all_errors, combine_with_all_errors_async};
pub use diag::{PanicPayload, UnwrapFailed, capture_unwrap_backtrace};
pub use outcome::{Outcome, err, ok};
