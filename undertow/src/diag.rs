//! Contract-violation diagnostics
//!
//! When `unwrap`/`expect` is called on the wrong variant the library panics
//! with a typed [`UnwrapFailed`] payload instead of a bare string, so tests
//! can downcast and inspect the offending value. Backtrace capture is off by
//! default and can be enabled per process, either in code or through the
//! `UNDERTOW_UNWRAP_BACKTRACE` environment variable.

use std::any::Any;
use std::backtrace::Backtrace;
use std::env;
use std::fmt;
use std::panic::panic_any;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicI8, Ordering};

use thiserror::Error;

/// Raw payload carried by a caught panic.
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Panic payload for `unwrap`/`expect` called on the wrong variant
///
/// Carries the `Debug` rendering of the value that was actually held, plus a
/// captured backtrace when capture is enabled.
#[derive(Debug, Error)]
#[error("{message}: {value}")]
pub struct UnwrapFailed {
    /// Which call was made on which variant
    pub message: String,
    /// `Debug` rendering of the offending value
    pub value: String,
    /// Captured at the violation site, `None` unless capture is enabled
    pub backtrace: Option<Backtrace>,
}

const FLAG_UNSET: i8 = -1;

static CAPTURE: AtomicI8 = AtomicI8::new(FLAG_UNSET);

/// Enable or disable backtrace capture on unwrap failures
///
/// Overrides the `UNDERTOW_UNWRAP_BACKTRACE` environment variable. Capture is
/// a debugging aid for tests; it has no effect on the modeled error channel.
pub fn capture_unwrap_backtrace(enabled: bool) {
    CAPTURE.store(enabled as i8, Ordering::Relaxed);
}

fn capture_enabled() -> bool {
    match CAPTURE.load(Ordering::Relaxed) {
        0 => false,
        1 => true,
        _ => env_default(),
    }
}

fn env_default() -> bool {
    static DEFAULT: OnceLock<bool> = OnceLock::new();
    *DEFAULT.get_or_init(|| {
        env::var("UNDERTOW_UNWRAP_BACKTRACE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// Build the panic payload for a wrong-variant unwrap and abort the chain.
pub(crate) fn unwrap_failed(message: &str, value: &dyn fmt::Debug) -> ! {
    let failure = UnwrapFailed {
        message: message.to_string(),
        value: format!("{value:?}"),
        backtrace: capture_enabled().then(Backtrace::force_capture),
    };
    tracing::error!(call = message, value = %failure.value, "outcome contract violation");
    panic_any(failure);
}

/// Best-effort message extraction from a panic payload.
pub(crate) fn panic_message(payload: &PanicPayload) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
