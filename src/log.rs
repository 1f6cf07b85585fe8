//! Crate-private logging macros.
//!
//! `debug!` and `warn!` are `tracing`'s under the `tracing` feature and
//! swallow their arguments otherwise. Neither leaks into the public macro
//! namespace.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {log_debug as debug, log_warn as warn};
