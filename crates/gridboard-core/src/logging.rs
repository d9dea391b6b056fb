//! Logging facade.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! macros. Without it, the same macro names expand to nothing so engine code
//! can log unconditionally without sprinkling `cfg` attributes. The no-op
//! forms expand to `()` so they work in expression position too.
//!
//! Callers import through the crate root (`gridboard_core::debug!`), which
//! resolves to whichever variant is compiled in.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, info_span, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        ()
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        ()
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        ()
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ()
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        ()
    };
}

/// Span stand-in used when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Mirrors `tracing::Span::entered`; the guard does nothing.
    #[must_use]
    pub fn entered(self) -> Self {
        self
    }
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug_span {
    ($($arg:tt)*) => {
        $crate::logging::NoopSpan
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info_span {
    ($($arg:tt)*) => {
        $crate::logging::NoopSpan
    };
}

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
}
