//! Logging setup.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, degraded result accepted (e.g. failed photo delete) |
//! | INFO  | Lifecycle events and operation completions |
//! | DEBUG | Decision points and intermediate values |

/// Initialise the global tracing subscriber.
///
/// Honours `RUST_LOG`; defaults to `info`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Same as [`init`], but safe to call repeatedly (tests).
pub fn try_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
