//! # Observability & Tracing
//!
//! Structured logging for the directory, built on the `tracing` crate.
//! The store actor emits structured events for every operation (defines,
//! injects, cache hits, fetch starts and settlements); this module only
//! installs the subscriber that renders them.

/// Initializes the tracing/logging infrastructure for the application.
///
/// Log verbosity is controlled via the `RUST_LOG` environment variable:
///
/// - `RUST_LOG=info` - lifecycle and fetch settlements
/// - `RUST_LOG=debug` - every store operation, including cache hits and
///   coalesced finds
/// - `RUST_LOG=resource_store=debug` - debug only for the store crate
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
