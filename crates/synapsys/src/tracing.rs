//! # Tracing
//!
//! The runtime logs through the `tracing` crate. Every event carries the
//! actor's registered name in the `actor` field, so one actor's history can be
//! followed with a plain filter.
//!
//! | Level | Events |
//! |-------|--------|
//! | `info` | system created, actor registered/started/stopped, shutdown progress |
//! | `warn` | handler errors, ask timeouts, replies nobody waited for, duplicate names |
//! | `error` | handler panics |
//! | `debug` | every send, ask and dispatched envelope, with the payload |
//! | `trace` | reduction budget yields |
//!
//! ```bash
//! RUST_LOG=info cargo run -p synapsys-sample        # lifecycle only
//! RUST_LOG=synapsys=debug cargo run -p synapsys-sample  # every envelope
//! ```
//!
//! Applications usually call [`setup_tracing`] once at the start of `main`.
//! Libraries and tests should leave subscriber setup to the binary.

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` only errors are printed.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
///
/// ```ignore
/// synapsys::tracing::setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
