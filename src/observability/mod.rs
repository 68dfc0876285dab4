// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging of invocation lifecycle
//! events.
//!
//! Message types follow a struct-based pattern with a `Display`
//! implementation plus the [`messages::StructuredLog`] trait, so call sites
//! emit consistent, field-structured events instead of scattering format
//! strings through the pipeline code.

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// Intended for binaries and tests embedding the crate. Installing twice is
/// harmless; the second attempt is ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
