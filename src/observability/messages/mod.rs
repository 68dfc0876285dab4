// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message implements `Display` for a human-readable line and
//! [`StructuredLog`] for field-structured emission.

use tracing::Span;

pub mod chain;

/// Implemented by every log message: emit the message at its level with
/// structured fields, or open a span carrying the same fields.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
