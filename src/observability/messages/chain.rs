// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for chain invocation lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Invocation start and completion
//! * Handler failures routed to recovery
//! * Recovery failures that terminate the invocation

use std::fmt::{Display, Formatter};
use std::time::Duration;

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// An invocation started against a chain.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InvocationStarted {
    pub handler_count: usize,
}

impl Display for InvocationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting invocation: {} handlers", self.handler_count)
    }
}

impl StructuredLog for InvocationStarted {
    fn log(&self) {
        tracing::info!(handler_count = self.handler_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "invocation",
            span_name = name,
            handler_count = self.handler_count,
        )
    }
}

/// An invocation completed with an encoded response.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InvocationCompleted {
    pub duration: Duration,
}

impl Display for InvocationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invocation completed in {:?}", self.duration)
    }
}

impl StructuredLog for InvocationCompleted {
    fn log(&self) {
        tracing::info!(duration_ms = self.duration.as_millis() as u64, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "invocation_completed",
            span_name = name,
            duration = ?self.duration,
        )
    }
}

/// A handler returned an error; the chain is routing it to recovery.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct HandlerFailed<'a> {
    pub index: usize,
    pub error: &'a anyhow::Error,
}

impl Display for HandlerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler {} failed, routing to recovery: {}",
            self.index, self.error
        )
    }
}

impl StructuredLog for HandlerFailed<'_> {
    fn log(&self) {
        tracing::error!(index = self.index, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "handler_failed",
            span_name = name,
            index = self.index,
        )
    }
}

/// The recovery handler itself failed; the invocation ends with a terminal
/// error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RecoveryFailed<'a> {
    pub error: &'a anyhow::Error,
}

impl Display for RecoveryFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Recovery handler failed: {}", self.error)
    }
}

impl StructuredLog for RecoveryFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("recovery_failed", span_name = name)
    }
}
