// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The upstream cancellation/deadline source for an invocation.

use std::collections::HashMap;

use serde_json::Value;
use tokio::time::{sleep_until, Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::errors::SignalError;

/// Upstream cancellation and deadline state handed to [`Chain::invoke`].
///
/// A `Signal` wraps a [`CancellationToken`] together with an optional
/// deadline and a baggage map of ambient values. The invocation
/// [`Context`](crate::context::Context) delegates its deadline/done/err
/// queries here unchanged; the chain core enforces no timeout policy of its
/// own, handlers check the signal when they need to react to expiry.
///
/// Clones share the same token, so a caller can keep a clone to cancel an
/// in-flight invocation.
///
/// [`Chain::invoke`]: crate::chain::Chain::invoke
#[derive(Debug, Clone, Default)]
pub struct Signal {
    token: CancellationToken,
    deadline: Option<Instant>,
    values: HashMap<String, Value>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach an ambient value, visible to
    /// [`Context::value`](crate::context::Context::value) lookups after the
    /// request-scoped store.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Cancel the signal. All clones observe the cancellation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Look up an ambient value.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Why this signal considers the invocation over, if it does.
    ///
    /// Explicit cancellation wins over an expired deadline.
    pub fn err(&self) -> Option<SignalError> {
        if self.token.is_cancelled() {
            return Some(SignalError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(SignalError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves when the token fires or the deadline passes, whichever comes
    /// first.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_signal_reports_no_error() {
        let signal = Signal::new();
        assert!(!signal.is_cancelled());
        assert_eq!(signal.err(), None);
        assert_eq!(signal.deadline(), None);
    }

    #[test]
    fn cancel_is_visible_to_clones() {
        let signal = Signal::new();
        let clone = signal.clone();
        signal.cancel();
        assert!(clone.is_cancelled());
        assert_eq!(clone.err(), Some(SignalError::Cancelled));
    }

    #[test]
    fn expired_deadline_reports_deadline_exceeded() {
        let signal = Signal::new().with_timeout(Duration::ZERO);
        assert_eq!(signal.err(), Some(SignalError::DeadlineExceeded));
    }

    #[test]
    fn cancellation_wins_over_expired_deadline() {
        let signal = Signal::new().with_timeout(Duration::ZERO);
        signal.cancel();
        assert_eq!(signal.err(), Some(SignalError::Cancelled));
    }

    #[test]
    fn baggage_values_are_retrievable() {
        let signal = Signal::new().with_value("stage", json!("prod"));
        assert_eq!(signal.value("stage"), Some(&json!("prod")));
        assert_eq!(signal.value("missing"), None);
    }

    #[tokio::test]
    async fn cancelled_resolves_on_token_fire() {
        let signal = Signal::new();
        signal.cancel();
        tokio::time::timeout(Duration::from_secs(1), signal.cancelled())
            .await
            .expect("cancelled() should resolve immediately after cancel");
    }

    #[tokio::test]
    async fn cancelled_resolves_on_deadline_expiry() {
        let signal = Signal::new().with_timeout(Duration::from_millis(50));
        tokio::time::timeout(Duration::from_secs(1), signal.cancelled())
            .await
            .expect("cancelled() should resolve at the deadline");
    }
}
