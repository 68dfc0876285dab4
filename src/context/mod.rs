// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-invocation context: the advance protocol, the abort sentinel, and the
//! key/value store shared by every handler in one chain invocation.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tokio::time::Instant;

use crate::errors::SignalError;
use crate::event::Payload;
use crate::observability::messages::chain::HandlerFailed;
use crate::observability::messages::StructuredLog;
use crate::signal::Signal;
use crate::traits::{ErrHandler, Handler, HandlerResult};

mod respond;

/// Cursor value marking an aborted chain. Every real handler index stays
/// below this; the chain's handler-count bound guarantees it.
pub(crate) const ABORT_INDEX: i8 = i8::MAX >> 1;

/// Per-invocation state handed to every handler in the chain.
///
/// `Context` is a cheap handle over shared state: cloning hands the same
/// cursor, store, and signal to another holder **within the same
/// invocation**. A context lives exactly as long as its invocation and is
/// never shared across invocations.
///
/// ## Advance protocol
///
/// The cursor starts before the first handler (`-1`), moves forward only,
/// and is forced to a sentinel past any real index by [`abort`](Self::abort).
/// Each call to [`next`](Self::next) advances the shared cursor, so a
/// handler in the chain runs at most once per invocation no matter how many
/// enclosing handlers also call `next`.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    payload: Payload,
    cursor: AtomicI8,
    handlers: Arc<[Arc<dyn Handler>]>,
    recovery: Arc<dyn ErrHandler>,
    signal: Signal,
    /// Lazily allocated on first write.
    keys: RwLock<Option<HashMap<String, Value>>>,
}

impl Context {
    pub(crate) fn new(
        payload: Payload,
        handlers: Arc<[Arc<dyn Handler>]>,
        recovery: Arc<dyn ErrHandler>,
        signal: Signal,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                payload,
                cursor: AtomicI8::new(-1),
                handlers,
                recovery,
                signal,
                keys: RwLock::new(None),
            }),
        }
    }

    /// The raw inbound payload.
    pub fn payload(&self) -> &Payload {
        &self.inner.payload
    }

    /// Advance the chain and run handlers until one finalizes the
    /// invocation, errors, or the chain is exhausted.
    ///
    /// Handlers are cooperative: each one calls `next` to pass control
    /// downstream, and the value it returns bubbles back up through every
    /// enclosing `next` call. If a handler returns an error, the chain's
    /// recovery handler runs once with that error and this context, and its
    /// result becomes the outcome of this `next` call; an error from
    /// recovery itself propagates to the caller.
    ///
    /// Exhausting the chain without any handler finalizing is a defined
    /// outcome, not an error: `next` returns the last handler's value, or
    /// `Value::Null` when no handler produced one.
    pub async fn next(&self) -> HandlerResult {
        let mut res = Value::Null;
        let mut cursor = self.advance();
        while (cursor as usize) < self.inner.handlers.len() && !self.is_aborted() {
            let handler = Arc::clone(&self.inner.handlers[cursor as usize]);
            match handler.call(self.clone()).await {
                Ok(value) => res = value,
                Err(err) => {
                    HandlerFailed { index: cursor as usize, error: &err }.log();
                    let recovery = Arc::clone(&self.inner.recovery);
                    return recovery.recover(err, self.clone()).await;
                }
            }
            cursor = self.advance();
        }
        Ok(res)
    }

    fn advance(&self) -> i8 {
        self.inner.cursor.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Force the cursor past the end of the chain. Idempotent: handlers that
    /// already ran are unaffected, handlers not yet reached will never run.
    pub fn abort(&self) {
        self.inner.cursor.store(ABORT_INDEX, Ordering::SeqCst);
    }

    /// True once the cursor has reached the abort sentinel.
    pub fn is_aborted(&self) -> bool {
        self.inner.cursor.load(Ordering::SeqCst) >= ABORT_INDEX
    }

    /// Finalize the invocation with `value` and halt the chain.
    ///
    /// The idiomatic way for a handler to produce the response: equivalent
    /// to [`abort`](Self::abort) followed by returning the value.
    pub fn respond(&self, value: Value) -> HandlerResult {
        self.abort();
        Ok(value)
    }

    /// Store `value` under `key`. Last write wins.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let mut keys = self.inner.keys.write().expect("invocation store lock poisoned");
        keys.get_or_insert_with(HashMap::new).insert(key.into(), value);
    }

    /// Fetch a stored value, or `None` if `key` was never written.
    pub fn get(&self, key: &str) -> Option<Value> {
        let keys = self.inner.keys.read().expect("invocation store lock poisoned");
        keys.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// Fetch a value an upstream handler is required to have stored.
    ///
    /// # Panics
    ///
    /// Panics if `key` was never set. Reaching for a missing key is a wiring
    /// defect in the chain, not a recoverable runtime error.
    pub fn must_get(&self, key: &str) -> Value {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key {key:?} does not exist in the invocation store"),
        }
    }

    /// Combined lookup: the request-scoped store first, then the signal's
    /// ambient baggage.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.get(key)
            .or_else(|| self.inner.signal.value(key).cloned())
    }

    /// Deadline of the upstream signal, unchanged.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.signal.deadline()
    }

    /// Resolves when the upstream signal is cancelled or its deadline
    /// passes.
    pub async fn done(&self) {
        self.inner.signal.cancelled().await
    }

    /// Error state of the upstream signal, unchanged.
    pub fn err(&self) -> Option<SignalError> {
        self.inner.signal.err()
    }

    /// The upstream signal itself.
    pub fn signal(&self) -> &Signal {
        &self.inner.signal
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cursor", &self.inner.cursor.load(Ordering::SeqCst))
            .field("handler_count", &self.inner.handlers.len())
            .field("aborted", &self.is_aborted())
            .finish_non_exhaustive()
    }
}
