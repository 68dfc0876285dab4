// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The chain builder and the single invocation entry point.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::context::{Context, ABORT_INDEX};
use crate::errors::InvokeError;
use crate::event::Payload;
use crate::observability::messages::chain::{
    InvocationCompleted, InvocationStarted, RecoveryFailed,
};
use crate::observability::messages::StructuredLog;
use crate::signal::Signal;
use crate::traits::{handler_fn, DefaultErrHandler, ErrHandler, Handler};


/// Most handlers one chain may hold. Bounded below the abort sentinel so
/// cursor arithmetic can never collide with it.
pub const MAX_HANDLERS: usize = ABORT_INDEX as usize - 1;

/// An ordered, append-only sequence of handlers plus one recovery handler.
///
/// A chain is built once at cold start and treated as read-only for the
/// lifetime of every invocation that references it: appends are the only
/// mutation, there is no removal, and concurrent invocations share the
/// registered handlers. Registration order is execution order; duplicates
/// are allowed.
///
/// # Examples
///
/// ```
/// use baton::chain::Chain;
/// use baton::signal::Signal;
/// use baton::traits::handler_fn;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut chain = Chain::new();
/// chain
///     .with("region", "us-east-1".into())
///     .handle(handler_fn(|ctx| Box::pin(async move { ctx.text(200, "ok") })));
///
/// let out = chain.invoke(Signal::new(), "{}").await.unwrap();
/// # assert!(!out.is_empty());
/// # }
/// ```
pub struct Chain {
    handlers: Vec<Arc<dyn Handler>>,
    recovery: Arc<dyn ErrHandler>,
}

impl Chain {
    /// An empty chain with the default recovery handler installed.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            recovery: Arc::new(DefaultErrHandler),
        }
    }

    /// Construct a chain from an initial handler sequence.
    ///
    /// # Panics
    ///
    /// Panics if the handler count reaches [`MAX_HANDLERS`]. The bound is a
    /// construction-time invariant protecting cursor arithmetic, never a
    /// per-invocation error.
    pub fn use_handlers<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        let mut chain = Self::new();
        chain.use_all(handlers);
        chain
    }

    /// Append one handler to the end of the sequence.
    pub fn handle(&mut self, handler: Arc<dyn Handler>) -> &mut Self {
        self.push(handler);
        self
    }

    /// Append any number of handlers, preserving their relative order.
    pub fn use_all<I>(&mut self, handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        for handler in handlers {
            self.push(handler);
        }
        self
    }

    /// Append a synthetic handler that stores `key -> value` into every
    /// invocation's store and then advances. Convenience for injecting
    /// fixed per-chain configuration without a dedicated handler.
    pub fn with(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        let key = key.into();
        self.handle(handler_fn(move |ctx| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move {
                ctx.set(key, value);
                ctx.next().await
            })
        }))
    }

    /// Replace the recovery handler invoked when any handler errors.
    pub fn set_err_handler(&mut self, recovery: Arc<dyn ErrHandler>) -> &mut Self {
        self.recovery = recovery;
        self
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn push(&mut self, handler: Arc<dyn Handler>) {
        if self.handlers.len() >= MAX_HANDLERS {
            panic!("too many handlers");
        }
        self.handlers.push(handler);
    }

    /// Run one invocation against this chain.
    ///
    /// Builds a fresh [`Context`] with the cursor before the first handler,
    /// drives the advance protocol to completion, and JSON-encodes the
    /// outcome value. Exactly one of {encoded response, terminal error} is
    /// returned: [`InvokeError::Recovery`] when the recovery handler itself
    /// failed, [`InvokeError::Encode`] when the outcome could not be
    /// encoded. Encoding failures bypass recovery.
    pub async fn invoke(
        &self,
        signal: Signal,
        payload: impl Into<Payload>,
    ) -> Result<Vec<u8>, InvokeError> {
        let started = Instant::now();
        InvocationStarted {
            handler_count: self.handlers.len(),
        }
        .log();

        let handlers: Arc<[Arc<dyn Handler>]> = self.handlers.iter().cloned().collect();
        let ctx = Context::new(
            payload.into(),
            handlers,
            Arc::clone(&self.recovery),
            signal,
        );

        let outcome = ctx.next().await.map_err(|source| {
            RecoveryFailed { error: &source }.log();
            InvokeError::Recovery { source }
        })?;
        let encoded = serde_json::to_vec(&outcome)?;

        InvocationCompleted {
            duration: started.elapsed(),
        }
        .log();
        Ok(encoded)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
