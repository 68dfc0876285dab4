use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::context::Context;

/// A pinned, boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of one handler: a serializable response value, or an opaque error
/// that the chain routes to its recovery handler.
pub type HandlerResult = Result<Value, anyhow::Error>;

/// One unit of request-processing logic in a chain.
///
/// Handlers are cooperative: each one decides whether control moves
/// downstream by calling [`Context::next`], finalizes the invocation with
/// [`Context::respond`] (or one of the response helpers), or halts the chain
/// with [`Context::abort`]. A handler holds no per-request state of its own;
/// everything request-scoped lives on the [`Context`].
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: Context) -> HandlerResult;
}

/// Adapter that lets a plain closure act as a [`Handler`].
pub struct HandlerFn<F>(F);

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: Fn(Context) -> BoxFuture<'static, HandlerResult> + Send + Sync,
{
    async fn call(&self, ctx: Context) -> HandlerResult {
        (self.0)(ctx).await
    }
}

/// Wrap a closure as a shared handler trait object.
///
/// ```
/// use baton::traits::handler_fn;
///
/// let handler = handler_fn(|ctx| Box::pin(async move { ctx.next().await }));
/// # drop(handler);
/// ```
pub fn handler_fn<F>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Context) -> BoxFuture<'static, HandlerResult> + Send + Sync + 'static,
{
    Arc::new(HandlerFn(f))
}
