use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::event::ProxyResponse;
use crate::traits::handler::{BoxFuture, HandlerResult};

/// The single error-handling hook for a chain.
///
/// When any handler returns an error during advancement, the chain invokes
/// this once with that error and the same context; the returned value becomes
/// the invocation's outcome. An error returned from `recover` itself is
/// terminal and propagates to the invoke caller with no further recovery.
#[async_trait]
pub trait ErrHandler: Send + Sync {
    async fn recover(&self, err: anyhow::Error, ctx: Context) -> HandlerResult;
}

/// Recovery installed when a chain never calls `set_err_handler`: a generic
/// 500 response carrying the error's message.
///
/// Deliberately does not abort the context, so an enclosing handler's loop
/// may continue past the failed handler.
pub struct DefaultErrHandler;

#[async_trait]
impl ErrHandler for DefaultErrHandler {
    async fn recover(&self, err: anyhow::Error, _ctx: Context) -> HandlerResult {
        let res = ProxyResponse {
            status_code: 500,
            body: format!("Internal Server Error: {err}"),
            ..ProxyResponse::default()
        };
        Ok(serde_json::to_value(res)?)
    }
}

/// Adapter that lets a plain closure act as an [`ErrHandler`].
pub struct ErrHandlerFn<F>(F);

#[async_trait]
impl<F> ErrHandler for ErrHandlerFn<F>
where
    F: Fn(anyhow::Error, Context) -> BoxFuture<'static, HandlerResult> + Send + Sync,
{
    async fn recover(&self, err: anyhow::Error, ctx: Context) -> HandlerResult {
        (self.0)(err, ctx).await
    }
}

/// Wrap a closure as a shared recovery trait object.
pub fn err_handler_fn<F>(f: F) -> Arc<dyn ErrHandler>
where
    F: Fn(anyhow::Error, Context) -> BoxFuture<'static, HandlerResult> + Send + Sync + 'static,
{
    Arc::new(ErrHandlerFn(f))
}
