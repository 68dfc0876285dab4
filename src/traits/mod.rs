pub mod handler;
pub mod recover;

pub use handler::{handler_fn, BoxFuture, Handler, HandlerResult};
pub use recover::{err_handler_fn, DefaultErrHandler, ErrHandler};
