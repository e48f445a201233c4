//! Middleware layer.
//!
//! A middleware stage sees every request before the route is resolved. It
//! either forwards the request with [`Next::run`] or short-circuits by
//! returning its own [`Response`]. Stages run in the order they were added
//! with [`Router::layer`](crate::Router::layer):
//!
//! ```rust,no_run
//! use stockroom::{Router, middleware::{ApiKeyGate, Recover, RequestLog, StaticKey}};
//!
//! let app = Router::new()
//!     .layer(RequestLog)
//!     .layer(Recover)
//!     .layer(ApiKeyGate::new("/api/products", StaticKey::new("secret")));
//! ```
//!
//! Built-in stages:
//! - [`RequestLog`]: one log line per request
//! - [`ApiKeyGate`]: pre-shared key check for mutating methods under a path
//! - [`Recover`]: turns panics in later stages into a generic `500`

mod auth;
mod log;
mod recover;

use std::sync::Arc;

pub use auth::{ApiKeyGate, CredentialVerifier, StaticKey, API_KEY_HEADER};
pub use log::RequestLog;
pub use recover::Recover;
pub use crate::handler::BoxFuture;

use crate::request::Request;
use crate::router::Routes;

/// A request interceptor.
///
/// Implementations return a boxed future so stages of different types can
/// share one chain:
///
/// ```rust
/// use stockroom::{Request, middleware::{BoxFuture, Middleware, Next}};
///
/// struct Noop;
///
/// impl Middleware for Noop {
///     fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a> {
///         next.run(req)
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a>;
}

/// The remainder of the chain after the current stage.
pub struct Next<'a> {
    stack: &'a [Arc<dyn Middleware>],
    routes: &'a Routes,
}

impl<'a> Next<'a> {
    pub(crate) fn new(stack: &'a [Arc<dyn Middleware>], routes: &'a Routes) -> Self {
        Self { stack, routes }
    }

    /// Forwards `req` to the next stage, or to route dispatch once the
    /// chain is exhausted.
    pub fn run(self, req: Request) -> BoxFuture<'a> {
        match self.stack.split_first() {
            Some((stage, rest)) => stage.handle(req, Next::new(rest, self.routes)),
            None => Box::pin(self.routes.dispatch(req)),
        }
    }
}
