use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::error;

use super::{BoxFuture, Middleware, Next};
use crate::error::ApiError;
use crate::request::Request;
use crate::response::IntoResponse;

/// Catches a panic anywhere later in the chain and answers with the generic
/// `500` body. The panic message is logged, never sent to the client.
///
/// Errors that handlers return as [`ApiError::Internal`] already take the
/// same path without unwinding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recover;

impl Middleware for Recover {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a> {
        let method = req.method();
        let path = req.path().to_owned();

        Box::pin(async move {
            match AssertUnwindSafe(next.run(req)).catch_unwind().await {
                Ok(res) => res,
                Err(payload) => {
                    error!(%method, %path, panic = panic_message(payload.as_ref()), "handler panicked");
                    ApiError::Internal("handler panicked".to_owned()).into_response()
                }
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, Router, Status};

    async fn boom(_req: Request) -> &'static str {
        panic!("store exploded")
    }

    #[tokio::test]
    async fn panics_become_generic_500s() {
        let app = Router::new().layer(Recover).get("/boom", boom);
        let res = app.handle(Request::new(Method::Get, "/boom")).await;
        assert_eq!(res.status_code(), Status::InternalServerError);
        assert_eq!(res.body(), b"Something went wrong on the server!");
    }

    #[tokio::test]
    async fn healthy_responses_pass_through() {
        let app = Router::new().layer(Recover).get("/", |_req: Request| async { "hi" });
        let res = app.handle(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), b"hi");
    }

    #[test]
    fn panic_messages_are_extracted() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("static");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "static");
        assert_eq!(panic_message(other.as_ref()), "<non-string panic payload>");
    }
}
