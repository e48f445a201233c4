use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use super::{BoxFuture, Middleware, Next};
use crate::request::Request;

/// Logs every request as it arrives: UTC timestamp, method, and the target
/// exactly as requested (path plus query string). Never short-circuits.
///
/// The outcome is logged at `debug` once the rest of the chain has replied.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestLog;

impl Middleware for RequestLog {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a> {
        let at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let method = req.method();
        let uri = req.uri();
        info!(%at, %method, %uri, "request");

        Box::pin(async move {
            let res = next.run(req).await;
            let status: u16 = res.status_code().into();
            debug!(%method, %uri, status, "response");
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use chrono::DateTime;

    use super::*;
    use crate::{Method, Router, Status};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).lines().map(str::to_owned).collect()
        }
    }

    #[tokio::test]
    async fn each_request_is_logged_with_time_method_and_target() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .layer(RequestLog)
            .get("/api/products", |_req: Request| async { "listed" });
        let res = app.handle(Request::new(Method::Get, "/api/products?x=1")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), b"listed");

        let lines = captured.lines();
        assert_eq!(lines.len(), 1, "{lines:?}");
        let line = &lines[0];
        assert!(line.contains("method=GET"), "{line}");
        assert!(line.contains("uri=/api/products?x=1"), "{line}");
        let at = line.split_whitespace()
            .find_map(|field| field.strip_prefix("at="))
            .unwrap_or_else(|| panic!("no timestamp in {line}"));
        assert!(DateTime::parse_from_rfc3339(at).is_ok(), "{at}");
    }

    #[tokio::test]
    async fn unrouted_requests_are_logged_too() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new().layer(RequestLog);
        let res = app.handle(Request::new(Method::Delete, "/nowhere")).await;
        assert_eq!(res.status_code(), Status::NotFound);
        let lines = captured.lines();
        assert!(lines.iter().any(|l| l.contains("method=DELETE") && l.contains("uri=/nowhere")), "{lines:?}");
    }
}
