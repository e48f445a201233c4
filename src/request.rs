//! Incoming HTTP request type.

use std::collections::HashMap;

use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request for `target`, which may carry a query string
    /// (`/api/products?page=2`).
    ///
    /// Used by tests and by anything driving a [`Router`](crate::Router)
    /// in-process; the server builds requests from hyper.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (target.to_owned(), None),
        };
        Self {
            method,
            path,
            query,
            headers: Vec::new(),
            body: Vec::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) async fn from_hyper(
        method: Method,
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes().to_vec();
        // Header values that are not visible ASCII are skipped; nothing in
        // this service reads such headers.
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_owned(), v.to_owned())))
            .collect();
        Ok(Self {
            method,
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers,
            body,
            params: HashMap::new(),
        })
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The request target as the client sent it: path plus query string.
    pub fn uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/products/{id}`, `req.param("id")` on
    /// `/api/products/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Whether `content-type` names `application/json`, ignoring parameters
    /// such as `charset`.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .and_then(|v| v.split(';').next())
            .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
    }

    /// Decodes the body as JSON. A body that is empty or not declared as
    /// `application/json` decodes as `{}`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if !self.is_json() || self.body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"{}");
        }
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_split_into_path_and_query() {
        let req = Request::new(Method::Get, "/api/products?sort=name");
        assert_eq!(req.path(), "/api/products");
        assert_eq!(req.query(), Some("sort=name"));
        assert_eq!(req.uri(), "/api/products?sort=name");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::Post, "/").with_header("X-Api-Key", "k");
        assert_eq!(req.header("x-api-key"), Some("k"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn empty_body_decodes_as_empty_object() {
        let req = Request::new(Method::Put, "/");
        let value: serde_json::Value = req.json().unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let req = Request::new(Method::Post, "/")
            .with_header("content-type", "application/json")
            .with_body("{name:");
        assert!(req.json::<serde_json::Value>().is_err());
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let req = Request::new(Method::Post, "/")
            .with_header("Content-Type", "Application/JSON; charset=utf-8")
            .with_body(r#"{"a":1}"#);
        assert!(req.is_json());
        let value: serde_json::Value = req.json().unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn undeclared_body_decodes_as_empty_object() {
        for content_type in [None, Some("text/plain"), Some("application/jsonp")] {
            let mut req = Request::new(Method::Post, "/").with_body(r#"{"a":1}"#);
            if let Some(ct) = content_type {
                req = req.with_header("content-type", ct);
            }
            assert!(!req.is_json());
            let value: serde_json::Value = req.json().unwrap();
            assert_eq!(value, serde_json::json!({}));
        }
    }
}
