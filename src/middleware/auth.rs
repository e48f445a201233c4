use std::future::ready;

use subtle::ConstantTimeEq;
use tracing::warn;

use super::{BoxFuture, Middleware, Next};
use crate::error::ApiError;
use crate::method::Method;
use crate::request::Request;
use crate::response::IntoResponse;

/// Header carrying the pre-shared key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Decides whether the credential presented with a request is acceptable.
///
/// `presented` is `None` when the request carried no credential at all.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify(&self, presented: Option<&str>) -> bool;
}

/// A single pre-shared secret, matched exactly.
pub struct StaticKey(String);

impl StaticKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl CredentialVerifier for StaticKey {
    fn verify(&self, presented: Option<&str>) -> bool {
        // Constant-time over equal lengths; a length mismatch fails fast.
        presented.is_some_and(|p| bool::from(p.as_bytes().ct_eq(self.0.as_bytes())))
    }
}

impl std::fmt::Debug for StaticKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticKey(..)")
    }
}

/// Rejects guarded methods under `scope` unless the credential header passes
/// the verifier. Everything else is forwarded untouched.
///
/// `scope` matches itself and anything below it: `/api/products` covers
/// `/api/products/42` but not `/api/productsx`.
pub struct ApiKeyGate {
    scope: String,
    header: String,
    guarded: Vec<Method>,
    verifier: Box<dyn CredentialVerifier>,
}

impl ApiKeyGate {
    /// Guards `POST`, `PUT` and `DELETE` under `scope`, reading the
    /// credential from [`API_KEY_HEADER`].
    pub fn new(scope: impl Into<String>, verifier: impl CredentialVerifier) -> Self {
        Self {
            scope: scope.into().trim_end_matches('/').to_owned(),
            header: API_KEY_HEADER.to_owned(),
            guarded: vec![Method::Post, Method::Put, Method::Delete],
            verifier: Box::new(verifier),
        }
    }

    pub fn header(mut self, name: impl Into<String>) -> Self {
        self.header = name.into();
        self
    }

    pub fn guard(mut self, methods: &[Method]) -> Self {
        self.guarded = methods.to_vec();
        self
    }

    fn in_scope(&self, path: &str) -> bool {
        match path.strip_prefix(&self.scope) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    fn admits(&self, req: &Request) -> bool {
        if !self.guarded.contains(&req.method()) || !self.in_scope(req.path()) {
            return true;
        }
        self.verifier.verify(req.header(&self.header))
    }
}

impl Middleware for ApiKeyGate {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a> {
        if self.admits(&req) {
            return next.run(req);
        }
        warn!(method = %req.method(), path = req.path(), "rejected request without a valid api key");
        Box::pin(ready(ApiError::Unauthorized.into_response()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> ApiKeyGate {
        ApiKeyGate::new("/api/products", StaticKey::new("secret"))
    }

    #[test]
    fn static_key_needs_an_exact_match() {
        let key = StaticKey::new("secret");
        assert!(key.verify(Some("secret")));
        assert!(!key.verify(Some("secret ")));
        assert!(!key.verify(Some("Secret")));
        assert!(!key.verify(None));
    }

    #[test]
    fn reads_are_never_gated() {
        let req = Request::new(Method::Get, "/api/products/1");
        assert!(gate().admits(&req));
    }

    #[test]
    fn writes_under_scope_need_the_key() {
        let bare = Request::new(Method::Delete, "/api/products/1");
        let wrong = Request::new(Method::Put, "/api/products/1").with_header("x-api-key", "nope");
        let right = Request::new(Method::Post, "/api/products").with_header("X-API-KEY", "secret");
        assert!(!gate().admits(&bare));
        assert!(!gate().admits(&wrong));
        assert!(gate().admits(&right));
    }

    #[test]
    fn scope_is_a_path_prefix_not_a_string_prefix() {
        assert!(gate().in_scope("/api/products"));
        assert!(gate().in_scope("/api/products/9"));
        assert!(!gate().in_scope("/api/productsx"));
        assert!(!gate().in_scope("/"));
    }

    #[test]
    fn guarded_methods_and_header_are_configurable() {
        let gate = gate().guard(&[Method::Patch]).header("authorization");
        assert!(gate.admits(&Request::new(Method::Post, "/api/products")));
        assert!(!gate.admits(&Request::new(Method::Patch, "/api/products/1")));
        assert!(gate.admits(
            &Request::new(Method::Patch, "/api/products/1").with_header("authorization", "secret")
        ));
    }
}
