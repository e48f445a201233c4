//! Wires configuration and a product store into the application router.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::handler::Handler;
use crate::middleware::{ApiKeyGate, Recover, RequestLog, StaticKey};
use crate::products::{self, handlers, MemoryStore, SharedStore};
use crate::request::Request;
use crate::response::IntoResponse;
use crate::router::Router;

/// Root of the products collection.
pub const PRODUCTS_ROOT: &str = "/api/products";

/// The store a fresh process starts with: the sample catalogue, or empty.
pub fn initial_store(config: &Config) -> Result<SharedStore, products::StoreError> {
    let store = if config.seed_sample_data {
        MemoryStore::with_products(products::sample_catalogue())?
    } else {
        MemoryStore::new()
    };
    info!(products = store.len()?, "product store ready");
    Ok(Arc::new(store))
}

/// The full application: request log, panic recovery, the api-key gate
/// over the products collection, and the routes.
pub fn build(config: &Config, store: SharedStore) -> Router {
    Router::new()
        .layer(RequestLog)
        .layer(Recover)
        .layer(ApiKeyGate::new(PRODUCTS_ROOT, StaticKey::new(config.api_key.clone())))
        .get("/", handlers::welcome)
        .get("/api/products", with_store(Arc::clone(&store), handlers::list))
        .get("/api/products/{id}", with_store(Arc::clone(&store), handlers::get))
        .post("/api/products", with_store(Arc::clone(&store), handlers::create))
        .put("/api/products/{id}", with_store(Arc::clone(&store), handlers::update))
        .delete("/api/products/{id}", with_store(Arc::clone(&store), handlers::delete))
}

/// Adapts a `(store, request)` handler to the router's `request`-only shape.
fn with_store<F, Fut, R>(store: SharedStore, f: F) -> impl Handler
where
    F: Fn(SharedStore, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    move |req: Request| f(Arc::clone(&store), req)
}
