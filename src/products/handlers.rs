//! Route handlers for the products collection.
//!
//! Each handler touches the store through single atomic calls and never
//! awaits between reading a product and writing it back.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Product, ProductFields};
use super::store::ProductStore;
use crate::error::ApiError;
use crate::request::Request;
use crate::response::Json;
use crate::status::Status;

/// The store as shared between handlers.
pub type SharedStore = Arc<dyn ProductStore>;

pub const MISSING_FIELDS: &str = "Name, price, and category are required.";
pub const INVALID_BODY: &str = "Request body must be valid JSON.";

/// `GET /`
pub async fn welcome(_req: Request) -> &'static str {
    "Welcome to the Product API! Go to /api/products to see all products."
}

/// `GET /api/products`
pub async fn list(store: SharedStore, _req: Request) -> Result<Json<Vec<Product>>, ApiError> {
    let products = store.list()?;
    debug!(count = products.len(), "listing products");
    Ok(Json::new(products))
}

/// `GET /api/products/{id}`
pub async fn get(store: SharedStore, req: Request) -> Result<Json<Product>, ApiError> {
    let id = product_id(&req)?;
    store.find(id)?.map(Json::new).ok_or(ApiError::NotFound)
}

/// `POST /api/products`
pub async fn create(store: SharedStore, req: Request) -> Result<Json<Product>, ApiError> {
    let fields = read_fields(&req)?;
    let product = fields
        .into_product(Uuid::new_v4().to_string())
        .ok_or_else(|| ApiError::BadRequest(MISSING_FIELDS.to_owned()))?;

    store.insert(product.clone())?;
    info!(id = %product.id, name = %product.name, "product created");
    Ok(Json::with_status(Status::Created, product))
}

/// `PUT /api/products/{id}`
pub async fn update(store: SharedStore, req: Request) -> Result<Json<Product>, ApiError> {
    let id = product_id(&req)?;
    let fields = read_fields(&req)?;
    let updated = store
        .update(id, &|current: &Product| fields.apply_to(current))?
        .ok_or(ApiError::NotFound)?;

    info!(%id, "product updated");
    Ok(Json::new(updated))
}

/// `DELETE /api/products/{id}`
pub async fn delete(store: SharedStore, req: Request) -> Result<Status, ApiError> {
    let id = product_id(&req)?;
    if !store.remove(id)? {
        return Err(ApiError::NotFound);
    }
    info!(%id, "product deleted");
    Ok(Status::NoContent)
}

fn product_id(req: &Request) -> Result<&str, ApiError> {
    req.param("id").ok_or(ApiError::NotFound)
}

fn read_fields(req: &Request) -> Result<ProductFields, ApiError> {
    req.json().map_err(|e| {
        debug!(error = %e, "rejecting request body");
        ApiError::BadRequest(INVALID_BODY.to_owned())
    })
}
