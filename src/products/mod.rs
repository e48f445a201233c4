//! The products collection: model, storage, and route handlers.

pub mod handlers;
mod model;
mod sample;
mod store;

pub use handlers::SharedStore;
pub use model::{Product, ProductFields};
pub use sample::sample_catalogue;
pub use store::{MemoryStore, ProductStore, StoreError};
