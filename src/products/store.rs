//! Product storage.
//!
//! Handlers only talk to [`ProductStore`], so the in-memory [`MemoryStore`]
//! can be replaced by a persistent backend without touching them.

use std::sync::{Mutex, MutexGuard};

use super::model::Product;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("product store lock poisoned")]
    Poisoned,

    #[error("a product with id `{0}` already exists")]
    DuplicateId(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// An ordered collection of products with unique ids.
///
/// Each call is atomic with respect to every other call.
pub trait ProductStore: Send + Sync + 'static {
    /// Every product, in insertion order.
    fn list(&self) -> Result<Vec<Product>, StoreError>;

    fn find(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// Appends `product`. Fails if its id is already present.
    fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// Replaces the product with `id` by `edit(current)`, keeping its
    /// position and its id. Returns the stored result, or `None` when no
    /// product has that id.
    fn update(&self, id: &str, edit: &dyn Fn(&Product) -> Product)
        -> Result<Option<Product>, StoreError>;

    /// Removes the product with `id`. Returns whether one was removed.
    fn remove(&self, id: &str) -> Result<bool, StoreError>;
}

/// Process-memory store. Everything is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `products` in order. Fails on a repeated id.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Result<Self, StoreError> {
        let store = Self::new();
        for p in products {
            store.insert(p)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Product>>, StoreError> {
        self.products.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ProductStore for MemoryStore {
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn find(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.lock()?.iter().find(|p| p.id == id).cloned())
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.lock()?;
        if products.iter().any(|p| p.id == product.id) {
            return Err(StoreError::DuplicateId(product.id));
        }
        products.push(product);
        Ok(())
    }

    fn update(&self, id: &str, edit: &dyn Fn(&Product) -> Product)
        -> Result<Option<Product>, StoreError>
    {
        let mut products = self.lock()?;
        let Some(slot) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let mut updated = edit(slot);
        updated.id.clone_from(&slot.id);
        *slot = updated.clone();
        Ok(Some(updated))
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut products = self.lock()?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Number;

    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            price: Number::from(10),
            category: "misc".to_owned(),
            in_stock: true,
        }
    }

    fn ids(store: &MemoryStore) -> Vec<String> {
        store.list().unwrap().into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn list_keeps_insertion_order() {
        let store = MemoryStore::with_products([product("b", "B"), product("a", "A"), product("c", "C")]).unwrap();
        assert_eq!(ids(&store), ["b", "a", "c"]);
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let store = MemoryStore::new();
        store.insert(product("a", "A")).unwrap();
        assert_eq!(store.insert(product("a", "again")), Err(StoreError::DuplicateId("a".to_owned())));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn remove_takes_exactly_one_and_keeps_order() {
        let store = MemoryStore::with_products([product("a", "A"), product("b", "B"), product("c", "C")]).unwrap();
        assert!(store.remove("b").unwrap());
        assert!(!store.remove("b").unwrap());
        assert_eq!(ids(&store), ["a", "c"]);
    }

    #[test]
    fn update_replaces_in_place_and_pins_the_id() {
        let store = MemoryStore::with_products([product("a", "A"), product("b", "B")]).unwrap();
        let updated = store
            .update("a", &|p: &Product| Product { id: "hijacked".to_owned(), name: "Z".to_owned(), ..p.clone() })
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, "a");
        assert_eq!(ids(&store), ["a", "b"]);
        assert_eq!(store.find("a").unwrap().unwrap().name, "Z");
    }

    #[test]
    fn update_of_missing_id_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.update("nope", &Product::clone).unwrap(), None);
        assert!(store.is_empty().unwrap());
    }
}
