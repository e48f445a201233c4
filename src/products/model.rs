//! The product record and the field set clients send to create or update one.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A catalogue entry. `id` is assigned by the server and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Kept as the JSON number the client sent, so `150` stays `150`.
    pub price: Number,
    pub category: String,
    pub in_stock: bool,
}

/// Fields accepted by create and update. Every field is optional on the
/// wire; unknown fields are ignored.
///
/// A field only counts as *provided* when it carries a non-empty value:
/// an empty string or a price of `0` is treated the same as an absent
/// field. `inStock` counts only when it is a JSON boolean; any other value
/// is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Number>,
    pub category: Option<String>,
    pub in_stock: Option<Value>,
}

impl ProductFields {
    fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    fn price(&self) -> Option<&Number> {
        self.price.as_ref().filter(|n| n.as_f64().is_some_and(|f| f != 0.0))
    }

    fn in_stock(&self) -> Option<bool> {
        self.in_stock.as_ref().and_then(Value::as_bool)
    }

    /// Builds a new product with `id`, or `None` when name, price or
    /// category is not provided. Description defaults to `""`, `inStock`
    /// to `true`.
    pub fn into_product(self, id: String) -> Option<Product> {
        let (name, price, category) = (self.name()?, self.price()?, self.category()?);
        Some(Product {
            id,
            name: name.to_owned(),
            description: self.description().unwrap_or_default().to_owned(),
            price: price.clone(),
            category: category.to_owned(),
            in_stock: self.in_stock().unwrap_or(true),
        })
    }

    /// `base` with every provided field overwritten. The id is kept.
    pub fn apply_to(&self, base: &Product) -> Product {
        Product {
            id: base.id.clone(),
            name: self.name().unwrap_or(&base.name).to_owned(),
            description: self.description().unwrap_or(&base.description).to_owned(),
            price: self.price().unwrap_or(&base.price).clone(),
            category: self.category().unwrap_or(&base.category).to_owned(),
            in_stock: self.in_stock().unwrap_or(base.in_stock),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
