use serde_json::Number;

use super::model::Product;

/// The catalogue a fresh process starts with when seeding is enabled.
pub fn sample_catalogue() -> Vec<Product> {
    vec![
        product("1", "Laptop", "High-performance laptop with 16GB RAM", 1200, "Books, electronics", true),
        product("2", "Smartphone", "Latest model with 128GB storage", 800, "electronics", true),
        product("3", "Coffee Maker", "Programmable coffee maker with timer", 50, "kitchen", false),
    ]
}

fn product(id: &str, name: &str, description: &str, price: u64, category: &str, in_stock: bool) -> Product {
    Product {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Number::from(price),
        category: category.to_owned(),
        in_stock,
    }
}
