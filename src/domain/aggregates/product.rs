//! Product Aggregate
//!
//! The catalog owns every product record; admin mutations go through it so
//! id assignment and patch semantics stay in one place.

use serde::{Deserialize, Serialize};

use crate::domain::events::{DomainEvent, ProductEvent};
use crate::{Result, StoreError};

const IMAGE_PLACEHOLDER: &str = "https://via.placeholder.com/150";
const DESCRIPTION_PLACEHOLDER: &str = "No description available.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    OnSale,
    LowStock,
    SoldOut,
    Discontinued,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub hex: String,
}

/// Option dimensions a variant is picked from. Empty lists mean the product
/// has no such dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptions {
    pub size: Vec<String>,
    pub color: Vec<ColorOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub stock: u32,
    pub status: ProductStatus,
    pub description: String,
    pub category: String,
    pub options: ProductOptions,
    pub img: String,
    pub sub_images: Vec<String>,
}

/// Admin create input. Only name, price, and stock are required; the rest
/// default.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub stock: u32,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Option<ProductOptions>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub sub_images: Option<Vec<String>>,
}

/// Admin update input. Partial patch: only supplied fields change.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<u32>,
    pub status: Option<ProductStatus>,
    pub description: Option<String>,
    pub options: Option<ProductOptions>,
    pub category: Option<String>,
    pub img: Option<String>,
    pub sub_images: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    events: Vec<DomainEvent>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products, events: vec![] }
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {id} not found")))
    }

    pub fn create(&mut self, new: NewProduct) -> Result<Product> {
        if new.name.trim().is_empty() {
            return Err(StoreError::Validation("product name must not be empty".to_string()));
        }
        if new.price < 0 {
            return Err(StoreError::Validation("product price must not be negative".to_string()));
        }
        let product = Product {
            id: self.next_id(),
            name: new.name,
            price: new.price,
            stock: new.stock,
            status: new.status.unwrap_or_default(),
            description: new.description.unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
            category: new.category.unwrap_or_else(|| "misc".to_string()),
            options: new.options.unwrap_or_default(),
            img: new.img.unwrap_or_else(|| IMAGE_PLACEHOLDER.to_string()),
            sub_images: new.sub_images.unwrap_or_default(),
        };
        self.products.push(product.clone());
        self.raise_event(DomainEvent::Product(ProductEvent::Created { product_id: product.id.clone() }));
        Ok(product)
    }

    /// Partial patch: unsupplied fields keep their current value.
    pub fn update(&mut self, id: &str, patch: ProductPatch) -> Result<Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {id} not found")))?;
        if let Some(price) = patch.price {
            if price < 0 {
                return Err(StoreError::Validation("product price must not be negative".to_string()));
            }
            product.price = price;
        }
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(status) = patch.status {
            product.status = status;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(options) = patch.options {
            product.options = options;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(img) = patch.img {
            product.img = img;
        }
        if let Some(sub_images) = patch.sub_images {
            product.sub_images = sub_images;
        }
        let updated = product.clone();
        self.raise_event(DomainEvent::Product(ProductEvent::Updated { product_id: updated.id.clone() }));
        Ok(updated)
    }

    pub fn remove(&mut self, id: &str) -> Result<()> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            return Err(StoreError::NotFound(format!("product {id} not found")));
        }
        self.raise_event(DomainEvent::Product(ProductEvent::Deleted { product_id: id.to_string() }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, e: DomainEvent) {
        self.events.push(e);
    }

    // Numeric max of existing ids plus one; non-numeric ids count as 0.
    fn next_id(&self) -> String {
        let max = self.products.iter().filter_map(|p| p.id.parse::<u64>().ok()).max().unwrap_or(0);
        (max + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, price: i64, stock: u32) -> NewProduct {
        NewProduct { name: name.to_string(), price, stock, ..Default::default() }
    }

    #[test]
    fn test_create_assigns_next_numeric_id() {
        let mut catalog = Catalog::new();
        let a = catalog.create(new_product("Knit", 39_000, 10)).unwrap();
        assert_eq!(a.id, "1");
        let b = catalog.create(new_product("Shirt", 54_000, 5)).unwrap();
        assert_eq!(b.id, "2");
        assert_eq!(a.description, DESCRIPTION_PLACEHOLDER);
        assert_eq!(a.status, ProductStatus::OnSale);
    }

    #[test]
    fn test_create_rejects_empty_name_and_negative_price() {
        let mut catalog = Catalog::new();
        assert!(matches!(catalog.create(new_product("  ", 1_000, 1)), Err(StoreError::Validation(_))));
        assert!(matches!(catalog.create(new_product("Coat", -1, 1)), Err(StoreError::Validation(_))));
        assert!(catalog.list().is_empty());
    }

    #[test]
    fn test_update_is_a_partial_patch() {
        let mut catalog = Catalog::new();
        let created = catalog.create(new_product("Knit", 39_000, 10)).unwrap();
        let updated = catalog
            .update(&created.id, ProductPatch { price: Some(35_000), ..Default::default() })
            .unwrap();
        assert_eq!(updated.price, 35_000);
        assert_eq!(updated.name, "Knit");
        assert_eq!(updated.stock, 10);
    }

    #[test]
    fn test_update_and_remove_unknown_id() {
        let mut catalog = Catalog::new();
        assert!(matches!(catalog.update("9", ProductPatch::default()), Err(StoreError::NotFound(_))));
        assert!(matches!(catalog.remove("9"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_remove_deletes_exactly_one() {
        let mut catalog = Catalog::new();
        catalog.create(new_product("Knit", 39_000, 10)).unwrap();
        catalog.create(new_product("Shirt", 54_000, 5)).unwrap();
        catalog.remove("1").unwrap();
        assert_eq!(catalog.list().len(), 1);
        assert!(catalog.get("1").is_err());
        assert!(catalog.get("2").is_ok());
    }
}
