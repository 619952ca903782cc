//! Per-session state
//!
//! Every visitor gets one `SessionState` holding their catalog view, cart,
//! and order history, seeded with demo data on first access. Mutations run
//! under the per-session mutex handed out by `SessionStore`, which supplies
//! the serialization the original host framework provided implicitly.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::aggregates::{Cart, Catalog, ColorOption, Order, OrderItem, OrderLedger, OrderStatus, Product, ProductOptions, ProductStatus};
use crate::domain::value_objects::{PaymentMethod, ShippingInfo};
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

#[derive(Clone, Debug)]
pub struct SessionState {
    pub catalog: Catalog,
    pub cart: Cart,
    pub orders: OrderLedger,
}

impl SessionState {
    pub fn seeded() -> Self {
        Self {
            catalog: Catalog::with_products(seed_products()),
            cart: Cart::new(),
            orders: OrderLedger::with_orders(seed_orders()),
        }
    }

    /// Checkout: place the order, then clear the cart. Both happen inside
    /// one critical section (the caller holds the session mutex), and the
    /// cart survives untouched when placement fails.
    pub fn checkout(&mut self, items: Vec<OrderItem>, shipping_info: ShippingInfo, payment_method: PaymentMethod, claimed_total: Option<i64>) -> Result<Order> {
        let order = self.orders.place(items, shipping_info, payment_method, claimed_total)?;
        self.cart.clear();
        Ok(order)
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session's state, creating and seeding it on first access.
    pub async fn session(&self, id: SessionId) -> Arc<Mutex<SessionState>> {
        if let Some(state) = self.sessions.read().await.get(&id.0) {
            return Arc::clone(state);
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(id.0).or_insert_with(|| Arc::new(Mutex::new(SessionState::seeded()))))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn sizes(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

fn colors(pairs: &[(&str, &str)]) -> Vec<ColorOption> {
    pairs.iter().map(|(name, hex)| ColorOption { name: name.to_string(), hex: hex.to_string() }).collect()
}

fn seed_products() -> Vec<Product> {
    let product = |id: &str, name: &str, price: i64, stock: u32, status: ProductStatus, description: &str, size: Vec<String>, color: Vec<ColorOption>, img: &str, sub_images: &[&str]| Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        stock,
        status,
        description: description.to_string(),
        category: "apparel".to_string(),
        options: ProductOptions { size, color },
        img: img.to_string(),
        sub_images: sub_images.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        product("1", "Pastel Knit", 39_000, 120, ProductStatus::OnSale,
            "Soft pastel-tone knit, comfortable for spring and autumn wear.",
            sizes(&["S", "M", "L", "XL"]),
            colors(&[("Ivory", "#f8f0e3"), ("Mint", "#a8c0bf"), ("Pink", "#f0b8c6")]),
            "img/product/1.jpg", &["img/product/2.jpg", "img/product/3.jpg"]),
        product("2", "Tailored Shirt", 54_000, 45, ProductStatus::OnSale,
            "Refined fabric and cut, wrinkle-resistant and office-ready.",
            sizes(&["S", "M", "L"]),
            colors(&[("White", "#FFFFFF"), ("Blue", "#6082B6"), ("Navy", "#000080")]),
            "img/product/2.jpg", &["img/product/3.jpg", "img/product/4.jpg"]),
        product("3", "Basic Tee", 22_000, 5, ProductStatus::LowStock,
            "Everyday staple in 100% cotton; worth owning in several colors.",
            sizes(&["Free"]),
            colors(&[("White", "#FFFFFF"), ("Black", "#000000"), ("Gray", "#808080")]),
            "img/product/3.jpg", &["img/product/4.jpg", "img/product/5.jpg"]),
        product("4", "Trench Coat", 99_000, 70, ProductStatus::OnSale,
            "Classic autumn trench with a water-repellent finish.",
            sizes(&["M", "L"]),
            colors(&[("Beige", "#F5F5DC"), ("Khaki", "#8FBC8F")]),
            "img/product/4.jpg", &["img/product/5.jpg", "img/product/6.jpg", "img/product/7.jpg"]),
        product("5", "Pleated Skirt", 45_000, 30, ProductStatus::OnSale,
            "Midi skirt with pleated detail, easy to dress up or down.",
            sizes(&["S", "M"]),
            colors(&[("Black", "#000000"), ("Charcoal", "#36454F")]),
            "img/product/5.jpg", &["img/product/6.jpg"]),
        product("6", "Dot Dress", 68_000, 90, ProductStatus::OnSale,
            "Long dress with a playful dot pattern and a defined waistline.",
            sizes(&["Free"]),
            colors(&[("Black Dot", "#000000"), ("Navy Dot", "#000080")]),
            "img/product/6.jpg", &["img/product/7.jpg", "img/product/8.jpg"]),
        product("7", "Denim Pants", 49_000, 15, ProductStatus::OnSale,
            "Regular-fit denim in a sturdy weave, wearable year-round.",
            sizes(&["26", "28", "30", "32"]),
            colors(&[("Mid Blue", "#5D8AA8"), ("Deep Blue", "#1560BD")]),
            "img/product/7.jpg", &["img/product/1.jpg", "img/product/2.jpg"]),
        product("8", "Loose-fit Cardigan", 63_000, 80, ProductStatus::OnSale,
            "Soft loose-fit cardigan, a light layer for the in-between seasons.",
            sizes(&["Free"]),
            colors(&[("Ivory", "#f8f0e3"), ("Beige", "#F5F5DC"), ("Brown", "#A52A2A")]),
            "img/product/8.jpg", &["img/product/3.jpg", "img/product/4.jpg"]),
    ]
}

// Two historical orders so order pages have content before the first
// checkout. They predate shipping capture, which exercises the read-time
// hydration in `OrderLedger::get`.
fn seed_orders() -> Vec<Order> {
    vec![
        Order {
            order_id: "ORD-20251026-001".to_string(),
            items: vec![OrderItem { product_id: "1".to_string(), name: "Pastel Knit".to_string(), option: "M/Ivory".to_string(), quantity: 1, price: 39_000 }],
            shipping_info: None,
            payment_method: None,
            subtotal: 39_000,
            shipping_fee: None,
            final_total: 42_000,
            date: Utc::now() - Duration::days(4),
            status: OrderStatus::Delivered,
        },
        Order {
            order_id: "ORD-20251027-002".to_string(),
            items: vec![OrderItem { product_id: "7".to_string(), name: "Denim Pants".to_string(), option: "28/Mid Blue".to_string(), quantity: 2, price: 49_000 }],
            shipping_info: None,
            payment_method: None,
            subtotal: 98_000,
            shipping_fee: None,
            final_total: 101_000,
            date: Utc::now() - Duration::days(3),
            status: OrderStatus::PaymentConfirmed,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            receiver_name: "Dana Kim".to_string(),
            address: "12 Elm St, Springfield".to_string(),
            phone: "010-1234-5678".to_string(),
            request: None,
        }
    }

    #[test]
    fn test_seeded_state_shape() {
        let state = SessionState::seeded();
        assert_eq!(state.catalog.list().len(), 8);
        assert!(state.cart.is_empty());
        assert_eq!(state.orders.len(), 2);
        // Seed orders hydrate placeholders on read
        let detail = state.orders.get("ORD-20251026-001").unwrap();
        assert_eq!(detail.shipping_fee, 3_000);
        assert_eq!(detail.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_checkout_snapshots_cart_and_clears_it() {
        let mut state = SessionState::seeded();
        state.cart.add("3", "Basic Tee", 22_000, "M/Black", 2);
        let items: Vec<OrderItem> = state
            .cart
            .lines()
            .iter()
            .map(|l| OrderItem { product_id: l.product_id.clone(), name: l.name.clone(), option: l.option.clone(), quantity: l.quantity, price: l.price })
            .collect();
        let order = state.checkout(items, shipping(), PaymentMethod::Card, None).unwrap();
        assert!(state.cart.is_empty());
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, "3");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.recomputed_products_price(), 44_000);
    }

    #[test]
    fn test_failed_checkout_keeps_cart() {
        let mut state = SessionState::seeded();
        state.cart.add("1", "Pastel Knit", 39_000, "M/Ivory", 1);
        let err = state.checkout(vec![], shipping(), PaymentMethod::Card, None).unwrap_err();
        assert!(matches!(err, crate::StoreError::Validation(_)));
        assert_eq!(state.cart.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_store_reuses_session_state() {
        let store = SessionStore::new();
        let id = SessionId(Uuid::new_v4());
        {
            let state = store.session(id).await;
            state.lock().await.cart.add("1", "Pastel Knit", 39_000, "M/Ivory", 1);
        }
        let state = store.session(id).await;
        assert_eq!(state.lock().await.cart.lines().len(), 1);
        assert_eq!(store.session_count().await, 1);

        let other = store.session(SessionId(Uuid::new_v4())).await;
        assert!(other.lock().await.cart.is_empty());
        assert_eq!(store.session_count().await, 2);
    }
}
