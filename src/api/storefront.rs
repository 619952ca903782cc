//! Storefront API Handlers
//!
//! Cart and order endpoints, plus the public product detail lookup. Every
//! handler resolves the caller's session and mutates under its mutex.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{AddOutcome, CartLine, Order, OrderDetail, OrderItem, Product};
use crate::domain::value_objects::{PaymentMethod, ShippingInfo};
use crate::session::SessionId;
use crate::StoreError;

use super::{log_events, AppState};

// ========================================
// Request / Response Types
// ========================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub option: String,
    #[serde(default)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub success: bool,
    pub cart: Vec<CartLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: String,
    pub option: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartRequest {
    pub product_id: String,
    pub option: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItem>,
    pub shipping_info: ShippingInfo,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Total the client displayed. Compared against the recomputed total and
    /// flagged on mismatch, never persisted as-is.
    #[serde(default)]
    pub final_total: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub message: String,
    pub order_id: String,
    pub order_total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub success: bool,
    pub message: String,
    pub order: OrderDetail,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
    pub order: Order,
}

// ========================================
// Handlers
// ========================================

/// GET /api/products/:id - full product detail
pub async fn get_product(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Path(id): Path<String>) -> Result<Json<Product>, StoreError> {
    let session = state.sessions.session(sid).await;
    let guard = session.lock().await;
    Ok(Json(guard.catalog.get(&id)?.clone()))
}

/// POST /api/cart/add - merge-aware add to cart
pub async fn add_to_cart(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Json(req): Json<AddToCartRequest>) -> Json<MessageResponse> {
    let quantity = req.quantity.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    let outcome = guard.cart.add(req.product_id, &req.name, req.price, req.option, quantity);
    let message = match outcome {
        AddOutcome::Added => format!("{} added to cart", req.name),
        AddOutcome::QuantityUpdated => format!("{} quantity increased by {}", req.name, quantity),
    };
    Json(MessageResponse::ok(message))
}

/// GET /api/cart - current cart lines in insertion order
pub async fn get_cart(State(state): State<AppState>, Extension(sid): Extension<SessionId>) -> Json<CartResponse> {
    let session = state.sessions.session(sid).await;
    let guard = session.lock().await;
    Json(CartResponse { success: true, cart: guard.cart.lines().to_vec() })
}

/// POST /api/cart/update - set a line's quantity (clamped to >= 1)
pub async fn update_cart(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Json(req): Json<UpdateCartRequest>) -> Result<Json<MessageResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    let quantity = guard.cart.update_quantity(&req.product_id, &req.option, req.quantity)?;
    Ok(Json(MessageResponse::ok(format!("quantity updated to {quantity}"))))
}

/// POST /api/cart/remove - delete a line
pub async fn remove_from_cart(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Json(req): Json<RemoveCartRequest>) -> Result<Json<MessageResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    guard.cart.remove(&req.product_id, &req.option)?;
    Ok(Json(MessageResponse::ok("item removed from cart")))
}

/// POST /api/order - checkout: create the order, clear the cart
pub async fn create_order(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Json(req): Json<CreateOrderRequest>) -> Result<Json<OrderCreatedResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    let order = guard.checkout(req.items, req.shipping_info, req.payment_method.unwrap_or_default(), req.final_total)?;
    log_events(guard.orders.take_events());
    Ok(Json(OrderCreatedResponse {
        success: true,
        message: "order placed successfully".to_string(),
        order_id: order.order_id,
        order_total: order.final_total,
    }))
}

/// GET /api/orders - order history, most recent first
pub async fn list_orders(State(state): State<AppState>, Extension(sid): Extension<SessionId>) -> Json<OrdersResponse> {
    let session = state.sessions.session(sid).await;
    let guard = session.lock().await;
    let orders = guard.orders.list();
    let total_count = orders.len();
    Json(OrdersResponse { success: true, orders, total_count })
}

/// GET /api/orders/:order_id - detail with defaults hydrated on read
pub async fn get_order(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Path(order_id): Path<String>) -> Result<Json<OrderDetailResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let guard = session.lock().await;
    let order = guard.orders.get(&order_id)?;
    Ok(Json(OrderDetailResponse { success: true, message: "order detail loaded".to_string(), order }))
}

/// POST /api/orders/:order_id/cancel - cancel while still eligible
pub async fn cancel_order(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Path(order_id): Path<String>) -> Result<Json<CancelResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    let order = guard.orders.cancel(&order_id)?;
    log_events(guard.orders.take_events());
    Ok(Json(CancelResponse { success: true, message: format!("order {order_id} has been canceled"), order }))
}
