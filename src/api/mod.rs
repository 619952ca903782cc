//! HTTP boundary
//!
//! Maps the session-scoped core operations onto the REST routes the
//! storefront and admin console call, and translates the error taxonomy
//! into status codes: validation/conflict -> 400, not-found -> 404.

use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::domain::events::DomainEvent;
use crate::session::{SessionId, SessionStore};
use crate::StoreError;

pub mod admin;
pub mod storefront;

const SESSION_COOKIE: &str = "sid";

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self { sessions: Arc::new(SessionStore::new()) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match self {
            StoreError::Validation(_) | StoreError::Conflict(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(serde_json::json!({ "success": false, "message": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Boutique Storefront API is running" }))
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "boutique-storefront"})) }))
        .route("/api/products/:id", get(storefront::get_product))
        .route("/api/cart", get(storefront::get_cart))
        .route("/api/cart/add", post(storefront::add_to_cart))
        .route("/api/cart/update", post(storefront::update_cart))
        .route("/api/cart/remove", post(storefront::remove_from_cart))
        .route("/api/order", post(storefront::create_order))
        .route("/api/orders", get(storefront::list_orders))
        .route("/api/orders/:order_id", get(storefront::get_order))
        .route("/api/orders/:order_id/cancel", post(storefront::cancel_order))
        .route("/api/admin/products", get(admin::list_products).post(admin::create_product))
        .route("/api/admin/products/:id", get(admin::get_product).put(admin::update_product).delete(admin::delete_product))
        .layer(middleware::from_fn(session_cookie))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolve the caller's session id from the `sid` cookie, minting a fresh
/// one (and setting the cookie on the response) when absent or malformed.
async fn session_cookie(mut req: Request, next: Next) -> Response {
    let existing = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .filter_map(|c| c.trim().strip_prefix(SESSION_COOKIE).and_then(|r| r.strip_prefix('=')))
                .find_map(|v| Uuid::parse_str(v).ok())
        });
    let (sid, fresh) = match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };
    req.extensions_mut().insert(SessionId(sid));

    let mut response = next.run(req).await;
    if fresh {
        if let Ok(value) = HeaderValue::from_str(&format!("{SESSION_COOKIE}={sid}; Path=/; HttpOnly; SameSite=Lax")) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

pub(crate) fn log_events(events: Vec<DomainEvent>) {
    for event in events {
        tracing::info!(?event, "domain event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new())
    }

    fn cookie() -> String {
        format!("{SESSION_COOKIE}={}", Uuid::new_v4())
    }

    async fn send(app: &Router, method: &str, uri: &str, cookie: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri).header(header::COOKIE, cookie);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }

    fn shipping() -> Value {
        json!({ "receiverName": "Dana Kim", "address": "12 Elm St", "phone": "010-1234-5678" })
    }

    #[tokio::test]
    async fn test_missing_cookie_gets_one_issued() {
        let app = app();
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("sid="));
    }

    #[tokio::test]
    async fn test_cart_add_merges_within_session() {
        let app = app();
        let sid = cookie();
        let line = json!({ "productId": "1", "name": "Pastel Knit", "price": 39000, "option": "M/Ivory", "quantity": 2 });
        let (status, body) = send(&app, "POST", "/api/cart/add", &sid, Some(line.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        send(&app, "POST", "/api/cart/add", &sid, Some(line)).await;

        let (_, body) = send(&app, "GET", "/api/cart", &sid, None).await;
        let cart = body["cart"].as_array().unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0]["quantity"], json!(4));

        // A different session sees an empty cart
        let (_, other) = send(&app, "GET", "/api/cart", &cookie(), None).await;
        assert!(other["cart"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_update_and_remove_unknown_line() {
        let app = app();
        let sid = cookie();
        let (status, body) = send(&app, "POST", "/api/cart/update", &sid, Some(json!({ "productId": "9", "option": "M/Red", "quantity": 3 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));
        let (status, _) = send(&app, "POST", "/api/cart/remove", &sid, Some(json!({ "productId": "9", "option": "M/Red" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_clears_cart_and_records_order() {
        let app = app();
        let sid = cookie();
        send(&app, "POST", "/api/cart/add", &sid, Some(json!({ "productId": "3", "name": "Basic Tee", "price": 22000, "option": "M/Black", "quantity": 2 }))).await;

        let order = json!({
            "items": [{ "productId": "3", "name": "Basic Tee", "option": "M/Black", "quantity": 2, "price": 22000 }],
            "shippingInfo": shipping(),
            "paymentMethod": "card",
            "finalTotal": 47000,
        });
        let (status, body) = send(&app, "POST", "/api/order", &sid, Some(order)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orderTotal"], json!(47000));
        let order_id = body["orderId"].as_str().unwrap().to_string();

        let (_, cart) = send(&app, "GET", "/api/cart", &sid, None).await;
        assert!(cart["cart"].as_array().unwrap().is_empty());

        let (_, orders) = send(&app, "GET", "/api/orders", &sid, None).await;
        // 2 seeded orders + the new one, most recent first
        assert_eq!(orders["totalCount"], json!(3));
        assert_eq!(orders["orders"][0]["orderId"], json!(order_id));

        let (status, detail) = send(&app, "GET", &format!("/api/orders/{order_id}"), &sid, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["order"]["totalProductsPrice"], json!(44000));
        assert_eq!(detail["order"]["shippingFee"], json!(3000));
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_items() {
        let app = app();
        let (status, body) = send(&app, "POST", "/api/order", &cookie(), Some(json!({
            "items": [],
            "shippingInfo": shipping(),
        }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_cancel_blocked_and_not_found() {
        let app = app();
        let sid = cookie();
        // Seeded order ORD-20251026-001 is already delivered
        let (status, body) = send(&app, "POST", "/api/orders/ORD-20251026-001/cancel", &sid, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("delivered"));

        let (status, _) = send(&app, "POST", "/api/orders/ORD-nope/cancel", &sid, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Seeded order ORD-20251027-002 is still payment-confirmed
        let (status, body) = send(&app, "POST", "/api/orders/ORD-20251027-002/cancel", &sid, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"]["status"], json!("canceled"));
    }

    #[tokio::test]
    async fn test_admin_create_lists_missing_fields() {
        let app = app();
        let (status, body) = send(&app, "POST", "/api/admin/products", &cookie(), Some(json!({ "name": "Wool Scarf" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("price"));
        assert!(message.contains("stock"));
    }

    #[tokio::test]
    async fn test_admin_crud_round_trip() {
        let app = app();
        let sid = cookie();
        let (status, body) = send(&app, "POST", "/api/admin/products", &sid, Some(json!({ "name": "Wool Scarf", "price": 18000, "stock": 40 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["id"], json!("9"));

        let (_, body) = send(&app, "PUT", "/api/admin/products/9", &sid, Some(json!({ "price": 15000 }))).await;
        assert_eq!(body["product"]["price"], json!(15000));
        assert_eq!(body["product"]["name"], json!("Wool Scarf"));

        let (status, _) = send(&app, "DELETE", "/api/admin/products/9", &sid, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", "/api/admin/products/9", &sid, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
