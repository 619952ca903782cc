//! Admin API Handlers
//!
//! Product CRUD for the admin console. Create collects every missing
//! required field into a single validation message; update is a partial
//! patch.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{NewProduct, Product, ProductOptions, ProductPatch, ProductStatus};
use crate::session::SessionId;
use crate::StoreError;

use super::{log_events, AppState};
use super::storefront::MessageResponse;

// ========================================
// Request / Response Types
// ========================================

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ProductMutationResponse {
    pub success: bool,
    pub message: String,
    pub product: Product,
}

/// Create payload with required fields modelled as `Option` so a request
/// missing several of them reports all of them at once instead of failing
/// on deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<u32>,
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

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct, StoreError> {
        let mut missing = vec![];
        if self.name.is_none() {
            missing.push("name");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if self.stock.is_none() {
            missing.push("stock");
        }
        if !missing.is_empty() {
            return Err(StoreError::Validation(format!("required fields missing: {}", missing.join(", "))));
        }
        Ok(NewProduct {
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            stock: self.stock.unwrap_or_default(),
            status: self.status,
            description: self.description,
            options: self.options,
            category: self.category,
            img: self.img,
            sub_images: self.sub_images,
        })
    }
}

// ========================================
// Handlers
// ========================================

/// GET /api/admin/products - full catalog
pub async fn list_products(State(state): State<AppState>, Extension(sid): Extension<SessionId>) -> Json<ProductListResponse> {
    let session = state.sessions.session(sid).await;
    let guard = session.lock().await;
    Json(ProductListResponse { success: true, products: guard.catalog.list().to_vec() })
}

/// GET /api/admin/products/:id
pub async fn get_product(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Path(id): Path<String>) -> Result<Json<ProductDetailResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let guard = session.lock().await;
    Ok(Json(ProductDetailResponse { success: true, product: guard.catalog.get(&id)?.clone() }))
}

/// POST /api/admin/products
pub async fn create_product(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Json(req): Json<CreateProductRequest>) -> Result<Json<ProductMutationResponse>, StoreError> {
    let new = req.into_new_product()?;
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    let product = guard.catalog.create(new)?;
    log_events(guard.catalog.take_events());
    Ok(Json(ProductMutationResponse { success: true, message: format!("product {} registered", product.id), product }))
}

/// PUT /api/admin/products/:id - partial patch
pub async fn update_product(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Path(id): Path<String>, Json(patch): Json<ProductPatch>) -> Result<Json<ProductMutationResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    let product = guard.catalog.update(&id, patch)?;
    log_events(guard.catalog.take_events());
    Ok(Json(ProductMutationResponse { success: true, message: format!("product {id} updated"), product }))
}

/// DELETE /api/admin/products/:id
pub async fn delete_product(State(state): State<AppState>, Extension(sid): Extension<SessionId>, Path(id): Path<String>) -> Result<Json<MessageResponse>, StoreError> {
    let session = state.sessions.session(sid).await;
    let mut guard = session.lock().await;
    guard.catalog.remove(&id)?;
    log_events(guard.catalog.take_events());
    Ok(Json(MessageResponse { success: true, message: format!("product {id} deleted") }))
}
