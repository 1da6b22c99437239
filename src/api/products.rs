//! Product endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::{AdminBody, ApiError, AppState, DeleteResponse};
use crate::domain::aggregates::catalog::{self, ProductPatch};
use crate::Product;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub description: String,
    /// JSON integer or numeric string.
    #[serde(default)]
    pub price: Option<Value>,
    /// Data URI or bare base64.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl ProductRequest {
    /// Shared field checks for create and update.
    fn checked_price(&self) -> Result<u64, ApiError> {
        self.validate()?;
        parse_price(self.price.as_ref())
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|i| !i.is_empty())
    }

    fn file_name(&self) -> &str {
        self.file_name.as_deref().filter(|f| !f.is_empty()).unwrap_or("image.jpg")
    }
}

/// Price must be a positive integer.
pub(crate) fn parse_price(value: Option<&Value>) -> Result<u64, ApiError> {
    let price = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match price {
        Some(p) if p > 0 => Ok(p),
        _ => Err(ApiError::Validation("Price must be a positive integer".into())),
    }
}

pub async fn list(State(s): State<AppState>) -> Json<Vec<Product>> {
    Json(s.catalog().load().await.products)
}

pub async fn create(State(s): State<AppState>, body: AdminBody) -> Result<(StatusCode, Json<Product>), ApiError> {
    let r: ProductRequest = body.parse()?;
    let price = r.checked_price()?;
    let image = r.image().ok_or_else(|| ApiError::Validation("Missing required fields: image".into()))?;

    let saved = s.images().save_encoded(image, r.file_name()).await.map_err(ApiError::storage("Failed to save image"))?;

    let mut doc = s.catalog().load().await;
    let product = Product { id: catalog::next_id(&doc.products), name: r.name, description: r.description, price, image: saved };
    catalog::insert(&mut doc.products, product.clone());
    s.catalog().save(&doc).await.map_err(ApiError::storage("Failed to save product"))?;

    tracing::info!(product_id = product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(State(s): State<AppState>, Path(id): Path<u64>, body: AdminBody) -> Result<Json<Product>, ApiError> {
    let r: ProductRequest = body.parse()?;
    let price = r.checked_price()?;

    let mut doc = s.catalog().load().await;
    if !doc.products.iter().any(|p| p.id == id) {
        return Err(ApiError::NotFound("Product"));
    }

    let image = match r.image() {
        Some(data) => Some(s.images().save_encoded(data, r.file_name()).await.map_err(ApiError::storage("Failed to save image"))?),
        None => None,
    };
    let patch = ProductPatch { name: r.name, description: r.description, price, image };
    let updated = catalog::update_by_id(&mut doc.products, id, |p| patch.apply(p))
        .cloned()
        .ok_or(ApiError::NotFound("Product"))?;
    s.catalog().save(&doc).await.map_err(ApiError::storage("Failed to update product"))?;

    tracing::info!(product_id = id, "product updated");
    Ok(Json(updated))
}

pub async fn delete(State(s): State<AppState>, Path(id): Path<u64>, _admin: AdminBody) -> Result<Json<DeleteResponse>, ApiError> {
    let mut doc = s.catalog().load().await;
    if !catalog::remove_by_id(&mut doc.products, id) {
        return Err(ApiError::NotFound("Product"));
    }
    s.catalog().save(&doc).await.map_err(ApiError::storage("Failed to delete product"))?;

    tracing::info!(product_id = id, "product deleted");
    Ok(Json(DeleteResponse { success: true, message: "Product deleted".into() }))
}
