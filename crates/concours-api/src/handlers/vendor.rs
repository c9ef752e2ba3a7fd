//! Vendor product endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use concours_auth::Role;
use concours_db::entities::product;
use sea_orm::{
    ActiveModelTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::{
    CreateProductRequest, ErrorResponse, Product, ProductList, UpdateProductRequest,
};
use crate::AppState;

/// Vendors act on their own listings; admins on any
fn vendor_or_admin(current: &CurrentUser, entry: &product::Model) -> Result<(), ApiError> {
    if entry.vendor_id == current.id || current.claims.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

fn validate_listing(name: &str, price_cents: i64) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Product name must not be empty".to_string()));
    }
    if price_cents < 0 {
        return Err(ApiError::Validation("Price must not be negative".to_string()));
    }
    Ok(())
}

/// List all products
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products", body = ProductList)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductList>, ApiError> {
    let entries = product::Entity::find()
        .order_by_asc(product::Column::Name)
        .all(&state.db)
        .await?;

    let total = entries.len();
    let products = entries.into_iter().map(Product::from).collect();

    Ok(Json(ProductList { products, total }))
}

/// List a product for sale under the caller's vendor account
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product listed", body = Product),
        (status = 400, description = "Validation failure", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_listing(&req.name, req.price_cents)?;

    let entry = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(current.id),
        name: Set(req.name),
        description: Set(req.description),
        price_cents: Set(req.price_cents),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Update a product listing
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let entry = product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;
    vendor_or_admin(&current, &entry)?;

    if let Some(ref name) = req.name {
        validate_listing(name, req.price_cents.unwrap_or(entry.price_cents))?;
    } else if let Some(price_cents) = req.price_cents {
        validate_listing(&entry.name, price_cents)?;
    }

    let mut active = entry.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    if let Some(price_cents) = req.price_cents {
        active.price_cents = Set(price_cents);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

/// Remove a product listing
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product removed"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let entry = product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;
    vendor_or_admin(&current, &entry)?;

    entry.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
