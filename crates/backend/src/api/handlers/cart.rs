use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::cart::{CartDto, CartError, CartItemDto, ItemQuery, PagedResult};
use serde::Deserialize;

use crate::domain::cart::service;

#[derive(Deserialize)]
pub struct ItemListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Validation failures become 400, everything else is a storage fault
fn error_status(e: &anyhow::Error) -> StatusCode {
    if e.downcast_ref::<CartError>().is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// GET /api/cart/:cart_id
pub async fn get_cart(Path(cart_id): Path<String>) -> Result<Json<CartDto>, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&cart_id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    match service::get_cart(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/cart
pub async fn create_cart(
    Json(dto): Json<CartDto>,
) -> Result<(StatusCode, Json<CartDto>), StatusCode> {
    match service::add_cart(dto).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => Err(error_status(&e)),
    }
}

/// PUT /api/cart/:cart_id
pub async fn update_cart(
    Path(cart_id): Path<String>,
    Json(dto): Json<CartDto>,
) -> Result<Json<CartDto>, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&cart_id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };

    // Identifier in the payload, when present, must match the path
    if let Some(ref dto_id) = dto.id {
        if uuid::Uuid::parse_str(dto_id).ok() != Some(uuid) {
            return Err(StatusCode::BAD_REQUEST);
        }
    }

    match service::update_cart(uuid, dto).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(error_status(&e)),
    }
}

/// DELETE /api/cart/:cart_id
pub async fn delete_cart(Path(cart_id): Path<String>) -> Result<(), StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&cart_id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    match service::delete_cart(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/cart/:cart_id/items
pub async fn list_items(
    Path(cart_id): Path<String>,
    Query(params): Query<ItemListParams>,
) -> Result<Json<PagedResult<CartItemDto>>, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&cart_id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };

    let query = ItemQuery {
        min_price: params.min_price,
        max_price: params.max_price,
        sort_by: params.sort_by,
        sort_desc: params.sort_desc.unwrap_or(false),
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(50),
    };

    match service::get_items(uuid, query).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/cart/:cart_id/items
pub async fn add_item(
    Path(cart_id): Path<String>,
    Json(dto): Json<CartItemDto>,
) -> Result<(StatusCode, Json<CartItemDto>), StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&cart_id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };

    match service::add_item(uuid, dto).await {
        Ok(Some(v)) => Ok((StatusCode::CREATED, Json(v))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(error_status(&e)),
    }
}

/// PUT /api/cart/:cart_id/items/:item_id
pub async fn update_item(
    Path((cart_id, item_id)): Path<(String, String)>,
    Json(dto): Json<CartItemDto>,
) -> Result<Json<CartItemDto>, StatusCode> {
    let (cart_uuid, item_uuid) =
        match (uuid::Uuid::parse_str(&cart_id), uuid::Uuid::parse_str(&item_id)) {
            (Ok(c), Ok(i)) => (c, i),
            _ => return Err(StatusCode::BAD_REQUEST),
        };

    // Identifiers in the payload, when present, must match the path
    if let Some(ref dto_id) = dto.id {
        if uuid::Uuid::parse_str(dto_id).ok() != Some(item_uuid) {
            return Err(StatusCode::BAD_REQUEST);
        }
    }
    if let Some(ref dto_cart_id) = dto.cart_id {
        if uuid::Uuid::parse_str(dto_cart_id).ok() != Some(cart_uuid) {
            return Err(StatusCode::BAD_REQUEST);
        }
    }

    match service::update_item(cart_uuid, item_uuid, dto).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(error_status(&e)),
    }
}

/// DELETE /api/cart/:cart_id/items/:item_id
pub async fn remove_item(
    Path((cart_id, item_id)): Path<(String, String)>,
) -> Result<(), StatusCode> {
    let (cart_uuid, item_uuid) =
        match (uuid::Uuid::parse_str(&cart_id), uuid::Uuid::parse_str(&item_id)) {
            (Ok(c), Ok(i)) => (c, i),
            _ => return Err(StatusCode::BAD_REQUEST),
        };

    match service::remove_item(cart_uuid, item_uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
