use contracts::domain::cart::{
    query_items, Cart, CartDto, CartItem, CartItemDto, CartItemId, ItemQuery, PagedResult,
};
use uuid::Uuid;

use super::repository;

/// Build a validated item from its transfer payload
fn item_from_dto(dto: &CartItemDto) -> anyhow::Result<CartItem> {
    let item = CartItem::new(
        dto.product_id,
        dto.product_name.clone(),
        dto.quantity,
        dto.price,
    )?;
    Ok(item)
}

pub async fn get_cart(id: Uuid) -> anyhow::Result<Option<CartDto>> {
    let cart = repository::get_by_id(id).await?;
    Ok(cart.as_ref().map(Into::into))
}

/// Create a cart, merging any pre-seeded items through the aggregate
pub async fn add_cart(dto: CartDto) -> anyhow::Result<CartDto> {
    let mut cart = Cart::new();
    for item_dto in &dto.items {
        cart.add_item(item_from_dto(item_dto)?)?;
    }

    repository::insert(&cart).await?;
    Ok(CartDto::from(&cart))
}

/// Whole-aggregate replace from a transfer payload
pub async fn update_cart(id: Uuid, dto: CartDto) -> anyhow::Result<Option<CartDto>> {
    let Some(existing) = repository::get_by_id(id).await? else {
        return Ok(None);
    };

    // Rebuild the item list from the payload; lifecycle metadata survives
    let mut cart = Cart::from_parts(existing.id, Vec::new(), existing.metadata);
    for item_dto in &dto.items {
        cart.add_item(item_from_dto(item_dto)?)?;
    }

    cart.before_write();
    repository::replace(&cart).await?;
    Ok(Some(CartDto::from(&cart)))
}

pub async fn delete_cart(id: Uuid) -> anyhow::Result<bool> {
    repository::delete(id).await
}

/// Paged, filtered, sorted view over a cart's items
pub async fn get_items(
    cart_id: Uuid,
    query: ItemQuery,
) -> anyhow::Result<Option<PagedResult<CartItemDto>>> {
    let Some(cart) = repository::get_by_id(cart_id).await? else {
        return Ok(None);
    };

    let page = query_items(cart.items(), &query);
    Ok(Some(PagedResult {
        items: page.items.iter().map(Into::into).collect(),
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
    }))
}

/// Add an item to a cart. Returns the stored item for the product, which
/// on a merge carries the accumulated quantity and the original price.
pub async fn add_item(cart_id: Uuid, dto: CartItemDto) -> anyhow::Result<Option<CartItemDto>> {
    let Some(mut cart) = repository::get_by_id(cart_id).await? else {
        return Ok(None);
    };

    let item = item_from_dto(&dto)?;
    let product_id = item.product_id;
    cart.add_item(item)?;

    cart.before_write();
    repository::replace(&cart).await?;

    let stored = cart
        .items()
        .iter()
        .find(|i| i.product_id == product_id)
        .map(Into::into);
    Ok(stored)
}

/// Update quantity and price of an item addressed by its item id
pub async fn update_item(
    cart_id: Uuid,
    item_id: Uuid,
    dto: CartItemDto,
) -> anyhow::Result<Option<CartItemDto>> {
    let Some(mut cart) = repository::get_by_id(cart_id).await? else {
        return Ok(None);
    };

    let Some(product_id) = cart
        .find_item(CartItemId::new(item_id))
        .map(|item| item.product_id)
    else {
        return Ok(None);
    };

    cart.update_item(product_id, dto.quantity, dto.price)?;

    cart.before_write();
    repository::replace(&cart).await?;

    let updated = cart
        .items()
        .iter()
        .find(|i| i.product_id == product_id)
        .map(Into::into);
    Ok(updated)
}

/// Remove an item addressed by its item id
pub async fn remove_item(cart_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
    let Some(mut cart) = repository::get_by_id(cart_id).await? else {
        return Ok(false);
    };

    let Some(product_id) = cart
        .find_item(CartItemId::new(item_id))
        .map(|item| item.product_id)
    else {
        return Ok(false);
    };

    cart.remove_item(product_id);

    cart.before_write();
    repository::replace(&cart).await?;
    Ok(true)
}
