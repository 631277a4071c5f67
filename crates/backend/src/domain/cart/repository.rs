use chrono::Utc;
use contracts::domain::cart::{Cart, CartId, CartItem, CartItemId};
use contracts::domain::common::EntityMetadata;
use uuid::Uuid;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

pub mod carts {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "carts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod items {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "cart_items")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub cart_id: String,
        pub product_id: String,
        pub product_name: String,
        pub quantity: i32,
        pub price: f64,
        pub position: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn item_from_model(m: items::Model) -> CartItem {
    let id = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
    let product_id = Uuid::parse_str(&m.product_id).unwrap_or_else(|_| Uuid::new_v4());
    let cart_id = Uuid::parse_str(&m.cart_id).ok().map(CartId::new);

    CartItem {
        id: CartItemId::new(id),
        product_id,
        product_name: m.product_name,
        quantity: m.quantity,
        price: m.price,
        cart_id,
    }
}

fn item_active_model(cart: &Cart, item: &CartItem, position: i32) -> items::ActiveModel {
    items::ActiveModel {
        id: Set(item.id.value().to_string()),
        cart_id: Set(cart.id.value().to_string()),
        product_id: Set(item.product_id.to_string()),
        product_name: Set(item.product_name.clone()),
        quantity: Set(item.quantity),
        price: Set(item.price),
        position: Set(position),
    }
}

/// Load a cart with its items, preserving insertion order
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Cart>> {
    let row = carts::Entity::find_by_id(id.to_string()).one(conn()).await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let item_rows = items::Entity::find()
        .filter(items::Column::CartId.eq(id.to_string()))
        .order_by_asc(items::Column::Position)
        .all(conn())
        .await?;

    let metadata = EntityMetadata {
        created_at: row.created_at.unwrap_or_else(Utc::now),
        updated_at: row.updated_at.unwrap_or_else(Utc::now),
        version: row.version,
    };
    let cart_id = CartId::new(Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::new_v4()));
    let cart_items = item_rows.into_iter().map(item_from_model).collect();

    Ok(Some(Cart::from_parts(cart_id, cart_items, metadata)))
}

/// Insert a new cart with all of its items
pub async fn insert(cart: &Cart) -> anyhow::Result<Uuid> {
    let uuid = cart.id.value();
    let active = carts::ActiveModel {
        id: Set(uuid.to_string()),
        created_at: Set(Some(cart.metadata.created_at)),
        updated_at: Set(Some(cart.metadata.updated_at)),
        version: Set(cart.metadata.version),
    };
    carts::Entity::insert(active).exec(conn()).await?;

    for (position, item) in cart.items().iter().enumerate() {
        items::Entity::insert(item_active_model(cart, item, position as i32))
            .exec(conn())
            .await?;
    }

    Ok(uuid)
}

/// Whole-aggregate replace: rewrite the cart row and all item rows.
/// Last writer wins; no concurrency token is checked.
pub async fn replace(cart: &Cart) -> anyhow::Result<()> {
    let id = cart.id.value().to_string();

    let active = carts::ActiveModel {
        id: Set(id.clone()),
        created_at: Set(Some(cart.metadata.created_at)),
        updated_at: Set(Some(cart.metadata.updated_at)),
        version: Set(cart.metadata.version),
    };
    carts::Entity::update(active).exec(conn()).await?;

    items::Entity::delete_many()
        .filter(items::Column::CartId.eq(id))
        .exec(conn())
        .await?;

    for (position, item) in cart.items().iter().enumerate() {
        items::Entity::insert(item_active_model(cart, item, position as i32))
            .exec(conn())
            .await?;
    }

    Ok(())
}

/// Delete a cart and its items
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    // Items go first; the cart row is the aggregate's existence marker
    items::Entity::delete_many()
        .filter(items::Column::CartId.eq(id.to_string()))
        .exec(conn())
        .await?;

    let result = carts::Entity::delete_by_id(id.to_string())
        .exec(conn())
        .await?;

    Ok(result.rows_affected > 0)
}
