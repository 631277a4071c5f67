use crate::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CartError;

// ============================================================================
// ID Types
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartId(pub Uuid);

impl CartId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for CartId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CartId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartItemId(pub Uuid);

impl CartItemId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for CartItemId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CartItemId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Cart Item
// ============================================================================

/// A single line item. Owned exclusively by one cart; all mutation goes
/// through the owning aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,

    #[serde(rename = "productId")]
    pub product_id: Uuid,

    #[serde(rename = "productName")]
    pub product_name: String,

    pub quantity: i32,

    pub price: f64,

    /// Owning cart. Informational back-reference only.
    #[serde(rename = "cartId")]
    pub cart_id: Option<CartId>,
}

impl CartItem {
    /// Create a validated line item
    pub fn new(
        product_id: Uuid,
        product_name: String,
        quantity: i32,
        price: f64,
    ) -> Result<Self, CartError> {
        if product_name.trim().is_empty() {
            return Err(CartError::Validation(
                "Product name cannot be empty".into(),
            ));
        }
        if quantity <= 0 {
            return Err(CartError::Validation(
                "Quantity must be greater than zero".into(),
            ));
        }
        if price <= 0.0 {
            return Err(CartError::Validation(
                "Price must be greater than zero".into(),
            ));
        }

        Ok(Self {
            id: CartItemId::new_v4(),
            product_id,
            product_name,
            quantity,
            price,
            cart_id: None,
        })
    }

    /// Derived, never stored
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    pub fn update_quantity(&mut self, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::Validation(
                "Quantity must be greater than zero".into(),
            ));
        }
        self.quantity = quantity;
        Ok(())
    }

    pub fn update_price(&mut self, price: f64) -> Result<(), CartError> {
        if price <= 0.0 {
            return Err(CartError::Validation(
                "Price must be greater than zero".into(),
            ));
        }
        self.price = price;
        Ok(())
    }
}

// ============================================================================
// Cart Aggregate Root
// ============================================================================

/// Aggregate root owning an ordered collection of items.
///
/// Invariant: at most one item per distinct product id. Items keep their
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    items: Vec<CartItem>,
    pub metadata: EntityMetadata,
}

impl Cart {
    /// Create an empty cart with a fresh id
    pub fn new() -> Self {
        Self::with_id(CartId::new_v4())
    }

    /// Create an empty cart with a known id
    pub fn with_id(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
            metadata: EntityMetadata::new(),
        }
    }

    /// Rebuild a cart loaded from storage
    pub fn from_parts(id: CartId, items: Vec<CartItem>, metadata: EntityMetadata) -> Self {
        Self {
            id,
            items,
            metadata,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of item subtotals, recomputed on every read
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.subtotal()).sum()
    }

    /// Add an item, merging by product id.
    ///
    /// If the product is already in the cart, its quantity becomes
    /// existing + incoming and the existing price is retained. Otherwise
    /// the item is appended, preserving insertion order.
    pub fn add_item(&mut self, mut item: CartItem) -> Result<(), CartError> {
        item.cart_id = Some(self.id);

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            let merged = existing.quantity + item.quantity;
            existing.update_quantity(merged)?;
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    /// Remove the item for a product. No-op if the product is not present.
    pub fn remove_item(&mut self, product_id: Uuid) {
        if let Some(pos) = self.items.iter().position(|i| i.product_id == product_id) {
            self.items.remove(pos);
        }
    }

    /// Update quantity and price of the item for a product. No-op if the
    /// product is not present. A failed update leaves the item untouched.
    pub fn update_item(
        &mut self,
        product_id: Uuid,
        quantity: i32,
        price: f64,
    ) -> Result<(), CartError> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let mut updated = item.clone();
            updated.update_quantity(quantity)?;
            updated.update_price(price)?;
            *item = updated;
        }
        Ok(())
    }

    /// Find an item by its own id (not product id)
    pub fn find_item(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
        self.metadata.increment_version();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Transfer payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartDto {
    pub id: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItemDto>,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemDto {
    pub id: Option<String>,

    #[serde(rename = "productId")]
    pub product_id: Uuid,

    #[serde(rename = "productName")]
    pub product_name: String,

    pub quantity: i32,

    pub price: f64,

    #[serde(rename = "cartId")]
    pub cart_id: Option<String>,

    #[serde(default)]
    pub subtotal: f64,
}

impl From<&CartItem> for CartItemDto {
    fn from(item: &CartItem) -> Self {
        Self {
            id: Some(item.id.as_string()),
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.price,
            cart_id: item.cart_id.map(|id| id.as_string()),
            subtotal: item.subtotal(),
        }
    }
}

impl From<&Cart> for CartDto {
    fn from(cart: &Cart) -> Self {
        Self {
            id: Some(cart.id.as_string()),
            items: cart.items().iter().map(Into::into).collect(),
            total: cart.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: Uuid, quantity: i32, price: f64) -> CartItem {
        CartItem::new(product_id, "Product A".to_string(), quantity, price).unwrap()
    }

    #[test]
    fn add_item_appends_new_product() {
        let mut cart = Cart::new();
        cart.add_item(item(Uuid::new_v4(), 2, 10.0)).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_name, "Product A");
        assert_eq!(cart.items()[0].cart_id, Some(cart.id));
    }

    #[test]
    fn add_item_merges_quantity_for_same_product() {
        let product_id = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(product_id, 2, 10.0)).unwrap();
        cart.add_item(item(product_id, 3, 10.0)).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn add_item_merge_keeps_first_price() {
        let product_id = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(product_id, 1, 10.0)).unwrap();
        // Incoming price differs; the stored price must win.
        cart.add_item(item(product_id, 1, 99.0)).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].price, 10.0);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn remove_item_deletes_existing_product() {
        let product_id = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(product_id, 2, 10.0)).unwrap();

        cart.remove_item(product_id);

        assert!(cart.items().is_empty());
    }

    #[test]
    fn remove_item_is_noop_for_missing_product() {
        let mut cart = Cart::new();
        cart.add_item(item(Uuid::new_v4(), 2, 10.0)).unwrap();

        cart.remove_item(Uuid::new_v4());

        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn update_item_changes_quantity_and_price() {
        let product_id = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(product_id, 2, 10.0)).unwrap();

        cart.update_item(product_id, 5, 15.0).unwrap();

        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.items()[0].price, 15.0);
    }

    #[test]
    fn update_item_is_noop_for_missing_product() {
        let mut cart = Cart::new();
        cart.update_item(Uuid::new_v4(), 5, 15.0).unwrap();
        assert!(cart.items().is_empty());
    }

    #[test]
    fn update_item_rejects_invalid_values() {
        let product_id = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(product_id, 2, 10.0)).unwrap();

        assert!(cart.update_item(product_id, 0, 15.0).is_err());
        assert!(cart.update_item(product_id, 5, 0.0).is_err());
        // Failed update leaves the item untouched
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[0].price, 10.0);
    }

    #[test]
    fn total_tracks_all_mutations() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut cart = Cart::new();
        assert_eq!(cart.total(), 0.0);

        cart.add_item(item(first, 2, 10.0)).unwrap();
        cart.add_item(item(second, 1, 5.0)).unwrap();
        assert_eq!(cart.total(), 25.0);

        cart.update_item(first, 3, 10.0).unwrap();
        assert_eq!(cart.total(), 35.0);

        cart.remove_item(second);
        assert_eq!(cart.total(), 30.0);
    }

    #[test]
    fn new_item_rejects_zero_quantity() {
        let result = CartItem::new(Uuid::new_v4(), "Product A".to_string(), 0, 10.0);
        assert!(matches!(result, Err(CartError::Validation(_))));
    }

    #[test]
    fn new_item_rejects_non_positive_price() {
        let zero = CartItem::new(Uuid::new_v4(), "Product A".to_string(), 1, 0.0);
        let negative = CartItem::new(Uuid::new_v4(), "Product A".to_string(), 1, -1.0);
        assert!(matches!(zero, Err(CartError::Validation(_))));
        assert!(matches!(negative, Err(CartError::Validation(_))));
    }

    #[test]
    fn new_item_rejects_blank_name() {
        let result = CartItem::new(Uuid::new_v4(), "   ".to_string(), 1, 10.0);
        assert!(matches!(result, Err(CartError::Validation(_))));
    }
}
