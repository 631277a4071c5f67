pub mod aggregate;
pub mod error;
pub mod query;

pub use aggregate::{Cart, CartDto, CartId, CartItem, CartItemDto, CartItemId};
pub use error::CartError;
pub use query::{query_items, ItemQuery, PagedResult};
