use serde::{Deserialize, Serialize};

use super::aggregate::CartItem;

/// Query over a cart's items: price filter, ordering and 1-based paging.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemQuery {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_desc: bool,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            min_price: None,
            max_price: None,
            sort_by: None,
            sort_desc: false,
            page: 1,
            page_size: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Sortable item fields. Names outside this table are tolerated and leave
/// the insertion order untouched.
fn comparator(sort_by: &str) -> Option<fn(&CartItem, &CartItem) -> std::cmp::Ordering> {
    match sort_by {
        "price" => Some(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal)),
        "quantity" => Some(|a, b| a.quantity.cmp(&b.quantity)),
        "product_name" => Some(|a, b| a.product_name.cmp(&b.product_name)),
        _ => None,
    }
}

/// Produce a deterministic page of a cart's items.
///
/// Filter, then sort (stable, ties keep insertion order), then page.
/// `total` reflects the count after filtering. A page before 1, a
/// non-positive page size, or a page beyond the range all yield an empty
/// slice rather than an error.
pub fn query_items(items: &[CartItem], query: &ItemQuery) -> PagedResult<CartItem> {
    let mut filtered: Vec<CartItem> = items
        .iter()
        .filter(|item| query.min_price.map_or(true, |min| item.price >= min))
        .filter(|item| query.max_price.map_or(true, |max| item.price <= max))
        .cloned()
        .collect();

    let total = filtered.len() as u64;

    if let Some(cmp) = query.sort_by.as_deref().and_then(comparator) {
        filtered.sort_by(cmp);
        if query.sort_desc {
            filtered.reverse();
        }
    }

    let page_items = if query.page < 1 || query.page_size == 0 {
        Vec::new()
    } else {
        let skip = (query.page as usize - 1) * query.page_size as usize;
        filtered
            .into_iter()
            .skip(skip)
            .take(query.page_size as usize)
            .collect()
    };

    let total_pages = if query.page_size == 0 {
        0
    } else {
        ((total as u32) + query.page_size - 1) / query.page_size
    };

    PagedResult {
        items: page_items,
        total,
        page: query.page,
        page_size: query.page_size,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn items_with_prices(prices: &[f64]) -> Vec<CartItem> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                CartItem::new(Uuid::new_v4(), format!("Product {}", i), 1, price).unwrap()
            })
            .collect()
    }

    fn query() -> ItemQuery {
        ItemQuery::default()
    }

    #[test]
    fn first_page_returns_lowest_prices_ascending() {
        let items = items_with_prices(&[30.0, 10.0, 50.0, 20.0, 40.0]);
        let result = query_items(
            &items,
            &ItemQuery {
                sort_by: Some("price".to_string()),
                page: 1,
                page_size: 2,
                ..query()
            },
        );

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].price, 10.0);
        assert_eq!(result.items[1].price, 20.0);
        assert_eq!(result.total, 5);
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn last_page_returns_remainder() {
        let items = items_with_prices(&[30.0, 10.0, 50.0, 20.0, 40.0]);
        let result = query_items(
            &items,
            &ItemQuery {
                sort_by: Some("price".to_string()),
                page: 3,
                page_size: 2,
                ..query()
            },
        );

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].price, 50.0);
    }

    #[test]
    fn page_beyond_range_is_empty() {
        let items = items_with_prices(&[30.0, 10.0, 50.0, 20.0, 40.0]);
        let result = query_items(
            &items,
            &ItemQuery {
                page: 10,
                page_size: 2,
                ..query()
            },
        );

        assert!(result.items.is_empty());
        assert_eq!(result.total, 5);
    }

    #[test]
    fn price_filter_keeps_bounds_inclusive_in_insertion_order() {
        let items = items_with_prices(&[5.0, 10.0, 15.0, 20.0, 25.0]);
        let result = query_items(
            &items,
            &ItemQuery {
                min_price: Some(10.0),
                max_price: Some(20.0),
                page: 1,
                page_size: 50,
                ..query()
            },
        );

        let prices: Vec<f64> = result.items.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![10.0, 15.0, 20.0]);
        // total reflects the filtered count
        assert_eq!(result.total, 3);
    }

    #[test]
    fn unknown_sort_field_keeps_insertion_order() {
        let items = items_with_prices(&[30.0, 10.0, 20.0]);
        let result = query_items(
            &items,
            &ItemQuery {
                sort_by: Some("colour".to_string()),
                page: 1,
                page_size: 50,
                ..query()
            },
        );

        let prices: Vec<f64> = result.items.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn descending_sort_flips_order() {
        let items = items_with_prices(&[30.0, 10.0, 20.0]);
        let result = query_items(
            &items,
            &ItemQuery {
                sort_by: Some("price".to_string()),
                sort_desc: true,
                page: 1,
                page_size: 50,
                ..query()
            },
        );

        let prices: Vec<f64> = result.items.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![30.0, 20.0, 10.0]);
    }

    #[test]
    fn stable_sort_preserves_insertion_order_on_ties() {
        let mut items = items_with_prices(&[10.0, 10.0, 10.0]);
        items[0].product_name = "first".to_string();
        items[1].product_name = "second".to_string();
        items[2].product_name = "third".to_string();

        let result = query_items(
            &items,
            &ItemQuery {
                sort_by: Some("price".to_string()),
                page: 1,
                page_size: 50,
                ..query()
            },
        );

        let names: Vec<&str> = result.items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_cart_yields_empty_page() {
        let result = query_items(&[], &query());
        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn invalid_paging_yields_empty_slice() {
        let items = items_with_prices(&[10.0, 20.0]);

        let zero_page = query_items(&items, &ItemQuery { page: 0, ..query() });
        assert!(zero_page.items.is_empty());
        assert_eq!(zero_page.total, 2);

        let zero_size = query_items(
            &items,
            &ItemQuery {
                page: 1,
                page_size: 0,
                ..query()
            },
        );
        assert!(zero_size.items.is_empty());
    }

    #[test]
    fn sort_by_quantity_and_name() {
        let mut items = items_with_prices(&[10.0, 20.0, 30.0]);
        items[0].quantity = 3;
        items[1].quantity = 1;
        items[2].quantity = 2;
        items[0].product_name = "banana".to_string();
        items[1].product_name = "apple".to_string();
        items[2].product_name = "cherry".to_string();

        let by_quantity = query_items(
            &items,
            &ItemQuery {
                sort_by: Some("quantity".to_string()),
                page: 1,
                page_size: 50,
                ..query()
            },
        );
        let quantities: Vec<i32> = by_quantity.items.iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![1, 2, 3]);

        let by_name = query_items(
            &items,
            &ItemQuery {
                sort_by: Some("product_name".to_string()),
                page: 1,
                page_size: 50,
                ..query()
            },
        );
        let names: Vec<&str> = by_name.items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["apple", "banana", "cherry"]);
    }
}
