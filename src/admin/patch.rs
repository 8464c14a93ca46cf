//! Local snapshot transforms, applied only after the remote write succeeded

use crate::models::{Order, Product, ProductPatch, Row, RowId};

/// Set the status of the order with `id`; every other field and order is untouched.
/// Returns whether an order matched.
pub fn set_order_status(orders: &mut [Order], id: &RowId, status: &str) -> bool {
    match orders.iter_mut().find(|order| order.id.loosely_eq(id)) {
        Some(order) => {
            order.status = status.to_string();
            true
        }
        None => false,
    }
}

/// New rows go to the front, matching newest-first snapshots
pub fn prepend<T>(rows: &mut Vec<T>, row: T) {
    rows.insert(0, row);
}

/// Merge `patch` into the product with `id`
pub fn merge_product(products: &mut [Product], id: &RowId, patch: &ProductPatch) -> bool {
    match products.iter_mut().find(|product| product.id.loosely_eq(id)) {
        Some(product) => {
            patch.apply_to(product);
            true
        }
        None => false,
    }
}

/// Drop every row with `id`; returns how many were removed
pub fn remove_by_id<T: Row>(rows: &mut Vec<T>, id: &RowId) -> usize {
    let before = rows.len();
    rows.retain(|row| !row.id().loosely_eq(id));
    before - rows.len()
}
