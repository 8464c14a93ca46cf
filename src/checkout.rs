//! Order placement and tracking

use std::sync::Arc;

use crate::cart::{Cart, CartLine};
use crate::error::{Error, Result, ValidationErrors};
use crate::models::{tables, NewOrder, Order, RowId, STATUS_PENDING};
use crate::remote::{insert_as, select_as, Remote, TableQuery};

/// Places orders from a cart and looks them up again
pub struct Checkout<R: Remote> {
    remote: Arc<R>,
}

impl<R: Remote> Checkout<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self { remote }
    }

    /// Insert one pending order for the cart's contents.
    ///
    /// The cart is emptied only once the order is stored.
    pub async fn place_order(&self, cart: &mut Cart, email: &str) -> Result<Order> {
        let mut errors = ValidationErrors::new();
        if cart.is_empty() {
            errors.add("cart", "Your cart is empty");
        }
        if email.trim().is_empty() {
            errors.add("email", "Email is required");
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let order = NewOrder {
            email: email.trim().to_string(),
            status: STATUS_PENDING.to_string(),
            total_amount: format!("{:.2}", cart.total()),
            items: cart.lines().iter().map(CartLine::to_order_item).collect(),
        };

        let row: Order = insert_as(self.remote.as_ref(), tables::ORDERS, &order)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error placing order");
                err
            })?;

        tracing::info!(order = %row.id, items = order.items.len(), "order placed");
        cart.clear();
        Ok(row)
    }

    pub async fn track_order(&self, order_id: &RowId) -> Result<Order> {
        let orders: Vec<Order> = select_as(
            self.remote.as_ref(),
            tables::ORDERS,
            TableQuery::all().eq("id", order_id).limit(1),
        )
        .await
        .map_err(|err| {
            tracing::error!(order = %order_id, error = %err, "error tracking order");
            err
        })?;

        orders
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found("Order"))
    }
}
