//! Shopping cart

use crate::models::{OrderItem, Product, RowId};

/// One product in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }

    /// The line as stored in an order's item list
    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            id: Some(self.product.id.clone()),
            name: Some(self.product.name.clone()),
            price: Some(self.product.price),
            quantity: self.quantity,
            image_url: self.product.image_url.clone(),
        }
    }
}

/// Lines keyed by product id, in the order they were first added
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of `product`; an existing line grows instead
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity,
            }),
        }
    }

    pub fn remove(&mut self, product_id: &RowId) {
        self.lines.retain(|line| !line.product.id.loosely_eq(product_id));
    }

    /// Set a line's quantity; zero removes it. Unknown products are ignored.
    pub fn set_quantity(&mut self, product_id: &RowId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: &RowId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id.loosely_eq(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: f64) -> Product {
        Product {
            id: RowId::from(id),
            name: format!("item {}", id),
            price,
            stock: 10,
            category: None,
            description: None,
            image_url: None,
            created_at: None,
        }
    }

    #[test]
    fn adding_same_product_merges_lines() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10.0), 1);
        cart.add(&product(1, 10.0), 2);
        cart.add(&product(2, 5.5), 1);

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total(), 35.5);
    }

    #[test]
    fn zero_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10.0), 2);
        cart.set_quantity(&RowId::from(1), 5);
        assert_eq!(cart.total(), 50.0);

        cart.set_quantity(&RowId::from("1"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn order_items_carry_product_snapshot() {
        let mut cart = Cart::new();
        cart.add(&product(4, 2.0), 3);
        let item = cart.lines()[0].to_order_item();
        assert_eq!(item.id, Some(RowId::from(4)));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, Some(2.0));

        cart.clear();
        assert_eq!(cart.item_count(), 0);
    }
}
