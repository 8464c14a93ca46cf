//! Dashboard aggregates

use crate::models::{Order, Product};

/// Figures shown on the dashboard; recomputed from the snapshots on every call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub total_orders: usize,
    /// Sum of parsed order totals; non-numeric totals count as zero
    pub total_revenue: f64,
    /// Orders whose status is exactly "Pending"
    pub pending_orders: usize,
    pub total_products: usize,
}

impl Stats {
    pub fn compute(orders: &[Order], products: &[Product]) -> Self {
        Self {
            total_orders: orders.len(),
            total_revenue: orders.iter().map(Order::total).sum(),
            pending_orders: orders.iter().filter(|order| order.is_pending()).count(),
            total_products: products.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, RowId};

    fn order(id: i64, status: &str, total: &str) -> Order {
        Order {
            id: RowId::from(id),
            email: None,
            status: status.to_string(),
            total_amount: Some(Amount::from(total)),
            items: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn revenue_treats_non_numeric_totals_as_zero() {
        let orders = vec![
            order(1, "Completed", "100"),
            order(2, "Completed", "abc"),
            order(3, "Completed", "50"),
        ];
        let stats = Stats::compute(&orders, &[]);
        assert_eq!(stats.total_revenue, 150.0);
        assert_eq!(stats.total_orders, 3);
    }

    #[test]
    fn pending_count_is_exact_match() {
        let orders = vec![
            order(1, "Pending", "1"),
            order(2, "Completed", "1"),
            order(3, "Pending", "1"),
            order(4, "pending", "1"),
        ];
        assert_eq!(Stats::compute(&orders, &[]).pending_orders, 2);
    }

    #[test]
    fn missing_total_counts_as_zero() {
        let mut missing = order(1, "Pending", "0");
        missing.total_amount = None;
        let stats = Stats::compute(&[missing], &[]);
        assert_eq!(stats.total_revenue, 0.0);
        assert_eq!(stats.total_products, 0);
    }
}
