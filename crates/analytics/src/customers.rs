use chrono::{DateTime, Utc};

use storefront_core::{CustomerId, Money};
use storefront_orders::Order;

/// Per-customer order statistics for the admin customer directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub order_count: usize,
    /// Lifetime spend, recomputed from line items.
    pub total_spent: Money,
    pub last_order_at: DateTime<Utc>,
}

/// Group orders by customer: order count, lifetime spend, and the most recent
/// order's timestamp. Sparse like `orders_by_status` — customers without
/// orders in the input do not appear. Sorted most recent first.
pub fn customer_summaries(orders: &[Order]) -> Vec<CustomerSummary> {
    let mut summaries: Vec<CustomerSummary> = Vec::new();

    for order in orders {
        let Some(customer_id) = order.customer_id() else {
            continue;
        };
        match summaries.iter_mut().find(|s| s.customer_id == customer_id) {
            Some(entry) => {
                entry.order_count += 1;
                entry.total_spent += order.computed_total();
                entry.last_order_at = entry.last_order_at.max(order.created_at());
            }
            None => summaries.push(CustomerSummary {
                customer_id,
                order_count: 1,
                total_spent: order.computed_total(),
                last_order_at: order.created_at(),
            }),
        }
    }

    summaries.sort_by(|a, b| b.last_order_at.cmp(&a.last_order_at));
    summaries
}
