use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};

use storefront_catalog::ProductId;
use storefront_core::Money;
use storefront_orders::{Order, OrderStatus};

const TOP_PRODUCTS_LIMIT: usize = 5;
const RECENT_ORDERS_LIMIT: usize = 10;
const REVENUE_MONTHS: usize = 6;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Aggregate sales for one product across all input orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    /// Unit price snapshot from the first line seen for this product.
    pub unit_price: Money,
    pub quantity: u64,
    pub revenue: Money,
}

/// Revenue bucket for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRevenue {
    /// Short month name ("Jan" … "Dec").
    pub month: &'static str,
    pub revenue: Money,
}

/// Summary statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAnalytics {
    pub total_orders: usize,
    pub total_revenue: Money,
    pub average_order_value: Money,
    /// Counts keyed by status; statuses with zero orders are omitted.
    pub orders_by_status: HashMap<OrderStatus, usize>,
    /// Exactly six entries, oldest month first.
    pub revenue_by_month: Vec<MonthlyRevenue>,
    /// At most five entries, highest revenue first.
    pub top_products: Vec<ProductSales>,
    /// At most ten entries, newest first.
    pub recent_orders: Vec<Order>,
}

/// Aggregate order statistics for the admin dashboard.
///
/// Pure function over a snapshot: the input is never mutated, and every
/// revenue figure is recomputed from line items rather than the stored order
/// totals, so a drifted stored value cannot skew the report. `now` fixes the
/// trailing six-month revenue window; callers (and tests) control the
/// reference clock.
///
/// An empty input produces zero aggregates and empty collections, never an
/// error.
pub fn analyze(orders: &[Order], now: DateTime<Utc>) -> OrderAnalytics {
    let total_orders = orders.len();
    let total_revenue: Money = orders.iter().map(Order::computed_total).sum();
    let average_order_value = total_revenue.divided_by(total_orders as u64);

    let mut orders_by_status: HashMap<OrderStatus, usize> = HashMap::new();
    for order in orders {
        *orders_by_status.entry(order.status()).or_insert(0) += 1;
    }

    OrderAnalytics {
        total_orders,
        total_revenue,
        average_order_value,
        orders_by_status,
        revenue_by_month: revenue_by_month(orders, now),
        top_products: top_products(orders),
        recent_orders: recent_orders(orders),
    }
}

/// The trailing `REVENUE_MONTHS` calendar months ending at `now`'s month,
/// oldest first. Orders land in a bucket when their creation timestamp falls
/// in that calendar month; empty months report zero.
fn revenue_by_month(orders: &[Order], now: DateTime<Utc>) -> Vec<MonthlyRevenue> {
    let mut window = Vec::with_capacity(REVENUE_MONTHS);
    let (mut year, mut month) = (now.year(), now.month());
    for _ in 0..REVENUE_MONTHS {
        window.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    window.reverse();

    window
        .into_iter()
        .map(|(year, month)| MonthlyRevenue {
            month: MONTH_NAMES[(month - 1) as usize],
            revenue: orders
                .iter()
                .filter(|o| {
                    o.created_at().year() == year && o.created_at().month() == month
                })
                .map(Order::computed_total)
                .sum(),
        })
        .collect()
}

fn top_products(orders: &[Order]) -> Vec<ProductSales> {
    // Discovery-ordered accumulation; the stable sort below keeps first-seen
    // products ahead on revenue ties.
    let mut sales: Vec<ProductSales> = Vec::new();
    for order in orders {
        for line in order.lines() {
            match sales.iter_mut().find(|s| s.product_id == line.product_id) {
                Some(entry) => {
                    entry.quantity += line.quantity as u64;
                    entry.revenue += line.line_total();
                }
                None => sales.push(ProductSales {
                    product_id: line.product_id,
                    product_name: line.product_name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity as u64,
                    revenue: line.line_total(),
                }),
            }
        }
    }

    sales.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    sales.truncate(TOP_PRODUCTS_LIMIT);
    sales
}

fn recent_orders(orders: &[Order]) -> Vec<Order> {
    let mut recent = orders.to_vec();
    recent.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    recent.truncate(RECENT_ORDERS_LIMIT);
    recent
}
