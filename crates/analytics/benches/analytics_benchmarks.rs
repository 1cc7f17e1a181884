use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{DateTime, Duration, TimeZone, Utc};

use storefront_analytics::{analyze, customer_summaries};
use storefront_catalog::ProductId;
use storefront_core::{Aggregate, AggregateId, CustomerId, Money};
use storefront_orders::{
    CustomerInfo, Order, OrderEvent, OrderId, OrderLineItem, OrderPlaced, OrderStatus,
    OrderStatusUpdated,
};

const STATUSES: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Synthetic order history: a bounded product catalog and customer pool so
/// the aggregations exercise their merge paths, timestamps spread across a
/// year so the monthly window filters.
fn seed_orders(count: usize) -> Vec<Order> {
    let products: Vec<ProductId> = (0..20)
        .map(|_| ProductId::new(AggregateId::new()))
        .collect();
    let customers: Vec<CustomerId> = (0..50).map(|_| CustomerId::new()).collect();

    (0..count)
        .map(|i| {
            let order_id = OrderId::new(AggregateId::new());
            let lines: Vec<OrderLineItem> = (0..(i % 4) + 1)
                .map(|j| OrderLineItem {
                    product_id: products[(i + j) % products.len()],
                    product_name: format!("Product {}", (i + j) % products.len()),
                    quantity: (j as u32 % 5) + 1,
                    unit_price: Money::from_cents(((i % 90) as u64 + 1) * 100),
                })
                .collect();
            let total = lines.iter().map(OrderLineItem::line_total).sum();
            let occurred_at = reference_now() - Duration::days((i % 365) as i64);

            let mut order = Order::empty(order_id);
            order.apply(&OrderEvent::OrderPlaced(OrderPlaced {
                order_id,
                customer_id: customers[i % customers.len()],
                customer_info: CustomerInfo {
                    name: "Load Test".to_string(),
                    email: "load@example.com".to_string(),
                    phone: "555-0100".to_string(),
                    address: "1 Main St".to_string(),
                },
                lines,
                total,
                occurred_at,
            }));
            let status = STATUSES[i % STATUSES.len()];
            if status != OrderStatus::Pending {
                order.apply(&OrderEvent::OrderStatusUpdated(OrderStatusUpdated {
                    order_id,
                    status,
                    occurred_at,
                }));
            }
            order
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let now = reference_now();

    for size in [100usize, 1_000, 5_000] {
        let orders = seed_orders(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &orders, |b, orders| {
            b.iter(|| analyze(black_box(orders), now));
        });
    }

    group.finish();
}

fn bench_customer_summaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("customer_summaries");

    for size in [100usize, 1_000, 5_000] {
        let orders = seed_orders(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &orders, |b, orders| {
            b.iter(|| customer_summaries(black_box(orders)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_customer_summaries);
criterion_main!(benches);
