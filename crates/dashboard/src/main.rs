//! Demo admin dashboard: seeds a catalog, drives two shopping sessions
//! through checkout, and prints the resulting analytics.

use anyhow::Result;
use chrono::Utc;

use storefront_analytics::{analyze, customer_summaries};
use storefront_cart::{AddItem, Cart, CartCommand, CartId, ClearCart, RemoveItem, UpdateQuantity};
use storefront_catalog::{
    AdjustStock, Category, CategoryId, CreateProduct, Product, ProductCommand,
};
use storefront_core::{Aggregate, AggregateId, CustomerId, Money};
use storefront_orders::{
    CustomerInfo, Order, OrderCommand, OrderId, OrderStatus, PlaceOrder, UpdateStatus,
};

/// Handle a command and fold the emitted events back into the aggregate.
fn drive<A: Aggregate>(aggregate: &mut A, command: &A::Command) -> Result<(), A::Error> {
    let events = aggregate.handle(command)?;
    for event in &events {
        aggregate.apply(event);
    }
    Ok(())
}

fn create_product(
    name: &str,
    description: &str,
    cents: u64,
    stock: i64,
    category_id: CategoryId,
) -> Result<Product> {
    let product_id = storefront_catalog::ProductId::new(AggregateId::new());
    let mut product = Product::empty(product_id);
    drive(
        &mut product,
        &ProductCommand::CreateProduct(CreateProduct {
            product_id,
            name: name.to_string(),
            description: description.to_string(),
            price: Money::from_cents(cents),
            initial_stock: stock,
            category_id: Some(category_id),
            occurred_at: Utc::now(),
        }),
    )?;
    Ok(product)
}

/// Place an order from the session cart, take the sold stock off the shelf,
/// and clear the cart for the next visit.
fn checkout(
    cart: &mut Cart,
    customer_id: CustomerId,
    customer_info: CustomerInfo,
    catalog: &mut [Product],
) -> Result<Order> {
    let order_id = OrderId::new(AggregateId::new());
    let mut order = Order::empty(order_id);
    let cmd = PlaceOrder::from_cart(order_id, customer_id, customer_info, cart, Utc::now());
    drive(&mut order, &OrderCommand::PlaceOrder(cmd))?;

    for line in order.lines() {
        if let Some(product) = catalog.iter_mut().find(|p| p.id_typed() == line.product_id) {
            drive(
                product,
                &ProductCommand::AdjustStock(AdjustStock {
                    product_id: line.product_id,
                    delta: -(line.quantity as i64),
                    occurred_at: Utc::now(),
                }),
            )?;
        }
    }

    drive(
        cart,
        &CartCommand::ClearCart(ClearCart {
            cart_id: cart.id_typed(),
            occurred_at: Utc::now(),
        }),
    )?;

    tracing::info!(order_id = %order.id_typed(), total = %order.total(), "order placed");
    Ok(order)
}

fn main() -> Result<()> {
    storefront_observability::init();

    // Catalog -------------------------------------------------------------
    let electronics = Category::new(
        CategoryId::new(AggregateId::new()),
        "Electronics",
        "Latest gadgets and electronic devices",
    );
    let clothing = Category::new(
        CategoryId::new(AggregateId::new()),
        "Clothing",
        "Fashion and apparel for all seasons",
    );

    let mut catalog = vec![
        create_product(
            "Wireless Headphones",
            "Premium wireless headphones with noise cancellation and 30-hour battery life.",
            29_999,
            50,
            electronics.id,
        )?,
        create_product(
            "Smart Watch",
            "Feature-rich smartwatch with health tracking and GPS.",
            39_999,
            30,
            electronics.id,
        )?,
        create_product(
            "Laptop Backpack",
            "Durable laptop backpack with anti-theft compartments.",
            8_999,
            100,
            electronics.id,
        )?,
        create_product(
            "Cotton T-Shirt",
            "Classic crew neck in heavyweight organic cotton.",
            1_999,
            200,
            clothing.id,
        )?,
    ];
    tracing::info!(products = catalog.len(), "catalog seeded");

    let smart_watch = catalog[1].id_typed();
    let tshirt = catalog[3].id_typed();

    let mut orders: Vec<Order> = Vec::new();

    // First session: browse, change quantities, check out. ----------------
    let session = CartId::new(AggregateId::new());
    let mut cart = Cart::new(session);
    drive(
        &mut cart,
        &CartCommand::AddItem(AddItem::for_product(session, &catalog[0], 1, Utc::now())),
    )?;
    drive(
        &mut cart,
        &CartCommand::AddItem(AddItem::for_product(session, &catalog[3], 2, Utc::now())),
    )?;
    drive(
        &mut cart,
        &CartCommand::UpdateQuantity(UpdateQuantity {
            cart_id: session,
            product_id: tshirt,
            quantity: 3,
            occurred_at: Utc::now(),
        }),
    )?;
    tracing::info!(items = cart.item_count(), total = %cart.total(), "cart ready for checkout");

    let alice = CustomerId::new();
    orders.push(checkout(
        &mut cart,
        alice,
        CustomerInfo {
            name: "Alice Chen".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555-0101".to_string(),
            address: "12 Birch Lane".to_string(),
        },
        &mut catalog,
    )?);

    // Second session: second thoughts about the watch. ---------------------
    let session = CartId::new(AggregateId::new());
    let mut cart = Cart::new(session);
    drive(
        &mut cart,
        &CartCommand::AddItem(AddItem::for_product(session, &catalog[1], 1, Utc::now())),
    )?;
    drive(
        &mut cart,
        &CartCommand::RemoveItem(RemoveItem {
            cart_id: session,
            product_id: smart_watch,
            occurred_at: Utc::now(),
        }),
    )?;
    drive(
        &mut cart,
        &CartCommand::AddItem(AddItem::for_product(session, &catalog[2], 1, Utc::now())),
    )?;

    let bob = CustomerId::new();
    orders.push(checkout(
        &mut cart,
        bob,
        CustomerInfo {
            name: "Bob Osei".to_string(),
            email: "bob@example.com".to_string(),
            phone: "555-0102".to_string(),
            address: "4 Harbor Road".to_string(),
        },
        &mut catalog,
    )?);

    // Alice comes back for headphones as a gift.
    let session = CartId::new(AggregateId::new());
    let mut cart = Cart::new(session);
    drive(
        &mut cart,
        &CartCommand::AddItem(AddItem::for_product(session, &catalog[0], 1, Utc::now())),
    )?;
    orders.push(checkout(
        &mut cart,
        alice,
        CustomerInfo {
            name: "Alice Chen".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555-0101".to_string(),
            address: "12 Birch Lane".to_string(),
        },
        &mut catalog,
    )?);

    // Admin moves the first order through fulfilment, cancels the last. ----
    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let order_id = orders[0].id_typed();
        drive(
            &mut orders[0],
            &OrderCommand::UpdateStatus(UpdateStatus {
                order_id,
                status,
                occurred_at: Utc::now(),
            }),
        )?;
    }
    let last = orders.len() - 1;
    let last_order_id = orders[last].id_typed();
    drive(
        &mut orders[last],
        &OrderCommand::UpdateStatus(UpdateStatus {
            order_id: last_order_id,
            status: OrderStatus::Cancelled,
            occurred_at: Utc::now(),
        }),
    )?;

    // Analytics ------------------------------------------------------------
    let report = analyze(&orders, Utc::now());
    tracing::info!(
        total_orders = report.total_orders,
        total_revenue = %report.total_revenue,
        average_order_value = %report.average_order_value,
        "storefront analytics"
    );
    for (status, count) in &report.orders_by_status {
        tracing::info!(status = %status, count = *count, "orders by status");
    }
    for bucket in &report.revenue_by_month {
        tracing::info!(month = bucket.month, revenue = %bucket.revenue, "monthly revenue");
    }
    for product in &report.top_products {
        tracing::info!(
            product = %product.product_name,
            quantity = product.quantity,
            revenue = %product.revenue,
            "top product"
        );
    }
    for summary in customer_summaries(&orders) {
        tracing::info!(
            customer_id = %summary.customer_id,
            orders = summary.order_count,
            total_spent = %summary.total_spent,
            "customer"
        );
    }
    for product in &catalog {
        tracing::info!(product = %product.name(), stock = product.stock(), "remaining stock");
    }

    Ok(())
}
