use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_cart::{Cart, CartLine};
use storefront_catalog::ProductId;
use storefront_core::{
    Aggregate, AggregateId, AggregateRoot, CustomerId, DomainError, Money, ValueObject,
};
use storefront_events::Event;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line: product snapshot, quantity, unit price captured at order time.
///
/// The price is independent of the product's current catalog price, so
/// historical orders keep the price the customer actually paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLineItem {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

impl From<&CartLine> for OrderLineItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Contact details collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerInfo {
    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation("invalid email address"));
        }
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone is required"));
        }
        if self.address.trim().is_empty() {
            return Err(DomainError::validation("address is required"));
        }
        Ok(())
    }
}

impl ValueObject for CustomerInfo {}

/// Aggregate root: Order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer_id: Option<CustomerId>,
    customer_info: Option<CustomerInfo>,
    lines: Vec<OrderLineItem>,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    version: u64,
    created: bool,
}

impl Order {
    /// Create an empty, not-yet-placed aggregate instance for rehydration.
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            customer_id: None,
            customer_info: None,
            lines: Vec::new(),
            total: Money::zero(),
            status: OrderStatus::Pending,
            created_at: DateTime::<Utc>::MIN_UTC,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn customer_info(&self) -> Option<&CustomerInfo> {
        self.customer_info.as_ref()
    }

    pub fn lines(&self) -> &[OrderLineItem] {
        &self.lines
    }

    /// Total stored at placement time.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Total recomputed from the line items.
    ///
    /// Reporting reads this, never the stored `total`, so a drifted stored
    /// value cannot skew revenue figures.
    pub fn computed_total(&self) -> Money {
        self.lines.iter().map(OrderLineItem::line_total).sum()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PlaceOrder (checkout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub customer_info: CustomerInfo,
    pub lines: Vec<OrderLineItem>,
    pub occurred_at: DateTime<Utc>,
}

impl PlaceOrder {
    /// Build the command from a session cart, carrying its line snapshots over.
    ///
    /// Clearing the cart afterwards is the caller's move (`ClearCart`).
    pub fn from_cart(
        order_id: OrderId,
        customer_id: CustomerId,
        customer_info: CustomerInfo,
        cart: &Cart,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            customer_id,
            customer_info,
            lines: cart.lines().iter().map(OrderLineItem::from).collect(),
            occurred_at,
        }
    }
}

/// Command: UpdateStatus (administrative action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    UpdateStatus(UpdateStatus),
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub customer_info: CustomerInfo,
    pub lines: Vec<OrderLineItem>,
    /// Sum of line totals at placement.
    pub total: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusUpdated {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderPlaced(OrderPlaced),
    OrderStatusUpdated(OrderStatusUpdated),
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "orders.order.placed",
            OrderEvent::OrderStatusUpdated(_) => "orders.order.status_updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderPlaced(e) => e.occurred_at,
            OrderEvent::OrderStatusUpdated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(e) => {
                self.id = e.order_id;
                self.customer_id = Some(e.customer_id);
                self.customer_info = Some(e.customer_info.clone());
                self.lines = e.lines.clone();
                self.total = e.total;
                self.status = OrderStatus::Pending;
                self.created_at = e.occurred_at;
                self.created = true;
            }
            OrderEvent::OrderStatusUpdated(e) => {
                self.status = e.status;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::PlaceOrder(cmd) => self.handle_place(cmd),
            OrderCommand::UpdateStatus(cmd) => self.handle_update_status(cmd),
        }
    }
}

impl Order {
    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<OrderEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("order already exists"));
        }

        if cmd.lines.is_empty() {
            return Err(DomainError::validation("at least one item is required"));
        }

        if cmd.lines.iter().any(|l| l.quantity == 0) {
            return Err(DomainError::validation("quantity must be positive"));
        }

        cmd.customer_info.validate()?;

        let total = cmd.lines.iter().map(OrderLineItem::line_total).sum();

        Ok(vec![OrderEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id,
            customer_id: cmd.customer_id,
            customer_info: cmd.customer_info.clone(),
            lines: cmd.lines.clone(),
            total,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_status(&self, cmd: &UpdateStatus) -> Result<Vec<OrderEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_order_id(cmd.order_id)?;

        if self.status == cmd.status {
            return Err(DomainError::conflict(format!(
                "order is already {}",
                self.status
            )));
        }

        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "cannot change status of a {} order",
                self.status
            )));
        }

        Ok(vec![OrderEvent::OrderStatusUpdated(OrderStatusUpdated {
            order_id: cmd.order_id,
            status: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_cart::{AddItem, CartCommand, CartId};

    fn test_order_id() -> OrderId {
        OrderId::new(AggregateId::new())
    }

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn test_customer_info() -> CustomerInfo {
        CustomerInfo {
            name: "Jamie Doe".to_string(),
            email: "jamie@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    fn line(cents: u64, quantity: u32) -> OrderLineItem {
        OrderLineItem {
            product_id: test_product_id(),
            product_name: "Widget".to_string(),
            quantity,
            unit_price: Money::from_cents(cents),
        }
    }

    fn place_cmd(order_id: OrderId, lines: Vec<OrderLineItem>) -> PlaceOrder {
        PlaceOrder {
            order_id,
            customer_id: CustomerId::new(),
            customer_info: test_customer_info(),
            lines,
            occurred_at: test_time(),
        }
    }

    fn placed_order(lines: Vec<OrderLineItem>) -> Order {
        let order_id = test_order_id();
        let mut order = Order::empty(order_id);
        let events = order
            .handle(&OrderCommand::PlaceOrder(place_cmd(order_id, lines)))
            .unwrap();
        order.apply(&events[0]);
        order
    }

    #[test]
    fn place_order_computes_total_from_lines() {
        let order = placed_order(vec![line(1000, 2), line(500, 1)]);

        assert_eq!(order.total(), Money::from_cents(2500));
        assert_eq!(order.computed_total(), Money::from_cents(2500));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.lines().len(), 2);
    }

    #[test]
    fn place_order_rejects_empty_lines() {
        let order_id = test_order_id();
        let order = Order::empty(order_id);

        let err = order
            .handle(&OrderCommand::PlaceOrder(place_cmd(order_id, vec![])))
            .unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("at least one item") => {}
            _ => panic!("Expected Validation error for empty lines"),
        }
    }

    #[test]
    fn place_order_rejects_zero_quantity() {
        let order_id = test_order_id();
        let order = Order::empty(order_id);

        let err = order
            .handle(&OrderCommand::PlaceOrder(place_cmd(
                order_id,
                vec![line(1000, 0)],
            )))
            .unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("quantity must be positive") => {}
            _ => panic!("Expected Validation error for zero quantity"),
        }
    }

    #[test]
    fn place_order_rejects_bad_customer_info() {
        let order_id = test_order_id();
        let order = Order::empty(order_id);
        let mut cmd = place_cmd(order_id, vec![line(1000, 1)]);
        cmd.customer_info.email = "not-an-email".to_string();

        let err = order
            .handle(&OrderCommand::PlaceOrder(cmd))
            .unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("invalid email") => {}
            _ => panic!("Expected Validation error for bad email"),
        }
    }

    #[test]
    fn place_order_rejects_duplicate_placement() {
        let order = placed_order(vec![line(1000, 1)]);
        let cmd = place_cmd(order.id_typed(), vec![line(1000, 1)]);

        let err = order
            .handle(&OrderCommand::PlaceOrder(cmd))
            .unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for duplicate placement"),
        }
    }

    #[test]
    fn from_cart_carries_lines_and_captured_prices() {
        let cart_id = CartId::new(AggregateId::new());
        let mut cart = Cart::new(cart_id);
        for (cents, quantity) in [(1000u64, 2u32), (500, 1)] {
            let events = cart
                .handle(&CartCommand::AddItem(AddItem {
                    cart_id,
                    product_id: test_product_id(),
                    product_name: "Widget".to_string(),
                    unit_price: Money::from_cents(cents),
                    quantity,
                    occurred_at: test_time(),
                }))
                .unwrap();
            for event in &events {
                cart.apply(event);
            }
        }

        let order_id = test_order_id();
        let mut order = Order::empty(order_id);
        let cmd = PlaceOrder::from_cart(
            order_id,
            CustomerId::new(),
            test_customer_info(),
            &cart,
            test_time(),
        );
        let events = order.handle(&OrderCommand::PlaceOrder(cmd)).unwrap();
        order.apply(&events[0]);

        assert_eq!(order.lines().len(), cart.lines().len());
        assert_eq!(order.total(), cart.total());
        assert_eq!(order.computed_total(), Money::from_cents(2500));
    }

    #[test]
    fn update_status_moves_through_lifecycle() {
        let mut order = placed_order(vec![line(1000, 1)]);

        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            let events = order
                .handle(&OrderCommand::UpdateStatus(UpdateStatus {
                    order_id: order.id_typed(),
                    status,
                    occurred_at: test_time(),
                }))
                .unwrap();
            order.apply(&events[0]);
            assert_eq!(order.status(), status);
        }
    }

    #[test]
    fn update_status_rejects_redundant_transition() {
        let order = placed_order(vec![line(1000, 1)]);

        let err = order
            .handle(&OrderCommand::UpdateStatus(UpdateStatus {
                order_id: order.id_typed(),
                status: OrderStatus::Pending,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        match err {
            DomainError::Conflict(msg) if msg.contains("already pending") => {}
            _ => panic!("Expected Conflict error for redundant transition"),
        }
    }

    #[test]
    fn update_status_rejects_leaving_terminal_states() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let mut order = placed_order(vec![line(1000, 1)]);
            let events = order
                .handle(&OrderCommand::UpdateStatus(UpdateStatus {
                    order_id: order.id_typed(),
                    status: terminal,
                    occurred_at: test_time(),
                }))
                .unwrap();
            order.apply(&events[0]);

            let err = order
                .handle(&OrderCommand::UpdateStatus(UpdateStatus {
                    order_id: order.id_typed(),
                    status: OrderStatus::Pending,
                    occurred_at: test_time(),
                }))
                .unwrap_err();
            match err {
                DomainError::InvariantViolation(msg) if msg.contains("cannot change status") => {}
                _ => panic!("Expected InvariantViolation when leaving {terminal}"),
            }
        }
    }

    #[test]
    fn update_status_rejects_unknown_order() {
        let order = Order::empty(test_order_id());

        let err = order
            .handle(&OrderCommand::UpdateStatus(UpdateStatus {
                order_id: order.id_typed(),
                status: OrderStatus::Processing,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        match err {
            DomainError::NotFound => {}
            _ => panic!("Expected NotFound error for unknown order"),
        }
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let order = placed_order(vec![line(1000, 1)]);
        let state_before = order.clone();

        let cmd = OrderCommand::UpdateStatus(UpdateStatus {
            order_id: order.id_typed(),
            status: OrderStatus::Processing,
            occurred_at: test_time(),
        });

        let events1 = order.handle(&cmd).unwrap();
        let events2 = order.handle(&cmd).unwrap();

        assert_eq!(order, state_before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn version_increments_on_apply() {
        let order_id = test_order_id();
        let mut order = Order::empty(order_id);
        assert_eq!(order.version(), 0);

        let events = order
            .handle(&OrderCommand::PlaceOrder(place_cmd(
                order_id,
                vec![line(1000, 1)],
            )))
            .unwrap();
        order.apply(&events[0]);
        assert_eq!(order.version(), 1);

        let events = order
            .handle(&OrderCommand::UpdateStatus(UpdateStatus {
                order_id,
                status: OrderStatus::Processing,
                occurred_at: test_time(),
            }))
            .unwrap();
        order.apply(&events[0]);
        assert_eq!(order.version(), 2);
    }
}
