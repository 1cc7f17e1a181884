//! `storefront-orders` — customer orders and their status lifecycle.

pub mod order;

pub use order::{
    CustomerInfo, Order, OrderCommand, OrderEvent, OrderId, OrderLineItem, OrderPlaced,
    OrderStatus, OrderStatusUpdated, PlaceOrder, UpdateStatus,
};
