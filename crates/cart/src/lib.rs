//! `storefront-cart` — the shopping cart for one session.
//!
//! A cart is an explicitly owned value: the session that owns it drives every
//! mutation through commands and reads totals back from the same handle. There
//! is no shared global cart state.

pub mod cart;

pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, CartId, CartLine, ClearCart, ItemAdded,
    ItemRemoved, QuantityUpdated, RemoveItem, UpdateQuantity,
};
