//! Cart domain module.
//!
//! Owns the customer's cart lines and derives subtotal, tax and total from the
//! catalog's *current* prices. Pure, deterministic domain logic (no IO).

pub mod cart;
pub mod totals;

pub use cart::{
    AddToCart, Cart, CartCleared, CartCommand, CartEvent, CartLine, ClearCart, LineAdded,
    LineRemoved, QuantityAdjustment, QuantityChanged, RemoveFromCart, UpdateQuantity,
};
pub use totals::{CartTotals, FnLookup, PriceLookup, PricedLine, TaxRate, UnitPrice};
