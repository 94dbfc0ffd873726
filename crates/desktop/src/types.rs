//! Shapes exchanged with the UI over the bridge.
//!
//! These are read models built from the session on demand. Amounts are
//! integer cents; ids are UUID strings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use kiosk_auth::Mode;
use kiosk_cart::{CartEvent, CartTotals, TaxRate};
use kiosk_catalog::{CatalogEvent, CategoryFilter, MenuItem};
use kiosk_core::{ItemId, Money, OrderId};
use kiosk_events::Event;

/// A menu item as the UI renders it (matches the `getMenuItems` response shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemRecord {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Money,
    pub discount: Money,
    pub effective_price: Money,
    pub image_path: String,
    pub is_special: bool,
    pub disabled: bool,
}

impl From<&MenuItem> for MenuItemRecord {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id_typed(),
            name: item.name().to_string(),
            description: item.description().to_string(),
            category: item.category().to_string(),
            price: item.price(),
            discount: item.discount(),
            effective_price: item.effective_price(),
            image_path: item.image_path().to_string(),
            is_special: item.is_special(),
            disabled: item.is_disabled(),
        }
    }
}

/// Everything the customer screen shows apart from the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub mode: Mode,
    /// `"All"` first, then the customer categories in ascending order.
    pub categories: Vec<String>,
    pub active_category: CategoryFilter,
    pub items: Vec<MenuItemRecord>,
    /// Capped to the configured display limit.
    pub specials: Vec<MenuItemRecord>,
}

/// A cart line priced against the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub item_id: ItemId,
    /// `None` once the item has been deleted from the catalog.
    pub name: Option<String>,
    pub image_path: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub tax_rate: TaxRate,
    pub totals: CartTotals,
}

/// One line of a placed order, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Event: OrderPlaced. The only record of an order; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub lines: Vec<OrderLine>,
    pub totals: CartTotals,
    pub placed_at: DateTime<Utc>,
}

/// Acknowledgement returned to the UI by `place_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderAck {
    pub order_id: OrderId,
    pub totals: CartTotals,
    pub placed_at: DateTime<Utc>,
}

impl From<&OrderPlaced> for OrderAck {
    fn from(order: &OrderPlaced) -> Self {
        Self {
            order_id: order.order_id,
            totals: order.totals,
            placed_at: order.placed_at,
        }
    }
}

/// Everything published on the session's event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stream", content = "event", rename_all = "snake_case")]
pub enum KioskEvent {
    Catalog(CatalogEvent),
    Cart(CartEvent),
    OrderPlaced(OrderPlaced),
}

impl Event for KioskEvent {
    fn event_type(&self) -> &'static str {
        match self {
            KioskEvent::Catalog(e) => e.event_type(),
            KioskEvent::Cart(e) => e.event_type(),
            KioskEvent::OrderPlaced(_) => "kiosk.order.placed",
        }
    }

    fn version(&self) -> u32 {
        match self {
            KioskEvent::Catalog(e) => e.version(),
            KioskEvent::Cart(e) => e.version(),
            KioskEvent::OrderPlaced(_) => 1,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            KioskEvent::Catalog(e) => e.occurred_at(),
            KioskEvent::Cart(e) => e.occurred_at(),
            KioskEvent::OrderPlaced(e) => e.placed_at,
        }
    }
}
