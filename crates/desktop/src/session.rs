//! The kiosk's single-owner application state.
//!
//! Every bridge request runs to completion against one `KioskSession` before
//! the next is read. Views are derived on each call; nothing is cached.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use kiosk_auth::{AccessGate, AuthzError, Mode, require_admin};
use kiosk_cart::{
    AddToCart, Cart, CartCommand, ClearCart, QuantityAdjustment, RemoveFromCart, TaxRate,
    UpdateQuantity,
};
use kiosk_catalog::{
    AddItem, CatalogCommand, CatalogStore, CategoryFilter, DeleteItem, ItemDraft, ItemPatch,
    UpdateItem,
};
use kiosk_core::{DomainError, ItemId, OrderId};
use kiosk_events::{EventBus, InMemoryEventBus, Subscription};

use crate::config::KioskConfig;
use crate::menu;
use crate::types::{
    CartLineView, CartView, KioskEvent, MenuItemRecord, MenuView, OrderAck, OrderLine,
    OrderPlaced,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthzError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("item {0} is not on the menu")]
    UnknownItem(ItemId),

    #[error("cannot place an order with an empty cart")]
    EmptyCart,
}

pub struct KioskSession {
    catalog: CatalogStore,
    cart: Cart,
    mode: Mode,
    gate: AccessGate,
    active_category: CategoryFilter,
    tax_rate: TaxRate,
    specials_limit: usize,
    bus: Arc<InMemoryEventBus<KioskEvent>>,
}

impl KioskSession {
    /// A session over `menu`, starting in customer mode with the `All` filter.
    pub fn new(config: &KioskConfig, menu: impl IntoIterator<Item = ItemDraft>) -> Self {
        Self {
            catalog: CatalogStore::with_items(menu),
            cart: Cart::new(),
            mode: Mode::Customer,
            gate: AccessGate::new(config.admin_pin.clone()),
            active_category: CategoryFilter::All,
            tax_rate: config.tax_rate,
            specials_limit: config.specials_limit,
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    /// A session seeded from the configured menu file or the built-in menu.
    pub fn from_config(config: &KioskConfig) -> anyhow::Result<Self> {
        let drafts = menu::seed_menu(config)?;
        Ok(Self::new(config, drafts))
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_category(&self) -> &CategoryFilter {
        &self.active_category
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn bus(&self) -> Arc<InMemoryEventBus<KioskEvent>> {
        Arc::clone(&self.bus)
    }

    /// Follow every event applied from now on.
    pub fn subscribe(&self) -> Subscription<KioskEvent> {
        self.bus.subscribe()
    }

    fn publish(&self, events: impl IntoIterator<Item = KioskEvent>) {
        for event in events {
            if let Err(err) = self.bus.publish(event) {
                tracing::warn!(error = %err, "failed to publish kiosk event");
            }
        }
    }

    fn run_catalog(&mut self, cmd: CatalogCommand) {
        let events = self.catalog.execute_lenient(cmd);
        self.publish(events.into_iter().map(KioskEvent::Catalog));
    }

    fn run_cart(&mut self, cmd: CartCommand) {
        let events = self.cart.execute_lenient(cmd);
        self.publish(events.into_iter().map(KioskEvent::Cart));
    }

    // ── customer side ──────────────────────────────────────────────────────

    /// Every enabled item, specials included, whatever category is selected.
    pub fn menu_items(&self) -> Vec<MenuItemRecord> {
        self.catalog
            .list_for_admin()
            .filter(|item| !item.is_disabled())
            .map(MenuItemRecord::from)
            .collect()
    }

    fn browsable_items(&self) -> Vec<MenuItemRecord> {
        self.catalog
            .list_for_customer(&self.active_category)
            .map(MenuItemRecord::from)
            .collect()
    }

    pub fn select_category(&mut self, filter: CategoryFilter) {
        tracing::debug!(category = %filter, "category selected");
        self.active_category = filter;
    }

    pub fn menu_view(&self) -> MenuView {
        let categories = std::iter::once(CategoryFilter::ALL)
            .chain(self.catalog.customer_categories())
            .map(str::to_string)
            .collect();

        MenuView {
            mode: self.mode,
            categories,
            active_category: self.active_category.clone(),
            items: self.browsable_items(),
            specials: self
                .catalog
                .list_specials()
                .take(self.specials_limit)
                .map(MenuItemRecord::from)
                .collect(),
        }
    }

    /// Add one unit of a catalog item. Ids that are not in the catalog are refused here,
    /// since the cart itself stores whatever id it is given.
    pub fn add_to_cart(&mut self, item_id: ItemId) -> Result<u32, SessionError> {
        if !self.catalog.contains(item_id) {
            return Err(SessionError::UnknownItem(item_id));
        }

        self.run_cart(CartCommand::AddToCart(AddToCart {
            item_id,
            occurred_at: Utc::now(),
        }));
        Ok(self.cart.quantity_of(item_id).unwrap_or_default())
    }

    pub fn update_quantity(&mut self, item_id: ItemId, delta: i64) -> QuantityAdjustment {
        let (outcome, events) = self.cart.adjust_quantity(UpdateQuantity {
            item_id,
            delta,
            occurred_at: Utc::now(),
        });
        self.publish(events.into_iter().map(KioskEvent::Cart));
        outcome
    }

    pub fn remove_from_cart(&mut self, item_id: ItemId) {
        self.run_cart(CartCommand::RemoveFromCart(RemoveFromCart {
            item_id,
            occurred_at: Utc::now(),
        }));
    }

    pub fn clear_cart(&mut self) {
        self.run_cart(CartCommand::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        }));
    }

    pub fn cart_view(&self) -> CartView {
        let lines = self
            .cart
            .priced_lines(&self.catalog)
            .map(|line| {
                let item = self.catalog.get(line.item_id);
                CartLineView {
                    item_id: line.item_id,
                    name: item.map(|i| i.name().to_string()),
                    image_path: item.map(|i| i.image_path().to_string()),
                    quantity: line.quantity,
                    unit_price: line.unit_price.map(|p| p.effective()).unwrap_or_default(),
                    line_total: line.line_total,
                }
            })
            .collect();

        CartView {
            lines,
            tax_rate: self.tax_rate,
            totals: self.cart.compute_totals(&self.catalog, self.tax_rate),
        }
    }

    /// Check out: price the cart, announce the order, then empty the cart.
    ///
    /// Lines whose item has been deleted are dropped from the order and its
    /// totals. A cart with nothing left to sell is refused as empty and kept.
    pub fn place_order(&mut self) -> Result<OrderAck, SessionError> {
        let lines: Vec<OrderLine> = self
            .cart
            .priced_lines(&self.catalog)
            .filter_map(|line| {
                let item = self.catalog.get(line.item_id)?;
                Some(OrderLine {
                    item_id: line.item_id,
                    name: item.name().to_string(),
                    quantity: line.quantity,
                    unit_price: item.effective_price(),
                    line_total: line.line_total,
                })
            })
            .collect();

        if lines.is_empty() {
            return Err(SessionError::EmptyCart);
        }

        let order = OrderPlaced {
            order_id: OrderId::new(),
            lines,
            totals: self.cart.compute_totals(&self.catalog, self.tax_rate),
            placed_at: Utc::now(),
        };

        tracing::info!(
            order_id = %order.order_id,
            lines = order.lines.len(),
            items = order.totals.item_count,
            total = %order.totals.total,
            "order received"
        );

        let ack = OrderAck::from(&order);
        self.publish([KioskEvent::OrderPlaced(order)]);
        self.clear_cart();
        Ok(ack)
    }

    // ── admin side ─────────────────────────────────────────────────────────

    pub fn admin_login(&mut self, pin: &str) -> Result<(), SessionError> {
        self.gate.enter_admin(&mut self.mode, pin)?;
        Ok(())
    }

    pub fn admin_logout(&mut self) {
        self.gate.exit_admin(&mut self.mode);
    }

    pub fn admin_items(&self) -> Result<Vec<MenuItemRecord>, SessionError> {
        require_admin(self.mode, "admin_items")?;
        Ok(self.catalog.list_for_admin().map(MenuItemRecord::from).collect())
    }

    /// Every category in the catalog, hidden and special items included.
    pub fn admin_categories(&self) -> Result<Vec<String>, SessionError> {
        require_admin(self.mode, "admin_categories")?;
        Ok(self.catalog.categories().map(str::to_string).collect())
    }

    pub fn add_item(&mut self, draft: ItemDraft) -> Result<ItemId, SessionError> {
        require_admin(self.mode, "add_item")?;

        let item_id = ItemId::new();
        self.run_catalog(CatalogCommand::AddItem(AddItem {
            item_id,
            draft,
            occurred_at: Utc::now(),
        }));
        tracing::info!(%item_id, "menu item added");
        Ok(item_id)
    }

    /// Unknown ids are ignored.
    pub fn update_item(&mut self, item_id: ItemId, patch: ItemPatch) -> Result<(), SessionError> {
        require_admin(self.mode, "update_item")?;

        self.run_catalog(CatalogCommand::UpdateItem(UpdateItem {
            item_id,
            patch,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Unknown ids are ignored. Cart lines that reference the item stay and price at zero.
    pub fn delete_item(&mut self, item_id: ItemId) -> Result<(), SessionError> {
        require_admin(self.mode, "delete_item")?;

        self.run_catalog(CatalogCommand::DeleteItem(DeleteItem {
            item_id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }
}
