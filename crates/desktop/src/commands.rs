//! Bridge commands exposed to the UI.
//!
//! Each command takes the raw arguments the UI sends (ids as strings), runs
//! one session operation and maps failures to a display string.

use kiosk_cart::QuantityAdjustment;
use kiosk_catalog::{CategoryFilter, ItemDraft, ItemPatch};
use kiosk_core::ItemId;

use crate::session::KioskSession;
use crate::types::{CartView, MenuItemRecord, MenuView, OrderAck};

fn parse_item_id(item_id: &str) -> Result<ItemId, String> {
    item_id
        .parse::<ItemId>()
        .map_err(|e| format!("Invalid item_id: {}", e))
}

/// List every enabled item. Category filtering is the UI's concern (see `menu_view`).
pub fn get_menu_items(session: &KioskSession) -> Result<Vec<MenuItemRecord>, String> {
    Ok(session.menu_items())
}

/// Check out the current cart.
///
/// The order is logged and announced on the event bus; nothing is persisted.
pub fn place_order(session: &mut KioskSession) -> Result<OrderAck, String> {
    session
        .place_order()
        .map_err(|e| format!("Order failed: {}", e))
}

pub fn menu_view(session: &KioskSession) -> Result<MenuView, String> {
    Ok(session.menu_view())
}

/// Select a category; `"All"` clears the filter.
pub fn select_category(session: &mut KioskSession, category: String) -> Result<MenuView, String> {
    session.select_category(CategoryFilter::from(category));
    Ok(session.menu_view())
}

pub fn add_to_cart(session: &mut KioskSession, item_id: String) -> Result<CartView, String> {
    let item_id = parse_item_id(&item_id)?;
    session.add_to_cart(item_id).map_err(|e| e.to_string())?;
    Ok(session.cart_view())
}

/// Adjust a line's quantity. A rejected adjustment still returns the (unchanged) cart.
pub fn update_quantity(
    session: &mut KioskSession,
    item_id: String,
    delta: i64,
) -> Result<CartView, String> {
    let item_id = parse_item_id(&item_id)?;
    if let QuantityAdjustment::Rejected = session.update_quantity(item_id, delta) {
        tracing::debug!(%item_id, delta, "quantity adjustment rejected");
    }
    Ok(session.cart_view())
}

pub fn remove_from_cart(session: &mut KioskSession, item_id: String) -> Result<CartView, String> {
    let item_id = parse_item_id(&item_id)?;
    session.remove_from_cart(item_id);
    Ok(session.cart_view())
}

pub fn clear_cart(session: &mut KioskSession) -> Result<CartView, String> {
    session.clear_cart();
    Ok(session.cart_view())
}

pub fn view_cart(session: &KioskSession) -> Result<CartView, String> {
    Ok(session.cart_view())
}

pub fn admin_login(session: &mut KioskSession, pin: String) -> Result<MenuView, String> {
    session.admin_login(&pin).map_err(|e| e.to_string())?;
    Ok(session.menu_view())
}

pub fn admin_logout(session: &mut KioskSession) -> Result<MenuView, String> {
    session.admin_logout();
    Ok(session.menu_view())
}

pub fn admin_items(session: &KioskSession) -> Result<Vec<MenuItemRecord>, String> {
    session.admin_items().map_err(|e| e.to_string())
}

/// Every category in the catalog, for the admin category pickers.
pub fn admin_categories(session: &KioskSession) -> Result<Vec<String>, String> {
    session.admin_categories().map_err(|e| e.to_string())
}

/// Add a menu item and return it as stored (discount already clamped).
pub fn add_item(session: &mut KioskSession, item: ItemDraft) -> Result<MenuItemRecord, String> {
    let item_id = session.add_item(item).map_err(|e| e.to_string())?;
    session
        .catalog()
        .get(item_id)
        .map(MenuItemRecord::from)
        .ok_or_else(|| format!("item {} vanished after add", item_id))
}

/// Auto-save one or more fields. Unknown ids are ignored and return the admin list unchanged.
pub fn update_item(
    session: &mut KioskSession,
    item_id: String,
    patch: ItemPatch,
) -> Result<Vec<MenuItemRecord>, String> {
    let item_id = parse_item_id(&item_id)?;
    session
        .update_item(item_id, patch)
        .map_err(|e| e.to_string())?;
    admin_items(session)
}

pub fn delete_item(
    session: &mut KioskSession,
    item_id: String,
) -> Result<Vec<MenuItemRecord>, String> {
    let item_id = parse_item_id(&item_id)?;
    session.delete_item(item_id).map_err(|e| e.to_string())?;
    admin_items(session)
}
