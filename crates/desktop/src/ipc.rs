//! Line-oriented JSON bridge: one request object in, one response object out.
//!
//! ```text
//! {"cmd":"add_to_cart","item_id":"0190..."}
//! {"ok":true,"data":{"lines":[...],"tax_rate":1000,"totals":{...}}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kiosk_catalog::{ItemDraft, ItemPatch};

use crate::commands;
use crate::session::KioskSession;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    GetMenuItems,
    PlaceOrder,
    MenuView,
    SelectCategory { category: String },
    AddToCart { item_id: String },
    UpdateQuantity { item_id: String, delta: i64 },
    RemoveFromCart { item_id: String },
    ClearCart,
    ViewCart,
    AdminLogin { pin: String },
    AdminLogout,
    AdminItems,
    AdminCategories,
    AddItem { item: ItemDraft },
    UpdateItem { item_id: String, patch: ItemPatch },
    DeleteItem { item_id: String },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::GetMenuItems => "get_menu_items",
            Request::PlaceOrder => "place_order",
            Request::MenuView => "menu_view",
            Request::SelectCategory { .. } => "select_category",
            Request::AddToCart { .. } => "add_to_cart",
            Request::UpdateQuantity { .. } => "update_quantity",
            Request::RemoveFromCart { .. } => "remove_from_cart",
            Request::ClearCart => "clear_cart",
            Request::ViewCart => "view_cart",
            Request::AdminLogin { .. } => "admin_login",
            Request::AdminLogout => "admin_logout",
            Request::AdminItems => "admin_items",
            Request::AdminCategories => "admin_categories",
            Request::AddItem { .. } => "add_item",
            Request::UpdateItem { .. } => "update_item",
            Request::DeleteItem { .. } => "delete_item",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

fn respond<T: Serialize>(result: Result<T, String>) -> Response {
    match result.and_then(|data| serde_json::to_value(data).map_err(|e| e.to_string())) {
        Ok(data) => Response::success(data),
        Err(error) => Response::failure(error),
    }
}

/// Run one request against the session.
pub fn dispatch(session: &mut KioskSession, request: Request) -> Response {
    let name = request.name();
    let response = match request {
        Request::GetMenuItems => respond(commands::get_menu_items(session)),
        Request::PlaceOrder => respond(commands::place_order(session)),
        Request::MenuView => respond(commands::menu_view(session)),
        Request::SelectCategory { category } => {
            respond(commands::select_category(session, category))
        }
        Request::AddToCart { item_id } => respond(commands::add_to_cart(session, item_id)),
        Request::UpdateQuantity { item_id, delta } => {
            respond(commands::update_quantity(session, item_id, delta))
        }
        Request::RemoveFromCart { item_id } => {
            respond(commands::remove_from_cart(session, item_id))
        }
        Request::ClearCart => respond(commands::clear_cart(session)),
        Request::ViewCart => respond(commands::view_cart(session)),
        Request::AdminLogin { pin } => respond(commands::admin_login(session, pin)),
        Request::AdminLogout => respond(commands::admin_logout(session)),
        Request::AdminItems => respond(commands::admin_items(session)),
        Request::AdminCategories => respond(commands::admin_categories(session)),
        Request::AddItem { item } => respond(commands::add_item(session, item)),
        Request::UpdateItem { item_id, patch } => {
            respond(commands::update_item(session, item_id, patch))
        }
        Request::DeleteItem { item_id } => respond(commands::delete_item(session, item_id)),
    };

    if let Some(error) = &response.error {
        tracing::debug!(cmd = name, %error, "bridge request failed");
    }
    response
}

/// Parse and run one line. Malformed input becomes an error response.
pub fn handle_line(session: &mut KioskSession, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(session, request),
        Err(err) => {
            tracing::warn!(error = %err, "malformed bridge request");
            Response::failure(format!("Invalid request: {}", err))
        }
    }
}
