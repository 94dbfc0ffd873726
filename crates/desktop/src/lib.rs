//! `kiosk-desktop`
//!
//! **Responsibility:** the bridge between the kiosk UI and the domain.
//!
//! This crate provides:
//! - The single-owner session state (catalog, cart, mode, event bus)
//! - Bridge commands (`get_menu_items`, `place_order`, cart and admin operations)
//! - A line-oriented JSON dispatcher used by the `kiosk-desktop` binary
//! - Environment configuration and the seed menu
//!
//! Rendering and window management are the UI's business, not this crate's.

pub mod commands;
pub mod config;
pub mod ipc;
pub mod menu;
pub mod session;
pub mod types;

pub use config::KioskConfig;
pub use ipc::{Request, Response, dispatch, handle_line};
pub use session::{KioskSession, SessionError};
