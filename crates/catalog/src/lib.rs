//! Catalog domain module.
//!
//! Owns the sellable menu items and derives every customer/admin view of them
//! (categories, filtered listings, specials). Pure, deterministic domain logic:
//! no IO, no rendering, no storage.

pub mod item;
pub mod query;
pub mod store;

pub use item::{ItemDraft, ItemPatch, MenuItem};
pub use query::{Categories, CategoryFilter};
pub use store::{
    AddItem, CatalogCommand, CatalogEvent, CatalogStore, DeleteItem, ItemAdded, ItemRemoved,
    ItemUpdated, UpdateItem,
};
