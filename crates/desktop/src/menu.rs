//! Seed menu for a fresh kiosk.

use std::path::Path;

use anyhow::Context;

use kiosk_catalog::ItemDraft;
use kiosk_core::Money;

use crate::config::KioskConfig;

fn seed(name: &str, description: &str, category: &str, cents: u64, image: &str) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price: Money::from_cents(cents),
        image_path: image.to_string(),
        ..ItemDraft::default()
    }
}

/// The built-in demo menu.
pub fn default_menu() -> Vec<ItemDraft> {
    vec![
        seed("Hot Dog", "Classic all-beef hot dog", "Meals", 150, "/images/hotdog.png"),
        seed("Soda", "Refreshing soda can", "Drinks", 100, "/images/soda.png"),
        seed("Pizza Slice", "Cheesy pepperoni slice", "Meals", 250, "/images/pizza.png"),
        seed("Pretzel", "Warm soft pretzel", "Snacks", 200, "/images/pretzel.png"),
    ]
}

/// Read a JSON array of item drafts.
pub fn load_menu(path: &Path) -> anyhow::Result<Vec<ItemDraft>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read menu file {}", path.display()))?;
    let drafts: Vec<ItemDraft> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse menu file {}", path.display()))?;
    Ok(drafts)
}

/// The menu named by the config, or the built-in one.
pub fn seed_menu(config: &KioskConfig) -> anyhow::Result<Vec<ItemDraft>> {
    match &config.menu_path {
        Some(path) => {
            let drafts = load_menu(path)?;
            tracing::info!(path = %path.display(), items = drafts.len(), "loaded seed menu");
            Ok(drafts)
        }
        None => Ok(default_menu()),
    }
}
