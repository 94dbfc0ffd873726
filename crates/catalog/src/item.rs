use serde::{Deserialize, Serialize};

use kiosk_core::{Entity, ItemId, Money};

/// A sellable menu item.
///
/// Fields are private so the `discount <= price` invariant can only be
/// established through [`MenuItem::from_draft`] and [`MenuItem::patched`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    id: ItemId,
    name: String,
    description: String,
    category: String,
    price: Money,
    discount: Money,
    image_path: String,
    is_special: bool,
    disabled: bool,
}

/// Everything an admin supplies when adding an item (the id is assigned by the store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Money,
    pub discount: Money,
    pub image_path: String,
    pub is_special: bool,
    pub disabled: bool,
}

/// Field-level edit of an existing item. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub discount: Option<Money>,
    pub image_path: Option<String>,
    pub is_special: Option<bool>,
    pub disabled: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A patch built from a full draft replaces every mutable field.
impl From<ItemDraft> for ItemPatch {
    fn from(draft: ItemDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            category: Some(draft.category),
            price: Some(draft.price),
            discount: Some(draft.discount),
            image_path: Some(draft.image_path),
            is_special: Some(draft.is_special),
            disabled: Some(draft.disabled),
        }
    }
}

impl MenuItem {
    /// Build a stored item, clamping the discount to `[0, price]`.
    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            price: draft.price,
            discount: draft.discount.min(draft.price),
            image_path: draft.image_path,
            is_special: draft.is_special,
            disabled: draft.disabled,
        }
    }

    /// The item after `patch`, with the discount clamp re-applied.
    ///
    /// The clamp runs even when only the price changes, so lowering a price
    /// below an existing discount shrinks the discount with it.
    pub fn patched(&self, patch: &ItemPatch) -> Self {
        let price = patch.price.unwrap_or(self.price);
        let discount = patch.discount.unwrap_or(self.discount);
        Self {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            category: patch.category.clone().unwrap_or_else(|| self.category.clone()),
            price,
            discount: discount.min(price),
            image_path: patch
                .image_path
                .clone()
                .unwrap_or_else(|| self.image_path.clone()),
            is_special: patch.is_special.unwrap_or(self.is_special),
            disabled: patch.disabled.unwrap_or(self.disabled),
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn is_special(&self) -> bool {
        self.is_special
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Price minus discount, floored at zero.
    pub fn effective_price(&self) -> Money {
        self.price.saturating_sub(self.discount)
    }

    /// Visible in the customer's category grid (not hidden, not a special).
    pub fn is_browsable(&self) -> bool {
        !self.disabled && !self.is_special
    }
}

impl Entity for MenuItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(price: u64, discount: u64) -> ItemDraft {
        ItemDraft {
            name: "Pretzel".to_string(),
            category: "Snacks".to_string(),
            price: Money::from_cents(price),
            discount: Money::from_cents(discount),
            ..ItemDraft::default()
        }
    }

    #[test]
    fn from_draft_clamps_discount_to_price() {
        let item = MenuItem::from_draft(ItemId::new(), draft(500, 800));
        assert_eq!(item.discount(), Money::from_cents(500));
        assert_eq!(item.effective_price(), Money::ZERO);
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let item = MenuItem::from_draft(ItemId::new(), draft(1000, 200));
        let patched = item.patched(&ItemPatch {
            name: Some("Big Pretzel".to_string()),
            ..ItemPatch::default()
        });

        assert_eq!(patched.name(), "Big Pretzel");
        assert_eq!(patched.category(), "Snacks");
        assert_eq!(patched.price(), Money::from_cents(1000));
        assert_eq!(patched.discount(), Money::from_cents(200));
        assert_eq!(patched.id_typed(), item.id_typed());
    }

    #[test]
    fn lowering_price_reclamps_existing_discount() {
        let item = MenuItem::from_draft(ItemId::new(), draft(1000, 400));
        let patched = item.patched(&ItemPatch {
            price: Some(Money::from_cents(300)),
            ..ItemPatch::default()
        });
        assert_eq!(patched.discount(), Money::from_cents(300));
    }

    #[test]
    fn patch_from_draft_replaces_everything() {
        let item = MenuItem::from_draft(ItemId::new(), draft(1000, 0));
        let replacement = ItemDraft {
            name: "Soda".to_string(),
            description: "Refreshing soda can".to_string(),
            category: "Drinks".to_string(),
            price: Money::from_cents(100),
            discount: Money::ZERO,
            image_path: "/images/soda.png".to_string(),
            is_special: true,
            disabled: true,
        };

        let patched = item.patched(&ItemPatch::from(replacement.clone()));
        assert_eq!(patched, MenuItem::from_draft(item.id_typed(), replacement));
    }

    #[test]
    fn draft_deserializes_with_missing_fields() {
        let draft: ItemDraft =
            serde_json::from_str(r#"{"name":"Hot Dog","price":150}"#).unwrap();
        assert_eq!(draft.name, "Hot Dog");
        assert_eq!(draft.price, Money::from_cents(150));
        assert!(draft.category.is_empty());
        assert!(!draft.is_special);
    }
}
