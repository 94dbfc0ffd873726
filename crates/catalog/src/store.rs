use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kiosk_core::{Aggregate, AggregateRoot, DomainError, ItemId};
use kiosk_events::{Event, execute};

use crate::item::{ItemDraft, ItemPatch, MenuItem};

/// Aggregate root: the kiosk's menu catalog.
///
/// Items are kept in insertion order; every listing preserves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStore {
    items: Vec<MenuItem>,
    version: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog from drafts, in order.
    pub fn with_items(drafts: impl IntoIterator<Item = ItemDraft>) -> Self {
        let mut store = Self::new();
        for draft in drafts {
            store.add_item(draft);
        }
        store
    }

    pub fn get(&self, id: ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id_typed() == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Add an item under a freshly assigned id. Empty names/categories are accepted.
    pub fn add_item(&mut self, draft: ItemDraft) -> ItemId {
        let item_id = ItemId::new();
        let cmd = CatalogCommand::AddItem(AddItem {
            item_id,
            draft,
            occurred_at: Utc::now(),
        });
        // Fresh v7 ids never collide with stored ones, so the command cannot be rejected.
        if let Err(err) = execute(self, &cmd) {
            tracing::error!(%item_id, error = %err, "add_item rejected");
        }
        item_id
    }

    /// Apply `patch` to the item. Unknown ids are ignored.
    pub fn update_item(&mut self, item_id: ItemId, patch: ItemPatch) -> Vec<CatalogEvent> {
        self.execute_lenient(CatalogCommand::UpdateItem(UpdateItem {
            item_id,
            patch,
            occurred_at: Utc::now(),
        }))
    }

    /// Remove the item. Unknown ids are ignored.
    pub fn delete_item(&mut self, item_id: ItemId) -> Vec<CatalogEvent> {
        self.execute_lenient(CatalogCommand::DeleteItem(DeleteItem {
            item_id,
            occurred_at: Utc::now(),
        }))
    }

    /// Run a command, treating missing targets as a no-op.
    pub fn execute_lenient(&mut self, cmd: CatalogCommand) -> Vec<CatalogEvent> {
        match execute(self, &cmd) {
            Ok(events) => events,
            Err(err) => {
                tracing::debug!(command = ?cmd, error = %err, "catalog command ignored");
                Vec::new()
            }
        }
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id_typed() == id)
    }
}

impl AggregateRoot for CatalogStore {
    /// One catalog per kiosk, so the id carries no information.
    type Id = ();

    fn id(&self) -> &Self::Id {
        &()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub item_id: ItemId,
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub item_id: ItemId,
    pub patch: ItemPatch,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteItem {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogCommand {
    AddItem(AddItem),
    UpdateItem(UpdateItem),
    DeleteItem(DeleteItem),
}

/// Event: ItemAdded. Carries the stored (clamped) item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemAdded {
    pub item: MenuItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemUpdated. Carries the item as it is after the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemUpdated {
    pub item: MenuItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRemoved {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogEvent {
    ItemAdded(ItemAdded),
    ItemUpdated(ItemUpdated),
    ItemRemoved(ItemRemoved),
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::ItemAdded(_) => "catalog.item.added",
            CatalogEvent::ItemUpdated(_) => "catalog.item.updated",
            CatalogEvent::ItemRemoved(_) => "catalog.item.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEvent::ItemAdded(e) => e.occurred_at,
            CatalogEvent::ItemUpdated(e) => e.occurred_at,
            CatalogEvent::ItemRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for CatalogStore {
    type Command = CatalogCommand;
    type Event = CatalogEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CatalogEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            CatalogEvent::ItemUpdated(e) => {
                if let Some(pos) = self.position(e.item.id_typed()) {
                    self.items[pos] = e.item.clone();
                }
            }
            CatalogEvent::ItemRemoved(e) => {
                self.items.retain(|item| item.id_typed() != e.item_id);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CatalogCommand::AddItem(cmd) => self.handle_add(cmd),
            CatalogCommand::UpdateItem(cmd) => self.handle_update(cmd),
            CatalogCommand::DeleteItem(cmd) => self.handle_delete(cmd),
        }
    }
}

impl CatalogStore {
    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CatalogEvent>, DomainError> {
        if self.contains(cmd.item_id) {
            return Err(DomainError::conflict(format!(
                "item {} already exists",
                cmd.item_id
            )));
        }

        Ok(vec![CatalogEvent::ItemAdded(ItemAdded {
            item: MenuItem::from_draft(cmd.item_id, cmd.draft.clone()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateItem) -> Result<Vec<CatalogEvent>, DomainError> {
        let current = self.get(cmd.item_id).ok_or_else(DomainError::not_found)?;

        let updated = current.patched(&cmd.patch);
        if &updated == current {
            return Ok(Vec::new());
        }

        Ok(vec![CatalogEvent::ItemUpdated(ItemUpdated {
            item: updated,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteItem) -> Result<Vec<CatalogEvent>, DomainError> {
        if !self.contains(cmd.item_id) {
            return Err(DomainError::not_found());
        }

        Ok(vec![CatalogEvent::ItemRemoved(ItemRemoved {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::Money;

    fn draft(name: &str, category: &str, price: u64, discount: u64) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            description: format!("Description for {name}"),
            category: category.to_string(),
            price: Money::from_cents(price),
            discount: Money::from_cents(discount),
            image_path: "/images/placeholder.jpg".to_string(),
            ..ItemDraft::default()
        }
    }

    #[test]
    fn add_item_assigns_unique_ids_and_keeps_order() {
        let mut store = CatalogStore::new();
        let a = store.add_item(draft("Hot Dog", "Meals", 150, 0));
        let b = store.add_item(draft("Soda", "Drinks", 100, 0));

        assert_ne!(a, b);
        let names: Vec<_> = store.list_for_admin().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Hot Dog", "Soda"]);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn add_item_clamps_discount() {
        let mut store = CatalogStore::new();
        let id = store.add_item(draft("Pretzel", "Snacks", 500, 800));
        assert_eq!(store.get(id).unwrap().discount(), Money::from_cents(500));
    }

    #[test]
    fn add_item_accepts_empty_name_and_category() {
        let mut store = CatalogStore::new();
        let id = store.add_item(draft("", "", 0, 0));
        assert!(store.contains(id));
    }

    #[test]
    fn update_item_reclamps_discount() {
        let mut store = CatalogStore::new();
        let id = store.add_item(draft("Pizza Slice", "Meals", 250, 0));

        let events = store.update_item(
            id,
            ItemPatch {
                discount: Some(Money::from_cents(900)),
                ..ItemPatch::default()
            },
        );

        assert_eq!(events.len(), 1);
        assert_eq!(store.get(id).unwrap().discount(), Money::from_cents(250));
    }

    #[test]
    fn update_of_unknown_id_is_a_silent_noop() {
        let mut store = CatalogStore::new();
        store.add_item(draft("Soda", "Drinks", 100, 0));
        let before = store.clone();

        let events = store.update_item(
            ItemId::new(),
            ItemPatch {
                name: Some("Ghost".to_string()),
                ..ItemPatch::default()
            },
        );

        assert!(events.is_empty());
        assert_eq!(store, before);
    }

    #[test]
    fn update_without_changes_emits_nothing() {
        let mut store = CatalogStore::new();
        let id = store.add_item(draft("Soda", "Drinks", 100, 0));

        let events = store.update_item(id, ItemPatch::default());

        assert!(events.is_empty());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn delete_item_removes_and_ignores_unknown() {
        let mut store = CatalogStore::new();
        let a = store.add_item(draft("Hot Dog", "Meals", 150, 0));
        let b = store.add_item(draft("Soda", "Drinks", 100, 0));

        assert_eq!(store.delete_item(a).len(), 1);
        assert!(store.delete_item(a).is_empty());
        assert!(!store.contains(a));
        assert!(store.contains(b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn handle_surfaces_not_found_and_conflict() {
        let mut store = CatalogStore::new();
        let id = store.add_item(draft("Soda", "Drinks", 100, 0));

        let err = store
            .handle(&CatalogCommand::DeleteItem(DeleteItem {
                item_id: ItemId::new(),
                occurred_at: Utc::now(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);

        let err = store
            .handle(&CatalogCommand::AddItem(AddItem {
                item_id: id,
                draft: draft("Soda", "Drinks", 100, 0),
                occurred_at: Utc::now(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let mut store = CatalogStore::new();
        let id = store.add_item(draft("Soda", "Drinks", 100, 0));
        let before = store.clone();

        let cmd = CatalogCommand::DeleteItem(DeleteItem {
            item_id: id,
            occurred_at: Utc::now(),
        });
        let events1 = store.handle(&cmd).unwrap();
        let events2 = store.handle(&cmd).unwrap();

        assert_eq!(store, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn event_types_are_stable() {
        let mut store = CatalogStore::new();
        let id = store.add_item(draft("Soda", "Drinks", 100, 0));
        let events = store.delete_item(id);
        assert_eq!(events[0].event_type(), "catalog.item.removed");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add { price: u64, discount: u64, category: String },
            Update { index: usize, price: Option<u64>, discount: Option<u64> },
            Delete { index: usize },
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u64..5_000, 0u64..10_000, "[A-D]?").prop_map(|(price, discount, category)| {
                    Op::Add { price, discount, category }
                }),
                (0usize..8, proptest::option::of(0u64..5_000), proptest::option::of(0u64..10_000))
                    .prop_map(|(index, price, discount)| Op::Update { index, price, discount }),
                (0usize..8).prop_map(|index| Op::Delete { index }),
            ]
        }

        fn run(ops: &[Op]) -> CatalogStore {
            let mut store = CatalogStore::new();
            for op in ops {
                match op {
                    Op::Add { price, discount, category } => {
                        store.add_item(draft("Item", category, *price, *discount));
                    }
                    Op::Update { index, price, discount } => {
                        let id = store
                            .items()
                            .get(*index)
                            .map(|i| i.id_typed())
                            .unwrap_or_default();
                        store.update_item(
                            id,
                            ItemPatch {
                                price: price.map(Money::from_cents),
                                discount: discount.map(Money::from_cents),
                                ..ItemPatch::default()
                            },
                        );
                    }
                    Op::Delete { index } => {
                        let id = store
                            .items()
                            .get(*index)
                            .map(|i| i.id_typed())
                            .unwrap_or_default();
                        store.delete_item(id);
                    }
                }
            }
            store
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: discount never exceeds price, whatever the mutation history.
            #[test]
            fn discount_never_exceeds_price(ops in proptest::collection::vec(op(), 0..40)) {
                let store = run(&ops);
                for item in store.list_for_admin() {
                    prop_assert!(item.discount() <= item.price());
                }
            }

            /// Property: categories are sorted, unique and non-empty.
            #[test]
            fn categories_sorted_and_unique(ops in proptest::collection::vec(op(), 0..40)) {
                let store = run(&ops);
                let categories: Vec<&str> = store.categories().collect();
                prop_assert!(categories.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(categories.iter().all(|c| !c.is_empty()));
            }

            /// Property: item ids stay unique.
            #[test]
            fn ids_stay_unique(ops in proptest::collection::vec(op(), 0..40)) {
                let store = run(&ops);
                let mut ids: Vec<ItemId> = store.list_for_admin().map(|i| i.id_typed()).collect();
                let len = ids.len();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), len);
            }
        }
    }
}
