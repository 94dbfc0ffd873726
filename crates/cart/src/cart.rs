use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kiosk_core::{Aggregate, AggregateRoot, DomainError, ItemId};
use kiosk_events::{Event, execute};

/// One cart line: an item reference and how many of it.
///
/// Prices are deliberately absent; they are read from the catalog at total time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartLine {
    item_id: ItemId,
    quantity: u32,
}

impl CartLine {
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Always `>= 1`.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Outcome of a quantity adjustment. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QuantityAdjustment {
    /// The line now has `quantity`.
    Applied { quantity: u32 },
    /// The adjustment would have reached zero or below; the line is unchanged.
    Rejected,
    /// No line for that item.
    Missing,
}

/// Aggregate root: the customer's cart.
///
/// At most one line per item id; lines keep the order of their first add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    version: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, item_id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    pub fn quantity_of(&self, item_id: ItemId) -> Option<u32> {
        self.line(item_id).map(CartLine::quantity)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `item_id`. Returns the line's new quantity.
    ///
    /// The cart does not check that the item exists in the catalog.
    pub fn add_to_cart(&mut self, item_id: ItemId) -> u32 {
        self.execute_lenient(CartCommand::AddToCart(AddToCart {
            item_id,
            occurred_at: Utc::now(),
        }));
        self.quantity_of(item_id).unwrap_or_default()
    }

    /// Adjust a line by `delta`. Results at or below zero are rejected, not clamped.
    pub fn update_quantity(&mut self, item_id: ItemId, delta: i64) -> QuantityAdjustment {
        let (outcome, _) = self.adjust_quantity(UpdateQuantity {
            item_id,
            delta,
            occurred_at: Utc::now(),
        });
        outcome
    }

    /// Run an `UpdateQuantity` command, returning its outcome and the applied events.
    pub fn adjust_quantity(
        &mut self,
        cmd: UpdateQuantity,
    ) -> (QuantityAdjustment, Vec<CartEvent>) {
        let (item_id, delta) = (cmd.item_id, cmd.delta);
        match execute(self, &CartCommand::UpdateQuantity(cmd)) {
            Ok(events) => match self.quantity_of(item_id) {
                Some(quantity) => (QuantityAdjustment::Applied { quantity }, events),
                None => (QuantityAdjustment::Missing, events),
            },
            Err(DomainError::NotFound) => (QuantityAdjustment::Missing, Vec::new()),
            Err(err) => {
                tracing::debug!(%item_id, delta, error = %err, "quantity adjustment rejected");
                (QuantityAdjustment::Rejected, Vec::new())
            }
        }
    }

    /// Drop the line for `item_id`. Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, item_id: ItemId) -> bool {
        !self
            .execute_lenient(CartCommand::RemoveFromCart(RemoveFromCart {
                item_id,
                occurred_at: Utc::now(),
            }))
            .is_empty()
    }

    pub fn clear(&mut self) {
        self.execute_lenient(CartCommand::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        }));
    }

    /// Run a command, treating a missing line or a rejected quantity as a no-op.
    pub fn execute_lenient(&mut self, cmd: CartCommand) -> Vec<CartEvent> {
        match execute(self, &cmd) {
            Ok(events) => events,
            Err(err) => {
                tracing::debug!(command = ?cmd, error = %err, "cart command ignored");
                Vec::new()
            }
        }
    }

    fn line_mut(&mut self, item_id: ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id == item_id)
    }
}

impl AggregateRoot for Cart {
    /// One cart per kiosk session.
    type Id = ();

    fn id(&self) -> &Self::Id {
        &()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddToCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCart {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub item_id: ItemId,
    pub delta: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveFromCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveFromCart {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddToCart(AddToCart),
    UpdateQuantity(UpdateQuantity),
    RemoveFromCart(RemoveFromCart),
    ClearCart(ClearCart),
}

/// Event: LineAdded (a new line with quantity 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged. Carries the resulting quantity, not the delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub item_id: ItemId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    QuantityChanged(QuantityChanged),
    LineRemoved(LineRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "cart.line.added",
            CartEvent::QuantityChanged(_) => "cart.line.quantity_changed",
            CartEvent::LineRemoved(_) => "cart.line.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => {
                self.lines.push(CartLine {
                    item_id: e.item_id,
                    quantity: 1,
                });
            }
            CartEvent::QuantityChanged(e) => {
                if let Some(line) = self.line_mut(e.item_id) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::LineRemoved(e) => {
                self.lines.retain(|line| line.item_id != e.item_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddToCart(cmd) => self.handle_add(cmd),
            CartCommand::UpdateQuantity(cmd) => self.handle_update_quantity(cmd),
            CartCommand::RemoveFromCart(cmd) => self.handle_remove(cmd),
            CartCommand::ClearCart(cmd) => self.handle_clear(cmd),
        }
    }
}

impl Cart {
    fn handle_add(&self, cmd: &AddToCart) -> Result<Vec<CartEvent>, DomainError> {
        let event = match self.line(cmd.item_id) {
            Some(line) => CartEvent::QuantityChanged(QuantityChanged {
                item_id: cmd.item_id,
                quantity: line.quantity.saturating_add(1),
                occurred_at: cmd.occurred_at,
            }),
            None => CartEvent::LineAdded(LineAdded {
                item_id: cmd.item_id,
                occurred_at: cmd.occurred_at,
            }),
        };
        Ok(vec![event])
    }

    fn handle_update_quantity(
        &self,
        cmd: &UpdateQuantity,
    ) -> Result<Vec<CartEvent>, DomainError> {
        let line = self.line(cmd.item_id).ok_or_else(DomainError::not_found)?;

        if cmd.delta == 0 {
            return Ok(Vec::new());
        }

        let result = i64::from(line.quantity).saturating_add(cmd.delta);
        if result <= 0 {
            return Err(DomainError::InvalidQuantity {
                current: line.quantity,
                delta: cmd.delta,
                result,
            });
        }

        let quantity = u32::try_from(result)
            .map_err(|_| DomainError::validation(format!("quantity {result} is too large")))?;

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            item_id: cmd.item_id,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveFromCart) -> Result<Vec<CartEvent>, DomainError> {
        if self.line(cmd.item_id).is_none() {
            return Err(DomainError::not_found());
        }

        Ok(vec![CartEvent::LineRemoved(LineRemoved {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Result<Vec<CartEvent>, DomainError> {
        if self.lines.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![CartEvent::CartCleared(CartCleared {
            occurred_at: cmd.occurred_at,
        })])
    }
}
